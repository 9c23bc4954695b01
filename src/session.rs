//! The session controller that ties calibration, the snapshot and the engine
//! together.
//!
//! [`Session::run`] walks the whole lifecycle:
//!
//! 1. check the icon count and [`calibrate`] the grid (nothing moved yet),
//! 2. capture the [`Snapshot`],
//! 3. lay out and place the board,
//! 4. poll input and tick the [`Engine`] until a terminal state or a stop,
//! 5. run the finish hook, wait, and restore the desktop.
//!
//! Once the snapshot exists, every exit path restores it: the normal ones
//! explicitly, a panic through the [`RestoreGuard`].  The finish hook always
//! runs first, with [`SessionEnd::Aborted`] when the loop panicked.

use crate::config::Config;
use crate::game::{Collision, Engine, GameState, SetupError, MIN_ICONS};
use crate::grid::{calibrate, CalibrationError};
use crate::snapshot::{RestoreGuard, Snapshot};
use crate::traits::{IconHost, InputSource};
use log::{debug, info};
use rand::rngs::StdRng;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Cancellation token for a running session.
///
/// Clones share the same flag.  Stopping is level-triggered: the session
/// checks the flag once per loop iteration and then goes straight to
/// restoration.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the session to stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a session that got as far as playing ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    GameOver { collision: Collision, length: usize },
    Won { length: usize },
    Stopped { length: usize },
    /// The game loop panicked.  Only ever passed to the finish hook.
    Aborted,
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEnd::GameOver { collision, length } => {
                write!(f, "game over: the snake {} at length {}", collision, length)
            }
            SessionEnd::Won { length } => write!(f, "you won with length {}", length),
            SessionEnd::Stopped { length } => write!(f, "stopped at length {}", length),
            SessionEnd::Aborted => write!(f, "the game was aborted by an unexpected error"),
        }
    }
}

/// Why a session could not be played.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("calibration failed: {0}")]
    Calibration(#[from] CalibrationError),
    #[error("setup failed: {0}")]
    Setup(#[from] SetupError),
}

type FinishHook<'a> = Box<dyn FnOnce(&SessionEnd) + 'a>;

/// Runs the finish hook at most once, on unwind if nobody called
/// [`finish`](FinishGuard::finish).
///
/// Must be created after the [`RestoreGuard`] so that it drops first.
struct FinishGuard<'a> {
    hook: Option<FinishHook<'a>>,
}

impl FinishGuard<'_> {
    fn finish(&mut self, end: &SessionEnd) {
        if let Some(hook) = self.hook.take() {
            hook(end);
        }
    }
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.finish(&SessionEnd::Aborted);
        }
    }
}

/// One game on one desktop.
///
/// Generic over the [`IconHost`] and [`InputSource`] so the whole lifecycle
/// runs against test doubles.
pub struct Session<'a, H: IconHost, I: InputSource> {
    host: H,
    input: I,
    config: Config,
    stop: StopSignal,
    on_finish: Option<FinishHook<'a>>,
}

impl<'a, H: IconHost, I: InputSource> Session<'a, H, I> {
    pub fn new(host: H, input: I, config: Config) -> Self {
        Self {
            host,
            input,
            config,
            stop: StopSignal::new(),
            on_finish: None,
        }
    }

    /// Use an externally owned stop signal.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Run `hook` once the game has ended, before the restore delay and the
    /// restore itself.  Also runs, with [`SessionEnd::Aborted`], when the game
    /// loop panics.  The binary uses it to bring the console back so the
    /// result is visible while the board is still on screen.
    pub fn on_finish(mut self, hook: impl FnOnce(&SessionEnd) + 'a) -> Self {
        self.on_finish = Some(Box::new(hook));
        self
    }

    /// A handle on this session's stop signal.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Play one game.
    ///
    /// Errors are returned before the board is placed; in that case no icon
    /// has been moved (or the snapshot has already been written back).
    pub fn run(self, rng: StdRng) -> Result<SessionEnd, SessionError> {
        let Session {
            host,
            mut input,
            config,
            stop,
            on_finish,
        } = self;

        let count = host.icon_count();
        if count < MIN_ICONS {
            return Err(SetupError::TooFewIcons {
                found: count,
                needed: MIN_ICONS,
            }
            .into());
        }
        let grid = calibrate(&host, config.calibration.tolerance_px)?;

        let guard = RestoreGuard::new(&host, Snapshot::capture(&host, count));
        let mut engine = match Engine::new(grid, &guard.snapshot().indices(), rng) {
            Ok(engine) => engine,
            Err(e) => {
                guard.restore();
                return Err(e.into());
            }
        };
        let mut finish = FinishGuard { hook: on_finish };
        engine.place(&host, config.game.placement_delay());
        info!("game started");

        let poll_interval = config.game.poll_interval();
        let mut last_tick = Instant::now();
        let end = loop {
            if stop.is_stopped() {
                break SessionEnd::Stopped {
                    length: engine.len(),
                };
            }

            let polled = input.poll();
            if polled.stop {
                info!("stop requested");
                stop.stop();
                continue;
            }
            if let Some(direction) = polled.direction {
                engine.steer(direction);
            }

            if last_tick.elapsed() >= config.game.tick_interval(engine.len()) {
                last_tick = Instant::now();
                match engine.tick(&host) {
                    GameState::Running => {}
                    GameState::GameOver(collision) => {
                        break SessionEnd::GameOver {
                            collision,
                            length: engine.len(),
                        }
                    }
                    GameState::Won => {
                        break SessionEnd::Won {
                            length: engine.len(),
                        }
                    }
                }
            }

            if !poll_interval.is_zero() {
                std::thread::sleep(poll_interval);
            }
        };
        info!("{}", end);

        finish.finish(&end);
        let delay = config.game.restore_delay();
        if !delay.is_zero() {
            debug!("restoring desktop in {:?}", delay);
            std::thread::sleep(delay);
        }
        guard.restore();
        Ok(end)
    }
}
