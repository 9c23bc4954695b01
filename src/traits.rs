//! Core traits that decouple iconsnake from the Windows shell and from any
//! particular keyboard API.
//!
//! The [`Engine`](crate::game::Engine), the [`calibrate`](crate::grid::calibrate)
//! heuristic and the [`Session`](crate::session::Session) controller only
//! depend on these abstractions.  The concrete backends live in
//! `crate::desktop` and are only compiled on Windows.

use crate::command::InputState;
use crate::grid::PixelPosition;

/// Index of one desktop icon slot, in `[0, icon_count)`.
///
/// Stable for the lifetime of the shell process; iconsnake never creates or
/// removes icons.
pub type IconIndex = usize;

/// Read/write access to the icon positions of a desktop.
///
/// Every method is infallible from the caller's point of view.  A backend
/// that cannot complete a request collapses the failure:
///
/// * [`icon_position`](IconHost::icon_position) returns `None`, which callers
///   treat as "skip this icon".
/// * [`set_icon_position`](IconHost::set_icon_position) does nothing and logs
///   the failure.  Writes are idempotent, so the next write of the same icon
///   corrects it.
pub trait IconHost {
    /// Number of icons currently present.
    fn icon_count(&self) -> usize;

    /// Current on-screen position of icon `index`.
    fn icon_position(&self, index: IconIndex) -> Option<PixelPosition>;

    /// Move icon `index` to `pos`.  Best effort.
    fn set_icon_position(&self, index: IconIndex, pos: PixelPosition);

    /// Width of the primary screen in physical pixels.
    fn screen_width(&self) -> i32;
}

impl<T: IconHost + ?Sized> IconHost for &T {
    fn icon_count(&self) -> usize {
        (**self).icon_count()
    }

    fn icon_position(&self, index: IconIndex) -> Option<PixelPosition> {
        (**self).icon_position(index)
    }

    fn set_icon_position(&self, index: IconIndex, pos: PixelPosition) {
        (**self).set_icon_position(index, pos)
    }

    fn screen_width(&self) -> i32 {
        (**self).screen_width()
    }
}

/// A source of steering and stop commands.
///
/// Implementations report the *current* key state; they must not block and
/// must not queue events.  The session polls once per loop iteration.
pub trait InputSource {
    /// Read the current input state.
    fn poll(&mut self) -> InputState;
}

/// Test doubles shared by the unit tests of every module.
#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use crate::command::Direction;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    /// An in-memory desktop that records every write made to it.
    ///
    /// A `None` slot models an icon whose position cannot be read; writes to
    /// such a slot are recorded but do not make it readable.
    #[derive(Debug)]
    pub struct MockDesktop {
        pub positions: RefCell<Vec<Option<PixelPosition>>>,
        pub writes: RefCell<Vec<(IconIndex, PixelPosition)>>,
        pub screen_width: i32,
    }

    impl MockDesktop {
        pub fn new(positions: Vec<(i32, i32)>, screen_width: i32) -> Self {
            Self {
                positions: RefCell::new(
                    positions
                        .into_iter()
                        .map(|(x, y)| Some(PixelPosition::new(x, y)))
                        .collect(),
                ),
                writes: RefCell::new(Vec::new()),
                screen_width,
            }
        }

        /// A desktop with the calibration anchors in place plus `extra`
        /// icons parked outside the anchor column and row.
        ///
        /// Grid step is `100x90`, origin `(20, 10)`, the lower-left boundary
        /// sits on row 9 and the screen is 2020px wide, so the calibrated
        /// grid is 20 columns by 10 rows.
        pub fn anchored(extra: usize) -> Self {
            let mut icons = vec![(20, 10), (20, 100), (120, 10), (20, 820)];
            for i in 0..extra {
                icons.push((320 + 100 * (i as i32 % 10), 280 + 90 * (i as i32 / 10)));
            }
            Self::new(icons, 2020)
        }

        pub fn position(&self, index: IconIndex) -> Option<PixelPosition> {
            self.positions.borrow()[index]
        }

        pub fn all_positions(&self) -> Vec<Option<PixelPosition>> {
            self.positions.borrow().clone()
        }

        pub fn write_count(&self) -> usize {
            self.writes.borrow().len()
        }

        pub fn make_unreadable(&self, index: IconIndex) {
            self.positions.borrow_mut()[index] = None;
        }
    }

    impl IconHost for MockDesktop {
        fn icon_count(&self) -> usize {
            self.positions.borrow().len()
        }

        fn icon_position(&self, index: IconIndex) -> Option<PixelPosition> {
            self.positions.borrow().get(index).copied().flatten()
        }

        fn set_icon_position(&self, index: IconIndex, pos: PixelPosition) {
            self.writes.borrow_mut().push((index, pos));
            if let Some(slot) = self.positions.borrow_mut().get_mut(index) {
                if slot.is_some() {
                    *slot = Some(pos);
                }
            }
        }

        fn screen_width(&self) -> i32 {
            self.screen_width
        }
    }

    /// An input source that replays a fixed script, then stays idle.
    #[derive(Debug, Default)]
    pub struct ScriptedInput {
        pub script: VecDeque<InputState>,
        pub polls: Cell<usize>,
    }

    impl ScriptedInput {
        pub fn new(script: impl IntoIterator<Item = InputState>) -> Self {
            Self {
                script: script.into_iter().collect(),
                polls: Cell::new(0),
            }
        }

        /// Steer once, then press stop after `idle` empty polls.
        pub fn steer_then_stop(direction: Direction, idle: usize) -> Self {
            let mut script = vec![InputState::steer(direction)];
            script.extend(std::iter::repeat(InputState::default()).take(idle));
            script.push(InputState::stop());
            Self::new(script)
        }
    }

    impl InputSource for ScriptedInput {
        fn poll(&mut self) -> InputState {
            self.polls.set(self.polls.get() + 1);
            self.script.pop_front().unwrap_or_default()
        }
    }
}
