//! Console window bookkeeping, console control events and DPI awareness.

use crate::session::StopSignal;
use log::{info, warn};
use std::sync::OnceLock;
use std::time::Duration;
use windows::Win32::Foundation::{BOOL, FALSE, HWND, TRUE};
use windows::Win32::System::Console::{
    GetConsoleWindow, SetConsoleCtrlHandler, CTRL_BREAK_EVENT, CTRL_CLOSE_EVENT, CTRL_C_EVENT,
    CTRL_LOGOFF_EVENT, CTRL_SHUTDOWN_EVENT,
};
use windows::Win32::UI::HiDpi::{SetProcessDpiAwareness, PROCESS_PER_MONITOR_DPI_AWARE};
use windows::Win32::UI::WindowsAndMessaging::{
    SetProcessDPIAware, ShowWindow, SW_MINIMIZE, SW_RESTORE,
};

/// The console window this process is attached to.
pub struct Console {
    hwnd: HWND,
}

impl Console {
    /// The current console window, if there is one.
    pub fn attach() -> Option<Self> {
        let hwnd = unsafe { GetConsoleWindow() };
        (!hwnd.is_invalid()).then_some(Self { hwnd })
    }

    /// Get the console out of the way of the icons.
    pub fn minimize(&self) {
        let _ = unsafe { ShowWindow(self.hwnd, SW_MINIMIZE) };
    }

    pub fn restore(&self) {
        let _ = unsafe { ShowWindow(self.hwnd, SW_RESTORE) };
    }
}

/// Opt out of DPI virtualisation so screen metrics are in physical pixels,
/// the same space icon positions are reported in.
pub fn set_dpi_awareness() {
    if unsafe { SetProcessDpiAwareness(PROCESS_PER_MONITOR_DPI_AWARE) }.is_ok() {
        info!("DPI awareness: per monitor");
    } else if unsafe { SetProcessDPIAware() }.as_bool() {
        info!("DPI awareness: system");
    } else {
        warn!("could not set DPI awareness, screen metrics may be scaled");
    }
}

/// How long a close, logoff or shutdown event is held back so the session
/// can put the icons back.  Windows kills the process after about five
/// seconds regardless.
const CLOSE_GRACE: Duration = Duration::from_millis(4500);

static STOP: OnceLock<StopSignal> = OnceLock::new();

/// Console control events iconsnake reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleEvent {
    /// Ctrl+C or Ctrl+Break: the process keeps running.
    Interrupt,
    /// The console is going away: the process ends when the handler returns.
    Close,
}

fn classify(event: u32) -> Option<ConsoleEvent> {
    match event {
        CTRL_C_EVENT | CTRL_BREAK_EVENT => Some(ConsoleEvent::Interrupt),
        CTRL_CLOSE_EVENT | CTRL_LOGOFF_EVENT | CTRL_SHUTDOWN_EVENT => Some(ConsoleEvent::Close),
        _ => None,
    }
}

unsafe extern "system" fn on_console_event(event: u32) -> BOOL {
    let (Some(kind), Some(stop)) = (classify(event), STOP.get()) else {
        return FALSE;
    };
    stop.stop();
    if kind == ConsoleEvent::Close {
        std::thread::sleep(CLOSE_GRACE);
    }
    TRUE
}

/// Turn Ctrl+C, Ctrl+Break and closing the console into `stop`.
///
/// Only the first signal passed in is used.
pub fn forward_stop_events(stop: StopSignal) -> windows::core::Result<()> {
    if STOP.set(stop).is_err() {
        warn!("console events already forwarded to another stop signal");
    }
    unsafe { SetConsoleCtrlHandler(Some(on_console_event), TRUE) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupts_and_closes_are_told_apart() {
        assert_eq!(classify(CTRL_C_EVENT), Some(ConsoleEvent::Interrupt));
        assert_eq!(classify(CTRL_BREAK_EVENT), Some(ConsoleEvent::Interrupt));
        assert_eq!(classify(CTRL_CLOSE_EVENT), Some(ConsoleEvent::Close));
        assert_eq!(classify(CTRL_SHUTDOWN_EVENT), Some(ConsoleEvent::Close));
        assert_eq!(classify(42), None);
    }
}
