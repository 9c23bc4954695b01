//! Resolution of the desktop's icon list control.
//!
//! The icons live in a list view nested three levels deep:
//! `Progman` → `SHELLDLL_DefView` → `SysListView32`.  If any link is missing
//! (a replacement shell, or a layout this chain does not cover) the lookup
//! fails and nothing is touched.

use log::info;
use windows::core::{HSTRING, PCWSTR};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{FindWindowExW, FindWindowW, GetWindowThreadProcessId};

const PROGMAN: &str = "Progman";
const DEF_VIEW: &str = "SHELLDLL_DefView";
const LIST_VIEW: &str = "SysListView32";

/// The desktop icon list control and the process that owns it.
#[derive(Debug, Clone, Copy)]
pub struct DesktopHandle {
    pub list_view: HWND,
    pub process_id: u32,
}

/// Errors from [`locate`].
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    #[error("desktop window {class:?} not found")]
    NotFound { class: &'static str },
}

/// Find the desktop list view and its owning process.
pub fn locate() -> Result<DesktopHandle, LocatorError> {
    let progman = find_window(None, PROGMAN)?;
    let def_view = find_window(Some(progman), DEF_VIEW)?;
    let list_view = find_window(Some(def_view), LIST_VIEW)?;

    let mut process_id = 0u32;
    unsafe { GetWindowThreadProcessId(list_view, Some(&mut process_id)) };
    if process_id == 0 {
        return Err(LocatorError::NotFound { class: LIST_VIEW });
    }

    info!(
        "found desktop list view {:?} in process {}",
        list_view.0, process_id
    );
    Ok(DesktopHandle {
        list_view,
        process_id,
    })
}

/// Top-level window of class `class`, or the first child of `parent` with it.
fn find_window(parent: Option<HWND>, class: &'static str) -> Result<HWND, LocatorError> {
    let wide = HSTRING::from(class);
    let name = PCWSTR(wide.as_ptr());
    let found = match parent {
        None => unsafe { FindWindowW(name, PCWSTR::null()) },
        Some(parent) => unsafe { FindWindowExW(parent, HWND::default(), name, PCWSTR::null()) },
    };
    found
        .ok()
        .filter(|h| !h.is_invalid())
        .ok_or(LocatorError::NotFound { class })
}
