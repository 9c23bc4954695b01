//! [`IconHost`] implementation backed by the desktop list view.
//!
//! The list view answers `LVM_GETITEMPOSITION` by writing a `POINT` through
//! a pointer, and that pointer must be valid inside Explorer.  A read
//! therefore:
//!
//! 1. opens Explorer with just the VM rights it needs,
//! 2. allocates a `POINT`-sized block inside it,
//! 3. asks the list view to fill the block,
//! 4. copies the block back,
//! 5. frees the block and closes the process handle.
//!
//! Step 5 is owned by [`RemoteBuffer`] and [`ProcessHandle`] and runs on
//! every exit path.  A write needs no remote memory: `LVM_SETITEMPOSITION`
//! takes the coordinates packed into `lParam`.

use super::locator::DesktopHandle;
use crate::grid::PixelPosition;
use crate::traits::{IconHost, IconIndex};
use log::debug;
use std::ffi::c_void;
use std::mem::size_of;
use windows::Win32::Foundation::{CloseHandle, FALSE, HANDLE, LPARAM, POINT, WPARAM};
use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
use windows::Win32::System::Memory::{
    VirtualAllocEx, VirtualFreeEx, MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_READWRITE,
};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_VM_OPERATION, PROCESS_VM_READ, PROCESS_VM_WRITE,
};
use windows::Win32::UI::Controls::{LVM_GETITEMCOUNT, LVM_GETITEMPOSITION, LVM_SETITEMPOSITION};
use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SendMessageW, SM_CXSCREEN};

/// The desktop's icons, addressed through its list view.
pub struct DesktopIcons {
    handle: DesktopHandle,
}

impl DesktopIcons {
    pub fn new(handle: DesktopHandle) -> Self {
        Self { handle }
    }
}

/// An open handle to the owning process, closed on drop.
struct ProcessHandle(HANDLE);

impl ProcessHandle {
    fn open(process_id: u32) -> Option<Self> {
        let access = PROCESS_VM_OPERATION | PROCESS_VM_READ | PROCESS_VM_WRITE;
        match unsafe { OpenProcess(access, FALSE, process_id) } {
            Ok(handle) => Some(Self(handle)),
            Err(e) => {
                debug!("open process {}: {}", process_id, e);
                None
            }
        }
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        if let Err(e) = unsafe { CloseHandle(self.0) } {
            debug!("close process handle: {}", e);
        }
    }
}

/// A block of memory inside the owning process, freed on drop.
struct RemoteBuffer<'a> {
    process: &'a ProcessHandle,
    ptr: *mut c_void,
}

impl<'a> RemoteBuffer<'a> {
    fn alloc(process: &'a ProcessHandle, len: usize) -> Option<Self> {
        let ptr = unsafe {
            VirtualAllocEx(process.0, None, len, MEM_COMMIT | MEM_RESERVE, PAGE_READWRITE)
        };
        if ptr.is_null() {
            debug!("remote allocation of {} bytes failed", len);
            return None;
        }
        Some(Self { process, ptr })
    }

    fn read_point(&self) -> Option<POINT> {
        let mut point = POINT::default();
        let mut read = 0usize;
        let result = unsafe {
            ReadProcessMemory(
                self.process.0,
                self.ptr,
                &mut point as *mut POINT as *mut c_void,
                size_of::<POINT>(),
                Some(&mut read),
            )
        };
        match result {
            Ok(()) if read == size_of::<POINT>() => Some(point),
            Ok(()) => {
                debug!("short remote read: {} bytes", read);
                None
            }
            Err(e) => {
                debug!("remote read: {}", e);
                None
            }
        }
    }
}

impl Drop for RemoteBuffer<'_> {
    fn drop(&mut self) {
        if let Err(e) = unsafe { VirtualFreeEx(self.process.0, self.ptr, 0, MEM_RELEASE) } {
            debug!("remote free: {}", e);
        }
    }
}

/// Pack a position the way `MAKELPARAM` does: x in the low word, y in the
/// high word.
fn pack_position(pos: PixelPosition) -> LPARAM {
    let packed = ((pos.y as u32 & 0xFFFF) << 16) | (pos.x as u32 & 0xFFFF);
    LPARAM(packed as isize)
}

impl IconHost for DesktopIcons {
    fn icon_count(&self) -> usize {
        let count = unsafe {
            SendMessageW(self.handle.list_view, LVM_GETITEMCOUNT, WPARAM(0), LPARAM(0))
        };
        usize::try_from(count.0).unwrap_or(0)
    }

    fn icon_position(&self, index: IconIndex) -> Option<PixelPosition> {
        let process = ProcessHandle::open(self.handle.process_id)?;
        let buffer = RemoteBuffer::alloc(&process, size_of::<POINT>())?;
        let ok = unsafe {
            SendMessageW(
                self.handle.list_view,
                LVM_GETITEMPOSITION,
                WPARAM(index),
                LPARAM(buffer.ptr as isize),
            )
        };
        if ok.0 == 0 {
            debug!("list view rejected position request for icon {}", index);
            return None;
        }
        let point = buffer.read_point()?;
        Some(PixelPosition::new(point.x, point.y))
    }

    fn set_icon_position(&self, index: IconIndex, pos: PixelPosition) {
        let ok = unsafe {
            SendMessageW(
                self.handle.list_view,
                LVM_SETITEMPOSITION,
                WPARAM(index),
                pack_position(pos),
            )
        };
        if ok.0 == 0 {
            debug!("failed to move icon {} to ({}, {})", index, pos.x, pos.y);
        }
    }

    fn screen_width(&self) -> i32 {
        unsafe { GetSystemMetrics(SM_CXSCREEN) }
    }
}
