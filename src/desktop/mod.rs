//! Windows desktop implementations.
//!
//! This module provides the concrete backends for the
//! [`IconHost`](crate::traits::IconHost) and
//! [`InputSource`](crate::traits::InputSource) traits, powered by the Win32
//! API: the desktop is a `SysListView32` control hosted by Explorer, so
//! every position request crosses into Explorer's address space.
//!
//! Nothing outside this module should reference Win32 directly.

pub mod channel;
pub mod console;
pub mod keyboard;
pub mod locator;
