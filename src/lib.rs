//! **iconsnake**: Snake played with the real icons of the Windows desktop.
//!
//! The desktop's own icons become the snake, the food and the border.  The
//! grid is inferred from where the icons currently sit, the game moves
//! icons by rewriting their positions inside Explorer, and the original
//! layout is written back when the game ends, however it ends.
//!
//! # Architecture
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::IconHost`]: reads and writes icon positions, so calibration,
//!   the snapshot and the engine are not coupled to Win32.
//! * [`traits::InputSource`]: reports the current key state, so the game
//!   loop is not coupled to any specific keyboard API.
//!
//! [`session::Session`] drives the lifecycle on top of them.  The Win32
//! backends live in `desktop` and are only built on Windows.

pub mod command;
pub mod config;
#[cfg(windows)]
pub mod desktop;
pub mod game;
pub mod grid;
pub mod session;
pub mod snapshot;
pub mod traits;
