//! [`InputSource`] backed by the asynchronous key state.
//!
//! `GetAsyncKeyState` reports whether a key is down right now, regardless
//! of which window has focus, so the game can be steered while the console
//! is minimised.

use crate::command::{InputState, Key};
use crate::traits::InputSource;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, VIRTUAL_KEY, VK_A, VK_D, VK_DOWN, VK_ESCAPE, VK_LEFT, VK_RIGHT, VK_S, VK_UP,
    VK_W,
};

/// Global keyboard state.
#[derive(Debug, Default)]
pub struct Keyboard;

impl Keyboard {
    pub fn new() -> Self {
        Self
    }
}

fn virtual_key(key: Key) -> VIRTUAL_KEY {
    match key {
        Key::W => VK_W,
        Key::A => VK_A,
        Key::S => VK_S,
        Key::D => VK_D,
        Key::Up => VK_UP,
        Key::Down => VK_DOWN,
        Key::Left => VK_LEFT,
        Key::Right => VK_RIGHT,
        Key::Escape => VK_ESCAPE,
    }
}

fn is_down(key: Key) -> bool {
    // The most significant bit is set while the key is held.
    unsafe { GetAsyncKeyState(i32::from(virtual_key(key).0)) < 0 }
}

impl InputSource for Keyboard {
    fn poll(&mut self) -> InputState {
        InputState::from_keys(is_down)
    }
}
