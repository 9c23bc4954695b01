//! Input vocabulary shared by the engine and the session controller.
//!
//! [`Direction`] is a four-way steering command and [`InputState`] is the
//! snapshot an [`InputSource`](crate::traits::InputSource) hands out each
//! time it is polled.

use std::fmt;

/// Direction of travel on the grid.
///
/// Rows grow downwards, matching screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Grid delta `(dcol, drow)` of one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    /// The direction pointing the other way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// One poll of the input source.
///
/// Last read wins: nothing is queued between polls, so a key that was
/// pressed and released between two polls is simply never seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    /// Requested direction, if any steering key is held.
    pub direction: Option<Direction>,
    /// Whether the stop key is held.
    pub stop: bool,
}

impl InputState {
    /// A poll in which only `direction` is held.
    pub fn steer(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            stop: false,
        }
    }

    /// A poll in which the stop key is held.
    pub fn stop() -> Self {
        Self {
            direction: None,
            stop: true,
        }
    }
}

/// Physical keys the game listens to, independent of any platform's key
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Escape,
}

/// Steering bindings, in priority order: when several are held the first
/// match wins.
const BINDINGS: [(Direction, [Key; 2]); 4] = [
    (Direction::Up, [Key::W, Key::Up]),
    (Direction::Down, [Key::S, Key::Down]),
    (Direction::Left, [Key::A, Key::Left]),
    (Direction::Right, [Key::D, Key::Right]),
];

impl InputState {
    /// Build a poll result from a key-state predicate.
    pub fn from_keys(is_down: impl Fn(Key) -> bool) -> Self {
        let direction = BINDINGS
            .iter()
            .find(|(_, keys)| keys.iter().any(|&k| is_down(k)))
            .map(|(d, _)| *d);
        Self {
            direction,
            stop: is_down(Key::Escape),
        }
    }
}
