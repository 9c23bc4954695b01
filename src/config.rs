//! Application configuration.
//!
//! The configuration is loaded from a JSON file, by default
//! `%APPDATA%\iconsnake\config.json`, or from the path passed with
//! `--config <path>`.  Every field is optional; a minimal `{}` file is valid
//! and all sections fall back to their compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "game": {
//!     "base_tick_secs": 0.25,
//!     "restore_delay_ms": 1000
//!   },
//!   "calibration": { "tolerance_px": 15 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Game pacing and presentation.
    #[serde(default)]
    pub game: GameConfig,

    /// Grid inference settings.
    #[serde(default)]
    pub calibration: CalibrationConfig,
}

/// Game pacing.
///
/// The tick length is `max(min_tick_secs, base_tick_secs -
/// tick_per_segment_secs × snake_length)`, so the snake speeds up as it
/// grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tick length of a zero-length snake.  Default: `0.3`.
    pub base_tick_secs: f64,
    /// Tick length removed per snake segment.  Default: `0.005`.
    pub tick_per_segment_secs: f64,
    /// Shortest possible tick.  Default: `0.05` (20 ticks per second).
    pub min_tick_secs: f64,
    /// How often input is polled between ticks (ms).  Default: `10`.
    pub poll_interval_ms: u64,
    /// Pause between icon writes while the board is laid out (ms).
    /// Default: `10`.
    pub placement_delay_ms: u64,
    /// Pause after the game ends, before the desktop is restored (ms).
    /// Default: `2000`.
    pub restore_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_tick_secs: 0.3,
            tick_per_segment_secs: 0.005,
            min_tick_secs: 0.05,
            poll_interval_ms: 10,
            placement_delay_ms: 10,
            restore_delay_ms: 2000,
        }
    }
}

impl GameConfig {
    /// Tick length for a snake of `length` segments.
    pub fn tick_interval(&self, length: usize) -> Duration {
        let secs = self.base_tick_secs - self.tick_per_segment_secs * length as f64;
        Duration::from_secs_f64(secs.max(self.min_tick_secs).max(0.0))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn placement_delay(&self) -> Duration {
        Duration::from_millis(self.placement_delay_ms)
    }

    pub fn restore_delay(&self) -> Duration {
        Duration::from_millis(self.restore_delay_ms)
    }
}

/// Grid inference settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Pixel distance under which two icons count as sharing a row or
    /// column.  Default: `20`.
    pub tolerance_px: i32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self { tolerance_px: 20 }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
