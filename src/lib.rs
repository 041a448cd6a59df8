//! Ripple Grid - tick-driven board reveal core
//!
//! Core modules:
//! - `sim`: Deterministic board simulation (cells, ripple, shapes, pings)
//! - `settings`: Data-driven board configuration
//! - `error`: Error type shared by every fallible operation

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{GridError, Result};
pub use settings::GridConfig;

/// Board configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default board dimensions
    pub const BOARD_WIDTH: usize = 20;
    pub const BOARD_HEIGHT: usize = 20;
    /// Distance between neighbouring cell centres in world units
    pub const CELL_SPACING: f32 = 1.0;

    /// Ripple defaults
    pub const RIPPLE_SPEED: f32 = 20.0;
    /// Ripple stops once its radius reaches this distance
    pub const MAX_RIPPLE_RADIUS: f32 = 30.0;

    /// Brightness of a cell that is switched off
    pub const OFF_BRIGHTNESS: f32 = 0.8;
    /// Brightness a ping flashes to before decaying
    pub const PING_BRIGHTNESS: f32 = 0.8;
    /// Intermediate decay steps of a ping (total steps = ghosts + 1)
    pub const NUM_GHOSTS: u32 = 2;
    /// Upper bound on ping ghost steps accepted from config
    pub const MAX_NUM_GHOSTS: u32 = 1024;
    /// Seconds between ping decay steps
    pub const GHOST_UPDATE_TIME: f32 = 0.0125;

    /// Idle flicker interval range (seconds)
    pub const MIN_FLICKER_INTERVAL: f32 = 0.5;
    pub const MAX_FLICKER_INTERVAL: f32 = 2.0;
    /// Idle flicker brightness offset range
    pub const MIN_FLICKER_OFFSET: f32 = -0.15;
    pub const MAX_FLICKER_OFFSET: f32 = 0.25;

    /// Grid line intensity for empty / element-carrying cells
    pub const EMPTY_GRID_INTENSITY: f32 = 0.9;
    pub const ELEMENT_GRID_INTENSITY: f32 = 0.1;
}

/// Grayscale luminance of an RGB pixel, normalized to [0, 1]
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    ((r as f32 + g as f32 + b as f32) / 3.0) / 255.0
}

/// Positive modulo (result in [0, m)), like a wrap-around repeat
#[inline]
pub fn wrap_index(value: i64, m: i64) -> i64 {
    value.rem_euclid(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance() {
        assert_eq!(luminance(0, 0, 0), 0.0);
        assert!((luminance(255, 255, 255) - 1.0).abs() < 1e-6);
        assert!((luminance(255, 0, 0) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(19, 20), 19);
        assert_eq!(wrap_index(-1, 20), 19);
        assert_eq!(wrap_index(20, 20), 0);
    }
}
