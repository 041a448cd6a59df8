//! Board configuration
//!
//! Loaded from JSON; every field falls back to the defaults in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GridError, Result};
use crate::sim::CellParams;

/// Board size, ripple tuning and cell lighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    // === Layout ===
    pub width: usize,
    pub height: usize,
    /// Distance between neighbouring cells (world units)
    pub cell_spacing: f32,

    // === Ripple ===
    /// Radius growth in world units per second
    pub ripple_speed: f32,
    pub max_ripple_radius: f32,

    // === Cell lighting ===
    pub off_brightness: f32,
    pub ping_brightness: f32,
    pub num_ghosts: u32,
    /// Seconds between ping decay steps
    pub ghost_update_time: f32,
    pub min_flicker_interval: f32,
    pub max_flicker_interval: f32,
    pub min_flicker_offset: f32,
    pub max_flicker_offset: f32,

    /// RNG seed for AI sampling and flicker
    pub seed: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            cell_spacing: CELL_SPACING,

            ripple_speed: RIPPLE_SPEED,
            max_ripple_radius: MAX_RIPPLE_RADIUS,

            off_brightness: OFF_BRIGHTNESS,
            ping_brightness: PING_BRIGHTNESS,
            num_ghosts: NUM_GHOSTS,
            ghost_update_time: GHOST_UPDATE_TIME,
            min_flicker_interval: MIN_FLICKER_INTERVAL,
            max_flicker_interval: MAX_FLICKER_INTERVAL,
            min_flicker_offset: MIN_FLICKER_OFFSET,
            max_flicker_offset: MAX_FLICKER_OFFSET,

            seed: 0,
        }
    }
}

impl GridConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded {}x{} board config from {}",
            config.width,
            config.height,
            path.display()
        );
        Ok(config)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(GridError::InvalidConfig(msg));

        if self.width == 0 || self.height == 0 {
            return invalid(format!("board must be non-empty, got {}x{}", self.width, self.height));
        }
        if !self.cell_spacing.is_finite() || self.cell_spacing <= 0.0 {
            return invalid(format!("cell_spacing must be positive, got {}", self.cell_spacing));
        }
        if !self.ripple_speed.is_finite() || self.ripple_speed <= 0.0 {
            return invalid(format!("ripple_speed must be positive, got {}", self.ripple_speed));
        }
        if !self.max_ripple_radius.is_finite() || self.max_ripple_radius < 0.0 {
            return invalid(format!(
                "max_ripple_radius must be non-negative, got {}",
                self.max_ripple_radius
            ));
        }
        self.cell_params().validate()
    }

    /// Lighting constants handed to every cell
    pub fn cell_params(&self) -> CellParams {
        CellParams {
            off_brightness: self.off_brightness,
            ping_brightness: self.ping_brightness,
            num_ghosts: self.num_ghosts,
            ghost_update_time: self.ghost_update_time,
            min_flicker_interval: self.min_flicker_interval,
            max_flicker_interval: self.max_flicker_interval,
            min_flicker_offset: self.min_flicker_offset,
            max_flicker_offset: self.max_flicker_offset,
        }
    }
}
