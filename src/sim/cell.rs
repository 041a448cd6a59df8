//! Board cells: lighting state, ping decay and idle flicker

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::element::Element;
use super::ping::PingSequence;
use crate::consts::*;
use crate::error::{GridError, Result};

/// Integer board coordinates, x in [0, width), y in [0, height)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: usize,
    pub y: usize,
}

impl CellCoord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Lighting constants shared by every cell on a board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellParams {
    pub off_brightness: f32,
    pub ping_brightness: f32,
    pub num_ghosts: u32,
    pub ghost_update_time: f32,
    pub min_flicker_interval: f32,
    pub max_flicker_interval: f32,
    pub min_flicker_offset: f32,
    pub max_flicker_offset: f32,
}

impl Default for CellParams {
    fn default() -> Self {
        Self {
            off_brightness: OFF_BRIGHTNESS,
            ping_brightness: PING_BRIGHTNESS,
            num_ghosts: NUM_GHOSTS,
            ghost_update_time: GHOST_UPDATE_TIME,
            min_flicker_interval: MIN_FLICKER_INTERVAL,
            max_flicker_interval: MAX_FLICKER_INTERVAL,
            min_flicker_offset: MIN_FLICKER_OFFSET,
            max_flicker_offset: MAX_FLICKER_OFFSET,
        }
    }
}

impl CellParams {
    /// Reject values that would panic or stall a cell tick
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(GridError::InvalidConfig(msg));

        if !self.off_brightness.is_finite() || !self.ping_brightness.is_finite() {
            return invalid(format!(
                "brightness must be finite, got off {} / ping {}",
                self.off_brightness, self.ping_brightness
            ));
        }
        if self.num_ghosts > MAX_NUM_GHOSTS {
            return invalid(format!(
                "num_ghosts must be at most {MAX_NUM_GHOSTS}, got {}",
                self.num_ghosts
            ));
        }
        if !self.ghost_update_time.is_finite() || self.ghost_update_time < 0.0 {
            return invalid(format!(
                "ghost_update_time must be non-negative, got {}",
                self.ghost_update_time
            ));
        }
        if !self.min_flicker_interval.is_finite()
            || !self.max_flicker_interval.is_finite()
            || self.min_flicker_interval < 0.0
            || self.min_flicker_interval > self.max_flicker_interval
        {
            return invalid(format!(
                "flicker interval range {}..={} is invalid",
                self.min_flicker_interval, self.max_flicker_interval
            ));
        }
        if !self.min_flicker_offset.is_finite()
            || !self.max_flicker_offset.is_finite()
            || self.min_flicker_offset > self.max_flicker_offset
        {
            return invalid(format!(
                "flicker offset range {}..={} is invalid",
                self.min_flicker_offset, self.max_flicker_offset
            ));
        }
        Ok(())
    }
}

/// One board cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub coord: CellCoord,
    pub enabled: bool,
    pub element: Element,
    pub brightness: f32,
    /// Brightness the idle flicker jitters around
    base_brightness: f32,
    /// World position, fixed at creation
    position: Vec3,
    /// Active ping, if any
    ping: Option<PingSequence>,
    /// Seconds until the next flicker; flicker stops once this is <= 0
    flicker_timer: f32,
}

impl Cell {
    /// A switched-off cell
    pub fn new(coord: CellCoord, position: Vec3, params: &CellParams) -> Self {
        let mut cell = Self {
            coord,
            enabled: false,
            element: Element::None,
            brightness: params.off_brightness,
            base_brightness: params.off_brightness,
            position,
            ping: None,
            flicker_timer: params.max_flicker_interval,
        };
        cell.off(params.off_brightness);
        cell
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn base_brightness(&self) -> f32 {
        self.base_brightness
    }

    /// The active ping, if the cell is mid-flash
    pub fn ping_sequence(&self) -> Option<&PingSequence> {
        self.ping.as_ref()
    }

    pub fn is_pinging(&self) -> bool {
        self.ping.is_some()
    }

    /// Squared distance from this cell to a world point
    #[inline]
    pub fn distance_squared(&self, point: Vec3) -> f32 {
        (self.position - point).length_squared()
    }

    /// Light the cell with an element. Cancels any active ping.
    pub fn on(&mut self, element: Element, brightness: f32) {
        self.ping = None;
        self.set_lit(element, brightness);
    }

    /// Switch the cell off. Cancels any active ping.
    pub fn off(&mut self, off_brightness: f32) {
        self.ping = None;
        self.enabled = false;
        self.element = Element::None;
        self.brightness = off_brightness;
        self.base_brightness = off_brightness;
    }

    /// Flash the cell with an element, then decay to off over later ticks.
    ///
    /// The cell reads as disabled for the whole flash.
    pub fn ping(&mut self, element: Element, params: &CellParams) {
        self.set_lit(element, params.ping_brightness);
        self.ping = Some(PingSequence::new(
            element,
            self.brightness,
            params.num_ghosts,
            params.ghost_update_time,
        ));
        self.enabled = false;
    }

    fn set_lit(&mut self, element: Element, brightness: f32) {
        self.enabled = true;
        self.element = element;
        self.brightness = brightness;
        self.base_brightness = brightness;
    }

    /// Advance ping decay or idle flicker. Returns true if brightness or
    /// enabled state changed.
    ///
    /// Non-finite or negative `dt` is ignored.
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, params: &CellParams, rng: &mut R) -> bool {
        if !dt.is_finite() || dt < 0.0 {
            return false;
        }
        if let Some(seq) = self.ping.as_mut() {
            if !seq.advance(dt) {
                return false;
            }
            let finished = seq.is_finished();
            let brightness = seq.brightness();
            if finished {
                self.off(params.off_brightness);
            } else {
                self.brightness = brightness;
                self.base_brightness = brightness;
            }
            return true;
        }

        if self.flicker_timer <= 0.0 {
            return false;
        }
        self.flicker_timer -= dt;
        if self.flicker_timer >= 0.0 {
            return false;
        }
        self.flicker_timer =
            rng.random_range(params.min_flicker_interval..=params.max_flicker_interval);
        self.brightness = self.base_brightness
            + rng.random_range(params.min_flicker_offset..=params.max_flicker_offset);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn cell() -> Cell {
        Cell::new(CellCoord::new(1, 2), Vec3::new(1.0, 2.0, 0.0), &CellParams::default())
    }

    #[test]
    fn test_new_cell_is_off() {
        let cell = cell();
        assert!(!cell.enabled);
        assert_eq!(cell.element, Element::None);
        assert_eq!(cell.brightness, OFF_BRIGHTNESS);
        assert_eq!(cell.position(), Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_on_then_off() {
        let mut cell = cell();
        cell.on(Element::Fire, 0.4);
        assert!(cell.enabled);
        assert_eq!(cell.element, Element::Fire);
        assert_eq!(cell.brightness, 0.4);
        assert_eq!(cell.base_brightness(), 0.4);

        cell.off(OFF_BRIGHTNESS);
        assert!(!cell.enabled);
        assert_eq!(cell.element, Element::None);
        assert_eq!(cell.brightness, OFF_BRIGHTNESS);
    }

    #[test]
    fn test_ping_decays_then_turns_off() {
        let params = CellParams::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut cell = cell();

        cell.ping(Element::Water, &params);
        assert!(!cell.enabled);
        assert!(cell.is_pinging());
        assert_eq!(cell.element, Element::Water);
        assert_eq!(cell.brightness, PING_BRIGHTNESS);

        let mut seen = vec![cell.brightness];
        for _ in 0..params.num_ghosts + 1 {
            assert!(cell.tick(GHOST_UPDATE_TIME, &params, &mut rng));
            seen.push(cell.brightness);
        }

        assert!(!cell.is_pinging());
        assert_eq!(cell.element, Element::None);
        assert_eq!(cell.brightness, OFF_BRIGHTNESS);
        // Two ghost steps, then off
        assert!(seen[1] < seen[0] && seen[2] < seen[1]);
    }

    #[test]
    fn test_on_cancels_ping() {
        let params = CellParams::default();
        let mut cell = cell();
        cell.ping(Element::Air, &params);
        cell.on(Element::Earth, 0.6);
        assert!(!cell.is_pinging());
        assert!(cell.enabled);
        assert_eq!(cell.brightness, 0.6);
    }

    #[test]
    fn test_flicker_waits_for_interval() {
        let params = CellParams::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut cell = cell();
        cell.on(Element::Light, 0.5);

        // First flicker fires once the initial max interval has elapsed
        assert!(!cell.tick(1.0, &params, &mut rng));
        assert!(!cell.tick(0.9, &params, &mut rng));
        assert!(cell.tick(0.2, &params, &mut rng));

        let offset = cell.brightness - cell.base_brightness();
        assert!(offset >= params.min_flicker_offset - 1e-6);
        assert!(offset <= params.max_flicker_offset + 1e-6);
        // Base is untouched by flicker
        assert_eq!(cell.base_brightness(), 0.5);
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let params = CellParams::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut cell = cell();
        cell.ping(Element::Fire, &params);

        assert!(!cell.tick(f32::NAN, &params, &mut rng));
        assert!(!cell.tick(-1.0, &params, &mut rng));
        assert!(!cell.tick(f32::INFINITY, &params, &mut rng));
        assert_eq!(cell.ping_sequence().map(|p| p.step()), Some(0));

        // Still decays normally afterwards
        for _ in 0..params.num_ghosts + 1 {
            assert!(cell.tick(GHOST_UPDATE_TIME, &params, &mut rng));
        }
        assert!(!cell.is_pinging());
    }

    #[test]
    fn test_params_validate() {
        assert!(CellParams::default().validate().is_ok());

        // Degenerate ranges are fine: flicker becomes fixed
        let fixed = CellParams {
            min_flicker_interval: 1.0,
            max_flicker_interval: 1.0,
            min_flicker_offset: 0.1,
            max_flicker_offset: 0.1,
            ..CellParams::default()
        };
        assert!(fixed.validate().is_ok());
        let mut rng = Pcg32::seed_from_u64(9);
        let mut cell = Cell::new(CellCoord::new(0, 0), Vec3::ZERO, &fixed);
        cell.on(Element::Fire, 0.5);
        assert!(!cell.tick(0.9, &fixed, &mut rng));
        assert!(cell.tick(0.2, &fixed, &mut rng));
        assert!((cell.brightness - 0.6).abs() < 1e-6);

        let bad = [
            CellParams {
                min_flicker_interval: 3.0,
                max_flicker_interval: 1.0,
                ..CellParams::default()
            },
            CellParams {
                min_flicker_offset: 0.5,
                max_flicker_offset: -0.5,
                ..CellParams::default()
            },
            CellParams {
                num_ghosts: u32::MAX,
                ..CellParams::default()
            },
            CellParams {
                ping_brightness: f32::NAN,
                ..CellParams::default()
            },
            CellParams {
                off_brightness: f32::INFINITY,
                ..CellParams::default()
            },
            CellParams {
                ghost_update_time: -0.1,
                ..CellParams::default()
            },
        ];
        for params in bad {
            assert!(matches!(params.validate(), Err(GridError::InvalidConfig(_))), "{params:?}");
        }
    }

    #[test]
    fn test_flicker_paused_while_pinging() {
        let params = CellParams {
            ghost_update_time: 10.0,
            ..CellParams::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut cell = cell();
        cell.ping(Element::Dark, &params);
        for _ in 0..5 {
            assert!(!cell.tick(1.0, &params, &mut rng));
        }
        assert_eq!(cell.brightness, PING_BRIGHTNESS);
    }
}
