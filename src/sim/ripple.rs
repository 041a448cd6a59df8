//! Expanding-radius ripple over the board
//!
//! The radius grows continuously (`speed * dt` per tick), so the reveal is
//! independent of tick granularity. A cell fires the first tick its squared
//! distance to the origin drops below `radius²`, then leaves the candidate
//! set, so it can never fire twice even if one tick overshoots several rings.

use std::fmt;

use glam::Vec3;

use super::board::Board;
use super::cell::{Cell, CellCoord};
use crate::error::{GridError, Result};

/// Action applied once to each cell a ripple reaches
pub type CellAction = Box<dyn FnMut(&mut Cell) + Send>;

/// Bookkeeping for the active ripple
pub struct RippleRun {
    pub id: u64,
    pub origin: Vec3,
    pub speed: f32,
    pub max_radius: f32,
    pub radius: f32,
    /// Storage indices of cells that haven't fired yet
    remaining: Vec<usize>,
    action: CellAction,
}

impl RippleRun {
    /// Cells still waiting for the wave
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

impl fmt::Debug for RippleRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RippleRun")
            .field("id", &self.id)
            .field("origin", &self.origin)
            .field("speed", &self.speed)
            .field("max_radius", &self.max_radius)
            .field("radius", &self.radius)
            .field("remaining", &self.remaining.len())
            .finish_non_exhaustive()
    }
}

/// Scheduler state
#[derive(Debug, Default)]
pub enum RippleState {
    #[default]
    Idle,
    Running(RippleRun),
    Cancelled { id: u64 },
    Completed { id: u64 },
}

/// What a single tick did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RippleTick {
    /// Cells fired this tick (no particular order within the tick)
    pub fired: Vec<CellCoord>,
    /// Set when the run finished during this tick
    pub completed: Option<u64>,
}

/// Drives at most one ripple at a time
#[derive(Debug, Default)]
pub struct RippleScheduler {
    state: RippleState,
    next_id: u64,
}

impl RippleScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RippleState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RippleState::Running(_))
    }

    /// Id of the running ripple, if any
    pub fn active_id(&self) -> Option<u64> {
        match &self.state {
            RippleState::Running(run) => Some(run.id),
            _ => None,
        }
    }

    /// Start a ripple from `origin`, superseding any running one.
    ///
    /// Returns the new run id. `board` is only read to collect the cells;
    /// the same board must be passed to every `tick` of this run.
    pub fn start(
        &mut self,
        board: &Board,
        origin: Vec3,
        speed: f32,
        max_radius: f32,
        action: CellAction,
    ) -> Result<u64> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(GridError::InvalidRippleSpeed(speed));
        }

        self.cancel();

        self.next_id += 1;
        let id = self.next_id;
        self.state = RippleState::Running(RippleRun {
            id,
            origin,
            speed,
            max_radius,
            radius: 0.0,
            remaining: (0..board.len()).collect(),
            action,
        });
        log::info!(
            "Ripple {} started at ({:.2}, {:.2}, {:.2}), speed {}",
            id,
            origin.x,
            origin.y,
            origin.z,
            speed
        );
        Ok(id)
    }

    /// Stop the running ripple. Cells it hasn't reached never fire.
    ///
    /// Returns the cancelled run id.
    pub fn cancel(&mut self) -> Option<u64> {
        let RippleState::Running(run) = &self.state else {
            return None;
        };
        let id = run.id;
        log::debug!("Ripple {} cancelled with {} cells unreached", id, run.remaining.len());
        self.state = RippleState::Cancelled { id };
        Some(id)
    }

    /// Grow the radius by `speed * dt` and fire every cell it now covers.
    ///
    /// Non-finite or negative `dt` leaves the run untouched.
    pub fn tick(&mut self, board: &mut Board, dt: f32) -> RippleTick {
        let RippleState::Running(run) = &mut self.state else {
            return RippleTick::default();
        };
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Ripple {} ignoring bad timestep {}", run.id, dt);
            return RippleTick::default();
        }

        run.radius += run.speed * dt;
        let radius_sq = run.radius * run.radius;

        let origin = run.origin;
        let action = &mut run.action;
        let mut fired = Vec::new();
        run.remaining.retain(|&index| {
            let cell = board.cell_at_mut(index);
            if cell.distance_squared(origin) < radius_sq {
                action(cell);
                fired.push(cell.coord);
                false
            } else {
                true
            }
        });

        let mut completed = None;
        if run.radius >= run.max_radius || run.remaining.is_empty() {
            let id = run.id;
            log::info!(
                "Ripple {} completed at radius {:.2} ({} cells unreached)",
                id,
                run.radius,
                run.remaining.len()
            );
            self.state = RippleState::Completed { id };
            completed = Some(id);
        }

        RippleTick { fired, completed }
    }
}
