//! Board-level controller: shapes, element ripples, taps and AI targets
//!
//! Owns the board, the ripple scheduler, a seeded RNG and the event queue.
//! All mutation goes through `&mut Grid`, one tick at a time.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::board::Board;
use super::cell::{Cell, CellCoord};
use super::element::Element;
use super::event::{EffectCue, GridEvent};
use super::ripple::{CellAction, RippleScheduler, RippleState};
use super::shape::{ShapeImage, plan_shape, sample_for_ai};
use crate::error::Result;
use crate::settings::GridConfig;

/// A board plus everything that drives it
#[derive(Debug)]
pub struct Grid {
    config: GridConfig,
    board: Board,
    ripple: RippleScheduler,
    rng: Pcg32,
    events: Vec<GridEvent>,
}

impl Grid {
    /// Lay out a fresh board on the XY plane from the config
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        let board = Board::from_grid_layout(
            config.width,
            config.height,
            config.cell_spacing,
            config.cell_params(),
        )?;
        Ok(Self::assemble(config, board))
    }

    /// Use caller-supplied cell positions (`width * height` of them, filled
    /// column by column as in `Board::from_positions`)
    pub fn with_positions<I>(config: GridConfig, positions: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        config.validate()?;
        let board = Board::from_positions(config.width, config.height, positions, config.cell_params())?;
        Ok(Self::assemble(config, board))
    }

    fn assemble(config: GridConfig, board: Board) -> Self {
        log::info!("Grid {}x{} ready (seed {})", board.width(), board.height(), config.seed);
        Self {
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            board,
            ripple: RippleScheduler::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ripple_state(&self) -> &RippleState {
        self.ripple.state()
    }

    pub fn is_rippling(&self) -> bool {
        self.ripple.is_running()
    }

    /// Queued events, oldest first. Clears the queue.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    /// Cancel the running ripple. Pings already in flight keep decaying.
    pub fn stop_all(&mut self) {
        if let Some(id) = self.ripple.cancel() {
            self.events.push(GridEvent::RippleCancelled { id });
        }
    }

    /// Ripple `image` onto the board from `origin`.
    ///
    /// Black pixels ping with `element`, the rest light at their luminance.
    /// The image is checked in full before anything changes.
    pub fn set_shape(&mut self, image: &ShapeImage, element: Element, origin: Vec3) -> Result<u64> {
        self.stop_all();
        self.events
            .push(GridEvent::Effect(EffectCue::ShapeEnabled { origin }));

        let plan = plan_shape(&self.board, image, element)?;
        let params = *self.board.params();
        let action: CellAction = Box::new(move |cell: &mut Cell| {
            if let Some(action) = plan.action_for(cell.coord) {
                action.apply(cell, &params);
            }
        });
        self.start_ripple(origin, action)
    }

    /// Ping every cell with `element` as the ripple passes
    pub fn ripple_element(&mut self, element: Element, origin: Vec3) -> Result<u64> {
        self.stop_all();
        let params = *self.board.params();
        let action: CellAction = Box::new(move |cell: &mut Cell| cell.ping(element, &params));
        self.start_ripple(origin, action)
    }

    fn start_ripple(&mut self, origin: Vec3, action: CellAction) -> Result<u64> {
        let id = self.ripple.start(
            &self.board,
            origin,
            self.config.ripple_speed,
            self.config.max_ripple_radius,
            action,
        )?;
        self.events.push(GridEvent::RippleStarted { id, origin });
        Ok(id)
    }

    /// Report a tap on a tile. `None` (tap missed the board) does nothing.
    pub fn tap_tile(&mut self, coord: Option<CellCoord>) -> Result<()> {
        let Some(coord) = coord else {
            return Ok(());
        };
        let cell = self.board.get(coord.x, coord.y)?;
        self.events.push(GridEvent::Effect(EffectCue::Tapped {
            coord,
            position: cell.position(),
            element: cell.element,
            color: cell.element.color(),
        }));
        Ok(())
    }

    /// Closest cell to a world point
    pub fn nearest_cell(&self, point: Vec3, include_disabled: bool) -> Option<CellCoord> {
        self.board.nearest(point, include_disabled).map(|cell| cell.coord)
    }

    /// Random AI target from a shape, `None` if the shape is all black
    pub fn random_cell_from_shape_for_ai(&mut self, image: &ShapeImage) -> Result<Option<CellCoord>> {
        sample_for_ai(&self.board, image, &mut self.rng)
    }

    pub fn set_on(&mut self, coord: CellCoord, element: Element, brightness: f32) -> Result<()> {
        self.board.set_on(coord.x, coord.y, element, brightness)?;
        self.push_cell_changed(coord)
    }

    pub fn set_off(&mut self, coord: CellCoord) -> Result<()> {
        self.board.set_off(coord.x, coord.y)?;
        self.push_cell_changed(coord)
    }

    pub fn ping(&mut self, coord: CellCoord, element: Element) -> Result<()> {
        self.board.ping(coord.x, coord.y, element)?;
        self.push_cell_changed(coord)
    }

    fn push_cell_changed(&mut self, coord: CellCoord) -> Result<()> {
        let cell = self.board.get(coord.x, coord.y)?;
        self.events.push(GridEvent::cell_changed(cell));
        Ok(())
    }

    /// Advance one frame.
    ///
    /// Cell pings and flicker step first, then the ripple, so a ping started
    /// by the ripple holds its flash for at least one full tick.
    pub fn tick(&mut self, dt: f32) {
        let mut changed = self.board.tick_cells(dt, &mut self.rng);

        let ripple = self.ripple.tick(&mut self.board, dt);
        changed.extend(ripple.fired);

        for coord in changed {
            if let Ok(cell) = self.board.get(coord.x, coord.y) {
                self.events.push(GridEvent::cell_changed(cell));
            }
        }
        if let Some(id) = ripple.completed {
            self.events.push(GridEvent::RippleCompleted { id });
        }
    }
}
