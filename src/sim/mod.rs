//! Deterministic board simulation
//!
//! All board logic lives here. This module must stay pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable row-major iteration order
//! - No rendering, audio or platform dependencies

pub mod board;
pub mod cell;
pub mod element;
pub mod event;
pub mod grid;
pub mod ping;
pub mod ripple;
pub mod shape;

pub use board::Board;
pub use cell::{Cell, CellCoord, CellParams};
pub use element::Element;
pub use event::{EffectCue, GridEvent};
pub use grid::Grid;
pub use ping::PingSequence;
pub use ripple::{CellAction, RippleRun, RippleScheduler, RippleState, RippleTick};
pub use shape::{
    Rgb, ShapeAction, ShapeImage, ShapePlan, ai_candidates, check_dimensions, plan_shape,
    sample_for_ai,
};
