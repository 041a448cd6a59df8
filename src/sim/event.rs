//! Events emitted for the rendering / audio collaborators
//!
//! The core never draws or plays anything. It queues these and the host
//! drains them once per frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellCoord};
use super::element::Element;

/// Fire-and-forget audio / particle triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectCue {
    /// A shape started rippling in
    ShapeEnabled { origin: Vec3 },
    /// A tile was tapped; particles take the element colour
    Tapped {
        coord: CellCoord,
        position: Vec3,
        element: Element,
        color: [f32; 3],
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridEvent {
    /// Visible state of a cell changed
    CellChanged {
        coord: CellCoord,
        enabled: bool,
        element: Element,
        brightness: f32,
    },
    Effect(EffectCue),
    RippleStarted { id: u64, origin: Vec3 },
    RippleCancelled { id: u64 },
    RippleCompleted { id: u64 },
}

impl GridEvent {
    /// Snapshot of a cell's visible state
    pub fn cell_changed(cell: &Cell) -> Self {
        GridEvent::CellChanged {
            coord: cell.coord,
            enabled: cell.enabled,
            element: cell.element,
            brightness: cell.brightness,
        }
    }
}
