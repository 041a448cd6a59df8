//! Element tags carried by active cells

use serde::{Deserialize, Serialize};

use crate::consts::{ELEMENT_GRID_INTENSITY, EMPTY_GRID_INTENSITY};

/// Game resource / colour category assigned to a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Element {
    #[default]
    None,
    Fire,
    Water,
    Earth,
    Air,
    Light,
    Dark,
}

impl Element {
    /// Every element except `None`
    pub const ALL: [Element; 6] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Air,
        Element::Light,
        Element::Dark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Element::None => "None",
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Earth => "Earth",
            Element::Air => "Air",
            Element::Light => "Light",
            Element::Dark => "Dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Element::None),
            "fire" => Some(Element::Fire),
            "water" => Some(Element::Water),
            "earth" => Some(Element::Earth),
            "air" => Some(Element::Air),
            "light" => Some(Element::Light),
            "dark" => Some(Element::Dark),
            _ => None,
        }
    }

    /// Tint used for the cell fresnel and tap particles (linear RGB)
    pub fn color(&self) -> [f32; 3] {
        match self {
            Element::None => [1.0, 1.0, 1.0],
            Element::Fire => [1.0, 0.35, 0.1],
            Element::Water => [0.15, 0.5, 1.0],
            Element::Earth => [0.45, 0.8, 0.2],
            Element::Air => [0.8, 0.95, 1.0],
            Element::Light => [1.0, 0.9, 0.4],
            Element::Dark => [0.45, 0.2, 0.7],
        }
    }

    /// Grid line intensity: bright lines on empty cells, faint under an element
    pub fn grid_intensity(&self) -> f32 {
        if *self == Element::None {
            EMPTY_GRID_INTENSITY
        } else {
            ELEMENT_GRID_INTENSITY
        }
    }
}
