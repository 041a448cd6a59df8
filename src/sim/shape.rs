//! Shape images: per-cell activation plans and AI target sampling
//!
//! Cell `(x, y)` reads pixel `x * board_width + y` from the image's flat
//! buffer. With boards filled column by column (see `Board::from_positions`)
//! that is pixel `i` for the cell built from position `i` on square boards.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::cell::{Cell, CellCoord, CellParams};
use super::element::Element;
use crate::error::{GridError, Result};
use crate::{luminance, wrap_index};

/// 8-bit RGB pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// "No activation" sentinel
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        *self == Self::BLACK
    }

    /// Grayscale brightness in [0, 1]
    #[inline]
    pub fn luminance(&self) -> f32 {
        luminance(self.r, self.g, self.b)
    }
}

/// In-memory image, pixels stored row-major (`y * width + x`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl ShapeImage {
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(GridError::LayoutMismatch {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Build an image by evaluating `f(x, y)` for every pixel
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Rgb) -> Self {
        let pixels = (0..width * height).map(|i| f(i % width, i / width)).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Pixel by flat buffer index
    pub fn pixel(&self, index: usize) -> Result<Rgb> {
        self.pixels
            .get(index)
            .copied()
            .ok_or(GridError::PixelOutOfRange {
                index,
                len: self.pixels.len(),
            })
    }
}

/// What a shape does to one cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeAction {
    /// Flash and decay (black pixel)
    Ping(Element),
    /// Light at the pixel's luminance
    On { element: Element, brightness: f32 },
}

impl ShapeAction {
    /// Action for a single pixel
    pub fn from_pixel(pixel: Rgb, element: Element) -> Self {
        if pixel.is_black() {
            ShapeAction::Ping(element)
        } else {
            ShapeAction::On {
                element,
                brightness: pixel.luminance(),
            }
        }
    }

    pub fn apply(&self, cell: &mut Cell, params: &CellParams) {
        match *self {
            ShapeAction::Ping(element) => cell.ping(element, params),
            ShapeAction::On {
                element,
                brightness,
            } => cell.on(element, brightness),
        }
    }
}

/// Precomputed per-cell actions for one shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapePlan {
    width: usize,
    /// Indexed like board storage (`y * width + x`)
    actions: Vec<ShapeAction>,
}

impl ShapePlan {
    pub fn action_for(&self, coord: CellCoord) -> Option<ShapeAction> {
        self.actions.get(coord.y * self.width + coord.x).copied()
    }

    pub fn actions(&self) -> &[ShapeAction] {
        &self.actions
    }
}

/// Warn (without failing) when the image and board sizes differ
pub fn check_dimensions(board: &Board, image: &ShapeImage) -> bool {
    let mut matches = true;
    if image.width() != board.width() {
        log::warn!(
            "Shape width {} doesn't match board width {}",
            image.width(),
            board.width()
        );
        matches = false;
    }
    if image.height() != board.height() {
        log::warn!(
            "Shape height {} doesn't match board height {}",
            image.height(),
            board.height()
        );
        matches = false;
    }
    matches
}

/// Work out what `image` does to every board cell.
///
/// Fails before touching any cell if a lookup falls outside the image.
pub fn plan_shape(board: &Board, image: &ShapeImage, element: Element) -> Result<ShapePlan> {
    check_dimensions(board, image);

    let width = board.width();
    let actions = board
        .all_cells()
        .map(|cell| -> Result<ShapeAction> {
            let pixel = image.pixel(cell.coord.x * width + cell.coord.y)?;
            Ok(ShapeAction::from_pixel(pixel, element))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ShapePlan { width, actions })
}

/// Every cell an AI may target for this shape, in scan order.
///
/// Scans the image column by column. Each non-black pixel maps to the board
/// cell at the mirrored coordinates, with x and y swapped.
pub fn ai_candidates(board: &Board, image: &ShapeImage) -> Result<Vec<CellCoord>> {
    let width = board.width();
    let (img_w, img_h) = (image.width() as i64, image.height() as i64);
    let mut candidates = Vec::new();

    for x in 0..image.width() {
        for y in 0..image.height() {
            if image.pixel(x * width + y)?.is_black() {
                continue;
            }
            let y_flipped = wrap_index(img_h - 1 - y as i64, img_h) as usize;
            let x_flipped = wrap_index(img_w - 1 - x as i64, img_w) as usize;
            candidates.push(board.get(y_flipped, x_flipped)?.coord);
        }
    }
    Ok(candidates)
}

/// Pick a uniformly random AI target from the shape, `None` if it's all black
pub fn sample_for_ai<R: Rng + ?Sized>(
    board: &Board,
    image: &ShapeImage,
    rng: &mut R,
) -> Result<Option<CellCoord>> {
    let candidates = ai_candidates(board, image)?;
    if candidates.is_empty() {
        return Ok(None);
    }
    Ok(Some(candidates[rng.random_range(0..candidates.len())]))
}
