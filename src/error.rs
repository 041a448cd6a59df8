//! Error type for board operations
//!
//! Out-of-range access is a programming or configuration error and fails
//! fast. "Nothing found" results are `Option`s, never errors.

use thiserror::Error;

/// Errors raised by board, sampler and config operations
#[derive(Debug, Error)]
pub enum GridError {
    /// Cell coordinates outside the board
    #[error("cell ({x}, {y}) is outside the {width}x{height} board")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// Pixel index outside the image buffer
    #[error("pixel index {index} is outside an image of {len} pixels")]
    PixelOutOfRange { index: usize, len: usize },

    /// Position list doesn't match the board dimensions
    #[error("board layout needs {expected} positions, got {actual}")]
    LayoutMismatch { expected: usize, actual: usize },

    /// Ripple speed must be finite and positive
    #[error("ripple speed must be finite and positive, got {0}")]
    InvalidRippleSpeed(f32),

    /// Config values that can't build a board
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;
