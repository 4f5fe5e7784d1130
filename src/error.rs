//! Error types for configuration, parsing, and infeasible rows.

use thiserror::Error;

/// Errors raised while parsing a color from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseColorError {
    #[error("hex color must be 3 or 6 digits, with an optional leading '#'")]
    InvalidLength,
    #[error("invalid hex digit: {0}")]
    InvalidHex(#[from] std::num::ParseIntError),
}

/// Errors in the parameters passed to [`crate::dither`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("palette has {len} yarns, must be in 1..={max}")]
    PaletteSize { len: usize, max: usize },
    #[error("width must be at least 1")]
    ZeroWidth,
    #[error("image has {actual} pixels, expected width*height = {expected}")]
    ImageSizeMismatch { expected: usize, actual: usize },
    #[error("beam_width must be at least 1 when method is Beam")]
    ZeroBeamWidth,
}

/// Top-level error returned by [`crate::dither`].
#[derive(Debug, Error)]
pub enum DitherError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("row {row} has no valid assignment under use_within={use_within}, cross_within={cross_within}")]
    Infeasible {
        row: usize,
        use_within: u32,
        cross_within: u32,
    },
}
