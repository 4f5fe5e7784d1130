//! Color types and conversions between sRGB, linear RGB, and Oklab.
//!
//! All cost calculations happen in linear RGB or Oklab; sRGB exists only
//! at the boundary (hex parsing, byte I/O). Conversions go through a
//! build-time lookup table (see `lut`) for speed.

mod linear_rgb;
mod lut;
mod oklab;
mod srgb;

pub use linear_rgb::LinearRgb;
pub use oklab::Oklab;
pub use srgb::Srgb;
