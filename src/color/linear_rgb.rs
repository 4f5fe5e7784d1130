//! Linear RGB color type.
//!
//! Linear RGB is the space in which light addition is physically accurate.
//! The cost metrics and error-diffusion kernel operate here (or in Oklab,
//! itself derived from linear RGB).

use super::lut::srgb_to_linear;
use super::srgb::Srgb;

/// A color in linear RGB space, typically in 0.0..=1.0 but unclamped for
/// intermediate error-diffusion accumulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LinearRgb {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }
}

impl From<Srgb> for LinearRgb {
    /// Decode sRGB's gamma curve via the LUT (IEC 61966-2-1).
    fn from(srgb: Srgb) -> Self {
        Self {
            r: srgb_to_linear(srgb.r),
            g: srgb_to_linear(srgb.g),
            b: srgb_to_linear(srgb.b),
        }
    }
}

impl std::ops::Sub for LinearRgb {
    type Output = LinearRgb;
    fn sub(self, rhs: LinearRgb) -> LinearRgb {
        LinearRgb::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl std::ops::Add for LinearRgb {
    type Output = LinearRgb;
    fn add(self, rhs: LinearRgb) -> LinearRgb {
        LinearRgb::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl std::ops::Mul<f32> for LinearRgb {
    type Output = LinearRgb;
    fn mul(self, rhs: f32) -> LinearRgb {
        LinearRgb::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}
