//! Pluggable color-difference metrics.
//!
//! Dispatched once per pixel-yarn pair ahead of the row solve (see
//! `solver::precompute_yarn_costs`), not per graph edge, so the hot
//! relaxation loop never pays for the match itself.

use crate::color::{LinearRgb, Oklab, Srgb};

/// Named color-difference metrics between a source pixel and a yarn color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostMetric {
    /// Squared Euclidean distance in linear RGB.
    Linear,
    /// Squared Euclidean distance in sRGB (gamma-encoded) space.
    Srgb,
    /// Squared Euclidean distance in Oklab.
    Oklab,
    /// Collapses each color to a single grey bucket in {0, 1, 2} before
    /// comparing; a coarse metric for black/white/grey yarn on a
    /// black/white/grey image, not meant for chromatic palettes.
    Demo,
}

impl CostMetric {
    pub fn cost(self, pixel: LinearRgb, yarn: LinearRgb) -> f32 {
        match self {
            CostMetric::Linear => sq_dist(pixel, yarn),
            CostMetric::Srgb => {
                let a = Srgb::from(pixel);
                let b = Srgb::from(yarn);
                sq(a.r - b.r) + sq(a.g - b.g) + sq(a.b - b.b)
            }
            CostMetric::Oklab => Oklab::from(pixel).distance_squared(Oklab::from(yarn)),
            CostMetric::Demo => sq(to_grey(pixel) - to_grey(yarn)),
        }
    }
}

#[inline]
fn sq(x: f32) -> f32 {
    x * x
}

#[inline]
fn sq_dist(a: LinearRgb, b: LinearRgb) -> f32 {
    sq(a.r - b.r) + sq(a.g - b.g) + sq(a.b - b.b)
}

/// Collapses a color to a single grey level in {0.0, 1.0, 2.0}: all
/// channels below 0.1 -> 0 (black), all above 0.9 -> 2 (white), else 1
/// (grey). A color that is neither uniformly dark nor uniformly light
/// (e.g. a saturated chromatic color) also falls into the middle bucket.
#[inline]
fn to_grey(c: LinearRgb) -> f32 {
    if c.r < 0.1 && c.g < 0.1 && c.b < 0.1 {
        0.0
    } else if c.r > 0.9 && c.g > 0.9 && c.b > 0.9 {
        2.0
    } else {
        1.0
    }
}
