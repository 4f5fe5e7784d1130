//! Row-to-row error diffusion.
//!
//! A symmetric three-tap kernel spreads the quantization residual of row
//! `r` into row `r + 1`. Unlike a classic Floyd-Steinberg kernel the taps
//! land two stitches to either side (knitting's row-wise constraints
//! already dominate horizontal placement within a row), and the weights
//! are deliberately sub-unity: there is no compensating weight for taps
//! that fall outside the image, so residual is simply lost at the edges
//! rather than redistributed.

use crate::color::LinearRgb;
use crate::palette::Palette;

/// `(dx, dy, weight)` taps, applied relative to the pixel whose residual
/// is being spread.
pub const KERNEL: [(i32, i32, f32); 3] = [(-2, 1, 2.0 / 16.0), (0, 1, 5.0 / 16.0), (2, 1, 2.0 / 16.0)];

/// Spread the quantization error of one already-decided row into the
/// rows below it, in place on `image`. A no-op unless `enabled`.
pub fn diffuse_row(
    image: &mut [LinearRgb],
    width: usize,
    height: usize,
    row: usize,
    yarns: &[u8],
    palette: &Palette,
    enabled: bool,
) {
    if !enabled {
        return;
    }

    for x in 0..width {
        let original = image[row * width + x];
        let chosen = palette.color(yarns[x] as usize);
        let residual = original - chosen;

        for &(dx, dy, weight) in &KERNEL {
            let nx = x as i32 + dx;
            let ny = row as i32 + dy;
            if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                continue;
            }
            let idx = ny as usize * width + nx as usize;
            image[idx] = image[idx] + residual * weight;
        }
    }
}
