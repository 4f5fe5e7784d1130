//! Gamma lookup table access, generated at compile time by build.rs.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Convert an sRGB value (0.0..=1.0) to linear RGB using the LUT with
/// linear interpolation between adjacent entries.
#[inline]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    let srgb = srgb.clamp(0.0, 1.0);
    let scaled = srgb * 4095.0;
    let index = scaled as usize;
    if index >= 4095 {
        return SRGB_TO_LINEAR[4095];
    }
    let frac = scaled - index as f32;
    let a = SRGB_TO_LINEAR[index];
    let b = SRGB_TO_LINEAR[index + 1];
    a + (b - a) * frac
}

/// Convert a linear RGB value (0.0..=1.0) to sRGB using the LUT with
/// linear interpolation between adjacent entries.
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    let linear = linear.clamp(0.0, 1.0);
    let scaled = linear * 4095.0;
    let index = scaled as usize;
    if index >= 4095 {
        return LINEAR_TO_SRGB[4095];
    }
    let frac = scaled - index as f32;
    let a = LINEAR_TO_SRGB[index];
    let b = LINEAR_TO_SRGB[index + 1];
    a + (b - a) * frac
}
