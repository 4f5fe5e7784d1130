//! sRGB color type: the boundary format for hex parsing and byte I/O.

use std::str::FromStr;

use crate::error::ParseColorError;

use super::linear_rgb::LinearRgb;
use super::lut::linear_to_srgb;

/// A color in sRGB space, values in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Srgb {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [
            (self.r * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.g * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.b * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }
}

impl From<LinearRgb> for Srgb {
    fn from(linear: LinearRgb) -> Self {
        Self {
            r: linear_to_srgb(linear.r),
            g: linear_to_srgb(linear.g),
            b: linear_to_srgb(linear.b),
        }
    }
}

impl FromStr for Srgb {
    type Err = ParseColorError;

    /// Parses `#RRGGBB`, `RRGGBB`, `#RGB`, or `RGB`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        match s.len() {
            3 => {
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::from_u8(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::from_u8(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_accuracy_within_one_lsb() {
        for i in 0..=255u8 {
            let original = Srgb::from_u8(i, i, i);
            let linear = LinearRgb::from(original);
            let back = Srgb::from(linear);
            let error = (back.to_bytes()[0] as i32 - i as i32).abs();
            assert!(error <= 1, "round-trip error {error} for {i}");
        }
    }

    #[test]
    fn hex_parsing_shorthand_and_full() {
        let white: Srgb = "#FFFFFF".parse().unwrap();
        assert_eq!(white.to_bytes(), [255, 255, 255]);
        let red: Srgb = "#f00".parse().unwrap();
        assert_eq!(red.to_bytes(), [255, 0, 0]);
        let no_hash: Srgb = "ABCDEF".parse().unwrap();
        assert_eq!(no_hash, Srgb::from_u8(0xAB, 0xCD, 0xEF));
    }

    #[test]
    fn hex_parsing_errors() {
        assert_eq!("#FFFF".parse::<Srgb>(), Err(ParseColorError::InvalidLength));
        assert_eq!("".parse::<Srgb>(), Err(ParseColorError::InvalidLength));
        assert!(matches!(
            "#GGG".parse::<Srgb>(),
            Err(ParseColorError::InvalidHex(_))
        ));
    }
}
