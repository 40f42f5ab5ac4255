//! Linear RGB colors with sRGB hex parsing
//!
//! Colors are authored as CSS-style hex literals (`#5a4ec4`) and stored in
//! linear space, which is what the shading math operates on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::math::Vec3;

/// Color parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The literal is not `#rgb` or `#rrggbb`
    #[error("Invalid hex color literal: {0:?}")]
    InvalidHex(String),
}

/// Linear RGB color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel (linear, 0.0 to 1.0)
    pub r: f32,
    /// Green channel (linear, 0.0 to 1.0)
    pub g: f32,
    /// Blue channel (linear, 0.0 to 1.0)
    pub b: f32,
}

impl Color {
    /// White
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a color from linear channel values
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse an sRGB hex literal (`#rrggbb`, `#rgb`, leading `#` optional)
    pub fn from_hex(literal: &str) -> Result<Self, ColorError> {
        let trimmed = literal.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let invalid = || ColorError::InvalidHex(literal.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channels = match digits.len() {
            6 => [&digits[0..2], &digits[2..4], &digits[4..6]]
                .map(|pair| u8::from_str_radix(pair, 16).unwrap_or(0)),
            3 => [&digits[0..1], &digits[1..2], &digits[2..3]]
                .map(|single| u8::from_str_radix(single, 16).unwrap_or(0) * 17),
            _ => return Err(invalid()),
        };

        Ok(Self::from_srgb8(channels[0], channels[1], channels[2]))
    }

    /// Create a color from 8-bit sRGB channels
    pub fn from_srgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            srgb_to_linear(f32::from(r) / 255.0),
            srgb_to_linear(f32::from(g) / 255.0),
            srgb_to_linear(f32::from(b) / 255.0),
        )
    }

    /// Format as an sRGB hex literal (`#rrggbb`)
    pub fn to_hex(&self) -> String {
        let encode = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", encode(self.r), encode(self.g), encode(self.b))
    }

    /// Channels as a vector
    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// Channels padded to four components for uniform blocks
    pub fn to_padded(&self, w: f32) -> [f32; 4] {
        [self.r, self.g, self.b, w]
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.077_399_38
    } else {
        (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c < 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(0.41666) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_extremes() {
        let white = Color::from_hex("#ffffff").unwrap();
        assert_relative_eq!(white.to_vec3(), Color::WHITE.to_vec3(), epsilon = 1e-6);
        assert_eq!(Color::from_hex("000").unwrap(), Color::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_parse_is_linearized() {
        let color = Color::from_hex("#808080").unwrap();
        // sRGB mid grey is roughly 21.6% in linear light
        assert_relative_eq!(color.r, 0.2158605, epsilon = 1e-4);
        assert_eq!(color.r, color.g);
    }

    #[test]
    fn test_hex_survives_conversion() {
        for literal in ["#5a4ec4", "#4e76c4", "#c4764e", "#0a0a0f"] {
            assert_eq!(Color::from_hex(literal).unwrap().to_hex(), literal);
        }
    }

    #[test]
    fn test_rejects_malformed_literals() {
        for literal in ["", "#12", "#12345", "#gg0000", "#1234567", "#+1ff00"] {
            assert!(matches!(Color::from_hex(literal), Err(ColorError::InvalidHex(_))), "{literal}");
        }
    }

    #[test]
    fn test_allows_at_most_one_hash() {
        assert_eq!(Color::from_hex("5a4ec4").unwrap().to_hex(), "#5a4ec4");
        assert_eq!(Color::from_hex(" #5a4ec4 ").unwrap().to_hex(), "#5a4ec4");
        for literal in ["##5a4ec4", "##fff", "#"] {
            assert!(matches!(Color::from_hex(literal), Err(ColorError::InvalidHex(_))), "{literal}");
        }
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            color: Color,
        }

        let holder: Holder = toml::from_str("color = \"#c4764e\"").unwrap();
        assert_eq!(holder.color.to_hex(), "#c4764e");
        assert!(toml::from_str::<Holder>("color = \"teal\"").is_err());

        let text = toml::to_string(&holder).unwrap();
        assert!(text.contains("#c4764e"));
    }
}
