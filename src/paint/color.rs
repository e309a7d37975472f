use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PaintError;

/// An RGBA8 colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Result<Self, PaintError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(PaintError::InvalidColor(hex.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| PaintError::InvalidColor(hex.to_string()))
        };
        let alpha = if digits.len() == 8 { channel(6)? } else { 0xFF };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_slice(px: &[u8]) -> Self {
        Color::rgba(px[0], px[1], px[2], px[3])
    }

    /// Same colour, fully opaque
    pub fn opaque(self) -> Self {
        Color { a: 0xFF, ..self }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Palette (2 rows of 14): deeper tones first, pastels second
pub const PALETTE: [&str; 28] = [
    "#000000", "#808080", "#B03060", "#FF1493", "#FF69B4", "#CC8899", "#8B4513",
    "#D2691E", "#8B0045", "#4B0082", "#483D8B", "#2E4A62", "#2F4F4F", "#556B2F",
    "#FFFFFF", "#FFE4F0", "#FFB6C1", "#FFC0CB", "#FFDAB9", "#FFE4B5", "#FFFACD",
    "#E0FFE0", "#B5EAD7", "#C7CEEA", "#B8D4E3", "#E6CCFF", "#F0E0FF", "#F5F5DC",
];

pub const BRUSH_SIZES: [u32; 5] = [1, 2, 3, 5, 8];

/// Palette entry `index`, if it exists
pub fn palette_color(index: usize) -> Option<Color> {
    PALETTE.get(index).and_then(|hex| Color::from_hex(hex).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parse_and_display() {
        let pink = Color::from_hex("#FF69B4").unwrap();
        assert_eq!(pink, Color::rgb(0xFF, 0x69, 0xB4));
        assert_eq!(pink.to_string(), "#FF69B4");

        let translucent = Color::from_hex("00000080").unwrap();
        assert_eq!(translucent.a, 0x80);
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(Color::from_hex("#FFF").is_err());
        assert!(Color::from_hex("#GGGGGG").is_err());
        assert!(Color::from_hex("#ÿÿÿ").is_err());
    }

    #[test]
    fn test_palette_is_valid() {
        for i in 0..PALETTE.len() {
            assert!(palette_color(i).is_some(), "palette entry {} is invalid", i);
        }
        assert_eq!(palette_color(14), Some(Color::WHITE));
        assert_eq!(palette_color(28), None);
    }
}
