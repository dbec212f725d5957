//! Brush configuration owned by the controls and read by the stroke tracker.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 8-bit RGB color. Paint always lands fully opaque, so there is no alpha here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(hex.to_string()));
        }
        let packed =
            u32::from_str_radix(digits, 16).map_err(|_| Error::InvalidColor(hex.to_string()))?;
        Ok(Self::new(
            (packed >> 16) as u8,
            (packed >> 8) as u8,
            packed as u8,
        ))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Salon dye palette shown in the color toolbar.
pub const SALON_COLORS: [Rgb; 7] = [
    Rgb::new(0x00, 0x00, 0x00), // Black
    Rgb::new(0x5D, 0x40, 0x37), // Brown
    Rgb::new(0xFF, 0xD7, 0x00), // Blonde
    Rgb::new(0xFF, 0x69, 0xB4), // Hot Pink
    Rgb::new(0xFF, 0x00, 0x00), // Red
    Rgb::new(0x4C, 0xAF, 0x50), // Green
    Rgb::new(0x21, 0x96, 0xF3), // Blue
];

/// Stroke width presets offered by the size picker.
pub const BRUSH_SIZES: [u32; 4] = [5, 12, 25, 40];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Source-over ink.
    Paint,
    /// Destination-out scissors.
    Erase,
}

impl Tool {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "paint" | "brush" => Some(Tool::Paint),
            "erase" | "eraser" => Some(Tool::Erase),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrushSettings {
    pub color: Rgb,
    /// Stroke width in surface pixels; never zero.
    pub size: u32,
    pub tool: Tool,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: SALON_COLORS[3],
            size: 20,
            tool: Tool::Paint,
        }
    }
}

impl BrushSettings {
    /// Picking a dye also puts the brush back in paint mode.
    pub fn with_dye(self, color: Rgb) -> Self {
        Self {
            color,
            tool: Tool::Paint,
            ..self
        }
    }

    pub fn with_size(self, size: u32) -> Self {
        Self {
            size: size.max(1),
            ..self
        }
    }

    pub fn with_tool(self, tool: Tool) -> Self {
        Self { tool, ..self }
    }

    pub fn radius(&self) -> f64 {
        self.size.max(1) as f64 / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#FF69B4").unwrap(), SALON_COLORS[3]);
        assert_eq!(Rgb::from_hex("5d4037").unwrap(), SALON_COLORS[1]);
        assert!(Rgb::from_hex("#FFF").is_err());
        assert!(Rgb::from_hex("#GG0000").is_err());
        assert!(Rgb::from_hex("#+12345").is_err());
        assert!(Rgb::from_hex("-12345").is_err());
        assert_eq!(SALON_COLORS[6].to_hex(), "#2196F3");
    }

    #[test]
    fn test_dye_switches_back_to_paint() {
        let b = BrushSettings::default().with_tool(Tool::Erase);
        let b = b.with_dye(SALON_COLORS[0]);
        assert_eq!(b.tool, Tool::Paint);
        assert_eq!(b.color, SALON_COLORS[0]);
        assert_eq!(b.size, 20);
    }

    #[test]
    fn test_size_never_zero() {
        assert_eq!(BrushSettings::default().with_size(0).size, 1);
        assert_eq!(Tool::parse("Eraser"), Some(Tool::Erase));
        assert_eq!(Tool::parse("spray"), None);
    }
}
