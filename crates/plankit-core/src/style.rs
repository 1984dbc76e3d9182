//! Style values shared by the model and the preferences.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 32-bit ARGB color
///
/// Serialized as `#rrggbb` when opaque, `#aarrggbb` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const GRAY: Color = Color(0xFF80_8080);
    pub const LIGHT_GRAY: Color = Color(0xFFC0_C0C0);
    /// Default selection outline color.
    pub const SELECTION: Color = Color(0xFF6C_A0DC);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Color from an `0xRRGGBB` value as stored by the model, made opaque.
    pub const fn from_rgb_value(rgb: u32) -> Self {
        Color(0xFF00_0000 | (rgb & 0x00FF_FFFF))
    }

    pub fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(&self) -> u8 {
        self.0 as u8
    }

    /// Same color with another alpha.
    pub fn with_alpha(&self, alpha: u8) -> Self {
        Color((self.0 & 0x00FF_FFFF) | (alpha as u32) << 24)
    }

    /// Component-wise average of two colors.
    pub fn mix(&self, other: Color) -> Self {
        let avg = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
        Color(
            (avg(self.alpha(), other.alpha()) as u32) << 24
                | (avg(self.red(), other.red()) as u32) << 16
                | (avg(self.green(), other.green()) as u32) << 8
                | avg(self.blue(), other.blue()) as u32,
        )
    }

    /// `#rrggbb` without alpha, as used by SVG fill attributes.
    pub fn to_hex_rgb(&self) -> String {
        format!("#{:06x}", self.0 & 0x00FF_FFFF)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha() == 0xFF {
            write!(f, "{}", self.to_hex_rgb())
        } else {
            write!(f, "#{:08x}", self.0)
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let value =
            u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid color '{}': {}", s, e))?;
        match hex.len() {
            6 => Ok(Color::from_rgb_value(value)),
            8 => Ok(Color(value)),
            _ => Err(format!("Invalid color '{}': expected 6 or 8 hex digits", s)),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Horizontal alignment of a text block around its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Font and alignment of a text drawn in the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font family, `None` for the default font.
    #[serde(default)]
    pub font_name: Option<String>,
    /// Font size in centimeters.
    pub font_size: f32,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub alignment: TextAlignment,
}

impl TextStyle {
    pub fn new(font_size: f32) -> Self {
        Self {
            font_name: None,
            font_size,
            bold: false,
            italic: false,
            alignment: TextAlignment::Center,
        }
    }

    pub fn derive_font_size(&self, font_size: f32) -> Self {
        Self {
            font_size,
            ..self.clone()
        }
    }

    pub fn derive_bold(&self, bold: bool) -> Self {
        Self {
            bold,
            ..self.clone()
        }
    }

    pub fn derive_alignment(&self, alignment: TextAlignment) -> Self {
        Self {
            alignment,
            ..self.clone()
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(18.0)
    }
}

/// Fill pattern of walls in the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallPattern {
    Foreground,
    Background,
    #[default]
    HatchUp,
    HatchDown,
    ReversedHatchUp,
    ReversedHatchDown,
    CrossHatch,
}

impl fmt::Display for WallPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Foreground => write!(f, "foreground"),
            Self::Background => write!(f, "background"),
            Self::HatchUp => write!(f, "hatchUp"),
            Self::HatchDown => write!(f, "hatchDown"),
            Self::ReversedHatchUp => write!(f, "reversedHatchUp"),
            Self::ReversedHatchDown => write!(f, "reversedHatchDown"),
            Self::CrossHatch => write!(f, "crossHatch"),
        }
    }
}
