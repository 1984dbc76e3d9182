//! User preferences for the plan
//!
//! Preferences are organized into sections:
//! - Units (length unit used by dimension lines and room areas)
//! - Plan display (grid, furniture icons, wall patterns, colors, pointer)
//! - Default text styles per item kind
//!
//! Supports JSON and TOML files, picked by extension.

use plankit_core::{Color, ItemKind, LengthUnit, TextStyle, WallPattern};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Kind of pointing device driving the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerType {
    /// Mouse or pen
    #[default]
    Mouse,
    /// Touch screen, feedback drawn twice as large
    Touch,
}

impl std::fmt::Display for PointerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mouse => write!(f, "Mouse"),
            Self::Touch => write!(f, "Touch"),
        }
    }
}

/// Unit settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitSettings {
    /// Unit of displayed lengths and areas
    #[serde(default)]
    pub length_unit: LengthUnit,
}

/// Plan display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    /// Draw the grid under the plan
    pub grid_visible: bool,
    /// Draw furniture with its top view icon instead of its catalog icon
    pub furniture_viewed_from_top: bool,
    /// Size in pixels of generated top view icons
    pub furniture_model_icon_size: u32,
    /// Fill rooms with their floor color or texture
    pub room_floor_colored_or_textured: bool,
    /// Pattern of walls that have none
    pub wall_pattern: WallPattern,
    /// Pattern given to new walls
    #[serde(default)]
    pub new_wall_pattern: Option<WallPattern>,
    /// Pointer device type
    #[serde(default)]
    pub pointer_type: PointerType,
    /// Color of selection outlines
    pub selection_color: Color,
    /// Plan background color
    pub background_color: Color,
    /// Plan foreground color
    pub foreground_color: Color,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            grid_visible: true,
            furniture_viewed_from_top: true,
            furniture_model_icon_size: 128,
            room_floor_colored_or_textured: true,
            wall_pattern: WallPattern::HatchUp,
            new_wall_pattern: None,
            pointer_type: PointerType::Mouse,
            selection_color: Color::SELECTION,
            background_color: Color::WHITE,
            foreground_color: Color::BLACK,
        }
    }
}

/// Default text styles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSettings {
    /// Font used when a text style names none
    #[serde(default)]
    pub default_font_name: Option<String>,
    /// Room names
    pub room_name: TextStyle,
    /// Room areas
    pub room_area: TextStyle,
    /// Furniture names
    pub furniture_name: TextStyle,
    /// Dimension line lengths
    pub dimension_line: TextStyle,
    /// Free labels
    pub label: TextStyle,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            default_font_name: None,
            room_name: TextStyle::new(24.0),
            room_area: TextStyle::new(24.0),
            furniture_name: TextStyle::new(18.0),
            dimension_line: TextStyle::new(18.0),
            label: TextStyle::new(18.0),
        }
    }
}

/// Complete user preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Unit settings
    #[serde(default)]
    pub units: UnitSettings,
    /// Plan display settings
    #[serde(default)]
    pub plan: PlanSettings,
    /// Default text styles
    #[serde(default)]
    pub text: TextSettings,
}

impl Preferences {
    /// Create new preferences with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length_unit(&self) -> LengthUnit {
        self.units.length_unit
    }

    /// Default text style of an item kind's texts.
    ///
    /// Rooms have two styles; this returns the name one, see
    /// [`TextSettings::room_area`] for areas.
    pub fn default_text_style(&self, kind: ItemKind) -> TextStyle {
        let style = match kind {
            ItemKind::Room => &self.text.room_name,
            ItemKind::Furniture => &self.text.furniture_name,
            ItemKind::DimensionLine => &self.text.dimension_line,
            _ => &self.text.label,
        };
        let mut style = style.clone();
        if style.font_name.is_none() {
            style.font_name = self.text.default_font_name.clone();
        }
        style
    }

    /// Whether feedback should be sized for touch input.
    pub fn is_touch(&self) -> bool {
        self.plan.pointer_type == PointerType::Touch
    }

    /// Parse preferences from TOML text
    pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
        let preferences: Self = toml::from_str(content)?;
        preferences.validate()?;
        Ok(preferences)
    }

    /// Serialize preferences to TOML text
    pub fn to_toml_string(&self) -> SettingsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parse preferences from JSON text
    pub fn from_json_str(content: &str) -> SettingsResult<Self> {
        let preferences: Self = serde_json::from_str(content)?;
        preferences.validate()?;
        Ok(preferences)
    }

    /// Serialize preferences to JSON text
    pub fn to_json_string(&self) -> SettingsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load preferences from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml_str(&content)
        } else {
            Err(ConfigError::UnsupportedFormat(path.display().to_string()).into())
        }
    }

    /// Save preferences to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            self.to_json_string()?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            self.to_toml_string()?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()).into());
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Preferences saved to {}", path.display());
        Ok(())
    }

    /// Validate preferences
    pub fn validate(&self) -> SettingsResult<()> {
        if self.plan.furniture_model_icon_size == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "plan.furniture_model_icon_size".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        let styles = [
            ("text.room_name", &self.text.room_name),
            ("text.room_area", &self.text.room_area),
            ("text.furniture_name", &self.text.furniture_name),
            ("text.dimension_line", &self.text.dimension_line),
            ("text.label", &self.text.label),
        ];
        for (key, style) in styles {
            if !(style.font_size.is_finite() && style.font_size > 0.0) {
                return Err(ConfigError::ValueOutOfRange {
                    key: format!("{}.font_size", key),
                    value: style.font_size.to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let preferences = Preferences::default();
        assert!(preferences.validate().is_ok());
        assert!(preferences.plan.grid_visible);
        assert_eq!(preferences.length_unit(), LengthUnit::Centimeter);
    }

    #[test]
    fn test_default_text_style_inherits_font() {
        let mut preferences = Preferences::default();
        preferences.text.default_font_name = Some("DejaVu Sans".to_string());
        let style = preferences.default_text_style(ItemKind::Room);
        assert_eq!(style.font_size, 24.0);
        assert_eq!(style.font_name.as_deref(), Some("DejaVu Sans"));
    }

    #[test]
    fn test_invalid_font_size() {
        let mut preferences = Preferences::default();
        preferences.text.label.font_size = 0.0;
        assert!(matches!(
            preferences.validate(),
            Err(SettingsError::Config(ConfigError::ValueOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_toml_partial_document() {
        let preferences = Preferences::from_toml_str(
            r#"
            [units]
            length_unit = "inch"
            "#,
        )
        .expect("partial TOML");
        assert_eq!(preferences.length_unit(), LengthUnit::Inch);
        assert_eq!(preferences.plan, PlanSettings::default());
    }
}
