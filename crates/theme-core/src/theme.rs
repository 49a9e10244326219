//! Theme aggregate
//!
//! A [`Theme`] bundles the base palette, the night palette, the use-case tree
//! and its night overrides under one name. The JSON shape (camelCase keys)
//! is the one exchanged with the remote theme API and stored on device.

use crate::color::{self, ColorError};
use crate::use_case::{UseCaseTree, UseCaseValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Name of the built-in theme
pub const DEFAULT_THEME_NAME: &str = "default";

/// Longest accepted theme name
pub const MAX_THEME_NAME_LENGTH: usize = 64;

/// Color name to color text
pub type ColorMap = BTreeMap<String, String>;

/// Theme errors
#[derive(Debug, Error)]
pub enum ThemeError {
    /// Theme name is empty, too long or contains unsupported characters
    #[error("Invalid theme name: {0:?}")]
    InvalidName(String),

    /// Color name is empty or contains unsupported characters
    #[error("Invalid color name: {0:?}")]
    InvalidColorName(String),

    /// A color value could not be parsed
    #[error("Invalid color {name}: {source}")]
    InvalidColor {
        /// Name of the offending color
        name: String,
        /// Parse failure
        #[source]
        source: ColorError,
    },

    /// Theme JSON could not be read or written
    #[error("Theme JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for theme operations
pub type Result<T> = std::result::Result<T, ThemeError>;

/// A named theme
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Theme name (unique per store)
    pub name: String,
    /// Base palette
    #[serde(default)]
    pub colors: ColorMap,
    /// Explicit night palette
    #[serde(default)]
    pub night_colors: ColorMap,
    /// Use-case assignments
    #[serde(default)]
    pub use_cases: UseCaseTree,
    /// Night overrides of the use-case assignments
    #[serde(default)]
    pub night_mode_use_cases: UseCaseTree,
}

impl Theme {
    /// Create an empty theme
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Builder-style base color
    pub fn with_color(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.colors.insert(name.into(), value.into());
        self
    }

    /// Builder-style night color
    pub fn with_night_color(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.night_colors.insert(name.into(), value.into());
        self
    }

    /// Builder-style use case
    pub fn with_use_case(mut self, key: impl Into<String>, value: UseCaseValue) -> Self {
        self.use_cases.insert(key, value);
        self
    }

    /// Builder-style night override
    pub fn with_night_override(mut self, key: impl Into<String>, value: UseCaseValue) -> Self {
        self.night_mode_use_cases.insert(key, value);
        self
    }

    /// Parse a theme from JSON and validate its name
    pub fn from_json_str(json: &str) -> Result<Self> {
        let theme: Theme = serde_json::from_str(json)?;
        validate_theme_name(&theme.name)?;
        Ok(theme)
    }

    /// Serialize to JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Copy this theme under a new name
    pub fn clone_as(&self, name: &str) -> Result<Self> {
        validate_theme_name(name)?;
        Ok(Self { name: name.to_string(), ..self.clone() })
    }

    /// Effective night use-case tree
    pub fn merged_night_use_cases(&self) -> UseCaseTree {
        self.use_cases.merged_with(&self.night_mode_use_cases)
    }

    /// Check that every color in both palettes parses
    pub fn check_colors(&self) -> Result<()> {
        for (name, value) in self.colors.iter().chain(self.night_colors.iter()) {
            validate_color_name(name)?;
            color::parse_color(value).map_err(|source| ThemeError::InvalidColor {
                name: name.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Check a theme name
pub fn validate_theme_name(name: &str) -> Result<()> {
    let valid = !name.trim().is_empty()
        && name.trim() == name
        && name.chars().count() <= MAX_THEME_NAME_LENGTH
        && name.chars().all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ' ' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ThemeError::InvalidName(name.to_string()))
    }
}

/// Check a color name; it becomes part of a CSS custom property
pub fn validate_color_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ThemeError::InvalidColorName(name.to_string()))
    }
}

// =============================================================================
// Built-in Theme
// =============================================================================

/// Built-in palette
pub mod palette {
    /// Accent navy
    pub const NAVY: &str = "#1E3A5F";
    /// Purple
    pub const PURPLE: &str = "#9D4EDD";
    /// Blue
    pub const BLUE: &str = "#3A86FF";
    /// Cyan
    pub const CYAN: &str = "#06FFA5";
    /// Gold
    pub const GOLD: &str = "#FFB703";
    /// Red
    pub const RED: &str = "#F44336";
    /// Green
    pub const GREEN: &str = "#4CAF50";
    /// Grey
    pub const GREY: &str = "#9E9E9E";
    /// Night red
    pub const NIGHT_RED: &str = "#E57373";
}

/// The theme available without any store
pub fn default_theme() -> Theme {
    use palette::*;

    let sessions = UseCaseTree::new()
        .with("total", UseCaseValue::color_ref("blue"))
        .with("newPlayers", UseCaseValue::color_ref("green"))
        .with("playerKills", UseCaseValue::color_ref("red"));
    let performance = UseCaseTree::new()
        .with("tps", UseCaseValue::scale_refs(&["red", "gold", "green"]))
        .with("ping", UseCaseValue::color_ref("purple"))
        .with("chunks", UseCaseValue::color_ref("cyan"));

    Theme::new(DEFAULT_THEME_NAME)
        .with_color("navy", NAVY)
        .with_color("purple", PURPLE)
        .with_color("blue", BLUE)
        .with_color("cyan", CYAN)
        .with_color("gold", GOLD)
        .with_color("red", RED)
        .with_color("green", GREEN)
        .with_color("grey", GREY)
        .with_night_color("night-red", NIGHT_RED)
        .with_use_case("sessions", UseCaseValue::Group(sessions))
        .with_use_case("performance", UseCaseValue::Group(performance))
        .with_use_case("kills", UseCaseValue::color_ref("red"))
        .with_use_case("deaths", UseCaseValue::color_ref("grey"))
        .with_use_case(
            crate::use_case::REFERENCE_COLORS_KEY,
            UseCaseValue::Group(UseCaseTree::new().with("theme", UseCaseValue::color_ref("navy"))),
        )
        .with_night_override("kills", UseCaseValue::color_ref("night-red"))
}
