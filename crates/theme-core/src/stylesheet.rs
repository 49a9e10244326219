//! CSS variable generation
//!
//! Renders a theme into two blocks of CSS custom properties: a light block
//! and a night block. Colors emit `--color-<name>` plus a matching
//! `--contrast-color-<name>`; use cases emit aliases pointing at the color
//! variables they reference.
//!
//! # Example
//!
//! ```rust
//! use theme_core::stylesheet::{generate, StylesheetScope};
//! use theme_core::theme::Theme;
//! use theme_core::use_case::UseCaseValue;
//!
//! let theme = Theme::new("demo")
//!     .with_color("red", "#ff0000")
//!     .with_use_case("kills", UseCaseValue::color_ref("red"));
//!
//! let css = generate(&theme, None, &StylesheetScope::Site);
//! assert!(css.contains("--color-red: #ff0000;"));
//! assert!(css.contains("--color-kills: var(--color-red);"));
//! ```

use crate::color;
use crate::theme::{ColorMap, Theme};
use crate::use_case::{merge, UseCaseTree};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Accent value meaning "keep the theme's own accent"
pub const ACCENT_SENTINEL: &str = "theme";

/// Class added to an ancestor element to switch to night colors
pub const NIGHT_MODE_CLASS: &str = "night-mode-colors";

/// Where the generated variables apply
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StylesheetScope {
    /// Whole document (`:root`)
    #[default]
    Site,
    /// Elements carrying the given class, for side-by-side previews
    Class(String),
}

impl StylesheetScope {
    /// Scope limited to a class name (a leading `.` is ignored)
    pub fn class(name: impl Into<String>) -> Self {
        let name = name.into();
        StylesheetScope::Class(name.trim_start_matches('.').to_string())
    }

    fn light_selector(&self) -> String {
        match self {
            StylesheetScope::Site => ":root".to_string(),
            StylesheetScope::Class(name) => format!(".{name}"),
        }
    }

    fn night_selector(&self) -> String {
        match self {
            StylesheetScope::Site => format!(".{NIGHT_MODE_CLASS}"),
            StylesheetScope::Class(name) => {
                format!(".{NIGHT_MODE_CLASS} .{name}, .{name}.{NIGHT_MODE_CLASS}")
            }
        }
    }
}

// =============================================================================
// Declaration Blocks
// =============================================================================

/// Ordered custom property declarations; setting a property twice keeps its
/// first position and the last value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationBlock {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl DeclarationBlock {
    /// Set a property value
    pub fn set(&mut self, property: String, value: String) {
        match self.positions.get(&property) {
            Some(&index) => self.entries[index].1 = value,
            None => {
                self.positions.insert(property.clone(), self.entries.len());
                self.entries.push((property, value));
            }
        }
    }

    /// Value of a property
    pub fn get(&self, property: &str) -> Option<&str> {
        self.positions.get(property).map(|&i| self.entries[i].1.as_str())
    }

    /// Whether the property is declared
    pub fn contains(&self, property: &str) -> bool {
        self.positions.contains_key(property)
    }

    /// Declarations in emission order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no declaration was made
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn set_color(&mut self, name: &str, value: &str) {
        self.set(format!("--color-{name}"), value.to_string());
        self.set(
            format!("--contrast-color-{name}"),
            color::contrast_color(value).to_string(),
        );
    }

    fn set_aliases(&mut self, tree: &UseCaseTree) {
        for entry in tree.flatten() {
            if let Some(target) = entry.referenced_color() {
                self.set(format!("--color-{}", entry.path), format!("var(--color-{target})"));
                self.set(
                    format!("--contrast-color-{}", entry.path),
                    format!("var(--contrast-color-{target})"),
                );
            }
        }
    }

    fn render(&self, selector: &str, out: &mut String) {
        let _ = writeln!(out, "{selector} {{");
        for (property, value) in self.iter() {
            let _ = writeln!(out, "  {property}: {value};");
        }
        out.push_str("}\n");
    }
}

/// Light and night declaration blocks of a theme
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Light mode declarations
    pub light: DeclarationBlock,
    /// Night mode declarations
    pub night: DeclarationBlock,
}

impl Stylesheet {
    /// Build the blocks from the four theme sections
    pub fn build(
        colors: &ColorMap,
        night_colors: &ColorMap,
        use_cases: &UseCaseTree,
        night_mode_use_cases: &UseCaseTree,
        accent: Option<&str>,
    ) -> Self {
        let mut sheet = Stylesheet::default();

        for (name, value) in colors {
            sheet.light.set_color(name, value);
            sheet.night.set_color(name, &color::night_variant(value));
        }

        for (name, value) in night_colors {
            sheet.night.set_color(name, value);
            if !colors.contains_key(name) {
                sheet.light.set_color(name, value);
            }
        }

        let mut light_tree = use_cases.clone();
        let mut night_tree = merge(use_cases, night_mode_use_cases);
        if let Some(accent) = accent.filter(|a| *a != ACCENT_SENTINEL && !a.is_empty()) {
            light_tree = light_tree.with_reference_color(ACCENT_SENTINEL, accent);
            night_tree = night_tree.with_reference_color(ACCENT_SENTINEL, accent);
        }
        sheet.light.set_aliases(&light_tree);
        sheet.night.set_aliases(&night_tree);

        sheet
    }

    /// Build the blocks for a theme
    pub fn for_theme(theme: &Theme, accent: Option<&str>) -> Self {
        Self::build(
            &theme.colors,
            &theme.night_colors,
            &theme.use_cases,
            &theme.night_mode_use_cases,
            accent,
        )
    }

    /// Render both blocks for the given scope
    pub fn render(&self, scope: &StylesheetScope) -> String {
        let mut out = String::new();
        self.light.render(&scope.light_selector(), &mut out);
        self.night.render(&scope.night_selector(), &mut out);
        out
    }
}

/// Render a theme's stylesheet text
pub fn generate(theme: &Theme, accent: Option<&str>, scope: &StylesheetScope) -> String {
    Stylesheet::for_theme(theme, accent).render(scope)
}
