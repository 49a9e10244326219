//! Theme model and rendering for the analytics dashboard
//!
//! This crate holds everything about themes that does not need a store:
//! the theme aggregate, color conversions, use-case trees and their night
//! overrides, reference validation and CSS variable generation.
//!
//! # Modules
//!
//! - [`color`] - Color parsing, conversions, contrast and night variants
//! - [`use_case`] - Use-case trees, merging, flattening and path helpers
//! - [`theme`] - Theme aggregate and the built-in theme
//! - [`validation`] - Unresolved color reference detection
//! - [`stylesheet`] - CSS custom property generation
//!
//! # Example
//!
//! ```rust
//! use theme_core::{default_theme, generate, validate_references, StylesheetScope};
//!
//! let theme = default_theme();
//! assert!(validate_references(&theme).is_empty());
//!
//! let css = generate(&theme, Some("purple"), &StylesheetScope::Site);
//! assert!(css.contains("--color-theme: var(--color-purple);"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod color;
pub mod stylesheet;
pub mod theme;
pub mod use_case;
pub mod validation;

// Re-export commonly used types
pub use color::{contrast_color, night_variant, parse_color, ColorError, Rgba};

pub use theme::{
    default_theme, validate_theme_name, ColorMap, Theme, ThemeError, DEFAULT_THEME_NAME,
};

pub use use_case::{
    color_reference, merge, referenced_color, UseCasePath, UseCaseTree, UseCaseValue,
    REFERENCE_COLORS_KEY,
};

pub use validation::{issue_messages, palette_issues, validate_references, ReferenceIssue};

pub use stylesheet::{generate, Stylesheet, StylesheetScope, ACCENT_SENTINEL};
