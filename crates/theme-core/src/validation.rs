//! Reference validation
//!
//! Every `var(--color-X)` leaf in the light use-case tree and in the merged
//! night tree must name a color of the base palette, the night palette or
//! the `referenceColors` group. Each unresolved name yields exactly one
//! [`ReferenceIssue`]. Palette entries must carry a parseable color and a
//! usable name.

use crate::color::parse_color;
use crate::theme::{validate_color_name, Theme, ThemeError};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A color name referenced by use cases but defined nowhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceIssue {
    /// The unresolved color name
    pub color: String,
    /// Flattened use-case paths referencing it, sorted
    pub paths: Vec<String>,
}

impl fmt::Display for ReferenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Color '{}' is not defined but is used by: {}",
            self.color,
            self.paths.join(", ")
        )
    }
}

/// Names a reference may resolve to
pub fn defined_names(theme: &Theme) -> BTreeSet<String> {
    let mut names: BTreeSet<String> = theme
        .colors
        .keys()
        .chain(theme.night_colors.keys())
        .cloned()
        .collect();
    names.extend(theme.use_cases.reference_color_names());
    names.extend(theme.merged_night_use_cases().reference_color_names());
    names
}

/// Collect the unresolved references of a theme, ordered by color name
pub fn validate_references(theme: &Theme) -> Vec<ReferenceIssue> {
    let defined = defined_names(theme);
    let mut unresolved: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    let light = theme.use_cases.references();
    let night = theme.merged_night_use_cases().references();
    for reference in light.into_iter().chain(night) {
        if !defined.contains(&reference.color) {
            unresolved.entry(reference.color).or_default().insert(reference.path);
        }
    }

    unresolved
        .into_iter()
        .map(|(color, paths)| ReferenceIssue { color, paths: paths.into_iter().collect() })
        .collect()
}

/// Base and night palette entries with a bad name or unparseable value
pub fn palette_issues(theme: &Theme) -> Vec<ThemeError> {
    theme
        .colors
        .iter()
        .chain(theme.night_colors.iter())
        .filter_map(|(name, value)| {
            if let Err(err) = validate_color_name(name) {
                return Some(err);
            }
            parse_color(value)
                .err()
                .map(|source| ThemeError::InvalidColor { name: name.clone(), source })
        })
        .collect()
}

/// Human-readable issue strings: palette problems first, then references
pub fn issue_messages(theme: &Theme) -> Vec<String> {
    palette_issues(theme)
        .iter()
        .map(ToString::to_string)
        .chain(validate_references(theme).iter().map(ToString::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::default_theme;
    use crate::use_case::{UseCaseTree, UseCaseValue};

    #[test]
    fn test_default_theme_is_valid() {
        assert!(validate_references(&default_theme()).is_empty());
    }

    #[test]
    fn test_one_issue_per_missing_color() {
        let theme = Theme::new("t")
            .with_color("red", "#ff0000")
            .with_use_case("kills", UseCaseValue::color_ref("blue"))
            .with_use_case("deaths", UseCaseValue::color_ref("blue"))
            .with_use_case("load", UseCaseValue::scale_refs(&["red", "orange"]));

        let issues = validate_references(&theme);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].color, "blue");
        assert_eq!(issues[0].paths, vec!["deaths".to_string(), "kills".to_string()]);
        assert_eq!(issues[1].color, "orange");
        assert_eq!(issues[1].paths, vec!["load-1".to_string()]);
    }

    #[test]
    fn test_night_overrides_are_checked() {
        let theme = Theme::new("t")
            .with_color("red", "#ff0000")
            .with_use_case("kills", UseCaseValue::color_ref("red"))
            .with_night_override("kills", UseCaseValue::color_ref("dark-red"));

        let messages = issue_messages(&theme);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("dark-red"));
        assert!(messages[0].contains("kills"));
    }

    #[test]
    fn test_night_colors_and_reference_colors_resolve() {
        let theme = Theme::new("t")
            .with_color("navy", "#000080")
            .with_night_color("dark-red", "#550000")
            .with_use_case("kills", UseCaseValue::color_ref("dark-red"))
            .with_use_case("accent", UseCaseValue::color_ref("theme"))
            .with_use_case(
                "referenceColors",
                UseCaseValue::Group(UseCaseTree::new().with("theme", UseCaseValue::color_ref("navy"))),
            );
        assert!(validate_references(&theme).is_empty());
    }

    #[test]
    fn test_raw_reference_color_does_not_resolve() {
        let theme = Theme::new("t")
            .with_use_case("accent", UseCaseValue::color_ref("theme"))
            .with_use_case(
                "referenceColors",
                UseCaseValue::Group(UseCaseTree::new().with("theme", UseCaseValue::Color("#123456".into()))),
            );

        let issues = validate_references(&theme);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].color, "theme");
        assert_eq!(issues[0].paths, vec!["accent".to_string()]);
    }

    #[test]
    fn test_non_reference_leaves_are_ignored() {
        let theme = Theme::new("t").with_use_case("raw", UseCaseValue::Color("#abcdef".into()));
        assert!(validate_references(&theme).is_empty());
    }

    #[test]
    fn test_unparseable_palette_value_is_an_issue() {
        let theme = Theme::new("t")
            .with_color("red", "not-a-color")
            .with_night_color("night-red", "#550000")
            .with_use_case("kills", UseCaseValue::color_ref("red"));

        assert!(validate_references(&theme).is_empty());
        let issues = palette_issues(&theme);
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], ThemeError::InvalidColor { ref name, .. } if name == "red"));

        let messages = issue_messages(&theme);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("red"));
    }

    #[test]
    fn test_bad_night_palette_entry_is_an_issue() {
        let theme = Theme::new("t").with_night_color("night-red", "rgb(300, 0, 0)");
        assert_eq!(issue_messages(&theme).len(), 1);
        assert!(palette_issues(&default_theme()).is_empty());
    }
}
