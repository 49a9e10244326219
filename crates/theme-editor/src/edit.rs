//! Edit operations
//!
//! Every change a user makes while editing a theme is an [`EditOperation`].
//! Operations are pure: [`EditOperation::apply`] takes a [`ThemeProjection`]
//! and returns the updated projection, so replaying the same list over the
//! same stored theme always yields the same result.

use serde::{Deserialize, Serialize};
use std::fmt;
use theme_core::theme::{ColorMap, Theme};
use theme_core::use_case::{UseCasePath, UseCaseTree, UseCaseValue};

/// Section of a theme an operation touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditTarget {
    /// Base palette
    Colors,
    /// Night palette
    NightColors,
    /// Use-case tree
    UseCases,
    /// Night use-case overrides
    NightModeUseCases,
}

/// The editable sections of a theme
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemeProjection {
    /// Base palette
    pub colors: ColorMap,
    /// Night palette
    pub night_colors: ColorMap,
    /// Use-case tree
    pub use_cases: UseCaseTree,
    /// Night use-case overrides
    pub night_mode_use_cases: UseCaseTree,
}

impl From<&Theme> for ThemeProjection {
    fn from(theme: &Theme) -> Self {
        Self {
            colors: theme.colors.clone(),
            night_colors: theme.night_colors.clone(),
            use_cases: theme.use_cases.clone(),
            night_mode_use_cases: theme.night_mode_use_cases.clone(),
        }
    }
}

impl ThemeProjection {
    /// Build a theme from this projection
    pub fn into_theme(self, name: impl Into<String>) -> Theme {
        Theme {
            name: name.into(),
            colors: self.colors,
            night_colors: self.night_colors,
            use_cases: self.use_cases,
            night_mode_use_cases: self.night_mode_use_cases,
        }
    }
}

/// A single reversible edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Add or change a base color
    SetColor {
        /// Color name
        name: String,
        /// Color text
        value: String,
    },
    /// Rename a base color, carrying its value, and repoint every reference
    RenameColor {
        /// Current name
        from: String,
        /// New name
        to: String,
        /// Value stored under the new name
        value: String,
    },
    /// Remove a base color; references are left dangling
    DeleteColor {
        /// Color name
        name: String,
    },
    /// Add or change a night color
    SetNightColor {
        /// Color name
        name: String,
        /// Color text
        value: String,
    },
    /// Rename a night color and repoint night overrides
    RenameNightColor {
        /// Current name
        from: String,
        /// New name
        to: String,
        /// Value stored under the new name
        value: String,
    },
    /// Remove a night color
    DeleteNightColor {
        /// Color name
        name: String,
    },
    /// Assign a value to a use case
    SetUseCase {
        /// Use-case path
        path: UseCasePath,
        /// New value
        value: UseCaseValue,
    },
    /// Override a use case in night mode
    SetNightOverride {
        /// Use-case path
        path: UseCasePath,
        /// Night value
        value: UseCaseValue,
    },
    /// Drop a night override so the base use case applies again
    RemoveNightOverride {
        /// Use-case path
        path: UseCasePath,
    },
}

impl EditOperation {
    /// Sections this operation changes
    pub fn targets(&self) -> &'static [EditTarget] {
        use EditTarget::*;
        match self {
            EditOperation::SetColor { .. } | EditOperation::DeleteColor { .. } => &[Colors],
            EditOperation::RenameColor { .. } => &[Colors, UseCases, NightModeUseCases],
            EditOperation::SetNightColor { .. } | EditOperation::DeleteNightColor { .. } => {
                &[NightColors]
            }
            EditOperation::RenameNightColor { .. } => &[NightColors, NightModeUseCases],
            EditOperation::SetUseCase { .. } => &[UseCases],
            EditOperation::SetNightOverride { .. } | EditOperation::RemoveNightOverride { .. } => {
                &[NightModeUseCases]
            }
        }
    }

    /// Whether this operation changes the given section
    pub fn touches(&self, target: EditTarget) -> bool {
        self.targets().contains(&target)
    }

    /// Human-readable description
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// Apply the operation to a projection
    pub fn apply(&self, mut projection: ThemeProjection) -> ThemeProjection {
        match self {
            EditOperation::SetColor { name, value } => {
                projection.colors.insert(name.clone(), value.clone());
            }
            EditOperation::RenameColor { from, to, value } => {
                projection.colors.remove(from);
                projection.colors.insert(to.clone(), value.clone());
                projection.use_cases = projection.use_cases.replace_references(from, to);
                projection.night_mode_use_cases =
                    projection.night_mode_use_cases.replace_references(from, to);
            }
            EditOperation::DeleteColor { name } => {
                projection.colors.remove(name);
            }
            EditOperation::SetNightColor { name, value } => {
                projection.night_colors.insert(name.clone(), value.clone());
            }
            EditOperation::RenameNightColor { from, to, value } => {
                projection.night_colors.remove(from);
                projection.night_colors.insert(to.clone(), value.clone());
                projection.night_mode_use_cases =
                    projection.night_mode_use_cases.replace_references(from, to);
            }
            EditOperation::DeleteNightColor { name } => {
                projection.night_colors.remove(name);
            }
            EditOperation::SetUseCase { path, value } => {
                projection.use_cases = projection.use_cases.set_at(path, value.clone());
            }
            EditOperation::SetNightOverride { path, value } => {
                projection.night_mode_use_cases =
                    projection.night_mode_use_cases.set_at(path, value.clone());
            }
            EditOperation::RemoveNightOverride { path } => {
                projection.night_mode_use_cases = projection.night_mode_use_cases.remove_at(path);
            }
        }
        projection
    }
}

impl fmt::Display for EditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOperation::SetColor { name, value } => write!(f, "Set color {name} to {value}"),
            EditOperation::RenameColor { from, to, .. } => write!(f, "Rename color {from} to {to}"),
            EditOperation::DeleteColor { name } => write!(f, "Delete color {name}"),
            EditOperation::SetNightColor { name, value } => {
                write!(f, "Set night color {name} to {value}")
            }
            EditOperation::RenameNightColor { from, to, .. } => {
                write!(f, "Rename night color {from} to {to}")
            }
            EditOperation::DeleteNightColor { name } => write!(f, "Delete night color {name}"),
            EditOperation::SetUseCase { path, .. } => write!(f, "Change use case {path}"),
            EditOperation::SetNightOverride { path, .. } => {
                write!(f, "Change night mode use case {path}")
            }
            EditOperation::RemoveNightOverride { path } => {
                write!(f, "Reset night mode use case {path}")
            }
        }
    }
}

/// Left fold of `operations` over `base`
pub fn replay<'a>(
    base: &ThemeProjection,
    operations: impl IntoIterator<Item = &'a EditOperation>,
) -> ThemeProjection {
    operations.into_iter().fold(base.clone(), |projection, op| op.apply(projection))
}
