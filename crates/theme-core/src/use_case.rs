//! Use-case trees
//!
//! A use-case tree maps semantic purposes ("sessions", "playerKills", ...) to
//! colors. Leaves never hold raw colors in a well-formed theme; they hold
//! references of the form `var(--color-<name>)` so that editing a color
//! re-themes every purpose that points at it.
//!
//! Night mode stores only the overrides relative to the base tree, and the
//! effective night tree is obtained with [`merge`].
//!
//! # Example
//!
//! ```rust
//! use theme_core::use_case::{merge, UseCaseTree, UseCaseValue};
//!
//! let base = UseCaseTree::new()
//!     .with("kills", UseCaseValue::color_ref("red"))
//!     .with("deaths", UseCaseValue::color_ref("grey"));
//! let night = UseCaseTree::new().with("kills", UseCaseValue::color_ref("pink"));
//!
//! let merged = merge(&base, &night);
//! assert_eq!(merged.get("kills"), Some(&UseCaseValue::color_ref("pink")));
//! assert_eq!(merged.get("deaths"), Some(&UseCaseValue::color_ref("grey")));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Prefix of a color reference leaf
pub const COLOR_VAR_PREFIX: &str = "var(--color-";

/// Top-level group whose leaves define named palette anchors
pub const REFERENCE_COLORS_KEY: &str = "referenceColors";

/// Build the reference text for a color name (`var(--color-<name>)`)
pub fn color_reference(name: &str) -> String {
    format!("{COLOR_VAR_PREFIX}{name})")
}

/// Extract the color name from reference text, if it is one
pub fn referenced_color(text: &str) -> Option<&str> {
    text.trim()
        .strip_prefix(COLOR_VAR_PREFIX)?
        .strip_suffix(')')
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Convert a camelCase key segment to kebab-case
pub fn to_kebab_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 4);
    for (i, c) in segment.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// =============================================================================
// Tree Types
// =============================================================================

/// A node of a use-case tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UseCaseValue {
    /// A single color reference
    Color(String),
    /// An ordered multi-color scale
    Scale(Vec<String>),
    /// A nested group of use cases
    Group(UseCaseTree),
}

impl UseCaseValue {
    /// A leaf referencing the named color
    pub fn color_ref(name: &str) -> Self {
        UseCaseValue::Color(color_reference(name))
    }

    /// A scale referencing each named color in order
    pub fn scale_refs(names: &[&str]) -> Self {
        UseCaseValue::Scale(names.iter().map(|n| color_reference(n)).collect())
    }

    /// Whether this is a nested group
    pub fn is_group(&self) -> bool {
        matches!(self, UseCaseValue::Group(_))
    }

    fn replace_references(&self, from: &str, to: &str) -> UseCaseValue {
        match self {
            UseCaseValue::Color(text) if text == from => UseCaseValue::Color(to.to_string()),
            UseCaseValue::Color(text) => UseCaseValue::Color(text.clone()),
            UseCaseValue::Scale(items) => UseCaseValue::Scale(
                items
                    .iter()
                    .map(|item| if item == from { to.to_string() } else { item.clone() })
                    .collect(),
            ),
            UseCaseValue::Group(tree) => UseCaseValue::Group(tree.replace_reference_text(from, to)),
        }
    }
}

/// Recursive mapping from use-case keys to values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UseCaseTree(BTreeMap<String, UseCaseValue>);

/// Address of a node in a [`UseCaseTree`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UseCasePath(Vec<String>);

impl UseCasePath {
    /// Build a path from its segments
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a dot separated path ("sessions.playerKills")
    pub fn parse(text: &str) -> Self {
        Self::new(text.split('.').filter(|s| !s.is_empty()))
    }

    /// Path segments
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether the path addresses the root
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UseCasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for UseCasePath {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

/// One leaf of a flattened tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    /// Kebab-case variable path (e.g. "player-kills" or "world-load-0")
    pub path: String,
    /// The leaf text
    pub value: String,
}

impl FlatEntry {
    /// Referenced color name, when the leaf is a color reference
    pub fn referenced_color(&self) -> Option<&str> {
        referenced_color(&self.value)
    }
}

/// A color reference found in a tree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ColorReference {
    /// Name of the referenced color
    pub color: String,
    /// Flattened path of the referencing leaf
    pub path: String,
}

// =============================================================================
// Tree Operations
// =============================================================================

impl UseCaseTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: UseCaseValue) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Insert or replace a top-level entry
    pub fn insert(&mut self, key: impl Into<String>, value: UseCaseValue) -> Option<UseCaseValue> {
        self.0.insert(key.into(), value)
    }

    /// Get a top-level entry
    pub fn get(&self, key: &str) -> Option<&UseCaseValue> {
        self.0.get(key)
    }

    /// Iterate over top-level entries in key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, UseCaseValue> {
        self.0.iter()
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tree has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the node at `path`
    pub fn get_at(&self, path: &UseCasePath) -> Option<&UseCaseValue> {
        let (last, parents) = path.segments().split_last()?;
        let mut node = self;
        for segment in parents {
            match node.0.get(segment)? {
                UseCaseValue::Group(child) => node = child,
                _ => return None,
            }
        }
        node.0.get(last)
    }

    /// Return a copy of the tree with `value` placed at `path`
    ///
    /// Missing or non-group intermediate nodes are replaced by groups. An empty
    /// path leaves the tree unchanged.
    pub fn set_at(&self, path: &UseCasePath, value: UseCaseValue) -> UseCaseTree {
        match path.segments().split_first() {
            None => self.clone(),
            Some((head, [])) => self.clone().with(head.clone(), value),
            Some((head, rest)) => {
                let child = match self.0.get(head) {
                    Some(UseCaseValue::Group(child)) => child.clone(),
                    _ => UseCaseTree::new(),
                };
                let updated = child.set_at(&UseCasePath(rest.to_vec()), value);
                self.clone().with(head.clone(), UseCaseValue::Group(updated))
            }
        }
    }

    /// Return a copy of the tree without the node at `path`
    ///
    /// Groups left empty by the removal are pruned. Paths that do not exist
    /// leave the tree unchanged.
    pub fn remove_at(&self, path: &UseCasePath) -> UseCaseTree {
        match path.segments().split_first() {
            None => self.clone(),
            Some((head, [])) => {
                let mut copy = self.clone();
                copy.0.remove(head);
                copy
            }
            Some((head, rest)) => match self.0.get(head) {
                Some(UseCaseValue::Group(child)) => {
                    let updated = child.remove_at(&UseCasePath(rest.to_vec()));
                    let mut copy = self.clone();
                    if updated.is_empty() {
                        copy.0.remove(head);
                    } else {
                        copy.0.insert(head.clone(), UseCaseValue::Group(updated));
                    }
                    copy
                }
                _ => self.clone(),
            },
        }
    }

    /// Merge `overrides` onto this tree, see [`merge`]
    pub fn merged_with(&self, overrides: &UseCaseTree) -> UseCaseTree {
        merge(self, overrides)
    }

    /// Rewrite every `var(--color-from)` leaf to `var(--color-to)`
    pub fn replace_references(&self, from: &str, to: &str) -> UseCaseTree {
        self.replace_reference_text(&color_reference(from), &color_reference(to))
    }

    fn replace_reference_text(&self, from: &str, to: &str) -> UseCaseTree {
        UseCaseTree(
            self.0
                .iter()
                .map(|(key, value)| (key.clone(), value.replace_references(from, to)))
                .collect(),
        )
    }

    /// Flatten to kebab-case variable paths, depth first in key order
    ///
    /// Scale elements become `<path>-<index>`; children of the top-level
    /// `referenceColors` group are emitted without the group prefix.
    pub fn flatten(&self) -> Vec<FlatEntry> {
        let mut entries = Vec::new();
        for (key, value) in &self.0 {
            if key == REFERENCE_COLORS_KEY {
                if let UseCaseValue::Group(anchors) = value {
                    anchors.flatten_into("", &mut entries);
                    continue;
                }
            }
            flatten_value(&to_kebab_case(key), value, &mut entries);
        }
        entries
    }

    fn flatten_into(&self, prefix: &str, entries: &mut Vec<FlatEntry>) {
        for (key, value) in &self.0 {
            let segment = to_kebab_case(key);
            let path = if prefix.is_empty() { segment } else { format!("{prefix}-{segment}") };
            flatten_value(&path, value, entries);
        }
    }

    /// Every color reference in the tree with the path that holds it
    pub fn references(&self) -> Vec<ColorReference> {
        self.flatten()
            .into_iter()
            .filter_map(|entry| {
                entry.referenced_color().map(|color| ColorReference {
                    color: color.to_string(),
                    path: entry.path.clone(),
                })
            })
            .collect()
    }

    /// Names defined by the `referenceColors` group
    ///
    /// Only anchors holding a color reference count; a raw color value there
    /// never becomes a `--color-<anchor>` variable.
    pub fn reference_color_names(&self) -> BTreeSet<String> {
        match self.0.get(REFERENCE_COLORS_KEY) {
            Some(UseCaseValue::Group(anchors)) => {
                let mut entries = Vec::new();
                anchors.flatten_into("", &mut entries);
                entries
                    .into_iter()
                    .filter(|entry| entry.referenced_color().is_some())
                    .map(|entry| entry.path)
                    .collect()
            }
            _ => BTreeSet::new(),
        }
    }

    /// Return a copy with `referenceColors.<name>` pointing at `color`
    pub fn with_reference_color(&self, name: &str, color: &str) -> UseCaseTree {
        self.set_at(
            &UseCasePath::new([REFERENCE_COLORS_KEY, name]),
            UseCaseValue::color_ref(color),
        )
    }
}

fn flatten_value(path: &str, value: &UseCaseValue, entries: &mut Vec<FlatEntry>) {
    match value {
        UseCaseValue::Color(text) => {
            entries.push(FlatEntry { path: path.to_string(), value: text.clone() });
        }
        UseCaseValue::Scale(items) => {
            for (index, text) in items.iter().enumerate() {
                entries.push(FlatEntry { path: format!("{path}-{index}"), value: text.clone() });
            }
        }
        UseCaseValue::Group(tree) => tree.flatten_into(path, entries),
    }
}

impl FromIterator<(String, UseCaseValue)> for UseCaseTree {
    fn from_iter<I: IntoIterator<Item = (String, UseCaseValue)>>(iter: I) -> Self {
        UseCaseTree(iter.into_iter().collect())
    }
}

/// Deep-merge night overrides onto a base tree
///
/// Groups merge recursively (a missing or non-group base node counts as an
/// empty group); leaves and scales in `overrides` replace the base node
/// wholesale. Neither input is modified.
pub fn merge(base: &UseCaseTree, overrides: &UseCaseTree) -> UseCaseTree {
    let mut result = base.clone();
    for (key, value) in &overrides.0 {
        let merged = match value {
            UseCaseValue::Group(child_overrides) => {
                let child_base = match base.0.get(key) {
                    Some(UseCaseValue::Group(child)) => child.clone(),
                    _ => UseCaseTree::new(),
                };
                UseCaseValue::Group(merge(&child_base, child_overrides))
            }
            leaf => leaf.clone(),
        };
        result.0.insert(key.clone(), merged);
    }
    result
}
