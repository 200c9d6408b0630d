//! Builtin Category Definitions
//!
//! Embedded definition set, parsed through the same validating loader as
//! user-supplied files.

use serde::Serialize;

use crate::axis::{Axis, AxisRange, AxisRanges};

/// Conventional file name of a definition source
pub const DEFAULT_DEFINITIONS_FILE: &str = "ideology_categories.json";

/// Builtin definition source (JSON keyed by category key, declaration order significant)
pub const BUILTIN_DEFINITIONS: &str = include_str!("../../data/categories.json");

/// A named region of the ideology space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    /// Unique key; position in the store decides overlap precedence
    pub key: String,
    /// Human-readable name
    pub name: String,
    /// English alias
    pub name_en: String,
    pub description: String,
    pub ranges: AxisRanges,
    pub examples: Vec<String>,
}

impl Category {
    /// Build a category with only a key and its box
    pub fn new(key: impl Into<String>, ranges: AxisRanges) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            name_en: String::new(),
            description: String::new(),
            ranges,
            examples: Vec::new(),
        }
    }

    pub fn range(&self, axis: Axis) -> AxisRange {
        self.ranges.get(axis)
    }

    /// `name`, falling back to `key` when the definition left it empty
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.key
        } else {
            &self.name
        }
    }
}
