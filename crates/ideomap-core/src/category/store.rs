//! Category Store
//!
//! Validated, read-only set of category definitions in declaration order.
//! Constructed once and passed by reference; there is no global instance.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use tracing::{debug, info};

use crate::axis::{Axis, AxisRange, AxisRanges};
use crate::error::{IdeomapError, Result};

use super::builtin::{Category, BUILTIN_DEFINITIONS};

/// Key reported when the definition source as a whole cannot be parsed
const SOURCE_KEY: &str = "<source>";

/// Runtime store of category definitions
#[derive(Debug, Clone, Default)]
pub struct CategoryStore {
    categories: Vec<Category>,
    index: HashMap<String, usize>,
}

impl CategoryStore {
    /// Load the embedded builtin set
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_DEFINITIONS)
    }

    /// Load a definition file, or the builtin set when no path is given
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    /// Load a definition file from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(IdeomapError::DefinitionsNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        let store = Self::from_json_str(&content)?;
        info!(path = %path.display(), categories = store.len(), "loaded category definitions");
        Ok(store)
    }

    /// Parse a JSON definition source, keeping the order keys appear in
    ///
    /// Any invalid entry rejects the whole source.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let OrderedEntries(entries) = serde_json::from_str(source)
            .map_err(|e| IdeomapError::malformed(SOURCE_KEY, e.to_string()))?;

        let categories = entries
            .into_iter()
            .map(|(key, value)| {
                let entry: CategoryEntry = serde_json::from_value(value)
                    .map_err(|e| IdeomapError::malformed(&key, e.to_string()))?;
                entry.into_category(key)
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_categories(categories)
    }

    /// Build from already-constructed categories, validating every box
    pub fn from_categories(categories: Vec<Category>) -> Result<Self> {
        let mut index = HashMap::with_capacity(categories.len());
        for (i, cat) in categories.iter().enumerate() {
            for axis in Axis::ALL {
                validate_range(&cat.key, axis, cat.range(axis))?;
            }
            if index.insert(cat.key.clone(), i).is_some() {
                return Err(IdeomapError::malformed(&cat.key, "duplicate category key"));
            }
        }
        debug!(categories = categories.len(), "category store built");
        Ok(Self { categories, index })
    }

    /// Look up a category, failing when absent
    pub fn get(&self, name: &str) -> Result<&Category> {
        self.find(name).ok_or_else(|| IdeomapError::CategoryNotFound {
            name: name.to_string(),
        })
    }

    pub fn find(&self, name: &str) -> Option<&Category> {
        self.index.get(name).map(|&i| &self.categories[i])
    }

    /// Declaration index of a category
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// All categories in declaration order
    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    /// Category keys in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<'a> IntoIterator for &'a CategoryStore {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

fn validate_range(key: &str, axis: Axis, range: AxisRange) -> Result<()> {
    if !range.min.is_finite() || !range.max.is_finite() {
        return Err(IdeomapError::malformed(
            key,
            format!("{} range has a non-finite bound", axis),
        ));
    }
    if range.min > range.max {
        return Err(IdeomapError::malformed(
            key,
            format!(
                "{} range has min > max ({} > {})",
                axis, range.min, range.max
            ),
        ));
    }
    Ok(())
}

/// Top-level definition map in source order
struct OrderedEntries(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for OrderedEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OrderedEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of category definitions keyed by name")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push(entry);
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// A single definition as written in the source
#[derive(Debug, Deserialize)]
struct CategoryEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    name_en: String,
    #[serde(default)]
    description: String,
    ranges: Option<RangesEntry>,
    #[serde(default)]
    examples: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RangesEntry {
    economic: Option<Vec<f64>>,
    culture: Option<Vec<f64>>,
    authority: Option<Vec<f64>>,
}

impl CategoryEntry {
    fn into_category(self, key: String) -> Result<Category> {
        let ranges = self
            .ranges
            .ok_or_else(|| IdeomapError::malformed(&key, "missing ranges"))?;

        let ranges = AxisRanges {
            economic: pair(&key, Axis::Economic, ranges.economic)?,
            culture: pair(&key, Axis::Culture, ranges.culture)?,
            authority: pair(&key, Axis::Authority, ranges.authority)?,
        };

        Ok(Category {
            key,
            name: self.name,
            name_en: self.name_en,
            description: self.description,
            ranges,
            examples: self.examples,
        })
    }
}

fn pair(key: &str, axis: Axis, bounds: Option<Vec<f64>>) -> Result<AxisRange> {
    match bounds.as_deref() {
        Some(&[min, max]) => Ok(AxisRange::new(min, max)),
        Some(other) => Err(IdeomapError::malformed(
            key,
            format!(
                "{} range must have exactly 2 bounds, got {}",
                axis,
                other.len()
            ),
        )),
        None => Err(IdeomapError::malformed(
            key,
            format!("missing {} range", axis),
        )),
    }
}
