//! Category joiner
//!
//! Resolves category references to display metadata. Both a missing reference
//! and a reference to a category that no longer exists resolve to the same
//! "Uncategorized" sentinel, under the same grouping key.

use std::collections::HashMap;

use serde::Serialize;

use super::grouping::CategoryKey;
use crate::models::{Category, CategoryId};

pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
pub const UNCATEGORIZED_COLOR: &str = "#9E9E9E";
pub const UNCATEGORIZED_ICON: &str = "tag";

/// Display metadata of a category as shown in reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub id: CategoryKey,
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl CategoryRef {
    /// The shared sentinel for records without a resolvable category
    pub fn uncategorized() -> Self {
        Self {
            id: CategoryKey::Uncategorized,
            name: UNCATEGORIZED_NAME.to_string(),
            color: UNCATEGORIZED_COLOR.to_string(),
            icon: UNCATEGORIZED_ICON.to_string(),
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        self.id == CategoryKey::Uncategorized
    }
}

impl Default for CategoryRef {
    fn default() -> Self {
        Self::uncategorized()
    }
}

impl From<&Category> for CategoryRef {
    fn from(category: &Category) -> Self {
        Self {
            id: CategoryKey::Category(category.id),
            name: category.name.clone(),
            color: category.color.clone(),
            icon: category.icon.clone(),
        }
    }
}

/// Lookup table over one snapshot of the category set
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    by_id: HashMap<CategoryId, CategoryRef>,
    uncategorized: CategoryRef,
}

impl CategoryIndex {
    pub fn new(categories: &[Category]) -> Self {
        Self {
            by_id: categories.iter().map(|c| (c.id, CategoryRef::from(c))).collect(),
            uncategorized: CategoryRef::uncategorized(),
        }
    }

    /// Grouping key for a reference; unknown ids collapse into `Uncategorized`
    pub fn key_for(&self, id: Option<CategoryId>) -> CategoryKey {
        match id {
            Some(id) if self.by_id.contains_key(&id) => CategoryKey::Category(id),
            _ => CategoryKey::Uncategorized,
        }
    }

    /// Display metadata for a reference
    pub fn resolve(&self, id: Option<CategoryId>) -> CategoryRef {
        self.resolve_key(self.key_for(id))
    }

    /// Display metadata for a grouping key
    pub fn resolve_key(&self, key: CategoryKey) -> CategoryRef {
        key.category_id()
            .and_then(|id| self.by_id.get(&id))
            .unwrap_or(&self.uncategorized)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// One-off lookup without building an index
pub fn resolve_category(id: Option<CategoryId>, categories: &[Category]) -> CategoryRef {
    id.and_then(|id| categories.iter().find(|c| c.id == id))
        .map(CategoryRef::from)
        .unwrap_or_else(CategoryRef::uncategorized)
}
