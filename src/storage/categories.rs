//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{default_categories, Category, CategoryId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_guard, write_guard};

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = write_guard(&self.categories)?;
        categories.clear();
        for category in file_data.categories {
            categories.insert(category.id, category);
        }

        tracing::info!(count = categories.len(), path = %self.path.display(), "loaded categories");
        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let categories = read_guard(&self.categories)?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));

        write_json_atomic(&self.path, &CategoryData { categories: list })
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, LedgerError> {
        Ok(read_guard(&self.categories)?.get(&id).cloned())
    }

    /// Get a category by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>, LedgerError> {
        let categories = read_guard(&self.categories)?;
        Ok(categories.values().find(|c| c.name_matches(name)).cloned())
    }

    /// Get all categories sorted by name
    pub fn get_all(&self) -> Result<Vec<Category>, LedgerError> {
        let categories = read_guard(&self.categories)?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    /// Insert a new category, rejecting a name already in use
    pub fn insert(&self, category: Category) -> Result<(), LedgerError> {
        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let mut categories = write_guard(&self.categories)?;

        if categories
            .values()
            .any(|c| c.id != category.id && c.name_matches(&category.name))
        {
            return Err(LedgerError::Duplicate {
                entity_type: "Category",
                identifier: category.name,
            });
        }

        categories.insert(category.id, category);
        Ok(())
    }

    /// Insert or update a category
    pub fn upsert(&self, category: Category) -> Result<(), LedgerError> {
        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        write_guard(&self.categories)?.insert(category.id, category);
        Ok(())
    }

    /// Delete a category; seeded defaults cannot be removed
    pub fn delete(&self, id: CategoryId) -> Result<bool, LedgerError> {
        let mut categories = write_guard(&self.categories)?;

        match categories.get(&id) {
            Some(c) if c.is_default => Err(LedgerError::Validation(format!(
                "Cannot delete default category '{}'",
                c.name
            ))),
            Some(_) => Ok(categories.remove(&id).is_some()),
            None => Ok(false),
        }
    }

    /// Add the default categories that are not present yet (matched by name)
    ///
    /// Returns how many were added.
    pub fn seed_defaults(&self) -> Result<usize, LedgerError> {
        let mut categories = write_guard(&self.categories)?;

        let mut added = 0;
        for seed in default_categories() {
            if categories.values().any(|c| c.name_matches(&seed.name)) {
                continue;
            }
            categories.insert(seed.id, seed);
            added += 1;
        }

        tracing::debug!(added, "seeded default categories");
        Ok(added)
    }

    /// Count categories
    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(read_guard(&self.categories)?.len())
    }
}
