//! Budget repository for JSON storage
//!
//! Manages loading and saving monthly budgets to budgets.json. A budget is
//! unique per (category, year, month); the key index is checked under the
//! same write lock that inserts the record.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Budget, BudgetId, BudgetKey, CategoryId};

use super::file_io::{read_json, write_json_atomic};
use super::query::BudgetFilter;
use super::{read_guard, write_guard};

/// Serializable budget data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

#[derive(Default)]
struct BudgetTable {
    budgets: HashMap<BudgetId, Budget>,
    /// Index: (category, year, month) -> budget id
    by_key: HashMap<BudgetKey, BudgetId>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    table: RwLock<BudgetTable>,
}

impl BudgetRepository {
    /// Create a new budget repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            table: RwLock::new(BudgetTable::default()),
        }
    }

    /// Load budgets from disk
    ///
    /// A hand-edited file may carry two budgets for one key; the first is kept.
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut table = write_guard(&self.table)?;
        table.budgets.clear();
        table.by_key.clear();

        for budget in file_data.budgets {
            let key = budget.key();
            if table.by_key.contains_key(&key) {
                tracing::warn!(%key, id = %budget.id, "skipping duplicate budget in data file");
                continue;
            }
            table.by_key.insert(key, budget.id);
            table.budgets.insert(budget.id, budget);
        }

        tracing::info!(count = table.budgets.len(), path = %self.path.display(), "loaded budgets");
        Ok(())
    }

    /// Save budgets to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let table = read_guard(&self.table)?;

        let mut budgets: Vec<_> = table.budgets.values().cloned().collect();
        budgets.sort_by_key(|b| (b.year, b.month, b.created_at));

        write_json_atomic(&self.path, &BudgetData { budgets })
    }

    /// Get a budget by ID
    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, LedgerError> {
        Ok(read_guard(&self.table)?.budgets.get(&id).cloned())
    }

    /// Get the budget of a category for one month
    pub fn find(
        &self,
        category_id: CategoryId,
        month: u32,
        year: i32,
    ) -> Result<Option<Budget>, LedgerError> {
        let table = read_guard(&self.table)?;
        let key = BudgetKey {
            category_id,
            year,
            month,
        };

        Ok(table
            .by_key
            .get(&key)
            .and_then(|id| table.budgets.get(id))
            .cloned())
    }

    /// Insert a new budget; fails if its (category, year, month) is taken
    pub fn insert(&self, budget: Budget) -> Result<(), LedgerError> {
        budget
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let mut table = write_guard(&self.table)?;
        let key = budget.key();

        if table.by_key.contains_key(&key) {
            return Err(LedgerError::Duplicate {
                entity_type: "Budget",
                identifier: key.to_string(),
            });
        }

        table.by_key.insert(key, budget.id);
        table.budgets.insert(budget.id, budget);
        Ok(())
    }

    /// Replace an existing budget
    ///
    /// Moving it onto a key held by another budget is rejected.
    pub fn update(&self, budget: Budget) -> Result<(), LedgerError> {
        budget
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let mut table = write_guard(&self.table)?;
        let old_key = match table.budgets.get(&budget.id) {
            Some(old) => old.key(),
            None => return Err(LedgerError::budget_not_found(budget.id.to_string())),
        };

        let key = budget.key();
        if let Some(&holder) = table.by_key.get(&key) {
            if holder != budget.id {
                return Err(LedgerError::Duplicate {
                    entity_type: "Budget",
                    identifier: key.to_string(),
                });
            }
        }

        table.by_key.remove(&old_key);
        table.by_key.insert(key, budget.id);
        table.budgets.insert(budget.id, budget);
        Ok(())
    }

    /// Delete a budget
    pub fn delete(&self, id: BudgetId) -> Result<bool, LedgerError> {
        let mut table = write_guard(&self.table)?;

        match table.budgets.remove(&id) {
            Some(budget) => {
                table.by_key.remove(&budget.key());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Budgets matching a filter
    pub fn query(&self, filter: &BudgetFilter) -> Result<Vec<Budget>, LedgerError> {
        let table = read_guard(&self.table)?;
        Ok(table
            .budgets
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect())
    }

    /// Count budgets
    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(read_guard(&self.table)?.budgets.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BudgetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_insert_and_find() {
        let (_temp_dir, repo) = create_test_repo();
        let food = CategoryId::new();
        let budget = Budget::new(food, Money::from_units(400), 3, 2025);
        let id = budget.id;

        repo.insert(budget).unwrap();

        assert_eq!(repo.find(food, 3, 2025).unwrap().unwrap().id, id);
        assert!(repo.find(food, 4, 2025).unwrap().is_none());
    }

    #[test]
    fn test_insert_rejects_second_budget_for_same_month() {
        let (_temp_dir, repo) = create_test_repo();
        let food = CategoryId::new();

        repo.insert(Budget::new(food, Money::from_units(400), 3, 2025))
            .unwrap();
        let err = repo
            .insert(Budget::new(food, Money::from_units(500), 3, 2025))
            .unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(
            repo.find(food, 3, 2025).unwrap().unwrap().amount,
            Money::from_units(400)
        );
    }

    #[test]
    fn test_insert_rejects_invalid_budget() {
        let (_temp_dir, repo) = create_test_repo();
        let err = repo
            .insert(Budget::new(CategoryId::new(), Money::from_units(10), 13, 2025))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_update_moves_key() {
        let (_temp_dir, repo) = create_test_repo();
        let food = CategoryId::new();
        let mut budget = Budget::new(food, Money::from_units(400), 3, 2025);
        repo.insert(budget.clone()).unwrap();

        budget.month = 4;
        budget.set_amount(Money::from_units(450));
        repo.update(budget).unwrap();

        assert!(repo.find(food, 3, 2025).unwrap().is_none());
        assert_eq!(
            repo.find(food, 4, 2025).unwrap().unwrap().amount,
            Money::from_units(450)
        );
    }

    #[test]
    fn test_update_onto_taken_key_fails() {
        let (_temp_dir, repo) = create_test_repo();
        let food = CategoryId::new();
        repo.insert(Budget::new(food, Money::from_units(400), 3, 2025))
            .unwrap();
        let mut april = Budget::new(food, Money::from_units(300), 4, 2025);
        repo.insert(april.clone()).unwrap();

        april.month = 3;
        assert!(repo.update(april).unwrap_err().is_duplicate());
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        let (_temp_dir, repo) = create_test_repo();
        let budget = Budget::new(CategoryId::new(), Money::from_units(1), 1, 2025);
        assert!(repo.update(budget).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_frees_key() {
        let (_temp_dir, repo) = create_test_repo();
        let food = CategoryId::new();
        let budget = Budget::new(food, Money::from_units(400), 3, 2025);
        let id = budget.id;
        repo.insert(budget).unwrap();

        assert!(repo.delete(id).unwrap());
        repo.insert(Budget::new(food, Money::from_units(100), 3, 2025))
            .unwrap();
    }

    #[test]
    fn test_query_by_month() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(Budget::new(CategoryId::new(), Money::from_units(1), 3, 2025))
            .unwrap();
        repo.insert(Budget::new(CategoryId::new(), Money::from_units(2), 3, 2025))
            .unwrap();
        repo.insert(Budget::new(CategoryId::new(), Money::from_units(3), 4, 2025))
            .unwrap();

        assert_eq!(repo.query(&BudgetFilter::for_month(3, 2025)).unwrap().len(), 2);
        assert_eq!(repo.query(&BudgetFilter::default()).unwrap().len(), 3);
    }

    #[test]
    fn test_load_keeps_first_duplicate() {
        let (temp_dir, _repo) = create_test_repo();
        let food = CategoryId::new();
        let first = Budget::new(food, Money::from_units(400), 3, 2025);
        let second = Budget::new(food, Money::from_units(900), 3, 2025);
        let path = temp_dir.path().join("budgets.json");
        fs::write(
            &path,
            serde_json::to_string(&serde_json::json!({ "budgets": [first, second] })).unwrap(),
        )
        .unwrap();

        let repo = BudgetRepository::new(path);
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(
            repo.find(food, 3, 2025).unwrap().unwrap().amount,
            Money::from_units(400)
        );
    }
}
