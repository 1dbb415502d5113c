//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{CategoryId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};
use super::query::TransactionFilter;
use super::{read_guard, write_guard};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with a category index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: category_id -> transaction_ids
    by_category: RwLock<HashMap<CategoryId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build the category index
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = write_guard(&self.data)?;
        let mut by_category = write_guard(&self.by_category)?;

        data.clear();
        by_category.clear();

        for txn in file_data.transactions {
            if let Some(cat_id) = txn.category_id {
                by_category.entry(cat_id).or_default().push(txn.id);
            }
            data.insert(txn.id, txn);
        }

        tracing::info!(count = data.len(), path = %self.path.display(), "loaded transactions");
        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = read_guard(&self.data)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        Ok(read_guard(&self.data)?.get(&id).cloned())
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let data = read_guard(&self.data)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// Transactions matching a filter, newest first, at most `filter.limit`
    ///
    /// A category filter is served from the index; the rest is a scan.
    pub fn query(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, LedgerError> {
        let data = read_guard(&self.data)?;

        let transactions: Vec<Transaction> = match filter.category_id {
            Some(cat_id) => {
                let by_category = read_guard(&self.by_category)?;
                by_category
                    .get(&cat_id)
                    .map(|ids| ids.as_slice())
                    .unwrap_or(&[])
                    .iter()
                    .filter_map(|id| data.get(id))
                    .filter(|t| filter.matches(t))
                    .cloned()
                    .collect()
            }
            None => data.values().filter(|t| filter.matches(t)).cloned().collect(),
        };

        Ok(filter.newest_first(transactions))
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), LedgerError> {
        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let mut data = write_guard(&self.data)?;
        let mut by_category = write_guard(&self.by_category)?;

        if let Some(old_cat) = data.get(&txn.id).and_then(|old| old.category_id) {
            if let Some(ids) = by_category.get_mut(&old_cat) {
                ids.retain(|&id| id != txn.id);
            }
        }

        if let Some(cat_id) = txn.category_id {
            by_category.entry(cat_id).or_default().push(txn.id);
        }

        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> Result<bool, LedgerError> {
        let mut data = write_guard(&self.data)?;
        let mut by_category = write_guard(&self.by_category)?;

        match data.remove(&id) {
            Some(txn) => {
                if let Some(ids) = txn.category_id.and_then(|c| by_category.get_mut(&c)) {
                    ids.retain(|&tid| tid != id);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(read_guard(&self.data)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateRange, Money, TransactionType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_rejects_zero_amount() {
        let (_temp_dir, repo) = create_test_repo();
        let err = repo
            .upsert(Transaction::new(date(2025, 1, 1), Money::zero()))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let txn = Transaction::new(date(2025, 1, 15), Money::from_cents(-5000));
        let id = txn.id;

        repo.upsert(txn).unwrap();
        repo.save().unwrap();

        let repo2 = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.get(id).unwrap().unwrap().amount.cents(), -5000);
    }

    #[test]
    fn test_query_by_category_follows_updates() {
        let (_temp_dir, repo) = create_test_repo();
        let food = CategoryId::new();
        let rent = CategoryId::new();

        let mut txn = Transaction::new(date(2025, 1, 15), Money::from_units(-10)).in_category(food);
        repo.upsert(txn.clone()).unwrap();
        assert_eq!(
            repo.query(&TransactionFilter::default().in_category(food))
                .unwrap()
                .len(),
            1
        );

        txn.category_id = Some(rent);
        repo.upsert(txn).unwrap();
        assert!(repo
            .query(&TransactionFilter::default().in_category(food))
            .unwrap()
            .is_empty());
        assert_eq!(
            repo.query(&TransactionFilter::default().in_category(rent))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_query_range_and_type() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Transaction::new(date(2025, 1, 10), Money::from_units(-1)))
            .unwrap();
        repo.upsert(Transaction::new(date(2025, 1, 15), Money::from_units(-2)))
            .unwrap();
        repo.upsert(Transaction::new(date(2025, 1, 15), Money::from_units(300)))
            .unwrap();
        repo.upsert(Transaction::new(date(2025, 1, 20), Money::from_units(-3)))
            .unwrap();

        let range = DateRange::new(date(2025, 1, 12), date(2025, 1, 20)).unwrap();
        let in_range = repo.query(&TransactionFilter::in_range(range)).unwrap();
        assert_eq!(in_range.len(), 2);

        let expenses = repo
            .query(&TransactionFilter::in_range(range).of_type(TransactionType::Expense))
            .unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, Money::from_units(-2));
    }

    #[test]
    fn test_query_newest_with_limit() {
        let (_temp_dir, repo) = create_test_repo();
        for day in [3, 17, 9, 25, 1] {
            repo.upsert(Transaction::new(date(2025, 1, day), Money::from_units(-1)))
                .unwrap();
        }

        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 20)).unwrap();
        let newest = repo
            .query(&TransactionFilter::in_range(range).newest(2))
            .unwrap();
        let dates: Vec<NaiveDate> = newest.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2025, 1, 17), date(2025, 1, 9)]);

        let none = repo
            .query(&TransactionFilter::default().newest(0))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let txn = Transaction::new(date(2025, 1, 15), Money::from_units(-5)).in_category(CategoryId::new());
        let id = txn.id;

        repo.upsert(txn).unwrap();
        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
