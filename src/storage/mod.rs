//! Storage layer for ledger-lens
//!
//! JSON file storage with atomic writes and automatic directory creation.
//! [`Storage`] is the record store the report engine reads through
//! [`RecordStore`].

pub mod budget;
pub mod categories;
pub mod file_io;
pub mod query;
pub mod transactions;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use budget::BudgetRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use query::{BudgetFilter, RecordStore, TransactionFilter};
pub use transactions::TransactionRepository;

pub use crate::models::DateRange;

use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Budget, Category, Transaction};

pub(crate) fn read_guard<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, LedgerError> {
    lock.read()
        .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_guard<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, LedgerError> {
    lock.write()
        .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    pub budgets: BudgetRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), LedgerError> {
        self.transactions.load()?;
        self.categories.load()?;
        self.budgets.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), LedgerError> {
        self.transactions.save()?;
        self.categories.save()?;
        self.budgets.save()?;
        tracing::info!(dir = %self.paths.data_dir().display(), "saved ledger data");
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

impl RecordStore for Storage {
    fn query_transactions(&self, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        self.transactions.query(filter)
    }

    fn query_budgets(&self, filter: &BudgetFilter) -> LedgerResult<Vec<Budget>> {
        self.budgets.query(filter)
    }

    fn query_categories(&self) -> LedgerResult<Vec<Category>> {
        self.categories.get_all()
    }
}
