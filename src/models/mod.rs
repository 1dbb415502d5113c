//! Core data models for ledger-lens
//!
//! Records as supplied by the store: transactions, categories and budgets,
//! plus the identifier and money types they share.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use budget::{Budget, BudgetKey};
pub use category::{default_categories, Category, CategoryType};
pub use ids::{BudgetId, CategoryId, TransactionId};
pub use money::Money;
pub use period::{DateRange, MonthPeriod, PeriodError};
pub use transaction::{PaymentMethod, Transaction, TransactionType};
