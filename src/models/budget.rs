//! Budget model
//!
//! A spending ceiling for one category in one calendar month.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, CategoryId};
use super::money::Money;

/// Lowest accepted budget year
pub const MIN_BUDGET_YEAR: i32 = 2000;
/// Highest accepted budget year
pub const MAX_BUDGET_YEAR: i32 = 2100;

/// The uniqueness key of a budget: one per category per month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BudgetKey {
    pub category_id: CategoryId,
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for BudgetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{:02}", self.category_id, self.year, self.month)
    }
}

/// A monthly spending limit for a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    #[serde(default)]
    pub id: BudgetId,

    /// The category this budget limits
    pub category_id: CategoryId,

    /// Spending ceiling (non-negative)
    pub amount: Money,

    /// Calendar month, 1-12
    pub month: u32,

    pub year: i32,

    #[serde(default)]
    pub notes: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget
    pub fn new(category_id: CategoryId, amount: Money, month: u32, year: i32) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            category_id,
            amount,
            month,
            year,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The (category, year, month) uniqueness key
    pub fn key(&self) -> BudgetKey {
        BudgetKey {
            category_id: self.category_id,
            year: self.year,
            month: self.month,
        }
    }

    /// Whether this budget applies to the given month
    pub fn is_for(&self, month: u32, year: i32) -> bool {
        self.month == month && self.year == year
    }

    /// Set the ceiling
    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
        self.updated_at = Utc::now();
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.amount.is_negative() {
            return Err(BudgetValidationError::NegativeAmount);
        }
        if !self.amount.is_in_range() {
            return Err(BudgetValidationError::AmountOutOfRange);
        }

        if !(1..=12).contains(&self.month) {
            return Err(BudgetValidationError::InvalidMonth(self.month));
        }

        if !(MIN_BUDGET_YEAR..=MAX_BUDGET_YEAR).contains(&self.year) {
            return Err(BudgetValidationError::InvalidYear(self.year));
        }

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02} limit: {}", self.year, self.month, self.amount)
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeAmount,
    AmountOutOfRange,
    InvalidMonth(u32),
    InvalidYear(i32),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount => write!(f, "Budget amount cannot be negative"),
            Self::AmountOutOfRange => write!(f, "Budget amount is out of range"),
            Self::InvalidMonth(m) => write!(f, "Budget month must be 1-12, got {}", m),
            Self::InvalidYear(y) => write!(
                f,
                "Budget year must be {}-{}, got {}",
                MIN_BUDGET_YEAR, MAX_BUDGET_YEAR, y
            ),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
