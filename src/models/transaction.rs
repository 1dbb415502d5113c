//! Transaction model
//!
//! A dated money movement. The sign of `amount` and the explicit `kind` are
//! both stored and may disagree; reports classify by `kind` and total by the
//! absolute amount.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TransactionId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    /// Infer a type from the sign of an amount (zero counts as expense)
    pub fn from_amount(amount: Money) -> Self {
        if amount.is_positive() {
            Self::Income
        } else {
            Self::Expense
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "expenses" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(format!("unknown transaction type '{}'", other)),
        }
    }
}

/// How a transaction was paid (informational only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    #[default]
    Card,
    BankTransfer,
    Mobile,
    Other,
}

/// A ledger transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "TransactionRecord")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Amount (negative for expense, positive for income)
    pub amount: Money,

    /// Calendar date of the movement
    pub date: NaiveDate,

    /// Explicit classification
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Category reference, if any
    pub category_id: Option<CategoryId>,

    pub payment_method: PaymentMethod,

    pub notes: String,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

/// On-disk shape, where `type` and the bookkeeping fields may be absent
#[derive(Deserialize)]
struct TransactionRecord {
    #[serde(default)]
    id: TransactionId,
    amount: Money,
    date: NaiveDate,
    #[serde(rename = "type", default)]
    kind: Option<TransactionType>,
    #[serde(default)]
    category_id: Option<CategoryId>,
    #[serde(default)]
    payment_method: PaymentMethod,
    #[serde(default)]
    notes: String,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        Self {
            id: record.id,
            amount: record.amount,
            date: record.date,
            kind: record
                .kind
                .unwrap_or_else(|| TransactionType::from_amount(record.amount)),
            category_id: record.category_id,
            payment_method: record.payment_method,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at.unwrap_or(record.created_at),
        }
    }
}

impl Transaction {
    /// Create a new transaction, inferring its type from the amount's sign
    pub fn new(date: NaiveDate, amount: Money) -> Self {
        Self::with_type(date, amount, TransactionType::from_amount(amount))
    }

    /// Create a new transaction with an explicit type
    pub fn with_type(date: NaiveDate, amount: Money, kind: TransactionType) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            amount,
            date,
            kind,
            category_id: None,
            payment_method: PaymentMethod::default(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style category assignment
    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Calendar month (1-12) of the transaction date
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_zero() {
            return Err(TransactionValidationError::ZeroAmount);
        }

        if !self.amount.is_in_range() {
            return Err(TransactionValidationError::AmountOutOfRange(self.amount));
        }

        if self.notes.len() > 500 {
            return Err(TransactionValidationError::NotesTooLong(self.notes.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.kind, self.amount)
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    ZeroAmount,
    AmountOutOfRange(Money),
    NotesTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroAmount => write!(f, "Transaction amount cannot be zero"),
            Self::AmountOutOfRange(amount) => {
                write!(f, "Transaction amount {} is out of range", amount)
            }
            Self::NotesTooLong(len) => {
                write!(f, "Transaction notes too long ({} chars, max 500)", len)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_type_inferred_from_sign() {
        let expense = Transaction::new(date(2025, 3, 5), Money::from_units(-50));
        let income = Transaction::new(date(2025, 3, 1), Money::from_units(2000));
        assert!(expense.is_expense());
        assert!(income.is_income());
        assert_eq!(expense.month(), 3);
    }

    #[test]
    fn test_explicit_type_may_disagree_with_sign() {
        let refund = Transaction::with_type(
            date(2025, 3, 5),
            Money::from_units(20),
            TransactionType::Expense,
        );
        assert!(refund.is_expense());
        assert!(refund.amount.is_positive());
    }

    #[test]
    fn test_deserialize_without_type() {
        let json = r#"{"amount": -30, "date": "2025-03-20"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.kind, TransactionType::Expense);
        assert_eq!(txn.amount, Money::from_units(-30));
        assert!(txn.category_id.is_none());
        assert_eq!(txn.payment_method, PaymentMethod::Card);
    }

    #[test]
    fn test_deserialize_keeps_explicit_type() {
        let json = r#"{"amount": -30, "date": "2025-03-20", "type": "income"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.kind, TransactionType::Income);
    }

    #[test]
    fn test_huge_amounts_are_rejected() {
        let json = r#"{"amount": -60000000000000000, "date": "2025-03-20"}"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());

        let txn = Transaction::new(date(2025, 3, 20), Money::from_cents(i64::MIN));
        assert_eq!(
            txn.validate(),
            Err(TransactionValidationError::AmountOutOfRange(txn.amount))
        );
    }

    #[test]
    fn test_serialization_round_trip_keeps_type_field() {
        let txn = Transaction::new(date(2025, 1, 2), Money::from_cents(-1234));
        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains("\"type\":\"expense\""));
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, txn.id);
        assert_eq!(back.amount, txn.amount);
    }

    #[test]
    fn test_validation() {
        let mut txn = Transaction::new(date(2025, 1, 2), Money::zero());
        assert_eq!(txn.validate(), Err(TransactionValidationError::ZeroAmount));

        txn.amount = Money::from_units(-5);
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_type_from_str() {
        assert_eq!("Income".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert!("transfer".parse::<TransactionType>().is_err());
    }
}
