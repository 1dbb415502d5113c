//! Dashboard summarizer
//!
//! Composes the current and previous month totals, their changes, the top
//! expense categories and the latest transactions into one summary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::categories::{CategoryIndex, CategoryRef};
use super::category_summary::{category_summary, CategoryTotal};
use super::compare::percent_change_money;
use super::grouping::{group_and_sum, sign_agnostic};
use crate::models::{Money, PaymentMethod, Transaction, TransactionId, TransactionType};

pub const DEFAULT_TOP_CATEGORY_LIMIT: usize = 3;
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Type totals of one period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub income: Money,
    pub expense: Money,
    /// `income - expense`
    pub balance: Money,
    pub transaction_count: usize,
}

impl PeriodTotals {
    pub fn from_records(records: &[Transaction]) -> Self {
        let by_type = group_and_sum(records, |t: &Transaction| t.kind, sign_agnostic);
        let income = by_type
            .get(&TransactionType::Income)
            .copied()
            .unwrap_or_default();
        let expense = by_type
            .get(&TransactionType::Expense)
            .copied()
            .unwrap_or_default();

        Self {
            income,
            expense,
            balance: income - expense,
            transaction_count: records.len(),
        }
    }
}

/// Percent changes from the previous period to the current one
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodChanges {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl PeriodChanges {
    pub fn between(current: &PeriodTotals, previous: &PeriodTotals) -> Self {
        Self {
            income: percent_change_money(current.income, previous.income),
            expense: percent_change_money(current.expense, previous.expense),
            balance: percent_change_money(current.balance, previous.balance),
        }
    }
}

/// A transaction with its category resolved for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentTransaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: CategoryRef,
    pub payment_method: PaymentMethod,
    pub notes: String,
    #[serde(skip)]
    created_at: DateTime<Utc>,
}

impl RecentTransaction {
    fn new(txn: &Transaction, index: &CategoryIndex) -> Self {
        Self {
            id: txn.id,
            date: txn.date,
            amount: txn.amount,
            kind: txn.kind,
            category: index.resolve(txn.category_id),
            payment_method: txn.payment_method,
            notes: txn.notes.clone(),
            created_at: txn.created_at,
        }
    }
}

/// How many entries the dashboard lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLimits {
    pub top_categories: usize,
    pub recent_transactions: usize,
}

impl Default for DashboardLimits {
    fn default() -> Self {
        Self {
            top_categories: DEFAULT_TOP_CATEGORY_LIMIT,
            recent_transactions: DEFAULT_RECENT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub current_month: PeriodTotals,
    pub previous_month: PeriodTotals,
    pub changes: PeriodChanges,
    pub top_categories: Vec<CategoryTotal>,
    pub recent_transactions: Vec<RecentTransaction>,
}

/// Build the dashboard from already-fetched record sets
///
/// `recent` is any set that contains the latest transactions; only the newest
/// `limits.recent_transactions` are kept, ordered by date and then creation
/// time, newest first.
pub fn summarize(
    current: &[Transaction],
    previous: &[Transaction],
    recent: &[Transaction],
    index: &CategoryIndex,
    limits: &DashboardLimits,
) -> DashboardSummary {
    let current_month = PeriodTotals::from_records(current);
    let previous_month = PeriodTotals::from_records(previous);

    let mut top_categories = category_summary(current, TransactionType::Expense, index);
    top_categories.truncate(limits.top_categories);

    let mut latest: Vec<&Transaction> = recent.iter().collect();
    latest.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    let recent_transactions = latest
        .into_iter()
        .take(limits.recent_transactions)
        .map(|t| RecentTransaction::new(t, index))
        .collect();

    DashboardSummary {
        changes: PeriodChanges::between(&current_month, &previous_month),
        current_month,
        previous_month,
        top_categories,
        recent_transactions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryType};
    use chrono::Duration;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn txn(m: u32, d: u32, units: i64) -> Transaction {
        Transaction::new(date(m, d), Money::from_units(units))
    }

    #[test]
    fn test_period_totals() {
        let records = vec![txn(3, 1, 2000), txn(3, 5, -50), txn(3, 20, -30)];
        let totals = PeriodTotals::from_records(&records);

        assert_eq!(totals.income, Money::from_units(2000));
        assert_eq!(totals.expense, Money::from_units(80));
        assert_eq!(totals.balance, Money::from_units(1920));
        assert_eq!(totals.transaction_count, 3);
    }

    #[test]
    fn test_changes_against_previous_month() {
        let current = vec![txn(3, 1, 2000), txn(3, 5, -150)];
        let previous = vec![txn(2, 1, 2000), txn(2, 5, -100)];

        let summary = summarize(
            &current,
            &previous,
            &current,
            &CategoryIndex::default(),
            &DashboardLimits::default(),
        );

        assert_eq!(summary.changes.income, 0.0);
        assert_eq!(summary.changes.expense, 50.0);
        assert!(summary.changes.balance < 0.0);
    }

    #[test]
    fn test_empty_previous_month_is_full_swing() {
        let current = vec![txn(3, 5, -10)];
        let summary = summarize(
            &current,
            &[],
            &current,
            &CategoryIndex::default(),
            &DashboardLimits::default(),
        );

        assert_eq!(summary.previous_month, PeriodTotals::default());
        assert_eq!(summary.changes.expense, 100.0);
        assert_eq!(summary.changes.income, 100.0);
    }

    #[test]
    fn test_top_three_expense_categories() {
        let cats: Vec<Category> = ["Food", "Rent", "Fun", "Travel"]
            .iter()
            .map(|n| Category::new(*n, "#123456", CategoryType::Expense))
            .collect();
        let index = CategoryIndex::new(&cats);
        let current = vec![
            txn(3, 1, -10).in_category(cats[0].id),
            txn(3, 1, -900).in_category(cats[1].id),
            txn(3, 1, -40).in_category(cats[2].id),
            txn(3, 1, -70).in_category(cats[3].id),
            txn(3, 1, 5000).in_category(cats[0].id),
        ];

        let summary = summarize(&current, &[], &current, &index, &DashboardLimits::default());
        let names: Vec<&str> = summary
            .top_categories
            .iter()
            .map(|c| c.category.name.as_str())
            .collect();

        assert_eq!(names, vec!["Rent", "Travel", "Fun"]);
    }

    #[test]
    fn test_five_most_recent() {
        let mut recent: Vec<Transaction> = (1..=7).map(|d| txn(3, d, -(d as i64))).collect();
        // Same day as the newest, created later
        let mut late_entry = txn(3, 7, -99);
        late_entry.created_at = recent[6].created_at + Duration::seconds(5);
        recent.push(late_entry);

        let summary = summarize(
            &[],
            &[],
            &recent,
            &CategoryIndex::default(),
            &DashboardLimits::default(),
        );

        let amounts: Vec<Money> = summary
            .recent_transactions
            .iter()
            .map(|t| t.amount)
            .collect();
        assert_eq!(
            amounts,
            vec![
                Money::from_units(-99),
                Money::from_units(-7),
                Money::from_units(-6),
                Money::from_units(-5),
                Money::from_units(-4),
            ]
        );
        assert!(summary.recent_transactions[0].category.is_uncategorized());
    }

    #[test]
    fn test_custom_limits() {
        let current: Vec<Transaction> = (1..=3).map(|d| txn(3, d, -10)).collect();
        let limits = DashboardLimits {
            top_categories: 1,
            recent_transactions: 2,
        };

        let summary = summarize(&current, &[], &current, &CategoryIndex::default(), &limits);

        assert_eq!(summary.top_categories.len(), 1);
        assert_eq!(summary.recent_transactions.len(), 2);
    }
}
