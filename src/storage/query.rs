//! The read-side contract between the reports and whatever holds the records
//!
//! Report generation only ever calls these three queries. Implementations are
//! free to hit disk or the network; a failed fetch is returned as-is and the
//! reports never retry it.

use crate::error::LedgerResult;
use crate::models::{Budget, Category, CategoryId, DateRange, Transaction, TransactionType};

/// Transaction query; `None` fields do not filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub date_range: Option<DateRange>,
    pub category_id: Option<CategoryId>,
    pub kind: Option<TransactionType>,
    /// Keep only this many of the newest matches
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Everything inside a date range
    pub fn in_range(range: DateRange) -> Self {
        Self {
            date_range: Some(range),
            ..Default::default()
        }
    }

    /// Restrict to one transaction type
    pub fn of_type(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restrict to one category
    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Keep only the `limit` newest matches
    pub fn newest(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.date_range.map_or(true, |r| r.contains(txn.date))
            && self.category_id.map_or(true, |c| txn.category_id == Some(c))
            && self.kind.map_or(true, |k| txn.kind == k)
    }

    /// Order matches newest first (date, then creation time) and apply `limit`
    pub fn newest_first(&self, mut matches: Vec<Transaction>) -> Vec<Transaction> {
        matches.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        if let Some(limit) = self.limit {
            matches.truncate(limit);
        }
        matches
    }
}

/// Budget query; `None` fields do not filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BudgetFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl BudgetFilter {
    /// Budgets of one calendar month
    pub fn for_month(month: u32, year: i32) -> Self {
        Self {
            month: Some(month),
            year: Some(year),
        }
    }

    pub fn matches(&self, budget: &Budget) -> bool {
        self.month.map_or(true, |m| budget.month == m)
            && self.year.map_or(true, |y| budget.year == y)
    }
}

/// Read access to ledger records
pub trait RecordStore {
    /// Transactions matching the filter
    ///
    /// Order is only guaranteed when `limit` is set, in which case the newest
    /// `limit` matches are returned newest first.
    fn query_transactions(&self, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>>;

    /// Budgets matching the filter, in no guaranteed order
    fn query_budgets(&self, filter: &BudgetFilter) -> LedgerResult<Vec<Budget>>;

    /// All categories
    fn query_categories(&self) -> LedgerResult<Vec<Category>>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn query_transactions(&self, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        (**self).query_transactions(filter)
    }

    fn query_budgets(&self, filter: &BudgetFilter) -> LedgerResult<Vec<Budget>> {
        (**self).query_budgets(filter)
    }

    fn query_categories(&self) -> LedgerResult<Vec<Category>> {
        (**self).query_categories()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let txn = Transaction::new(date(2025, 3, 5), Money::from_units(-50));
        assert!(TransactionFilter::default().matches(&txn));
    }

    #[test]
    fn test_range_end_is_exclusive() {
        let range = DateRange::new(date(2025, 3, 1), date(2025, 4, 1)).unwrap();
        let filter = TransactionFilter::in_range(range);

        let inside = Transaction::new(date(2025, 3, 31), Money::from_units(-1));
        let outside = Transaction::new(date(2025, 4, 1), Money::from_units(-1));
        assert!(filter.matches(&inside));
        assert!(!filter.matches(&outside));
    }

    #[test]
    fn test_type_and_category_filters() {
        let food = CategoryId::new();
        let txn = Transaction::new(date(2025, 3, 5), Money::from_units(-50)).in_category(food);

        assert!(TransactionFilter::default()
            .of_type(TransactionType::Expense)
            .in_category(food)
            .matches(&txn));
        assert!(!TransactionFilter::default()
            .of_type(TransactionType::Income)
            .matches(&txn));
        assert!(!TransactionFilter::default()
            .in_category(CategoryId::new())
            .matches(&txn));
    }

    #[test]
    fn test_newest_first_applies_limit() {
        let older = Transaction::new(date(2025, 3, 1), Money::from_units(-1));
        let mut same_day_first = Transaction::new(date(2025, 3, 9), Money::from_units(-2));
        let mut same_day_second = Transaction::new(date(2025, 3, 9), Money::from_units(-3));
        same_day_first.created_at = chrono::Utc::now() - chrono::Duration::minutes(5);
        same_day_second.created_at = chrono::Utc::now();

        let picked = TransactionFilter::default()
            .newest(2)
            .newest_first(vec![older, same_day_first, same_day_second.clone()]);

        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].id, same_day_second.id);
        assert_eq!(picked[1].date, date(2025, 3, 9));

        let all = TransactionFilter::default().newest_first(picked);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_budget_filter() {
        let budget = Budget::new(CategoryId::new(), Money::from_units(400), 3, 2025);
        assert!(BudgetFilter::for_month(3, 2025).matches(&budget));
        assert!(!BudgetFilter::for_month(4, 2025).matches(&budget));
        assert!(BudgetFilter {
            month: None,
            year: Some(2025)
        }
        .matches(&budget));
    }
}
