//! Per-category totals of one transaction type

use serde::Serialize;

use super::categories::{CategoryIndex, CategoryRef};
use super::grouping::{group_and_count, sign_agnostic};
use crate::models::{Money, Transaction, TransactionType};

/// Total of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    #[serde(flatten)]
    pub category: CategoryRef,
    pub value: Money,
    pub count: usize,
}

/// Sign-agnostic totals per category for records of `kind`
///
/// Zero totals are dropped. Rows are ordered by value, highest first, and
/// equal values by category name.
pub fn category_summary(
    records: &[Transaction],
    kind: TransactionType,
    index: &CategoryIndex,
) -> Vec<CategoryTotal> {
    let groups = group_and_count(
        records.iter().filter(|t| t.kind == kind),
        |t: &Transaction| index.key_for(t.category_id),
        sign_agnostic,
    );

    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .filter(|(_, bucket)| !bucket.total.is_zero())
        .map(|(key, bucket)| CategoryTotal {
            category: index.resolve_key(key),
            value: bucket.total,
            count: bucket.count,
        })
        .collect();

    totals.sort_by(|a, b| {
        b.value
            .cmp(&a.value)
            .then_with(|| a.category.name.cmp(&b.category.name))
    });
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryType};
    use chrono::NaiveDate;

    fn txn(units: i64, kind: TransactionType, category: Option<&Category>) -> Transaction {
        let t = Transaction::with_type(
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            Money::from_units(units),
            kind,
        );
        match category {
            Some(c) => t.in_category(c.id),
            None => t,
        }
    }

    #[test]
    fn test_summary_sorted_and_filtered_by_type() {
        let food = Category::new("Food", "#FF6B6B", CategoryType::Expense);
        let rent = Category::new("Rent", "#45B7D1", CategoryType::Expense);
        let index = CategoryIndex::new(&[food.clone(), rent.clone()]);

        let records = vec![
            txn(-50, TransactionType::Expense, Some(&food)),
            txn(-30, TransactionType::Expense, Some(&food)),
            txn(-900, TransactionType::Expense, Some(&rent)),
            txn(-5, TransactionType::Expense, None),
            txn(2000, TransactionType::Income, None),
        ];

        let rows = category_summary(&records, TransactionType::Expense, &index);

        let values: Vec<(&str, Money, usize)> = rows
            .iter()
            .map(|r| (r.category.name.as_str(), r.value, r.count))
            .collect();
        assert_eq!(
            values,
            vec![
                ("Rent", Money::from_units(900), 1),
                ("Food", Money::from_units(80), 2),
                ("Uncategorized", Money::from_units(5), 1),
            ]
        );
    }

    #[test]
    fn test_zero_totals_are_dropped() {
        let index = CategoryIndex::default();
        let records = vec![txn(0, TransactionType::Expense, None)];

        assert!(category_summary(&records, TransactionType::Expense, &index).is_empty());
    }

    #[test]
    fn test_values_never_zero_and_descending() {
        let cats: Vec<Category> = (0..5)
            .map(|i| Category::new(format!("C{}", i), "#123456", CategoryType::Expense))
            .collect();
        let index = CategoryIndex::new(&cats);
        let records: Vec<Transaction> = cats
            .iter()
            .enumerate()
            .map(|(i, c)| txn(-(i as i64 * 10), TransactionType::Expense, Some(c)))
            .collect();

        let rows = category_summary(&records, TransactionType::Expense, &index);

        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| !r.value.is_zero()));
        assert!(rows.windows(2).all(|w| w[0].value > w[1].value));
    }

    #[test]
    fn test_row_serializes_flat() {
        let index = CategoryIndex::default();
        let records = vec![txn(-12, TransactionType::Expense, None)];
        let rows = category_summary(&records, TransactionType::Expense, &index);

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["name"], "Uncategorized");
        assert_eq!(json["color"], "#9E9E9E");
        assert_eq!(json["value"], 12.0);
    }
}
