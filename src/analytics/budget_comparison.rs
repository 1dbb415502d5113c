//! Budget comparison builder
//!
//! Merges a month's budgets with the actual spending per category. Every
//! budget yields a row; spending in a category without a budget yields a
//! synthesized "unbudgeted" row. Rows are ordered by how much of the budget
//! is used, highest first.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::categories::{CategoryIndex, CategoryRef};
use super::grouping::CategoryKey;
use crate::models::{Budget, Money};

/// Display cap of `percentage_used`
pub const MAX_PERCENTAGE_USED: f64 = 100.0;

/// A budget joined to its category
///
/// `key` is the budget's own category, even when that category no longer
/// exists; `category` is only what gets displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetLine {
    pub key: CategoryKey,
    pub category: CategoryRef,
    pub budgeted: Money,
}

impl BudgetLine {
    pub fn new(category: CategoryRef, budgeted: Money) -> Self {
        Self {
            key: category.id,
            category,
            budgeted,
        }
    }

    pub fn from_budget(budget: &Budget, index: &CategoryIndex) -> Self {
        Self {
            key: CategoryKey::Category(budget.category_id),
            category: index.resolve(Some(budget.category_id)),
            budgeted: budget.amount,
        }
    }
}

/// Budget lines for a set of budgets, in input order
pub fn budget_lines(budgets: &[Budget], index: &CategoryIndex) -> Vec<BudgetLine> {
    budgets
        .iter()
        .map(|b| BudgetLine::from_budget(b, index))
        .collect()
}

/// Classification of a comparison row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Within,
    Exceeded,
    Unbudgeted,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Within => "within",
            Self::Exceeded => "exceeded",
            Self::Unbudgeted => "unbudgeted",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Budget versus actual for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub category: CategoryRef,
    pub budgeted: Money,
    pub actual: Money,
    /// `budgeted - actual`; negative when over budget
    pub difference: Money,
    /// Share of the budget spent, capped at 100
    pub percentage_used: f64,
    /// Share of the budget spent, uncapped
    pub raw_percentage: f64,
    pub status: BudgetStatus,
}

impl ComparisonRow {
    fn budgeted(line: &BudgetLine, actual: Money) -> Self {
        let difference = line.budgeted - actual;
        let raw_percentage = actual.percent_of(line.budgeted);

        Self {
            category: line.category.clone(),
            budgeted: line.budgeted,
            actual,
            difference,
            percentage_used: raw_percentage.min(MAX_PERCENTAGE_USED),
            raw_percentage,
            status: if difference.is_negative() {
                BudgetStatus::Exceeded
            } else {
                BudgetStatus::Within
            },
        }
    }

    fn unbudgeted(category: CategoryRef, actual: Money) -> Self {
        Self {
            category,
            budgeted: Money::zero(),
            actual,
            difference: -actual,
            percentage_used: MAX_PERCENTAGE_USED,
            raw_percentage: MAX_PERCENTAGE_USED,
            status: BudgetStatus::Unbudgeted,
        }
    }

    /// Whether spending went past what was budgeted
    pub fn is_over(&self) -> bool {
        self.difference.is_negative()
    }
}

/// Compare budget lines against actual spending per category
///
/// Lines are matched to `actuals` by their own category key, so a budget on a
/// deleted category gets no spending while uncategorized spending still shows
/// up as an unbudgeted row. Two lines for the same category keep the first
/// one. Unbudgeted rows are
/// appended by descending actual, then by name, before the final stable sort
/// by `percentage_used`.
pub fn compare(
    lines: &[BudgetLine],
    actuals: &HashMap<CategoryKey, Money>,
    index: &CategoryIndex,
) -> Vec<ComparisonRow> {
    let mut budgeted: HashSet<CategoryKey> = HashSet::with_capacity(lines.len());
    let mut rows = Vec::with_capacity(lines.len() + actuals.len());

    for line in lines {
        if !budgeted.insert(line.key) {
            tracing::warn!(
                category = %line.category.name,
                "more than one budget for category, keeping the first"
            );
            continue;
        }
        let actual = actuals.get(&line.key).copied().unwrap_or_default();
        rows.push(ComparisonRow::budgeted(line, actual));
    }

    let mut synthesized: Vec<ComparisonRow> = actuals
        .iter()
        .filter(|(key, actual)| !budgeted.contains(*key) && !actual.is_zero())
        .map(|(&key, &actual)| ComparisonRow::unbudgeted(index.resolve_key(key), actual))
        .collect();
    synthesized.sort_by(|a, b| {
        b.actual
            .cmp(&a.actual)
            .then_with(|| a.category.name.cmp(&b.category.name))
    });
    rows.extend(synthesized);

    rows.sort_by(|a, b| b.percentage_used.total_cmp(&a.percentage_used));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryType};

    struct Fixture {
        index: CategoryIndex,
        food: CategoryRef,
        rent: CategoryRef,
        fun: CategoryRef,
    }

    fn fixture() -> Fixture {
        let categories = vec![
            Category::new("Food", "#FF6B6B", CategoryType::Expense),
            Category::new("Rent", "#45B7D1", CategoryType::Expense),
            Category::new("Fun", "#FFEAA7", CategoryType::Expense),
        ];
        let index = CategoryIndex::new(&categories);
        Fixture {
            food: index.resolve(Some(categories[0].id)),
            rent: index.resolve(Some(categories[1].id)),
            fun: index.resolve(Some(categories[2].id)),
            index,
        }
    }

    fn actuals(entries: &[(&CategoryRef, i64)]) -> HashMap<CategoryKey, Money> {
        entries
            .iter()
            .map(|(c, units)| (c.id, Money::from_units(*units)))
            .collect()
    }

    #[test]
    fn test_exceeded_is_capped_but_difference_is_true() {
        let f = fixture();
        let lines = vec![BudgetLine::new(f.food.clone(), Money::from_units(400))];

        let rows = compare(&lines, &actuals(&[(&f.food, 450)]), &f.index);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.status, BudgetStatus::Exceeded);
        assert_eq!(row.difference, Money::from_units(-50));
        assert_eq!(row.percentage_used, 100.0);
        assert_eq!(row.raw_percentage, 112.5);
        assert!(row.is_over());
    }

    #[test]
    fn test_spending_without_budget_is_synthesized() {
        let f = fixture();
        let rows = compare(&[], &actuals(&[(&f.fun, 80)]), &f.index);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, f.fun);
        assert_eq!(rows[0].budgeted, Money::zero());
        assert_eq!(rows[0].difference, Money::from_units(-80));
        assert_eq!(rows[0].percentage_used, 100.0);
        assert_eq!(rows[0].status, BudgetStatus::Unbudgeted);
    }

    #[test]
    fn test_missing_actual_defaults_to_zero() {
        let f = fixture();
        let lines = vec![BudgetLine::new(f.rent.clone(), Money::from_units(1200))];

        let rows = compare(&lines, &HashMap::new(), &f.index);

        assert_eq!(rows[0].actual, Money::zero());
        assert_eq!(rows[0].difference, Money::from_units(1200));
        assert_eq!(rows[0].percentage_used, 0.0);
        assert_eq!(rows[0].status, BudgetStatus::Within);
    }

    #[test]
    fn test_zero_budget_zero_actual_is_not_unbudgeted() {
        let f = fixture();
        let lines = vec![BudgetLine::new(f.fun.clone(), Money::zero())];

        let rows = compare(&lines, &actuals(&[(&f.fun, 0)]), &f.index);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, BudgetStatus::Within);
        assert_eq!(rows[0].percentage_used, 0.0);
    }

    #[test]
    fn test_zero_budget_with_spending_is_exceeded() {
        let f = fixture();
        let lines = vec![BudgetLine::new(f.fun.clone(), Money::zero())];

        let rows = compare(&lines, &actuals(&[(&f.fun, 10)]), &f.index);

        assert_eq!(rows[0].status, BudgetStatus::Exceeded);
        assert_eq!(rows[0].percentage_used, 0.0);
    }

    #[test]
    fn test_sorted_by_usage_with_stable_ties() {
        let f = fixture();
        let lines = vec![
            BudgetLine::new(f.rent.clone(), Money::from_units(1000)),
            BudgetLine::new(f.food.clone(), Money::from_units(100)),
            BudgetLine::new(f.fun.clone(), Money::from_units(100)),
        ];
        let spent = actuals(&[(&f.rent, 500), (&f.food, 200), (&f.fun, 300)]);

        let rows = compare(&lines, &spent, &f.index);
        let names: Vec<&str> = rows.iter().map(|r| r.category.name.as_str()).collect();

        // Food and Fun both cap at 100 and keep their input order
        assert_eq!(names, vec!["Food", "Fun", "Rent"]);
    }

    #[test]
    fn test_synthesized_rows_ordered_by_actual_then_name() {
        let f = fixture();
        let mut spent = actuals(&[(&f.food, 50), (&f.rent, 90), (&f.fun, 50)]);
        spent.insert(CategoryKey::Uncategorized, Money::from_units(10));

        let rows = compare(&[], &spent, &f.index);
        let names: Vec<&str> = rows.iter().map(|r| r.category.name.as_str()).collect();

        assert_eq!(names, vec!["Rent", "Food", "Fun", "Uncategorized"]);
    }

    #[test]
    fn test_duplicate_budget_keeps_first() {
        let f = fixture();
        let lines = vec![
            BudgetLine::new(f.food.clone(), Money::from_units(400)),
            BudgetLine::new(f.food.clone(), Money::from_units(900)),
        ];

        let rows = compare(&lines, &actuals(&[(&f.food, 100)]), &f.index);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].budgeted, Money::from_units(400));
    }

    #[test]
    fn test_budget_lines_resolve_categories() {
        let categories = vec![Category::new("Food", "#FF6B6B", CategoryType::Expense)];
        let index = CategoryIndex::new(&categories);
        let budgets = vec![
            Budget::new(categories[0].id, Money::from_units(400), 3, 2025),
            Budget::new(crate::models::CategoryId::new(), Money::from_units(50), 3, 2025),
        ];

        let lines = budget_lines(&budgets, &index);

        assert_eq!(lines[0].category.name, "Food");
        assert!(lines[1].category.is_uncategorized());
        assert_eq!(lines[1].key, CategoryKey::Category(budgets[1].category_id));
    }

    #[test]
    fn test_budgets_on_deleted_categories_stay_separate() {
        let f = fixture();
        let budgets = vec![
            Budget::new(crate::models::CategoryId::new(), Money::from_units(100), 3, 2025),
            Budget::new(crate::models::CategoryId::new(), Money::from_units(500), 3, 2025),
        ];
        let mut spent = HashMap::new();
        spent.insert(CategoryKey::Uncategorized, Money::from_units(90));

        let rows = compare(&budget_lines(&budgets, &f.index), &spent, &f.index);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].status, BudgetStatus::Unbudgeted);
        assert_eq!(rows[0].actual, Money::from_units(90));
        assert!(rows[0].category.is_uncategorized());

        let budgeted: Vec<Money> = rows[1..].iter().map(|r| r.budgeted).collect();
        assert_eq!(budgeted, vec![Money::from_units(100), Money::from_units(500)]);
        assert!(rows[1..]
            .iter()
            .all(|r| r.actual.is_zero() && r.status == BudgetStatus::Within));
    }
}
