//! Gap filler
//!
//! Turns a sparse month-keyed grouping into a dense, ascending sequence.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Money, TransactionType};

pub const MONTHS_IN_YEAR: u32 = 12;

/// One slot of a gap-filled sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthValue<V> {
    pub month: u32,
    pub value: V,
}

/// Emit months `1..=month_count` in order, falling back to `default` for
/// months the partial map does not hold
pub fn fill_months<V: Clone>(
    partial: &HashMap<u32, V>,
    month_count: u32,
    default: V,
) -> Vec<MonthValue<V>> {
    (1..=month_count)
        .map(|month| MonthValue {
            month,
            value: partial.get(&month).cloned().unwrap_or_else(|| default.clone()),
        })
        .collect()
}

/// Income and expense totals of one month
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    pub month: u32,
    pub expense: Money,
    pub income: Money,
}

/// Twelve monthly buckets from a month/type grouping
///
/// A month that only saw one type still reports the other as zero.
pub fn monthly_buckets(
    by_month: &HashMap<u32, HashMap<TransactionType, Money>>,
) -> Vec<MonthlyBucket> {
    let partial: HashMap<u32, (Money, Money)> = by_month
        .iter()
        .map(|(&month, types)| {
            let total = |kind| types.get(&kind).copied().unwrap_or_default();
            (
                month,
                (total(TransactionType::Expense), total(TransactionType::Income)),
            )
        })
        .collect();

    fill_months(&partial, MONTHS_IN_YEAR, (Money::zero(), Money::zero()))
        .into_iter()
        .map(|slot| MonthlyBucket {
            month: slot.month,
            expense: slot.value.0,
            income: slot.value.1,
        })
        .collect()
}
