//! Insight projector
//!
//! Spending run-rate for the current period, a linear projection to the end of
//! the period, the peak spending day, and the categories whose spending moved
//! the most against the previous period. Only expense records count.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::categories::{CategoryIndex, CategoryRef};
use super::compare::percent_change_money;
use super::grouping::{group_and_sum, sign_agnostic, CategoryKey};
use crate::models::{Money, Transaction};

pub const DEFAULT_DELTA_LIMIT: usize = 3;

/// Which day is reported when several days share the highest spending
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakDayTieBreak {
    #[default]
    Earliest,
    Latest,
}

/// What happens to a category with no spending in the current period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroCurrentPolicy {
    /// Keep it, with a change of -100%
    #[default]
    Report,
    /// Drop it from the ranked deltas
    Exclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightPolicy {
    pub peak_day_tie_break: PeakDayTieBreak,
    pub zero_current: ZeroCurrentPolicy,
    pub delta_limit: usize,
}

impl Default for InsightPolicy {
    fn default() -> Self {
        Self {
            peak_day_tie_break: PeakDayTieBreak::default(),
            zero_current: ZeroCurrentPolicy::default(),
            delta_limit: DEFAULT_DELTA_LIMIT,
        }
    }
}

/// The day with the highest spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeakDay {
    pub date: NaiveDate,
    pub total: Money,
}

/// Spending movement of one category between two periods
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDelta {
    pub category: CategoryRef,
    pub current: Money,
    pub previous: Money,
    /// Percent change, see [`percent_change`](super::compare::percent_change)
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub current_total: Money,
    pub previous_total: Money,
    pub total_change: f64,
    pub daily_average: Money,
    pub projected_total: Money,
    pub days_elapsed: u32,
    pub days_remaining: u32,
    pub transaction_count: usize,
    pub peak_day: Option<PeakDay>,
    pub top_category_deltas: Vec<CategoryDelta>,
}

/// Project the current period's spending
///
/// `day_of_period` is how many days of the period have passed, counting the
/// current one; zero is read as one. The projection scales the current total
/// by `days_in_period / day_of_period` without rounding the daily average
/// first.
pub fn project(
    current: &[Transaction],
    previous: &[Transaction],
    day_of_period: u32,
    days_in_period: u32,
    index: &CategoryIndex,
    policy: &InsightPolicy,
) -> Insight {
    let days_elapsed = day_of_period.max(1);

    let current: Vec<&Transaction> = current.iter().filter(|t| t.is_expense()).collect();
    let previous: Vec<&Transaction> = previous.iter().filter(|t| t.is_expense()).collect();

    let current_total: Money = current.iter().map(|t| sign_agnostic(t)).sum();
    let previous_total: Money = previous.iter().map(|t| sign_agnostic(t)).sum();

    Insight {
        current_total,
        previous_total,
        total_change: percent_change_money(current_total, previous_total),
        daily_average: current_total.per(days_elapsed),
        projected_total: current_total.scale(days_in_period as f64 / days_elapsed as f64),
        days_elapsed,
        days_remaining: days_in_period.saturating_sub(day_of_period),
        transaction_count: current.len(),
        peak_day: peak_day(&current, policy.peak_day_tie_break),
        top_category_deltas: category_deltas(&current, &previous, index, policy),
    }
}

fn peak_day(records: &[&Transaction], tie_break: PeakDayTieBreak) -> Option<PeakDay> {
    let by_day = group_and_sum(
        records.iter().copied(),
        |t: &Transaction| t.date,
        sign_agnostic,
    );

    let mut days: Vec<(NaiveDate, Money)> = by_day.into_iter().collect();
    days.sort_by_key(|(date, _)| *date);

    let mut peak: Option<PeakDay> = None;
    for (date, total) in days {
        let replace = match peak {
            None => true,
            Some(best) => match tie_break {
                PeakDayTieBreak::Earliest => total > best.total,
                PeakDayTieBreak::Latest => total >= best.total,
            },
        };
        if replace {
            peak = Some(PeakDay { date, total });
        }
    }
    peak
}

fn category_deltas(
    current: &[&Transaction],
    previous: &[&Transaction],
    index: &CategoryIndex,
    policy: &InsightPolicy,
) -> Vec<CategoryDelta> {
    let key_fn = |t: &Transaction| index.key_for(t.category_id);
    let current_by: HashMap<CategoryKey, Money> =
        group_and_sum(current.iter().copied(), key_fn, sign_agnostic);
    let previous_by: HashMap<CategoryKey, Money> =
        group_and_sum(previous.iter().copied(), key_fn, sign_agnostic);

    let keys: HashSet<CategoryKey> = current_by.keys().chain(previous_by.keys()).copied().collect();

    let mut deltas: Vec<CategoryDelta> = keys
        .into_iter()
        .filter_map(|key| {
            let current = current_by.get(&key).copied().unwrap_or_default();
            let previous = previous_by.get(&key).copied().unwrap_or_default();

            if current.is_zero() && previous.is_zero() {
                return None;
            }
            if current.is_zero() && policy.zero_current == ZeroCurrentPolicy::Exclude {
                return None;
            }

            Some(CategoryDelta {
                category: index.resolve_key(key),
                current,
                previous,
                change: percent_change_money(current, previous),
            })
        })
        .collect();

    deltas.sort_by(|a, b| {
        b.change
            .abs()
            .total_cmp(&a.change.abs())
            .then_with(|| b.current.cmp(&a.current))
            .then_with(|| a.category.name.cmp(&b.category.name))
    });
    deltas.truncate(policy.delta_limit);
    deltas
}
