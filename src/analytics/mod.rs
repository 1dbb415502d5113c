//! Analytics engine
//!
//! Pure computations over record snapshots that were fetched beforehand.
//! Nothing here performs I/O or fails: missing categories resolve to the
//! "Uncategorized" sentinel, zero baselines follow fixed policies and empty
//! inputs produce empty or zero-filled results.

pub mod budget_comparison;
pub mod categories;
pub mod category_summary;
pub mod compare;
pub mod dashboard;
pub mod gap_fill;
pub mod grouping;
pub mod insights;

pub use budget_comparison::{budget_lines, compare, BudgetLine, BudgetStatus, ComparisonRow};
pub use categories::{resolve_category, CategoryIndex, CategoryRef};
pub use category_summary::{category_summary, CategoryTotal};
pub use compare::{percent_change, percent_change_money};
pub use dashboard::{
    summarize, DashboardLimits, DashboardSummary, PeriodChanges, PeriodTotals, RecentTransaction,
};
pub use gap_fill::{fill_months, monthly_buckets, MonthValue, MonthlyBucket, MONTHS_IN_YEAR};
pub use grouping::{
    group_and_count, group_and_sum, group_by_month_and_type, raw_amount, sign_agnostic, Bucket,
    CategoryKey,
};
pub use insights::{
    project, CategoryDelta, Insight, InsightPolicy, PeakDay, PeakDayTieBreak, ZeroCurrentPolicy,
};
