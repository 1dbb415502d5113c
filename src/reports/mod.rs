//! Reports module for ledger-lens
//!
//! Every report is generated in two phases: a fetch phase that reads the
//! record sets it needs through [`RecordStore`] (the only step that can fail)
//! and a compute phase that hands those snapshots to [`crate::analytics`].
//! The fetches of one report do not depend on each other.
//!
//! [`ReportEngine`] bundles a store with the insight and dashboard tunables.

pub mod budget;
pub mod category;
pub mod dashboard;
pub mod insight;
pub mod monthly;

pub use budget::BudgetComparisonReport;
pub use category::CategorySummaryReport;
pub use dashboard::DashboardReport;
pub use insight::InsightReport;
pub use monthly::MonthlySummaryReport;

use std::io::Write;

use chrono::NaiveDate;

use crate::analytics::{DashboardLimits, InsightPolicy};
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{DateRange, Money, TransactionType};
use crate::storage::RecordStore;

/// Entry point for report generation over one record store
pub struct ReportEngine<S: RecordStore> {
    store: S,
    insight_policy: InsightPolicy,
    dashboard_limits: DashboardLimits,
}

impl<S: RecordStore> ReportEngine<S> {
    /// Create an engine with the default tunables
    pub fn new(store: S) -> Self {
        Self {
            store,
            insight_policy: InsightPolicy::default(),
            dashboard_limits: DashboardLimits::default(),
        }
    }

    /// Create an engine with the tunables from user settings
    pub fn with_settings(store: S, settings: &Settings) -> Self {
        Self {
            store,
            insight_policy: settings.insights.policy(),
            dashboard_limits: settings.dashboard.limits(),
        }
    }

    pub fn with_insight_policy(mut self, policy: InsightPolicy) -> Self {
        self.insight_policy = policy;
        self
    }

    pub fn with_dashboard_limits(mut self, limits: DashboardLimits) -> Self {
        self.dashboard_limits = limits;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Income and expense per month of `year`, all twelve months present
    pub fn monthly_summary(&self, year: i32) -> LedgerResult<MonthlySummaryReport> {
        MonthlySummaryReport::generate(&self.store, year)
    }

    /// Per-category totals of `kind` within `range`
    pub fn category_summary(
        &self,
        range: DateRange,
        kind: TransactionType,
    ) -> LedgerResult<CategorySummaryReport> {
        CategorySummaryReport::generate(&self.store, range, kind)
    }

    /// Current against previous month as seen on `as_of`
    pub fn dashboard_summary(&self, as_of: NaiveDate) -> LedgerResult<DashboardReport> {
        DashboardReport::generate(&self.store, as_of, &self.dashboard_limits)
    }

    /// Budget against actual spending for one month
    pub fn budget_comparison(&self, month: u32, year: i32) -> LedgerResult<BudgetComparisonReport> {
        BudgetComparisonReport::generate(&self.store, month, year)
    }

    /// Spending run-rate and projection as seen on `as_of`
    pub fn insights(&self, as_of: NaiveDate) -> LedgerResult<InsightReport> {
        InsightReport::generate(&self.store, as_of, &self.insight_policy)
    }
}

/// Amount column value for CSV export
fn csv_amount(amount: Money) -> String {
    format!("{:.2}", amount.to_f64())
}

fn finish_csv<W: Write>(mut csv: csv::Writer<W>) -> LedgerResult<()> {
    csv.flush()
        .map_err(|e| LedgerError::Export(e.to_string()))
}
