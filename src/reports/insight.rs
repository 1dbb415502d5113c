//! Spending Insight Report
//!
//! Run-rate and projection for the month containing the reference date.

use std::io::Write;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{csv_amount, finish_csv};
use crate::analytics::{project, CategoryIndex, Insight, InsightPolicy};
use crate::error::LedgerResult;
use crate::models::{DateRange, MonthPeriod, TransactionType};
use crate::storage::{RecordStore, TransactionFilter};

/// Spending Insight Report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport {
    pub as_of: NaiveDate,
    pub period: MonthPeriod,
    #[serde(flatten)]
    pub insight: Insight,
}

impl InsightReport {
    /// Generate insights as seen on `as_of`
    ///
    /// The current month is counted up to and including `as_of`, which is
    /// also the day of the period; the previous month is counted in full.
    pub fn generate<S: RecordStore>(
        store: &S,
        as_of: NaiveDate,
        policy: &InsightPolicy,
    ) -> LedgerResult<Self> {
        let period = MonthPeriod::containing(as_of)?;
        let month_to_date = DateRange::inclusive(period.start_date(), as_of)?;

        let current = store.query_transactions(
            &TransactionFilter::in_range(month_to_date).of_type(TransactionType::Expense),
        )?;
        let previous = store.query_transactions(
            &TransactionFilter::in_range(period.prev()?.range()).of_type(TransactionType::Expense),
        )?;
        let categories = store.query_categories()?;
        tracing::debug!(
            %as_of,
            current = current.len(),
            previous = previous.len(),
            "fetched insight input"
        );

        let insight = project(
            &current,
            &previous,
            as_of.day(),
            period.days(),
            &CategoryIndex::new(&categories),
            policy,
        );

        Ok(Self {
            as_of,
            period,
            insight,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let insight = &self.insight;
        let mut output = String::new();

        output.push_str(&format!(
            "Spending Insights - {} (day {} of {})\n",
            self.period,
            insight.days_elapsed,
            insight.days_elapsed + insight.days_remaining
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Spent so far:     {:>12}\n", insight.current_total));
        output.push_str(&format!("Daily average:    {:>12}\n", insight.daily_average));
        output.push_str(&format!("Projected total:  {:>12}\n", insight.projected_total));
        output.push_str(&format!(
            "Last month:       {:>12} ({:+.1}%)\n",
            insight.previous_total, insight.total_change
        ));

        match &insight.peak_day {
            Some(peak) => output.push_str(&format!(
                "Peak day:         {} ({})\n",
                peak.date, peak.total
            )),
            None => output.push_str("Peak day:         -\n"),
        }

        output.push_str("\nBiggest Category Changes\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        if insight.top_category_deltas.is_empty() {
            output.push_str("  (no spending in either month)\n");
        }
        for delta in &insight.top_category_deltas {
            output.push_str(&format!(
                "  {:<24} {:>12} {:>12} {:>+8.1}%\n",
                delta.category.name, delta.current, delta.previous, delta.change
            ));
        }

        output
    }

    /// Export the category deltas to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Period", "Category", "Current", "Previous", "Change"])?;

        for delta in &self.insight.top_category_deltas {
            csv.write_record([
                self.period.to_string(),
                delta.category.name.clone(),
                csv_amount(delta.current),
                csv_amount(delta.previous),
                format!("{:.1}", delta.change),
            ])?;
        }

        finish_csv(csv)
    }
}
