//! Dashboard Report
//!
//! The month containing the reference date against the month before it, plus
//! the top expense categories and the latest activity.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use super::{csv_amount, finish_csv};
use crate::analytics::{summarize, CategoryIndex, DashboardLimits, DashboardSummary};
use crate::error::LedgerResult;
use crate::models::{DateRange, MonthPeriod};
use crate::storage::{RecordStore, TransactionFilter};

/// Dashboard Report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub as_of: NaiveDate,
    pub period: MonthPeriod,
    #[serde(flatten)]
    pub summary: DashboardSummary,
}

impl DashboardReport {
    /// Generate the dashboard as seen on `as_of`
    ///
    /// The current month counts up to and including `as_of`; the previous
    /// month is counted in full. Transactions dated after `as_of` are ignored,
    /// and only the newest few up to `as_of` are fetched for the recent list.
    pub fn generate<S: RecordStore>(
        store: &S,
        as_of: NaiveDate,
        limits: &DashboardLimits,
    ) -> LedgerResult<Self> {
        let period = MonthPeriod::containing(as_of)?;
        let month_to_date = DateRange::inclusive(period.start_date(), as_of)?;
        let history = DateRange::inclusive(NaiveDate::MIN, as_of)?;

        let current = store.query_transactions(&TransactionFilter::in_range(month_to_date))?;
        let previous =
            store.query_transactions(&TransactionFilter::in_range(period.prev()?.range()))?;
        let recent = store.query_transactions(
            &TransactionFilter::in_range(history).newest(limits.recent_transactions),
        )?;
        let categories = store.query_categories()?;
        tracing::debug!(
            %as_of,
            current = current.len(),
            previous = previous.len(),
            recent = recent.len(),
            "fetched dashboard input"
        );

        let index = CategoryIndex::new(&categories);
        Ok(Self {
            as_of,
            period,
            summary: summarize(&current, &previous, &recent, &index, limits),
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let summary = &self.summary;
        let mut output = String::new();

        output.push_str(&format!("Dashboard - {} (as of {})\n", self.period, self.as_of));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:>14} {:>14} {:>10}\n",
            "", "This Month", "Last Month", "Change"
        ));

        let rows = [
            (
                "Income",
                summary.current_month.income,
                summary.previous_month.income,
                summary.changes.income,
            ),
            (
                "Expense",
                summary.current_month.expense,
                summary.previous_month.expense,
                summary.changes.expense,
            ),
            (
                "Balance",
                summary.current_month.balance,
                summary.previous_month.balance,
                summary.changes.balance,
            ),
        ];
        for (label, current, previous, change) in rows {
            output.push_str(&format!(
                "{:<12} {:>14} {:>14} {:>+9.1}%\n",
                label, current, previous, change
            ));
        }

        output.push_str("\nTop Categories\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        if summary.top_categories.is_empty() {
            output.push_str("  (no spending this month)\n");
        }
        for row in &summary.top_categories {
            output.push_str(&format!(
                "  {:<32} {:>12} {:>6}\n",
                row.category.name, row.value, row.count
            ));
        }

        output.push_str("\nRecent Transactions\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        if summary.recent_transactions.is_empty() {
            output.push_str("  (none)\n");
        }
        for txn in &summary.recent_transactions {
            output.push_str(&format!(
                "  {} {:<24} {:>12}  {}\n",
                txn.date, txn.category.name, txn.amount, txn.notes
            ));
        }

        output
    }

    /// Export the period totals to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerResult<()> {
        let summary = &self.summary;
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Metric", "Current", "Previous", "Change"])?;

        let rows = [
            (
                "income",
                summary.current_month.income,
                summary.previous_month.income,
                summary.changes.income,
            ),
            (
                "expense",
                summary.current_month.expense,
                summary.previous_month.expense,
                summary.changes.expense,
            ),
            (
                "balance",
                summary.current_month.balance,
                summary.previous_month.balance,
                summary.changes.balance,
            ),
        ];
        for (metric, current, previous, change) in rows {
            csv.write_record([
                metric.to_string(),
                csv_amount(current),
                csv_amount(previous),
                format!("{:.1}", change),
            ])?;
        }

        finish_csv(csv)
    }
}
