//! Monthly Summary Report
//!
//! Income and expense totals for every month of a year, months without
//! activity included.

use std::io::Write;

use serde::Serialize;

use super::{csv_amount, finish_csv};
use crate::analytics::{group_by_month_and_type, monthly_buckets, MonthlyBucket};
use crate::error::LedgerResult;
use crate::models::{DateRange, Money};
use crate::storage::{RecordStore, TransactionFilter};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Monthly Summary Report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummaryReport {
    pub year: i32,
    /// Exactly twelve entries, January first
    pub months: Vec<MonthlyBucket>,
    pub total_income: Money,
    pub total_expense: Money,
}

impl MonthlySummaryReport {
    /// Generate the summary for a calendar year
    pub fn generate<S: RecordStore>(store: &S, year: i32) -> LedgerResult<Self> {
        let range = DateRange::year(year)?;
        let transactions = store.query_transactions(&TransactionFilter::in_range(range))?;
        tracing::debug!(year, transactions = transactions.len(), "fetched monthly summary input");

        Ok(Self::from_buckets(
            year,
            monthly_buckets(&group_by_month_and_type(&transactions)),
        ))
    }

    fn from_buckets(year: i32, months: Vec<MonthlyBucket>) -> Self {
        Self {
            year,
            total_income: months.iter().map(|m| m.income).sum(),
            total_expense: months.iter().map(|m| m.expense).sum(),
            months,
        }
    }

    /// Net result of the year (income minus expense)
    pub fn net(&self) -> Money {
        self.total_income - self.total_expense
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Monthly Summary - {}\n", self.year));
        output.push_str(&"=".repeat(50));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>12} {:>12} {:>12}\n",
            "Month", "Income", "Expense", "Net"
        ));
        output.push_str(&"-".repeat(50));
        output.push('\n');

        for bucket in &self.months {
            let name = MONTH_NAMES
                .get(bucket.month as usize - 1)
                .copied()
                .unwrap_or("?");
            output.push_str(&format!(
                "{:<10} {:>12} {:>12} {:>12}\n",
                name,
                bucket.income,
                bucket.expense,
                bucket.income - bucket.expense
            ));
        }

        output.push_str(&"-".repeat(50));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>12} {:>12} {:>12}\n",
            "TOTAL",
            self.total_income,
            self.total_expense,
            self.net()
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Year", "Month", "Income", "Expense", "Net"])?;

        for bucket in &self.months {
            csv.write_record([
                self.year.to_string(),
                bucket.month.to_string(),
                csv_amount(bucket.income),
                csv_amount(bucket.expense),
                csv_amount(bucket.income - bucket.expense),
            ])?;
        }

        finish_csv(csv)
    }
}
