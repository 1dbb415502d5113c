//! Category Summary Report
//!
//! Totals per category of one transaction type over a date range.

use std::io::Write;

use serde::Serialize;

use super::{csv_amount, finish_csv};
use crate::analytics::{category_summary, CategoryIndex, CategoryTotal};
use crate::error::LedgerResult;
use crate::models::{DateRange, Money, TransactionType};
use crate::storage::{RecordStore, TransactionFilter};

/// Category Summary Report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummaryReport {
    pub range: DateRange,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Highest total first, never zero
    pub categories: Vec<CategoryTotal>,
    pub total: Money,
}

impl CategorySummaryReport {
    /// Generate the summary for a range and transaction type
    pub fn generate<S: RecordStore>(
        store: &S,
        range: DateRange,
        kind: TransactionType,
    ) -> LedgerResult<Self> {
        let transactions =
            store.query_transactions(&TransactionFilter::in_range(range).of_type(kind))?;
        let categories = store.query_categories()?;
        tracing::debug!(
            %range,
            %kind,
            transactions = transactions.len(),
            categories = categories.len(),
            "fetched category summary input"
        );

        let rows = category_summary(&transactions, kind, &CategoryIndex::new(&categories));
        Ok(Self {
            range,
            kind,
            total: rows.iter().map(|r| r.value).sum(),
            categories: rows,
        })
    }

    /// Share of the total held by one row
    pub fn share(&self, row: &CategoryTotal) -> f64 {
        row.value.percent_of(self.total)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Category Summary ({}): {}\n", self.kind, self.range));
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<35} {:>12} {:>6} {:>7}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        if self.categories.is_empty() {
            output.push_str("No transactions in this range.\n");
        }

        for row in &self.categories {
            output.push_str(&format!(
                "{:<35} {:>12} {:>6} {:>6.1}%\n",
                row.category.name,
                row.value,
                row.count,
                self.share(row)
            ));
        }

        output.push_str(&"-".repeat(64));
        output.push('\n');
        output.push_str(&format!("{:<35} {:>12}\n", "TOTAL", self.total));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Category", "Color", "Type", "Amount", "Count"])?;

        for row in &self.categories {
            csv.write_record([
                row.category.name.clone(),
                row.category.color.clone(),
                self.kind.to_string(),
                csv_amount(row.value),
                row.count.to_string(),
            ])?;
        }

        finish_csv(csv)
    }
}
