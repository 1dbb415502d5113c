//! Budget Comparison Report
//!
//! Budgeted versus actual spending per category for one month.

use std::io::Write;

use serde::Serialize;

use super::{csv_amount, finish_csv};
use crate::analytics::{
    budget_lines, compare, group_and_sum, sign_agnostic, BudgetStatus, CategoryIndex,
    ComparisonRow,
};
use crate::error::LedgerResult;
use crate::models::{Money, MonthPeriod, Transaction, TransactionType};
use crate::storage::{BudgetFilter, RecordStore, TransactionFilter};

/// Budget Comparison Report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetComparisonReport {
    pub period: MonthPeriod,
    /// Highest `percentage_used` first
    pub rows: Vec<ComparisonRow>,
    pub total_budgeted: Money,
    pub total_actual: Money,
}

impl BudgetComparisonReport {
    /// Generate the comparison for a month
    pub fn generate<S: RecordStore>(store: &S, month: u32, year: i32) -> LedgerResult<Self> {
        let period = MonthPeriod::new(year, month)?;

        let mut budgets = store.query_budgets(&BudgetFilter::for_month(month, year))?;
        let expenses = store.query_transactions(
            &TransactionFilter::in_range(period.range()).of_type(TransactionType::Expense),
        )?;
        let categories = store.query_categories()?;
        tracing::debug!(
            %period,
            budgets = budgets.len(),
            expenses = expenses.len(),
            "fetched budget comparison input"
        );

        // Creation order, so ties and duplicates resolve the same way every run
        budgets.sort_by_key(|b| (b.created_at, b.id));

        let index = CategoryIndex::new(&categories);
        let actuals = group_and_sum(
            &expenses,
            |t: &Transaction| index.key_for(t.category_id),
            sign_agnostic,
        );
        let rows = compare(&budget_lines(&budgets, &index), &actuals, &index);

        Ok(Self {
            period,
            total_budgeted: rows.iter().map(|r| r.budgeted).sum(),
            total_actual: rows.iter().map(|r| r.actual).sum(),
            rows,
        })
    }

    /// Rows that went over budget or had no budget at all
    pub fn over_budget(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|r| r.is_over())
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Budget vs Actual - {}\n", self.period));
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<26} {:>12} {:>12} {:>12} {:>6} {:>8}\n",
            "Category", "Budgeted", "Actual", "Remaining", "Used", "Status"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No budgets or spending for this month.\n");
        }

        for row in &self.rows {
            let marker = if row.is_over() { " *" } else { "" };
            output.push_str(&format!(
                "{:<26} {:>12} {:>12} {:>12} {:>5.0}% {:>8}{}\n",
                row.category.name,
                row.budgeted,
                row.actual,
                row.difference,
                row.percentage_used,
                row.status,
                marker
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<26} {:>12} {:>12} {:>12}\n",
            "TOTAL",
            self.total_budgeted,
            self.total_actual,
            self.total_budgeted - self.total_actual
        ));

        let over = self.over_budget().count();
        if over > 0 {
            output.push_str(&format!("\n* = over budget ({} categories)\n", over));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "Period",
            "Category",
            "Budgeted",
            "Actual",
            "Difference",
            "Percentage Used",
            "Status",
        ])?;

        for row in &self.rows {
            csv.write_record([
                self.period.to_string(),
                row.category.name.clone(),
                csv_amount(row.budgeted),
                csv_amount(row.actual),
                csv_amount(row.difference),
                format!("{:.1}", row.percentage_used),
                row.status.to_string(),
            ])?;
        }

        finish_csv(csv)
    }

    pub fn count_by_status(&self, status: BudgetStatus) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }
}
