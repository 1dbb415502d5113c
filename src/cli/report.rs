//! CLI commands for reports
//!
//! Every report can be printed as terminal text, emitted as JSON, or exported
//! to a CSV file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use clap::Subcommand;
use serde::Serialize;

use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{DateRange, MonthPeriod, TransactionType};
use crate::reports::{
    BudgetComparisonReport, CategorySummaryReport, DashboardReport, InsightReport,
    MonthlySummaryReport, ReportEngine,
};
use crate::storage::RecordStore;

/// Report subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ReportCommands {
    /// Income and expense per month of a year
    Monthly {
        /// Calendar year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Totals per category over a date range
    #[command(alias = "spending")]
    Categories {
        /// First day included (YYYY-MM-DD, defaults to the start of this month)
        #[arg(short, long)]
        start: Option<NaiveDate>,

        /// Last day included (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        end: Option<NaiveDate>,

        /// Transaction type to total
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: TransactionType,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// This month against last month, top categories and recent activity
    Dashboard {
        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Budgeted against actual spending for one month
    Budget {
        /// Month number 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// Calendar year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Spending run-rate and month-end projection
    Insights {
        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// How a report reaches the user
trait Rendered: Serialize {
    /// Name used in the export confirmation
    fn label(&self) -> &'static str;

    fn render(&self) -> String;

    fn write_csv(&self, writer: &mut BufWriter<File>) -> LedgerResult<()>;
}

macro_rules! rendered {
    ($report:ty, $label:literal) => {
        impl Rendered for $report {
            fn label(&self) -> &'static str {
                $label
            }

            fn render(&self) -> String {
                self.format_terminal()
            }

            fn write_csv(&self, writer: &mut BufWriter<File>) -> LedgerResult<()> {
                self.export_csv(writer)
            }
        }
    };
}

rendered!(MonthlySummaryReport, "Monthly summary");
rendered!(CategorySummaryReport, "Category summary");
rendered!(DashboardReport, "Dashboard");
rendered!(BudgetComparisonReport, "Budget comparison");
rendered!(InsightReport, "Insight");

/// Handle report commands
///
/// `today` supplies every date the user left out.
pub fn handle_report_command<S: RecordStore, W: Write>(
    store: S,
    settings: &Settings,
    cmd: ReportCommands,
    json: bool,
    today: NaiveDate,
    out: &mut W,
) -> LedgerResult<()> {
    let engine = ReportEngine::with_settings(store, settings);

    match cmd {
        ReportCommands::Monthly { year, output } => {
            let report = engine.monthly_summary(year.unwrap_or_else(|| today.year()))?;
            emit(&report, json, output.as_deref(), out)
        }
        ReportCommands::Categories {
            start,
            end,
            kind,
            output,
        } => {
            let range = category_range(start, end, today)?;
            let report = engine.category_summary(range, kind)?;
            emit(&report, json, output.as_deref(), out)
        }
        ReportCommands::Dashboard { as_of, output } => {
            let report = engine.dashboard_summary(as_of.unwrap_or(today))?;
            emit(&report, json, output.as_deref(), out)
        }
        ReportCommands::Budget {
            month,
            year,
            output,
        } => {
            let report = engine.budget_comparison(
                month.unwrap_or_else(|| today.month()),
                year.unwrap_or_else(|| today.year()),
            )?;
            emit(&report, json, output.as_deref(), out)
        }
        ReportCommands::Insights { as_of, output } => {
            let report = engine.insights(as_of.unwrap_or(today))?;
            emit(&report, json, output.as_deref(), out)
        }
    }
}

/// Resolve the inclusive range of the category summary
fn category_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> LedgerResult<DateRange> {
    let start = match start {
        Some(date) => date,
        None => MonthPeriod::containing(today)?.start_date(),
    };
    let end = end.unwrap_or(today);

    if start > end {
        return Err(LedgerError::Validation(format!(
            "Start date {} is after end date {}",
            start, end
        )));
    }

    Ok(DateRange::inclusive(start, end)?)
}

fn emit<R: Rendered, W: Write>(
    report: &R,
    json: bool,
    output: Option<&Path>,
    out: &mut W,
) -> LedgerResult<()> {
    if let Some(path) = output {
        let file = File::create(path).map_err(|e| {
            LedgerError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        report.write_csv(&mut writer)?;
        writer.flush()?;
        writeln!(out, "{} exported to: {}", report.label(), path.display())?;
    } else if json {
        writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    } else {
        writeln!(out, "{}", report.render())?;
    }

    Ok(())
}
