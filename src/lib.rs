//! ledger-lens - reports over a personal income and expense ledger
//!
//! The crate turns a ledger of transactions, categories and monthly budgets
//! into summaries: income and expense per month, totals per category, budget
//! against actual, a dashboard of this month against last, and a month-end
//! spending projection.
//!
//! # Architecture
//!
//! - `models`: ledger records, money and calendar periods
//! - `storage`: JSON file store and the [`storage::RecordStore`] read seam
//! - `analytics`: pure computations over fetched record sets
//! - `reports`: fetch-then-compute report structs with terminal/CSV rendering
//! - `config`: path resolution and user settings
//! - `cli`: clap command handlers used by the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use ledger_lens::config::paths::LedgerPaths;
//! use ledger_lens::reports::ReportEngine;
//! use ledger_lens::storage::Storage;
//!
//! let storage = Storage::new(LedgerPaths::new()?)?;
//! storage.load_all()?;
//! let report = ReportEngine::new(&storage).monthly_summary(2025)?;
//! println!("{}", report.format_terminal());
//! ```

pub mod analytics;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
