//! CLI command handlers
//!
//! This module bridges clap argument parsing with the report engine.

pub mod report;

pub use report::{handle_report_command, ReportCommands};
