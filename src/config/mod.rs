//! Configuration module for ledger-lens
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Report tunables (top-N limits, insight policies)

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
