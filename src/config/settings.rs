//! User settings for ledger-lens
//!
//! Tunables of the dashboard and insight reports.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::analytics::dashboard::{
    DashboardLimits, DEFAULT_RECENT_LIMIT, DEFAULT_TOP_CATEGORY_LIMIT,
};
use crate::analytics::insights::{
    InsightPolicy, PeakDayTieBreak, ZeroCurrentPolicy, DEFAULT_DELTA_LIMIT,
};
use crate::error::LedgerError;

/// Insight report tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightSettings {
    /// Which day wins when several days share the highest spending
    #[serde(default)]
    pub peak_day_tie_break: PeakDayTieBreak,

    /// Whether categories that dropped to zero stay in the ranked deltas
    #[serde(default)]
    pub zero_current: ZeroCurrentPolicy,

    /// Number of category deltas to keep
    #[serde(default = "default_delta_limit")]
    pub delta_limit: usize,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            peak_day_tie_break: PeakDayTieBreak::default(),
            zero_current: ZeroCurrentPolicy::default(),
            delta_limit: default_delta_limit(),
        }
    }
}

impl InsightSettings {
    /// Build the projector policy from these settings
    pub fn policy(&self) -> InsightPolicy {
        InsightPolicy {
            peak_day_tie_break: self.peak_day_tie_break,
            zero_current: self.zero_current,
            delta_limit: self.delta_limit,
        }
    }
}

/// Dashboard tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Number of top expense categories shown
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,

    /// Number of recent transactions shown
    #[serde(default = "default_recent_transactions")]
    pub recent_transactions: usize,
}

impl DashboardSettings {
    /// Build the dashboard limits from these settings
    pub fn limits(&self) -> DashboardLimits {
        DashboardLimits {
            top_categories: self.top_categories,
            recent_transactions: self.recent_transactions,
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            top_categories: default_top_categories(),
            recent_transactions: default_recent_transactions(),
        }
    }
}

/// User settings for ledger-lens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Insight report tunables
    #[serde(default)]
    pub insights: InsightSettings,

    /// Dashboard tunables
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_delta_limit() -> usize {
    DEFAULT_DELTA_LIMIT
}

fn default_top_categories() -> usize {
    DEFAULT_TOP_CATEGORY_LIMIT
}

fn default_recent_transactions() -> usize {
    DEFAULT_RECENT_LIMIT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            insights: InsightSettings::default(),
            dashboard: DashboardSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.insights.delta_limit, 3);
        assert_eq!(settings.insights.peak_day_tie_break, PeakDayTieBreak::Earliest);
        assert_eq!(settings.insights.zero_current, ZeroCurrentPolicy::Report);
        assert_eq!(settings.dashboard.top_categories, 3);
        assert_eq!(settings.dashboard.recent_transactions, 5);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.dashboard.top_categories = 5;
        settings.insights.zero_current = ZeroCurrentPolicy::Exclude;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.dashboard.top_categories, 5);
        assert_eq!(loaded.insights.zero_current, ZeroCurrentPolicy::Exclude);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), r#"{"insights": {"delta_limit": 5}}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.insights.delta_limit, 5);
        assert_eq!(loaded.insights.zero_current, ZeroCurrentPolicy::Report);
        assert_eq!(loaded.dashboard.recent_transactions, 5);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), "not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }
}
