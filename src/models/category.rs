//! Category model
//!
//! Categories carry display metadata only. The reports never need more than
//! the id, name, color and icon.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Which transaction types a category applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    #[default]
    Expense,
    Income,
    Both,
}

/// A transaction category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Display name, unique case-insensitively
    pub name: String,

    /// Display color as a hex string (`#RRGGBB`)
    pub color: String,

    /// Display icon token
    #[serde(default)]
    pub icon: String,

    #[serde(rename = "type", default)]
    pub kind: CategoryType,

    /// Built-in categories cannot be renamed or deleted
    #[serde(default)]
    pub is_default: bool,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>, color: impl Into<String>, kind: CategoryType) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            color: color.into(),
            icon: String::new(),
            kind,
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style icon assignment
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Whether this category's name matches `name`, ignoring case
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if !is_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 6 || hex.len() == 3) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Categories seeded into a fresh ledger
pub fn default_categories() -> Vec<Category> {
    let seeds: [(&str, &str, &str, CategoryType); 8] = [
        ("Food", "#FF6B6B", "utensils", CategoryType::Expense),
        ("Transport", "#4ECDC4", "car", CategoryType::Expense),
        ("Housing", "#45B7D1", "home", CategoryType::Expense),
        ("Utilities", "#96CEB4", "bolt", CategoryType::Expense),
        ("Entertainment", "#FFEAA7", "film", CategoryType::Expense),
        ("Health", "#DDA0DD", "heart", CategoryType::Expense),
        ("Salary", "#2ECC71", "briefcase", CategoryType::Income),
        ("Other", "#95A5A6", "tag", CategoryType::Both),
    ];

    seeds
        .iter()
        .map(|(name, color, icon, kind)| {
            let mut category = Category::new(*name, *color, *kind).with_icon(*icon);
            category.is_default = true;
            category
        })
        .collect()
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::InvalidColor(color) => write!(f, "Invalid category color '{}'", color),
        }
    }
}

impl std::error::Error for CategoryValidationError {}
