//! Category rule table: which file extensions route to which category.
//!
//! The table is data, not code, so operators can extend it from a TOML file
//! without touching the pipeline.

use crate::error::{OrganizerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// One destination category and the extensions routed to it. Extensions are
/// stored lowercase with the leading dot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub extensions: BTreeSet<String>,
}

/// Ordered category table. Extension sets are expected to be disjoint; if
/// they overlap, the first matching category in table order wins, which
/// keeps classification deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRules {
    pub categories: Vec<CategoryRule>,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            categories: vec![
                rule(
                    "documents",
                    &[
                        ".pdf", ".doc", ".docx", ".txt", ".rtf", ".xls", ".xlsx", ".ppt",
                        ".pptx", ".csv",
                    ],
                ),
                rule(
                    "images",
                    &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".svg"],
                ),
                rule("videos", &[".mp4", ".mov", ".avi", ".mkv", ".webm"]),
                rule(
                    "code",
                    &[
                        ".py", ".js", ".ts", ".java", ".cpp", ".c", ".go", ".rs", ".html",
                        ".css", ".ipynb",
                    ],
                ),
                rule("archives", &[".zip", ".rar", ".7z", ".tar", ".gz"]),
            ],
        }
    }
}

fn rule(name: &str, extensions: &[&str]) -> CategoryRule {
    CategoryRule {
        name: name.to_string(),
        extensions: extensions.iter().map(|e| e.to_string()).collect(),
    }
}

impl CategoryRules {
    /// Category for a dot-prefixed extension, matched case-insensitively.
    pub fn category_for_extension(&self, ext: &str) -> Option<&str> {
        let ext = ext.to_lowercase();
        self.categories
            .iter()
            .find(|c| c.extensions.contains(&ext))
            .map(|c| c.name.as_str())
    }

    /// Loads a rule table from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| OrganizerError::io(path, e))?;
        toml::from_str(&raw).map_err(|e| OrganizerError::format("category rules", path, e))
    }
}
