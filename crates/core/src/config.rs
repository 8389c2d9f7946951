use crate::error::{OrganizerError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Explicit organizer configuration. Nothing is read from process-wide
/// globals; callers decide where the model and rule table live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Folder whose immediate files get organized.
    pub source_dir: PathBuf,
    /// Root under which category folders are created.
    #[serde(default = "default_target_root")]
    pub target_root: PathBuf,
    /// Persisted classifier model. When set, the model is loaded from here
    /// if present, otherwise trained from the default corpus and saved back.
    /// When unset, the default corpus is trained in memory.
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    /// Optional TOML category table overriding the built-in one.
    #[serde(default)]
    pub rules_path: Option<PathBuf>,
    /// Glob patterns excluded when listing source files.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_target_root() -> PathBuf {
    PathBuf::from("Organized")
}

impl OrganizerConfig {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_root: default_target_root(),
            model_path: None,
            rules_path: None,
            exclude: Vec::new(),
        }
    }
}

/// Loads configuration from a TOML file, or from `config/default` when no
/// path is given (missing default file is not an error until a required
/// field is absent).
pub fn load(path: Option<&str>) -> Result<OrganizerConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let cfg = settings
        .build()
        .map_err(|e| OrganizerError::Config(e.to_string()))?;
    cfg.try_deserialize()
        .map_err(|e| OrganizerError::Config(e.to_string()))
}
