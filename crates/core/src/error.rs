use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrganizerError {
    /// A file could not be read, hashed, or moved.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The classifier was asked to persist before being trained.
    #[error("classifier model is not trained")]
    State,

    /// A persisted artifact (model blob, undo log, rules file) failed to parse.
    #[error("malformed {artifact} at {}: {detail}", .path.display())]
    Format {
        artifact: &'static str,
        path: PathBuf,
        detail: String,
    },

    /// The organizer could not be set up from its configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl OrganizerError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn format(artifact: &'static str, path: &Path, detail: impl ToString) -> Self {
        Self::Format {
            artifact,
            path: path.to_path_buf(),
            detail: detail.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrganizerError>;
