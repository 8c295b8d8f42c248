use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("session {0} not found")]
    SessionNotFound(String),

    #[error("no session logs found in {}", .0.display())]
    NoSessionLogs(PathBuf),

    #[error("no session log folder found for {cwd} (looked in {})", .searched.display())]
    NoProjectFolder { cwd: String, searched: PathBuf },

    #[error("invalid project name '{0}': must be a plain directory name")]
    InvalidProjectName(String),

    #[error("invalid period '{0}': expected YYYY-Www or YYYY-MM")]
    InvalidPeriod(String),

    #[error("no extraction backend found: install the claude CLI")]
    ExtractorUnavailable,

    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VaultError>;
