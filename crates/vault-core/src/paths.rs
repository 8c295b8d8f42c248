use crate::error::{Result, VaultError};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

pub const DASHBOARD_FILE: &str = "DASHBOARD.md";
pub const STATUS_FILE: &str = "STATUS.md";
pub const LOG_DIR: &str = "Log";
pub const DAILY_DIR: &str = "Daily";
pub const WEEKLY_DIR: &str = "Weekly";
pub const MONTHLY_DIR: &str = "Monthly";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn dashboard_path(vault: &Path) -> PathBuf {
    vault.join(DASHBOARD_FILE)
}

pub fn project_dir(projects: &Path, name: &str) -> PathBuf {
    projects.join(name)
}

pub fn status_path(projects: &Path, name: &str) -> PathBuf {
    project_dir(projects, name).join(STATUS_FILE)
}

pub fn daily_dir(projects: &Path, name: &str) -> PathBuf {
    project_dir(projects, name).join(LOG_DIR).join(DAILY_DIR)
}

pub fn weekly_dir(projects: &Path, name: &str) -> PathBuf {
    project_dir(projects, name).join(LOG_DIR).join(WEEKLY_DIR)
}

pub fn monthly_dir(projects: &Path, name: &str) -> PathBuf {
    project_dir(projects, name).join(LOG_DIR).join(MONTHLY_DIR)
}

/// `Projects/<name>/Log/Daily/<YYYY-MM-DD>.md`
pub fn daily_path(projects: &Path, name: &str, date_key: &str) -> PathBuf {
    daily_dir(projects, name).join(format!("{date_key}.md"))
}

/// `Projects/<name>/Log/Weekly/<YYYY-Www>.md`
pub fn weekly_path(projects: &Path, name: &str, week_key: &str) -> PathBuf {
    weekly_dir(projects, name).join(format!("{week_key}.md"))
}

/// `Projects/<name>/Log/Monthly/<YYYY-MM>.md`
pub fn monthly_path(projects: &Path, name: &str, month_key: &str) -> PathBuf {
    monthly_dir(projects, name).join(format!("{month_key}.md"))
}

// ---------------------------------------------------------------------------
// Project name validation
// ---------------------------------------------------------------------------

/// Reject project names that could escape the vault via path traversal.
/// Project names come from directory names or user input and become path
/// components verbatim.
pub fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.contains('\0')
    {
        return Err(VaultError::InvalidProjectName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
