//! Locating assistant session logs on the filesystem.
//!
//! The assistant encodes a project's working directory as a folder name
//! with slashes replaced by dashes (`/home/me/app` → `-home-me-app`).
//! Recency always comes from filesystem mtime, never from an index file.

use crate::config::Config;
use crate::error::{Result, VaultError};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Resolve a project path to the assistant's log folder.
pub fn project_log_dir(claude_projects: &Path, project_path: &str) -> Result<PathBuf> {
    let encoded = project_path.replace('/', "-");
    let folder_name = if encoded.starts_with('-') {
        encoded
    } else {
        format!("-{encoded}")
    };

    let candidate = claude_projects.join(&folder_name);
    if candidate.exists() {
        return Ok(candidate);
    }

    Err(VaultError::NoProjectFolder {
        cwd: project_path.to_string(),
        searched: claude_projects.to_path_buf(),
    })
}

fn mtime(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// The most recently modified `.jsonl` file in a folder.
pub fn latest_session_log(folder: &Path) -> Result<PathBuf> {
    let logs = jsonl_files(folder)?;
    logs.into_iter()
        .max_by_key(|p| mtime(p))
        .ok_or_else(|| VaultError::NoSessionLogs(folder.to_path_buf()))
}

fn jsonl_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "jsonl") {
            files.push(path);
        }
    }
    Ok(files)
}

/// Most recent session log for the current working directory.
pub fn session_log_for_cwd(config: &Config) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    session_log_for_project(config, &cwd.to_string_lossy())
}

/// Most recent session log for a specific project path.
pub fn session_log_for_project(config: &Config, project_path: &str) -> Result<PathBuf> {
    let folder = project_log_dir(&config.claude_projects_path, project_path)?;
    latest_session_log(&folder)
}

/// Look up a session log by its id across all project folders.
pub fn session_log_by_id(config: &Config, session_id: &str) -> Result<PathBuf> {
    if config.claude_projects_path.exists() {
        for entry in std::fs::read_dir(&config.claude_projects_path)? {
            let folder = entry?.path();
            if !folder.is_dir() {
                continue;
            }
            let log = folder.join(format!("{session_id}.jsonl"));
            if log.exists() {
                return Ok(log);
            }
        }
    }
    Err(VaultError::SessionNotFound(session_id.to_string()))
}

/// Recently active projects, newest first, as (project name, latest log).
/// Folder names are decoded back to path components; the last component is
/// the project name.
pub fn list_recent_projects(config: &Config, limit: usize) -> Result<Vec<(String, PathBuf)>> {
    if !config.claude_projects_path.exists() {
        return Ok(Vec::new());
    }

    let mut projects: Vec<(String, PathBuf, SystemTime)> = Vec::new();
    for entry in std::fs::read_dir(&config.claude_projects_path)? {
        let folder = entry?.path();
        if !folder.is_dir() {
            continue;
        }
        let Some(latest) = jsonl_files(&folder)?.into_iter().max_by_key(|p| mtime(p)) else {
            continue;
        };

        let decoded = folder
            .file_name()
            .map(|n| n.to_string_lossy().replace('-', "/"))
            .unwrap_or_default();
        let name = decoded
            .rsplit('/')
            .find(|part| !part.is_empty())
            .unwrap_or("unknown")
            .to_string();

        let modified = mtime(&latest);
        projects.push((name, latest, modified));
    }

    projects.sort_by(|a, b| b.2.cmp(&a.2));
    Ok(projects
        .into_iter()
        .take(limit)
        .map(|(name, path, _)| (name, path))
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
