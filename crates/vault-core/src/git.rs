//! Commit source: recent git commits for a project, injected into the
//! daily entry deterministically. Best-effort — any failure yields an
//! empty list, never an error.

use crate::record::CommitRef;
use std::path::Path;
use std::process::Command;

/// Commits in `repo_path` since `since_date` (`YYYY-MM-DD`), newest first
/// as `git log` emits them. Empty if the path or git is missing, or the
/// command fails.
pub fn recent_commits(repo_path: &str, since_date: &str) -> Vec<CommitRef> {
    if !Path::new(repo_path).exists() {
        return Vec::new();
    }

    let since = if since_date.is_empty() {
        "midnight"
    } else {
        since_date
    };
    let output = Command::new("git")
        .args([
            "-C",
            repo_path,
            "log",
            "--oneline",
            "--no-decorate",
            "--since",
            since,
        ])
        .output();

    let output = match output {
        Ok(o) if o.status.success() => o,
        Ok(_) | Err(_) => {
            tracing::debug!(repo_path, "git log unavailable, no commits injected");
            return Vec::new();
        }
    };

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once(' ') {
            Some((hash, message)) => CommitRef {
                hash: hash.to_string(),
                message: message.to_string(),
            },
            None => CommitRef {
                hash: line.to_string(),
                message: String::new(),
            },
        })
        .collect()
}
