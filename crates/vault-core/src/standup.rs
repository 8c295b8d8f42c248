//! Cross-project standup report.
//!
//! Read-only over the vault: completed items come from the daily logs in a
//! date range, next steps and blockers from the current STATUS.md. Nothing
//! is written back.

use crate::error::Result;
use crate::paths;
use crate::sections;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// One project's contribution to the standup.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectStandup {
    pub project: String,
    /// Completed items from daily logs dated `since` or later.
    pub completed: Vec<String>,
    /// Unchecked next steps from STATUS.md.
    pub next_steps: Vec<String>,
    /// Current blockers from STATUS.md.
    pub blockers: Vec<String>,
}

impl ProjectStandup {
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.next_steps.is_empty() && self.blockers.is_empty()
    }
}

/// Completed items from every daily log dated `since` or later. Non-date
/// filenames and unreadable files are skipped, as in rollup aggregation.
pub fn completed_since(daily_dir: &Path, since: NaiveDate) -> Result<Vec<String>> {
    let mut completed = Vec::new();

    if !daily_dir.exists() {
        return Ok(completed);
    }

    let mut files: Vec<_> = std::fs::read_dir(daily_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();

    for file in files {
        let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(stem, "%Y-%m-%d") else {
            continue;
        };
        if date < since {
            continue;
        }
        let Ok(content) = std::fs::read_to_string(&file) else {
            tracing::warn!(file = %file.display(), "skipping unreadable daily file");
            continue;
        };
        completed.extend(sections::extract_bold_label_section(&content, "Completed"));
    }

    Ok(completed)
}

/// Gather one project's standup data. A project without a STATUS.md or
/// daily logs contributes empty lists, not an error.
pub fn project_standup(
    projects_path: &Path,
    project: &str,
    since: NaiveDate,
) -> Result<ProjectStandup> {
    let completed = completed_since(&paths::daily_dir(projects_path, project), since)?;

    let status_path = paths::status_path(projects_path, project);
    let (next_steps, blockers) = if status_path.exists() {
        let content = std::fs::read_to_string(&status_path)?;
        let next_steps = sections::extract_checklist(&content, "Next Steps")
            .into_iter()
            .filter(|item| !item.done)
            .map(|item| item.text)
            .collect();
        (next_steps, sections::extract_section(&content, "Blockers"))
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(ProjectStandup {
        project: project.to_string(),
        completed,
        next_steps,
        blockers,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
