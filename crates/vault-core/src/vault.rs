//! Vault writes: STATUS overwrite, append-only daily log, dashboard and
//! rollup regeneration.
//!
//! Ownership model: the daily logs are the sole durable owner of historical
//! fact. STATUS.md and DASHBOARD.md are views — losing them loses no
//! history. The design assumes at most one writer process per project; no
//! file locking is taken.

use crate::config::Config;
use crate::error::{Result, VaultError};
use crate::io;
use crate::paths;
use crate::record::ExtractionRecord;
use crate::rollup::{self, Period};
use crate::sections;
use crate::standup::{self, ProjectStandup};
use crate::templates;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

/// Paths touched by a full [`Vault::update`].
#[derive(Debug, Clone)]
pub struct UpdatePaths {
    pub status: PathBuf,
    pub daily: PathBuf,
    pub dashboard: PathBuf,
}

/// Fields a STATUS.md document yields back to the dashboard. Lossy by
/// design: only what is representable in the rendered markdown survives.
#[derive(Debug, Clone, Default)]
pub struct StatusSummary {
    pub status: Option<String>,
    pub phase: Option<String>,
    pub next_steps: Vec<String>,
}

pub struct Vault {
    vault_path: PathBuf,
    projects_path: PathBuf,
}

impl Vault {
    pub fn new(config: &Config) -> Self {
        Self {
            vault_path: config.vault_path.clone(),
            projects_path: config.projects_path(),
        }
    }

    pub fn projects_path(&self) -> &Path {
        &self.projects_path
    }

    /// Project directory, created on first write. Creation is idempotent.
    fn project_dir(&self, project: &str) -> Result<PathBuf> {
        paths::validate_project_name(project)?;
        let dir = paths::project_dir(&self.projects_path, project);
        io::ensure_dir(&dir)?;
        Ok(dir)
    }

    /// Project names sorted by directory name.
    pub fn list_projects(&self) -> Result<Vec<String>> {
        if !self.projects_path.exists() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = std::fs::read_dir(&self.projects_path)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();
        Ok(names)
    }

    // -----------------------------------------------------------------------
    // STATUS.md
    // -----------------------------------------------------------------------

    /// Overwrite STATUS.md with the current state. The document reflects
    /// only this record; it has no memory of prior runs.
    pub fn write_status(&self, project: &str, record: &ExtractionRecord) -> Result<PathBuf> {
        let dir = self.project_dir(project)?;
        let path = dir.join(paths::STATUS_FILE);
        let updated = Local::now().format("%Y-%m-%d %H:%M").to_string();
        io::atomic_write(&path, templates::render_status(project, record, &updated).as_bytes())?;
        tracing::debug!(project, path = %path.display(), "wrote STATUS.md");
        Ok(path)
    }

    /// Raw STATUS.md content for a project, or `ProjectNotFound`.
    pub fn read_status(&self, project: &str) -> Result<String> {
        paths::validate_project_name(project)?;
        let path = paths::status_path(&self.projects_path, project);
        if !path.exists() {
            return Err(VaultError::ProjectNotFound(project.to_string()));
        }
        Ok(std::fs::read_to_string(&path)?)
    }

    /// Re-parse a rendered STATUS.md into the dashboard-visible fields.
    pub fn parse_status_summary(content: &str) -> StatusSummary {
        StatusSummary {
            status: sections::extract_section_text(content, "Status"),
            phase: sections::extract_section_text(content, "Phase"),
            next_steps: sections::extract_section(content, "Next Steps"),
        }
    }

    // -----------------------------------------------------------------------
    // Daily log
    // -----------------------------------------------------------------------

    /// Append one timestamped entry to the daily log for `date`, writing
    /// the date header first if the document is new. Prior entries are
    /// never rewritten or deleted.
    pub fn append_daily(
        &self,
        project: &str,
        record: &ExtractionRecord,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        let dir = self.project_dir(project)?;
        let daily_dir = dir.join(paths::LOG_DIR).join(paths::DAILY_DIR);
        io::ensure_dir(&daily_dir)?;

        let date_key = date.format("%Y-%m-%d").to_string();
        let path = daily_dir.join(format!("{date_key}.md"));
        io::write_if_missing(&path, templates::render_daily_header(&date_key).as_bytes())?;

        let time = Local::now().format("%H:%M").to_string();
        io::append_text(&path, &templates::render_daily_entry(project, record, &time))?;
        tracing::debug!(project, %date_key, "appended daily entry");
        Ok(path)
    }

    // -----------------------------------------------------------------------
    // DASHBOARD.md
    // -----------------------------------------------------------------------

    /// Regenerate DASHBOARD.md from disk state alone: every project with a
    /// STATUS.md contributes one row, stamped with that file's modified
    /// date. Projects without a STATUS.md are skipped, not errored.
    pub fn write_dashboard(&self) -> Result<PathBuf> {
        let mut rows = Vec::new();

        for project in self.list_projects()? {
            let status_path = paths::status_path(&self.projects_path, &project);
            if !status_path.exists() {
                continue;
            }
            let content = std::fs::read_to_string(&status_path)?;
            let summary = Self::parse_status_summary(&content);
            let updated = io::modified_date(&status_path)?;
            rows.push(templates::render_dashboard_row(
                &project,
                summary.status.as_deref(),
                summary.phase.as_deref(),
                summary.next_steps.first().map(String::as_str),
                &updated,
            ));
        }

        let path = paths::dashboard_path(&self.vault_path);
        let updated = Local::now().format("%Y-%m-%d %H:%M").to_string();
        io::atomic_write(&path, templates::render_dashboard(&rows, &updated).as_bytes())?;
        tracing::debug!(rows = rows.len(), "regenerated DASHBOARD.md");
        Ok(path)
    }

    // -----------------------------------------------------------------------
    // Full update
    // -----------------------------------------------------------------------

    /// STATUS + daily + dashboard, in that order.
    pub fn update(
        &self,
        project: &str,
        record: &ExtractionRecord,
        date: NaiveDate,
    ) -> Result<UpdatePaths> {
        let status = self.write_status(project, record)?;
        let daily = self.append_daily(project, record, date)?;
        let dashboard = self.write_dashboard()?;
        Ok(UpdatePaths {
            status,
            daily,
            dashboard,
        })
    }

    // -----------------------------------------------------------------------
    // Rollups
    // -----------------------------------------------------------------------

    /// Regenerate the rollup document for one project and period. The prior
    /// rollup file, if present, is overwritten, not merged.
    pub fn generate_rollup(&self, project: &str, period: &Period) -> Result<PathBuf> {
        paths::validate_project_name(project)?;
        if !paths::project_dir(&self.projects_path, project).exists() {
            return Err(VaultError::ProjectNotFound(project.to_string()));
        }

        let daily_dir = paths::daily_dir(&self.projects_path, project);
        let data = rollup::aggregate_dailies(&daily_dir, period)?;
        let generated = Local::now().format("%Y-%m-%d %H:%M").to_string();

        let (path, content) = match period {
            Period::Week(week) => (
                paths::weekly_path(&self.projects_path, project, week),
                templates::render_weekly(week, project, &data, &generated),
            ),
            Period::Month(month) => (
                paths::monthly_path(&self.projects_path, project, month),
                templates::render_monthly(month, project, &data, &generated),
            ),
        };
        io::atomic_write(&path, content.as_bytes())?;
        tracing::debug!(project, period = period.key(), "regenerated rollup");
        Ok(path)
    }

    /// Rollups for every project that has a daily log directory.
    /// Best-effort: a failing project is reported and skipped.
    pub fn generate_rollup_all(&self, period: &Period) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for project in self.list_projects()? {
            if !paths::daily_dir(&self.projects_path, &project).exists() {
                continue;
            }
            match self.generate_rollup(&project, period) {
                Ok(path) => written.push(path),
                Err(e) => tracing::warn!(project, error = %e, "rollup failed"),
            }
        }
        Ok(written)
    }

    // -----------------------------------------------------------------------
    // Standup
    // -----------------------------------------------------------------------

    /// Standup data for one project, or every project, read-only. Completed
    /// items come from daily logs dated `since` or later; next steps and
    /// blockers from each project's current STATUS.md.
    pub fn collect_standup(
        &self,
        since: NaiveDate,
        project: Option<&str>,
    ) -> Result<Vec<ProjectStandup>> {
        let projects = match project {
            Some(name) => {
                paths::validate_project_name(name)?;
                if !paths::project_dir(&self.projects_path, name).exists() {
                    return Err(VaultError::ProjectNotFound(name.to_string()));
                }
                vec![name.to_string()]
            }
            None => self.list_projects()?,
        };
        projects
            .iter()
            .map(|name| standup::project_standup(&self.projects_path, name, since))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vault(dir: &TempDir) -> Vault {
        let config = Config {
            vault_path: dir.path().to_path_buf(),
            claude_projects_path: dir.path().join("claude"),
            projects_folder: "Projects".into(),
            extraction_model: "haiku".into(),
            max_conversation_chars: 50_000,
        };
        Vault::new(&config)
    }

    fn sample_record() -> ExtractionRecord {
        ExtractionRecord {
            status: "Implementing auth".into(),
            phase: "Phase 1".into(),
            summary: "Auth work.".into(),
            completed: vec!["Added login endpoint".into()],
            decisions: vec!["Chose SQLite".into()],
            next_steps: vec!["Wire up refresh".into()],
            github_refs: vec!["#105".into()],
            ..Default::default()
        }
    }

    #[test]
    fn write_status_overwrites_previous() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);

        v.write_status("foo", &sample_record()).unwrap();
        let mut second = sample_record();
        second.status = "Shipping".into();
        let path = v.write_status("foo", &second).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Shipping"));
        assert!(!content.contains("Implementing auth"));
    }

    #[test]
    fn status_round_trips_scalar_fields() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);
        v.write_status("foo", &sample_record()).unwrap();

        let summary = Vault::parse_status_summary(&v.read_status("foo").unwrap());
        assert_eq!(summary.status.as_deref(), Some("Implementing auth"));
        assert_eq!(summary.phase.as_deref(), Some("Phase 1"));
        assert_eq!(summary.next_steps, vec!["Wire up refresh"]);
    }

    #[test]
    fn read_status_of_unknown_project_errors() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);
        assert!(matches!(
            v.read_status("ghost"),
            Err(VaultError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn append_daily_keeps_all_entries() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);
        let date = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();

        let mut record = sample_record();
        for i in 0..3 {
            record.summary = format!("Session {i}.");
            v.append_daily("foo", &record, date).unwrap();
        }

        let path = dir
            .path()
            .join("Projects/foo/Log/Daily/2026-02-06.md");
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("# Daily Log: 2026-02-06"));
        // One header, three entries in append order
        assert_eq!(content.matches("# Daily Log").count(), 1);
        for i in 0..3 {
            assert!(content.contains(&format!("Session {i}.")));
        }
        let s0 = content.find("Session 0.").unwrap();
        let s2 = content.find("Session 2.").unwrap();
        assert!(s0 < s2);
        assert_eq!(content.matches("\n---\n").count(), 3);
    }

    #[test]
    fn dashboard_reads_status_documents() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);
        v.write_status("foo", &sample_record()).unwrap();
        // Project without STATUS.md is omitted, not errored
        std::fs::create_dir_all(dir.path().join("Projects/bare")).unwrap();

        let path = v.write_dashboard().unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let today = Local::now().format("%Y-%m-%d").to_string();
        assert!(content
            .contains(&format!("| foo | Implementing auth | Phase 1 | Wire up refresh | {today} |")));
        assert!(!content.contains("| bare |"));
    }

    #[test]
    fn dashboard_placeholder_when_empty() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);
        let path = v.write_dashboard().unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("_No projects yet_"));
    }

    #[test]
    fn update_writes_all_three_documents() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);
        let date = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();

        let written = v.update("Foo", &sample_record(), date).unwrap();
        assert!(written.status.exists());
        assert!(written.daily.exists());
        assert!(written.dashboard.exists());

        // Dashboard row derives from STATUS.md, stamped with its file date
        let dashboard = std::fs::read_to_string(&written.dashboard).unwrap();
        let today = Local::now().format("%Y-%m-%d").to_string();
        assert!(dashboard.contains(&format!("| Foo | Implementing auth | Phase 1 | Wire up refresh | {today} |")));
    }

    #[test]
    fn rollup_overwrites_prior_file() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);
        let date = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();
        v.append_daily("foo", &sample_record(), date).unwrap();

        let period = Period::parse("2026-02").unwrap();
        let path = v.generate_rollup("foo", &period).unwrap();
        std::fs::write(&path, "stale content").unwrap();
        v.generate_rollup("foo", &period).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale content"));
        assert!(content.contains("- Added login endpoint"));
        assert!(content.contains("### Key Decisions\n- Chose SQLite"));
    }

    #[test]
    fn grouped_completed_items_reach_rollup() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);
        let date = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();
        let record = ExtractionRecord {
            completed_groups: vec![crate::record::CompletedGroup {
                heading: "Auth".into(),
                items: vec!["Added login endpoint".into()],
            }],
            ..Default::default()
        };
        v.append_daily("foo", &record, date).unwrap();

        let path = v
            .generate_rollup("foo", &Period::parse("2026-02").unwrap())
            .unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("### Completed\n- Added login endpoint"));
    }

    #[test]
    fn rollup_for_unknown_project_errors() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);
        assert!(matches!(
            v.generate_rollup("ghost", &Period::parse("2026-02").unwrap()),
            Err(VaultError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn rollup_all_skips_projects_without_dailies() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);
        let date = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();
        v.append_daily("with-log", &sample_record(), date).unwrap();
        v.write_status("status-only", &sample_record()).unwrap();

        let written = v
            .generate_rollup_all(&Period::parse("2026-W06").unwrap())
            .unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with("with-log/Log/Weekly/2026-W06.md"));
    }

    #[test]
    fn standup_covers_all_projects() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);
        let date = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();
        v.update("alpha", &sample_record(), date).unwrap();
        v.write_status("beta", &sample_record()).unwrap();

        let since = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let projects = v.collect_standup(since, None).unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].project, "alpha");
        assert_eq!(projects[0].completed, vec!["Added login endpoint"]);
        assert_eq!(projects[0].next_steps, vec!["Wire up refresh"]);
        // beta has a STATUS.md but no daily logs
        assert!(projects[1].completed.is_empty());
        assert_eq!(projects[1].next_steps, vec!["Wire up refresh"]);
    }

    #[test]
    fn standup_for_unknown_project_errors() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);
        let since = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert!(matches!(
            v.collect_standup(since, Some("ghost")),
            Err(VaultError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn traversal_project_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let v = vault(&dir);
        assert!(matches!(
            v.write_status("../escape", &sample_record()),
            Err(VaultError::InvalidProjectName(_))
        ));
    }
}
