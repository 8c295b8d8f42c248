//! Markdown renderers for vault documents.
//!
//! Every renderer is a pure function over strings; timestamps are passed in
//! by the caller. Empty data always renders an explicit marker under its
//! heading — a section is never omitted.

use crate::record::{CommitRef, ExtractionRecord, IssueRef};
use crate::rollup::RollupData;
use crate::standup::ProjectStandup;

pub const EMPTY_MARKER: &str = "_None_";
pub const UNKNOWN_MARKER: &str = "_Unknown_";
pub const NO_PHASE_MARKER: &str = "_Not specified_";
pub const NO_SUMMARY_MARKER: &str = "_No summary_";
pub const DASH: &str = "—";

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return EMPTY_MARKER.to_string();
    }
    items
        .iter()
        .map(|i| format!("- {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn checkbox_list(items: &[String]) -> String {
    if items.is_empty() {
        return EMPTY_MARKER.to_string();
    }
    items
        .iter()
        .map(|i| format!("- [ ] {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn scalar_or(value: &str, marker: &str) -> String {
    if value.is_empty() {
        marker.to_string()
    } else {
        value.to_string()
    }
}

/// Flat `- [x]` completed items, groups flattened. Daily entries use this
/// form: a `###` group heading inside a `**Completed**:` block would end
/// the block for the aggregator, so grouping stays a STATUS.md-only shape.
fn completed_checkboxes(record: &ExtractionRecord) -> String {
    let items = record.flat_completed();
    if items.is_empty() {
        return EMPTY_MARKER.to_string();
    }
    items
        .iter()
        .map(|i| format!("- [x] {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Completed items grouped under `###` sub-headings, or flat `- [x]` items
/// if no groups were extracted.
fn completed_section(record: &ExtractionRecord) -> String {
    if !record.completed_groups.is_empty() {
        let mut lines = Vec::new();
        for group in &record.completed_groups {
            lines.push(format!("\n### {}", group.heading));
            for item in &group.items {
                lines.push(format!("- [x] {item}"));
            }
        }
        return lines.join("\n");
    }
    if !record.completed.is_empty() {
        return record
            .completed
            .iter()
            .map(|i| format!("- [x] {i}"))
            .collect::<Vec<_>>()
            .join("\n");
    }
    EMPTY_MARKER.to_string()
}

fn issues_table(issues: &[IssueRef]) -> String {
    if issues.is_empty() {
        return EMPTY_MARKER.to_string();
    }
    let mut lines = vec![
        "| Issue | Title | Effort | Status |".to_string(),
        "|-------|-------|--------|--------|".to_string(),
    ];
    for issue in issues {
        lines.push(format!(
            "| {} | {} | {} | {} |",
            issue.number, issue.title, issue.effort, issue.status
        ));
    }
    lines.join("\n")
}

fn commits_table(commits: &[CommitRef]) -> String {
    if commits.is_empty() {
        return EMPTY_MARKER.to_string();
    }
    let mut lines = vec![
        "| Commit | Description |".to_string(),
        "|--------|-------------|".to_string(),
    ];
    for commit in commits {
        lines.push(format!("| {} | {} |", commit.hash, commit.message));
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// STATUS.md — overwritten each run (current state at a glance)
// ---------------------------------------------------------------------------

pub fn render_status(project: &str, record: &ExtractionRecord, updated: &str) -> String {
    format!(
        "# {project}\n\n\
         > Last updated: {updated}\n\n\
         ## Status\n{status}\n\n\
         ## Phase\n{phase}\n\n\
         ## Completed Today\n{completed}\n\n\
         ## Issues\n{issues}\n\n\
         ## Next Steps\n{next_steps}\n\n\
         ## Decisions\n{decisions}\n\n\
         ## Blockers\n{blockers}\n\n\
         ## GitHub References\n{github_refs}\n\n\
         ## Notes\n{notes}\n",
        status = scalar_or(&record.status, UNKNOWN_MARKER),
        phase = scalar_or(&record.phase, NO_PHASE_MARKER),
        completed = completed_section(record),
        issues = issues_table(&record.issues),
        next_steps = checkbox_list(&record.next_steps),
        decisions = bullet_list(&record.decisions),
        blockers = bullet_list(&record.blockers),
        github_refs = bullet_list(&record.github_refs),
        notes = bullet_list(&record.notes),
    )
}

// ---------------------------------------------------------------------------
// DASHBOARD.md — cross-project overview (overwritten)
// ---------------------------------------------------------------------------

pub fn render_dashboard_row(
    project: &str,
    status: Option<&str>,
    phase: Option<&str>,
    next_step: Option<&str>,
    updated: &str,
) -> String {
    format!(
        "| {} | {} | {} | {} | {} |",
        project,
        status.unwrap_or(DASH),
        phase.unwrap_or(DASH),
        next_step.unwrap_or(DASH),
        updated
    )
}

pub fn render_dashboard(rows: &[String], updated: &str) -> String {
    let body = if rows.is_empty() {
        "| _No projects yet_ | | | | |".to_string()
    } else {
        rows.join("\n")
    };
    format!(
        "# Dashboard\n\n\
         > Auto-generated: {updated}\n\n\
         | Project | Status | Phase | Next Step | Last Updated |\n\
         |---------|--------|-------|-----------|--------------|\n\
         {body}\n"
    )
}

// ---------------------------------------------------------------------------
// Daily log — header written once, entries appended
// ---------------------------------------------------------------------------

pub fn render_daily_header(date_key: &str) -> String {
    format!("# Daily Log: {date_key}\n")
}

pub fn render_daily_entry(project: &str, record: &ExtractionRecord, time: &str) -> String {
    format!(
        "\n---\n\n\
         ### {time} — {project}\n\n\
         **Summary**: {summary}\n\n\
         **Completed**:\n{completed}\n\n\
         **Issues**:\n{issues}\n\n\
         **Commits**:\n{commits}\n\n\
         **Decisions**:\n{decisions}\n\n\
         **Blockers**:\n{blockers}\n\n\
         **Next Steps**:\n{next_steps}\n\n\
         **Notes**:\n{notes}\n\n\
         **GitHub Refs**: {github_refs}\n\n\
         **Knowledge**:\n{knowledge}\n",
        summary = scalar_or(&record.summary, NO_SUMMARY_MARKER),
        completed = completed_checkboxes(record),
        issues = issues_table(&record.issues),
        commits = commits_table(&record.commits),
        decisions = bullet_list(&record.decisions),
        blockers = bullet_list(&record.blockers),
        next_steps = checkbox_list(&record.next_steps),
        notes = bullet_list(&record.notes),
        github_refs = if record.github_refs.is_empty() {
            EMPTY_MARKER.to_string()
        } else {
            record.github_refs.join(", ")
        },
        knowledge = bullet_list(&record.knowledge),
    )
}

// ---------------------------------------------------------------------------
// Weekly / monthly rollups — fully regenerated, never appended
// ---------------------------------------------------------------------------

pub fn render_weekly(week: &str, project: &str, data: &RollupData, generated: &str) -> String {
    format!(
        "# Week {week}\n\n\
         > Generated: {generated}\n\n\
         ## {project}\n\n\
         ### Completed\n{completed}\n\n\
         ### Decisions\n{decisions}\n\n\
         ### Blockers (end of week)\n{blockers}\n\n\
         ### GitHub References\n{github_refs}\n",
        completed = bullet_list(&data.completed),
        decisions = bullet_list(&data.decisions),
        blockers = bullet_list(&data.blockers),
        github_refs = bullet_list(&data.github_refs),
    )
}

pub fn render_monthly(month: &str, project: &str, data: &RollupData, generated: &str) -> String {
    format!(
        "# {month}\n\n\
         > Generated: {generated}\n\n\
         ## {project}\n\n\
         ### Completed\n{completed}\n\n\
         ### Key Decisions\n{decisions}\n\n\
         ### Unresolved Blockers\n{blockers}\n\n\
         ### GitHub References\n{github_refs}\n",
        completed = bullet_list(&data.completed),
        decisions = bullet_list(&data.decisions),
        blockers = bullet_list(&data.blockers),
        github_refs = bullet_list(&data.github_refs),
    )
}

// ---------------------------------------------------------------------------
// Standup — cross-project report, printed rather than written to the vault
// ---------------------------------------------------------------------------

/// Per-project caps keep the report readable when a project has a long
/// backlog.
const STANDUP_MAX_COMPLETED: usize = 10;
const STANDUP_MAX_NEXT: usize = 5;
const STANDUP_MAX_BLOCKERS: usize = 5;

pub fn render_standup(date: &str, since_label: &str, projects: &[ProjectStandup]) -> String {
    let mut lines = vec![format!("# Daily Standup - {date}"), String::new()];

    if projects.iter().any(|p| !p.completed.is_empty()) {
        lines.push(format!("## {since_label}"));
        lines.push(String::new());
        for p in projects {
            if p.completed.is_empty() {
                continue;
            }
            lines.push(format!("### {}", p.project));
            for item in p.completed.iter().take(STANDUP_MAX_COMPLETED) {
                lines.push(format!("- [x] {item}"));
            }
            lines.push(String::new());
        }
    }

    if projects.iter().any(|p| !p.next_steps.is_empty()) {
        lines.push("## Today's Focus".to_string());
        lines.push(String::new());
        for p in projects {
            if p.next_steps.is_empty() {
                continue;
            }
            lines.push(format!("### {}", p.project));
            for item in p.next_steps.iter().take(STANDUP_MAX_NEXT) {
                lines.push(format!("- [ ] {item}"));
            }
            lines.push(String::new());
        }
    }

    let blockers: Vec<String> = projects
        .iter()
        .flat_map(|p| p.blockers.iter().map(|b| format!("{}: {b}", p.project)))
        .take(STANDUP_MAX_BLOCKERS)
        .collect();
    lines.push("## Blockers".to_string());
    lines.push(String::new());
    if blockers.is_empty() {
        lines.push("- (none)".to_string());
    } else {
        for blocker in &blockers {
            lines.push(format!("- {blocker}"));
        }
    }
    lines.push(String::new());

    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
