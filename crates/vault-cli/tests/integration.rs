use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Run vault-agent against a temp vault. HOME is redirected so no real
/// config file leaks in, and the vault/projects paths come from env vars.
fn vault_agent(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vault-agent").unwrap();
    cmd.env("HOME", dir.path())
        .env("OBSIDIAN_VAULT_PATH", dir.path().join("vault"))
        .env("CLAUDE_PROJECTS_PATH", dir.path().join("claude"));
    cmd
}

fn write_status_doc(dir: &TempDir, project: &str, status: &str, phase: &str) {
    let project_dir = dir.path().join("vault/Projects").join(project);
    std::fs::create_dir_all(&project_dir).unwrap();
    std::fs::write(
        project_dir.join("STATUS.md"),
        format!(
            "# {project}\n\n> Last updated: 2026-02-06 14:30\n\n\
             ## Status\n{status}\n\n## Phase\n{phase}\n\n\
             ## Completed Today\n- [x] Added login endpoint\n\n\
             ## Issues\n_None_\n\n\
             ## Next Steps\n- [ ] Wire up refresh\n\n\
             ## Decisions\n_None_\n\n## Blockers\n_None_\n\n\
             ## GitHub References\n_None_\n\n## Notes\n_None_\n"
        ),
    )
    .unwrap();
}

fn write_daily_doc(dir: &TempDir, project: &str, date: &str, completed: &[&str], refs: &str) {
    let daily_dir = dir.path().join("vault/Projects").join(project).join("Log/Daily");
    std::fs::create_dir_all(&daily_dir).unwrap();
    let mut content = format!("# Daily Log: {date}\n\n---\n\n### 12:00 — {project}\n\n**Summary**: work\n\n**Completed**:\n");
    for item in completed {
        content.push_str(&format!("- [x] {item}\n"));
    }
    content.push_str("\n**Decisions**:\n- Chose SQLite\n\n**Blockers**:\n_None_\n\n");
    content.push_str(&format!("**GitHub Refs**: {refs}\n"));
    std::fs::write(daily_dir.join(format!("{date}.md")), content).unwrap();
}

// ---------------------------------------------------------------------------
// vault-agent init
// ---------------------------------------------------------------------------

#[test]
fn init_writes_config_file() {
    let dir = TempDir::new().unwrap();
    vault_agent(&dir).arg("init").assert().success();

    let config = dir.path().join(".config/vault-agent/config.yaml");
    assert!(config.exists());
    let content = std::fs::read_to_string(config).unwrap();
    assert!(content.contains("projects_folder: Projects"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    vault_agent(&dir).arg("init").assert().success();
    vault_agent(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    vault_agent(&dir).args(["init", "--force"]).assert().success();
}

// ---------------------------------------------------------------------------
// vault-agent dashboard
// ---------------------------------------------------------------------------

#[test]
fn dashboard_on_empty_vault_writes_placeholder() {
    let dir = TempDir::new().unwrap();
    vault_agent(&dir).arg("dashboard").assert().success();

    let content = std::fs::read_to_string(dir.path().join("vault/DASHBOARD.md")).unwrap();
    assert!(content.contains("_No projects yet_"));
}

#[test]
fn dashboard_rows_come_from_status_documents() {
    let dir = TempDir::new().unwrap();
    write_status_doc(&dir, "alpha", "Implementing auth", "Phase 1");
    write_status_doc(&dir, "beta", "Stable", "Maintenance");
    // Project directory without STATUS.md is omitted
    std::fs::create_dir_all(dir.path().join("vault/Projects/bare")).unwrap();

    vault_agent(&dir).arg("dashboard").assert().success();

    let content = std::fs::read_to_string(dir.path().join("vault/DASHBOARD.md")).unwrap();
    assert!(content.contains("| alpha | Implementing auth | Phase 1 | Wire up refresh |"));
    assert!(content.contains("| beta | Stable | Maintenance |"));
    assert!(!content.contains("| bare |"));
}

// ---------------------------------------------------------------------------
// vault-agent status
// ---------------------------------------------------------------------------

#[test]
fn status_prints_parsed_fields() {
    let dir = TempDir::new().unwrap();
    write_status_doc(&dir, "alpha", "Implementing auth", "Phase 1");

    vault_agent(&dir)
        .args(["status", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: Implementing auth"))
        .stdout(predicate::str::contains("Phase:  Phase 1"))
        .stdout(predicate::str::contains("[ ] Wire up refresh"));
}

#[test]
fn status_json_output() {
    let dir = TempDir::new().unwrap();
    write_status_doc(&dir, "alpha", "Implementing auth", "Phase 1");

    let output = vault_agent(&dir)
        .args(["status", "alpha", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["status"], "Implementing auth");
    assert_eq!(parsed["next_steps"][0]["done"], false);
}

#[test]
fn status_of_unknown_project_fails() {
    let dir = TempDir::new().unwrap();
    vault_agent(&dir)
        .args(["status", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project not found"));
}

// ---------------------------------------------------------------------------
// vault-agent weekly / monthly
// ---------------------------------------------------------------------------

#[test]
fn weekly_rollup_filters_by_iso_week() {
    let dir = TempDir::new().unwrap();
    write_daily_doc(&dir, "alpha", "2026-02-06", &["Added login endpoint"], "#105");
    // Seven days later falls in the next ISO week — must not contribute
    write_daily_doc(&dir, "alpha", "2026-02-13", &["Next week work"], "#200");

    vault_agent(&dir)
        .args(["weekly", "--project", "alpha", "--week", "2026-W06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-W06.md"));

    let content =
        std::fs::read_to_string(dir.path().join("vault/Projects/alpha/Log/Weekly/2026-W06.md"))
            .unwrap();
    assert!(content.contains("- Added login endpoint"));
    assert!(content.contains("- #105"));
    assert!(!content.contains("Next week work"));
}

#[test]
fn monthly_rollup_dedups_across_dailies() {
    let dir = TempDir::new().unwrap();
    write_daily_doc(&dir, "alpha", "2026-02-01", &["Added login endpoint"], "#105");
    write_daily_doc(
        &dir,
        "alpha",
        "2026-02-15",
        &["Added login endpoint", "Added logout endpoint"],
        "#105",
    );
    write_daily_doc(&dir, "alpha", "2026-03-01", &["March work"], "#300");

    vault_agent(&dir)
        .args(["monthly", "--project", "alpha", "--month", "2026-02"])
        .assert()
        .success();

    let content =
        std::fs::read_to_string(dir.path().join("vault/Projects/alpha/Log/Monthly/2026-02.md"))
            .unwrap();
    assert_eq!(content.matches("Added login endpoint").count(), 1);
    assert!(content.contains("Added logout endpoint"));
    assert!(!content.contains("March work"));
    assert_eq!(content.matches("#105").count(), 1);
}

#[test]
fn rollup_all_reports_when_nothing_to_do() {
    let dir = TempDir::new().unwrap();
    vault_agent(&dir)
        .arg("weekly")
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects with daily logs"));
}

#[test]
fn malformed_period_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    vault_agent(&dir)
        .args(["weekly", "--project", "alpha", "--week", "nonsense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid period"));
}

// ---------------------------------------------------------------------------
// vault-agent standup
// ---------------------------------------------------------------------------

fn days_ago(n: i64) -> String {
    (chrono::Local::now().date_naive() - chrono::Duration::days(n))
        .format("%Y-%m-%d")
        .to_string()
}

#[test]
fn standup_aggregates_recent_work_and_status() {
    let dir = TempDir::new().unwrap();
    write_status_doc(&dir, "alpha", "Implementing auth", "Phase 1");
    write_daily_doc(&dir, "alpha", &days_ago(1), &["Added login endpoint"], "#105");

    vault_agent(&dir)
        .arg("standup")
        .assert()
        .success()
        .stdout(predicate::str::contains("## Yesterday"))
        .stdout(predicate::str::contains("### alpha\n- [x] Added login endpoint"))
        .stdout(predicate::str::contains("- [ ] Wire up refresh"));
}

#[test]
fn standup_week_flag_widens_the_range() {
    let dir = TempDir::new().unwrap();
    write_daily_doc(&dir, "alpha", &days_ago(5), &["Old refactor work"], "#90");

    vault_agent(&dir)
        .arg("standup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Old refactor work").not());

    vault_agent(&dir)
        .args(["standup", "--week"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## This Week"))
        .stdout(predicate::str::contains("Old refactor work"));
}

#[test]
fn standup_json_output() {
    let dir = TempDir::new().unwrap();
    write_status_doc(&dir, "alpha", "Implementing auth", "Phase 1");

    let output = vault_agent(&dir)
        .args(["standup", "--project", "alpha", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed[0]["project"], "alpha");
    assert_eq!(parsed[0]["next_steps"][0], "Wire up refresh");
}

// ---------------------------------------------------------------------------
// vault-agent sync
// ---------------------------------------------------------------------------

#[test]
fn sync_all_with_no_sessions_is_a_noop() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("claude")).unwrap();
    vault_agent(&dir)
        .args(["sync", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No recent projects found."));
}

#[test]
fn sync_unknown_session_id_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("claude")).unwrap();
    vault_agent(&dir)
        .args(["sync", "--session", "deadbeef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("deadbeef"));
}
