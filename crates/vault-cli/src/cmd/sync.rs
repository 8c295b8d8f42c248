use anyhow::Context;
use chrono::{Local, NaiveDate};
use std::path::Path;
use vault_core::config::Config;
use vault_core::extract::{self, Backend};
use vault_core::finder;
use vault_core::git;
use vault_core::record::ExtractionRecord;
use vault_core::session::Session;
use vault_core::vault::Vault;

pub fn run(
    session: Option<&str>,
    project: Option<&str>,
    all: bool,
    date: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let date_override = date
        .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
        .transpose()
        .context("invalid --date, expected YYYY-MM-DD")?;

    if all {
        let recent = finder::list_recent_projects(&config, 10)?;
        if recent.is_empty() {
            println!("No recent projects found.");
            return Ok(());
        }
        let backend = Backend::detect(&config)?;
        // Best-effort sweep: one failing project never aborts the rest
        for (name, log_path) in recent {
            if let Err(e) = process_session(&log_path, &config, &backend, date_override, dry_run) {
                eprintln!("error processing {name}: {e:#}");
            }
        }
        return Ok(());
    }

    let log_path = if let Some(id) = session {
        finder::session_log_by_id(&config, id)?
    } else if let Some(path) = project {
        finder::session_log_for_project(&config, path)?
    } else {
        finder::session_log_for_cwd(&config)?
    };

    let backend = Backend::detect(&config)?;
    process_session(&log_path, &config, &backend, date_override, dry_run)
}

fn process_session(
    log_path: &Path,
    config: &Config,
    backend: &Backend,
    date_override: Option<NaiveDate>,
    dry_run: bool,
) -> anyhow::Result<()> {
    println!("Processing: {}", log_path.display());

    let session = Session::parse(log_path)?;
    println!("  Project:  {}", session.project_name);
    println!("  Messages: {}", session.messages.len());

    let conversation = session.conversation_text(config.max_conversation_chars);

    println!("  Extracting with {} ({})...", backend.name(), config.extraction_model);
    let mut record = backend
        .extract(&conversation)
        .context("extraction failed, nothing written")?;
    record.knowledge = extract::extract_captures(&conversation);

    let date = date_override
        .or_else(|| session.date())
        .unwrap_or_else(|| Local::now().date_naive());

    // Commits are injected deterministically, never extracted
    if !session.project_path.is_empty() {
        let since = date.format("%Y-%m-%d").to_string();
        record.commits = git::recent_commits(&session.project_path, &since);
        if !record.commits.is_empty() {
            println!("  Commits:  {} found", record.commits.len());
        }
    }

    if dry_run {
        println!("\n=== DRY RUN — would write: ===");
        print_record(&record);
        return Ok(());
    }

    let vault = Vault::new(config);
    let written = vault.update(&session.project_name, &record, date)?;
    println!("\n  STATUS:    {}", written.status.display());
    println!("  Daily:     {}", written.daily.display());
    println!("  DASHBOARD: {}", written.dashboard.display());
    Ok(())
}

fn print_record(record: &ExtractionRecord) {
    println!("  Status:      {}", record.status);
    println!("  Phase:       {}", record.phase);
    println!("  Summary:     {}", record.summary);
    if record.completed_groups.is_empty() {
        println!("  Completed:   {:?}", record.completed);
    } else {
        println!("  Completed:");
        for group in &record.completed_groups {
            println!("    {}:", group.heading);
            for item in &group.items {
                println!("      - {item}");
            }
        }
    }
    for issue in &record.issues {
        println!("  Issue:       {} {} ({}) [{}]", issue.number, issue.title, issue.effort, issue.status);
    }
    for commit in &record.commits {
        println!("  Commit:      {} {}", commit.hash, commit.message);
    }
    println!("  Next Steps:  {:?}", record.next_steps);
    println!("  Decisions:   {:?}", record.decisions);
    println!("  Blockers:    {:?}", record.blockers);
    println!("  GitHub Refs: {:?}", record.github_refs);
    println!("  Notes:       {:?}", record.notes);
    println!("  Knowledge:   {:?}", record.knowledge);
}
