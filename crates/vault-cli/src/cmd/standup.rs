use crate::output::print_json;
use anyhow::Context;
use chrono::{Duration, Local};
use vault_core::config::Config;
use vault_core::templates;
use vault_core::vault::Vault;

pub fn run(project: Option<&str>, days: u32, week: bool, json: bool) -> anyhow::Result<()> {
    let (days, since_label) = if week {
        (7, "This Week".to_string())
    } else if days == 1 {
        (1, "Yesterday".to_string())
    } else {
        (days, format!("Last {days} Days"))
    };

    let today = Local::now().date_naive();
    let since = today - Duration::days(i64::from(days));

    let config = Config::load().context("failed to load configuration")?;
    let vault = Vault::new(&config);
    let projects = vault.collect_standup(since, project)?;

    if projects.is_empty() {
        println!("No projects found in {}.", vault.projects_path().display());
        return Ok(());
    }

    if json {
        return print_json(&projects);
    }

    let date = today.format("%Y-%m-%d").to_string();
    print!("{}", templates::render_standup(&date, &since_label, &projects));
    Ok(())
}
