use anyhow::Context;
use chrono::Local;
use vault_core::config::Config;
use vault_core::rollup::Period;
use vault_core::vault::Vault;

pub fn run_weekly(project: Option<&str>, week: Option<&str>) -> anyhow::Result<()> {
    let period = match week {
        Some(key) => Period::parse(key)?,
        None => Period::week_of(Local::now().date_naive()),
    };
    run(project, &period, "Weekly")
}

pub fn run_monthly(project: Option<&str>, month: Option<&str>) -> anyhow::Result<()> {
    let period = match month {
        Some(key) => Period::parse(key)?,
        None => Period::month_of(Local::now().date_naive()),
    };
    run(project, &period, "Monthly")
}

fn run(project: Option<&str>, period: &Period, label: &str) -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let vault = Vault::new(&config);

    match project {
        Some(name) => {
            let path = vault.generate_rollup(name, period)?;
            println!("{label}: {}", path.display());
        }
        None => {
            let written = vault.generate_rollup_all(period)?;
            if written.is_empty() {
                println!("No projects with daily logs found.");
            }
            for path in written {
                println!("{label}: {}", path.display());
            }
        }
    }
    Ok(())
}
