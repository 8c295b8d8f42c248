use anyhow::Context;
use vault_core::config::Config;
use vault_core::vault::Vault;

pub fn run() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let path = Vault::new(&config).write_dashboard()?;
    println!("Dashboard: {}", path.display());
    Ok(())
}
