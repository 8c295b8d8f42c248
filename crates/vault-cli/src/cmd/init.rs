use vault_core::config::Config;

pub fn run(force: bool) -> anyhow::Result<()> {
    let path = Config::init_file(force)?;
    println!("Config written: {}", path.display());
    println!("Edit it to point at your vault, then run `vault-agent sync`.");
    Ok(())
}
