use anyhow::Result;

use crate::config::Config;

pub fn cmd_config(config: &Config, path_only: bool) -> Result<()> {
    let path = Config::config_path();
    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    println!("# {}", path.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
