//! `config` command: show and initialize configuration.

use crate::config::ConfigLoader;

pub fn show(as_json: bool) -> anyhow::Result<()> {
    ConfigLoader::show_config(as_json)?;
    Ok(())
}

pub fn init(force: bool) -> anyhow::Result<()> {
    let dir = ConfigLoader::init_project(force)?;
    println!("Initialized project configuration in {}", dir.display());
    Ok(())
}
