//! `analyze` command: stateless structure preview.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::job::Orchestrator;

pub async fn run(files: Vec<PathBuf>, company: String, sector: String) -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    let orchestrator = Arc::new(Orchestrator::new(config)?);

    let report = orchestrator.analyze(&files, &company, &sector).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
