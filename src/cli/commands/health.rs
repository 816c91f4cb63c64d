//! `health` command: report model availability and job-store occupancy.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::job::Orchestrator;

pub async fn run() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    let orchestrator = Arc::new(Orchestrator::new(config)?);

    let health = orchestrator.health();
    println!("{}", serde_json::to_string_pretty(&health)?);
    Ok(())
}
