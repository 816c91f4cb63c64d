//! `generate` command: submit a job and poll it to completion.

use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ConfigLoader;
use crate::job::{Orchestrator, Submission};
use crate::types::{DocumentKind, FormatSelection, ImageSource, JobState, Language};

pub struct GenerateOptions {
    pub files: Vec<PathBuf>,
    pub kind: DocumentKind,
    pub sector: String,
    pub company: String,
    /// Comma-separated section keys to retain; everything when absent.
    pub sections: Option<String>,
    pub formats: FormatSelection,
    pub language: Language,
    pub logo_top_left: Option<String>,
    pub logo_bottom_right: Option<String>,
    pub special_document: Option<PathBuf>,
    pub additional_documents: Vec<PathBuf>,
    pub output: Option<PathBuf>,
}

pub async fn run(options: GenerateOptions) -> anyhow::Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(output) = &options.output {
        config.storage.output_dir = output.clone();
    }

    let orchestrator = Arc::new(Orchestrator::new(config)?);

    let selected_sections = options.sections.as_ref().map(|csv| {
        csv.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    });

    let submission = Submission {
        source_files: options.files,
        kind: options.kind,
        sector: options.sector,
        company_name: options.company,
        selected_sections,
        formats: options.formats,
        language: options.language,
        logo_top_left: ImageSource::classify(options.logo_top_left.as_deref()),
        logo_bottom_right: ImageSource::classify(options.logo_bottom_right.as_deref()),
        special_document: options.special_document,
        additional_documents: options.additional_documents,
    };

    let job_id = orchestrator.submit(submission)?;
    println!("Submitted job {}", style(&job_id).cyan());

    let mut last_progress = 0u8;
    loop {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let status = orchestrator.status(&job_id)?;

        if status.progress != last_progress {
            println!(
                "  [{:>3}%] {}",
                status.progress,
                style(&status.message).dim()
            );
            last_progress = status.progress;
        }

        match status.status {
            JobState::Processing => continue,
            JobState::Completed => {
                println!("{}", style("Done.").green().bold());
                if let Some(summary) = &status.structure_summary {
                    println!(
                        "  {} sections ({} top-level)",
                        summary.total_sections, summary.main_sections
                    );
                }
                for filename in &status.files {
                    let path = orchestrator.artifact_path(filename)?;
                    println!("  {}", path.display());
                }
                return Ok(());
            }
            JobState::Error => {
                anyhow::bail!("{}", status.message);
            }
        }
    }
}
