//! Job Orchestration
//!
//! Sequences one submitted job through its phases: extract → synthesize
//! structure → generate content → render selected formats → report progress →
//! schedule deferred cleanup. Owns the ephemeral job-state store and enforces
//! the admission ceiling. Each job runs as one background task; per-section
//! generation inside a job fans out concurrently (see `content`).

pub mod store;

pub use store::JobStore;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::ai::{SharedProvider, create_provider};
use crate::config::Config;
use crate::constants::progress;
use crate::content::{ContentGenerator, InsightDistiller};
use crate::extract::DocumentProcessor;
use crate::render::{self, LogicalOrderShaper, RenderContext, TextShaper};
use crate::synthesis::StructureSynthesizer;
use crate::types::{
    DocumentKind, DocumentOutline, FormatSelection, ImageSource, JobRecord, JobState, JobStatus,
    Language, OutputFormat, ProposalRequest, Result, Section, SmithError, StructureSummary,
    count, flatten,
};

// =============================================================================
// Submission
// =============================================================================

/// One generation request as accepted from the caller.
#[derive(Debug, Default)]
pub struct Submission {
    pub source_files: Vec<PathBuf>,
    pub kind: DocumentKind,
    pub sector: String,
    pub company_name: String,
    pub selected_sections: Option<Vec<String>>,
    pub formats: FormatSelection,
    pub language: Language,
    pub logo_top_left: ImageSource,
    pub logo_bottom_right: ImageSource,
    /// One "special" supporting document (standards/compliance material).
    pub special_document: Option<PathBuf>,
    /// Additional supporting documents, distilled together.
    pub additional_documents: Vec<PathBuf>,
}

impl Submission {
    fn request(&self) -> ProposalRequest {
        ProposalRequest {
            kind: self.kind,
            sector: self.sector.clone(),
            company_name: self.company_name.clone(),
            selected_sections: self.selected_sections.clone(),
            formats: self.formats.clone(),
            language: self.language,
            logo_top_left: self.logo_top_left.clone(),
            logo_bottom_right: self.logo_bottom_right.clone(),
            special_insights: None,
            additional_insights: None,
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// Result of the stateless analyze-only entry point.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeReport {
    pub extracted: ExtractionSummary,
    pub suggested_structure: Vec<Section>,
    pub available_sections: Vec<SectionOption>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub sections_found: usize,
    pub requirements_found: usize,
    pub scope_summary: String,
}

/// Flat listing entry callers use to build a selection filter.
#[derive(Debug, Serialize, Deserialize)]
pub struct SectionOption {
    pub key: String,
    pub title: String,
    pub level: u8,
    pub content_requirements: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub model_available: bool,
    pub active_jobs: usize,
    pub tracked_jobs: usize,
    pub version: String,
}

// =============================================================================
// Orchestrator
// =============================================================================

pub struct Orchestrator {
    config: Config,
    store: JobStore,
    processor: DocumentProcessor,
    provider: Option<SharedProvider>,
    shaper: Arc<dyn TextShaper>,
}

impl Orchestrator {
    /// Build an orchestrator from configuration: resolves the provider (or
    /// its absence), prepares storage directories, installs the default
    /// logical-order text shaper.
    pub fn new(config: Config) -> Result<Self> {
        std::fs::create_dir_all(&config.storage.output_dir)?;
        std::fs::create_dir_all(&config.storage.upload_dir)?;

        let provider = create_provider(&config.llm)?;
        if let Some(provider) = &provider {
            info!("Generative model configured: {} ({})", provider.name(), provider.model());
        }

        Ok(Self {
            config,
            store: JobStore::new(),
            processor: DocumentProcessor::new(),
            provider,
            shaper: Arc::new(LogicalOrderShaper),
        })
    }

    /// Swap in a host-supplied text shaper (for paint-based targets).
    pub fn with_shaper(mut self, shaper: Arc<dyn TextShaper>) -> Self {
        self.shaper = shaper;
        self
    }

    /// Register a host-supplied source extractor (PDF, image OCR, ...).
    pub fn register_extractor(&mut self, extractor: Box<dyn crate::extract::TextExtractor>) {
        self.processor.register(extractor);
    }

    fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.config.llm.timeout_secs)
    }

    // =========================================================================
    // Caller Surface
    // =========================================================================

    /// Accept a job and return its identifier immediately; the phases run as
    /// one background task. Rejects synchronously above the admission
    /// ceiling, before any job record is created.
    pub fn submit(self: &Arc<Self>, submission: Submission) -> Result<String> {
        if submission.source_files.is_empty() {
            return Err(SmithError::Generation(
                "At least one source file is required".to_string(),
            ));
        }

        let job_id = uuid::Uuid::new_v4().to_string();
        self.store.try_admit(&job_id, self.config.jobs.max_active)?;
        self.store.put_record(
            &job_id,
            JobRecord::processing(
                "Analyzing RFP and generating proposal structure...",
                progress::SUBMITTED,
            ),
        );

        let this = Arc::clone(self);
        let id = job_id.clone();
        tokio::spawn(async move {
            this.run_job(id, submission).await;
        });

        Ok(job_id)
    }

    /// Poll a job's status.
    pub fn status(&self, job_id: &str) -> Result<JobStatus> {
        let record = self
            .store
            .get_record(job_id)
            .ok_or_else(|| SmithError::JobNotFound(job_id.to_string()))?;

        let structure_summary = if record.status != JobState::Error {
            record
                .structure_summary
                .clone()
                .or_else(|| self.structure_summary(job_id))
        } else {
            None
        };

        Ok(JobStatus {
            job_id: job_id.to_string(),
            status: record.status,
            message: record.message,
            progress: record.progress,
            files: record.files,
            structure_summary,
        })
    }

    /// Fetch the synthesized structure for a job, tree form.
    pub fn structure(&self, job_id: &str) -> Result<Vec<Section>> {
        self.store
            .get_structure(job_id)
            .ok_or_else(|| SmithError::JobNotFound(job_id.to_string()))
    }

    /// Resolve a produced artifact name to its path under the output
    /// directory. Rejects names that escape the directory.
    pub fn artifact_path(&self, filename: &str) -> Result<PathBuf> {
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            return Err(SmithError::ArtifactNotFound(filename.to_string()));
        }
        let path = self.config.storage.output_dir.join(filename);
        if !path.exists() {
            return Err(SmithError::ArtifactNotFound(filename.to_string()));
        }
        Ok(path)
    }

    /// Explicit early cleanup: cancels the pending deferred cleanup and
    /// removes the job's record, structure and artifacts now.
    pub fn cleanup(&self, job_id: &str) -> Result<()> {
        if self.store.get_record(job_id).is_none() && self.store.get_structure(job_id).is_none() {
            return Err(SmithError::JobNotFound(job_id.to_string()));
        }
        self.store.cancel_cleanup(job_id);
        self.purge(job_id);
        Ok(())
    }

    pub fn health(&self) -> Health {
        Health {
            model_available: self.provider.is_some(),
            active_jobs: self.store.active_count(),
            tracked_jobs: self.store.record_count(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Stateless analyze-only entry point: extraction + structure synthesis
    /// without content generation or rendering.
    pub async fn analyze(
        &self,
        files: &[PathBuf],
        company_name: &str,
        sector: &str,
    ) -> Result<AnalyzeReport> {
        let (combined_text, outline) = self.extract_sources(files)?;

        let request = ProposalRequest {
            company_name: company_name.to_string(),
            sector: sector.to_string(),
            ..Default::default()
        };

        let synthesizer = StructureSynthesizer::new(self.provider.clone(), self.llm_timeout());
        let structure = synthesizer.synthesize(&combined_text, &outline, &request).await;

        let scope_summary = if outline.scope.chars().count() > 500 {
            format!(
                "{}...",
                outline.scope.chars().take(500).collect::<String>()
            )
        } else {
            outline.scope.clone()
        };

        let available_sections = flatten(&structure)
            .into_iter()
            .map(|s| SectionOption {
                key: s.key.clone(),
                title: s.title.clone(),
                level: s.level,
                content_requirements: s.content_requirements.clone(),
            })
            .collect();

        Ok(AnalyzeReport {
            extracted: ExtractionSummary {
                sections_found: outline.headings.len(),
                requirements_found: outline.requirements.len(),
                scope_summary,
            },
            suggested_structure: structure,
            available_sections,
        })
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    async fn run_job(self: Arc<Self>, job_id: String, submission: Submission) {
        match self.run_pipeline(&job_id, submission).await {
            Ok((files, warnings)) => {
                let summary = self.structure_summary(&job_id);
                let total_sections = summary.as_ref().map(|s| s.total_sections).unwrap_or(0);

                let mut message = format!(
                    "Proposal generated successfully with {} sections! Generated {} file{}.",
                    total_sections,
                    files.len(),
                    if files.len() == 1 { "" } else { "s" }
                );
                if !warnings.is_empty() {
                    message.push_str(&format!(" Warnings: {}", warnings.join("; ")));
                }

                self.store.update_record(&job_id, |record| {
                    record.status = JobState::Completed;
                    record.message = message;
                    record.progress = progress::DONE;
                    record.files = files;
                    record.structure_summary = summary;
                });
                info!("Job {} completed", job_id);
            }
            Err(e) => {
                error!("Job {} failed: {}", job_id, e);
                self.store.update_record(&job_id, |record| {
                    record.status = JobState::Error;
                    record.message = format!("Error generating proposal: {}", e);
                    record.progress = 0;
                    record.files = Vec::new();
                });
            }
        }

        self.store.deactivate(&job_id);
        self.schedule_cleanup(&job_id);
    }

    async fn run_pipeline(
        &self,
        job_id: &str,
        submission: Submission,
    ) -> Result<(Vec<String>, Vec<String>)> {
        self.progress(job_id, progress::EXTRACTING, "Processing uploaded RFP files...");
        let (combined_text, outline) = self.extract_sources(&submission.source_files)?;

        let mut request = submission.request();
        self.distill_supporting_documents(&submission, &mut request).await;

        self.progress(
            job_id,
            progress::STRUCTURING,
            "Analyzing RFP structure and generating proposal outline...",
        );
        let synthesizer = StructureSynthesizer::new(self.provider.clone(), self.llm_timeout());
        let structure = synthesizer.synthesize(&combined_text, &outline, &request).await;
        self.store.put_structure(job_id, structure.clone());

        self.progress(job_id, progress::GENERATING, "Generating proposal content...");
        let generator = ContentGenerator::new(self.provider.clone(), self.llm_timeout());
        let content = generator.generate(&combined_text, &structure, &request).await;

        let ctx = RenderContext {
            content: &content,
            structure: &structure,
            company_name: &request.company_name,
            job_id,
            request: &request,
            output_dir: &self.config.storage.output_dir,
            shaper: self.shaper.as_ref(),
        };

        let mut files = Vec::new();
        let mut warnings = Vec::new();

        if request.formats.includes(OutputFormat::Docx) {
            match render::docx::render(&ctx).await {
                Ok(file) => files.push(file),
                Err(e) => {
                    warn!("Word document generation failed: {}", e);
                    warnings.push(format!("Word document generation failed: {}", e));
                }
            }
        }

        if request.formats.includes(OutputFormat::Sheet) {
            match render::sheet::render(&ctx) {
                Ok(file) => files.push(file),
                Err(e) => {
                    warn!("Spreadsheet generation failed: {}", e);
                    warnings.push(format!("Spreadsheet generation failed: {}", e));
                }
            }
        }

        // The visualization artifact accompanies every job regardless of the
        // format selection; its failure is only a warning.
        self.progress(
            job_id,
            progress::VISUALIZING,
            "Generating interactive visualizations...",
        );
        match render::html::render(&ctx) {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!("Visualization generation failed: {}", e);
                warnings.push(format!("Visualization generation failed: {}", e));
            }
        }

        if files.is_empty() {
            return Err(SmithError::Generation(format!(
                "No files were successfully generated. {}",
                warnings.join("; ")
            )));
        }

        self.progress(job_id, progress::FINALIZING, "Finalizing documents...");
        Ok((files, warnings))
    }

    /// Extract and merge all source files. A single unreadable file is
    /// logged and skipped; a batch with no readable file at all fails.
    fn extract_sources(&self, files: &[PathBuf]) -> Result<(String, DocumentOutline)> {
        let mut combined_text = String::new();
        let mut outline = DocumentOutline::default();

        for path in files {
            match self.processor.process_file(path) {
                Ok((text, file_outline)) => {
                    combined_text.push_str(&text);
                    combined_text.push_str("\n\n");
                    outline.merge(file_outline);
                }
                Err(e) => {
                    warn!("Skipping source file {}: {}", path.display(), e);
                }
            }
        }

        if combined_text.trim().is_empty() {
            return Err(SmithError::Generation(
                "No readable source files were provided".to_string(),
            ));
        }
        Ok((combined_text, outline))
    }

    /// Distill supporting documents into advisory insights on the request.
    /// Failures here never fail the job; the insights simply stay absent.
    async fn distill_supporting_documents(
        &self,
        submission: &Submission,
        request: &mut ProposalRequest,
    ) {
        let distiller = InsightDistiller::new(self.provider.clone(), self.llm_timeout());

        if let Some(path) = &submission.special_document {
            match self.processor.process_file(path) {
                Ok((text, outline)) => {
                    request.special_insights =
                        Some(distiller.distill_special(&text, &outline, request).await);
                }
                Err(e) => warn!("Skipping special document {}: {}", path.display(), e),
            }
        }

        if submission.additional_documents.is_empty() {
            return;
        }
        let mut texts = Vec::new();
        for path in &submission.additional_documents {
            match self.processor.process_file(path) {
                Ok((text, _)) => texts.push(text),
                Err(e) => warn!("Skipping additional document {}: {}", path.display(), e),
            }
        }
        if !texts.is_empty() {
            request.additional_insights =
                Some(distiller.distill_additional(&texts.join("\n\n"), request).await);
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    fn progress(&self, job_id: &str, progress: u8, message: &str) {
        self.store.update_record(job_id, |record| {
            record.progress = progress;
            record.message = message.to_string();
        });
    }

    fn structure_summary(&self, job_id: &str) -> Option<StructureSummary> {
        let structure = self.store.get_structure(job_id)?;
        Some(StructureSummary {
            total_sections: count(&structure),
            main_sections: structure.len(),
            section_titles: structure.iter().take(5).map(|s| s.title.clone()).collect(),
            dynamic_generation: flatten(&structure).iter().any(|s| s.is_dynamic),
        })
    }

    /// Schedule the deferred cleanup for a terminal job as a cancellable
    /// task; an explicit cleanup aborts it instead of racing it.
    fn schedule_cleanup(self: &Arc<Self>, job_id: &str) {
        let delay = Duration::from_secs(self.config.jobs.cleanup_delay_secs);
        let this = Arc::clone(self);
        let id = job_id.to_string();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.purge(&id);
            this.store.forget_cleanup(&id);
        });
        self.store.register_cleanup(job_id, handle);
    }

    /// Remove every trace of a job: artifacts on disk, record, structure and
    /// active-set membership.
    fn purge(&self, job_id: &str) {
        if let Some(record) = self.store.remove_record(job_id) {
            for filename in &record.files {
                let path = self.config.storage.output_dir.join(filename);
                if path.exists()
                    && let Err(e) = std::fs::remove_file(&path)
                {
                    warn!("Could not remove artifact {}: {}", path.display(), e);
                }
            }
        }
        self.store.remove_structure(job_id);
        self.store.deactivate(job_id);
        info!("Cleaned up job data for {}", job_id);
    }
}
