use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rfpsmith::types::{DocumentKind, FormatSelection, Language};

fn parse_kind(s: &str) -> Result<DocumentKind, String> {
    s.parse()
}

fn parse_language(s: &str) -> Result<Language, String> {
    s.parse()
}

fn parse_formats(s: &str) -> Result<FormatSelection, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "rfpsmith")]
#[command(
    version,
    about = "AI-driven RFP response generator with dynamic proposal structure"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize rfpsmith in the current directory
    Init {
        #[arg(long, short, help = "Overwrite existing configuration")]
        force: bool,
    },

    /// Generate a proposal from RFP source files
    Generate {
        #[arg(required = true, help = "RFP source files (txt, md, docx)")]
        files: Vec<PathBuf>,

        #[arg(long, short, help = "Company/display name for the proposal")]
        company: String,

        #[arg(long, default_value = "general", help = "Client sector")]
        sector: String,

        #[arg(long = "type", value_parser = parse_kind, default_value = "technical",
              help = "Proposal type: technical, financial")]
        kind: DocumentKind,

        #[arg(long, value_parser = parse_language, default_value = "en",
              help = "Output language: en, ar")]
        language: Language,

        #[arg(long, value_parser = parse_formats, default_value = "all",
              help = "Output formats: all, or comma-separated docx,sheet,html")]
        formats: FormatSelection,

        #[arg(long, help = "Comma-separated section keys to include")]
        sections: Option<String>,

        #[arg(long, help = "Top-left logo (path or URL)")]
        logo_top_left: Option<String>,

        #[arg(long, help = "Bottom-right logo (path or URL)")]
        logo_bottom_right: Option<String>,

        #[arg(long, help = "Special supporting document (standards/compliance)")]
        special_document: Option<PathBuf>,

        #[arg(long = "additional-document", help = "Additional supporting document (repeatable)")]
        additional_documents: Vec<PathBuf>,

        #[arg(long, short, help = "Output directory override")]
        output: Option<PathBuf>,
    },

    /// Analyze RFP files and preview the proposal structure
    Analyze {
        #[arg(required = true, help = "RFP source files")]
        files: Vec<PathBuf>,

        #[arg(long, short, default_value = "Company", help = "Company/display name")]
        company: String,

        #[arg(long, default_value = "general", help = "Client sector")]
        sector: String,
    },

    /// Report model availability and job-store occupancy
    Health,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(long, help = "Print as JSON instead of TOML")]
        json: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mrfpsmith encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Init { force } => {
            rfpsmith::cli::commands::config::init(force)?;
        }
        Commands::Generate {
            files,
            company,
            sector,
            kind,
            language,
            formats,
            sections,
            logo_top_left,
            logo_bottom_right,
            special_document,
            additional_documents,
            output,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(rfpsmith::cli::commands::generate::run(
                rfpsmith::cli::commands::generate::GenerateOptions {
                    files,
                    kind,
                    sector,
                    company,
                    sections,
                    formats,
                    language,
                    logo_top_left,
                    logo_bottom_right,
                    special_document,
                    additional_documents,
                    output,
                },
            ))?;
        }
        Commands::Analyze {
            files,
            company,
            sector,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(rfpsmith::cli::commands::analyze::run(files, company, sector))?;
        }
        Commands::Health => {
            let rt = Runtime::new()?;
            rt.block_on(rfpsmith::cli::commands::health::run())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                rfpsmith::cli::commands::config::show(json)?;
            }
        },
    }

    Ok(())
}
