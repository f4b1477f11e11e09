use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reposcope::cli::commands::symbols::SymbolsOptions;
use reposcope::config::OutputFormat;

/// Parse structure dump format from string
fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "reposcope")]
#[command(
    version,
    about = "Source-structure extraction and class-diagram reconciliation for Python codebases"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract per-file symbol tables and write the structure dump
    Symbols {
        #[arg(help = "Repository root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(short = 'f', long, value_parser = parse_output_format, help = "Output format: json, csv (default: from config)")]
        format: Option<OutputFormat>,
        #[arg(short = 'o', long, help = "Output file (default: <root>/<root-name>-structure.<ext>)")]
        output: Option<PathBuf>,
    },

    /// Rebuild class views with the diagram generator
    Classes {
        #[arg(help = "Repository root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(long, help = "Print graph-store triples instead of the class graph")]
        triples: bool,
    },

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
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            reposcope::cli::Output::new().error(&format!("Error: {:#}", e));
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
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Symbols {
            path,
            format,
            output,
        } => {
            reposcope::cli::commands::symbols::run(SymbolsOptions {
                path,
                format,
                output,
                quiet: cli.quiet,
            })?;
        }
        Commands::Classes { path, triples } => {
            let rt = Runtime::new()?;
            rt.block_on(reposcope::cli::commands::classes::run(path, triples))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                reposcope::cli::commands::config::show(global, &format)?;
            }
            ConfigAction::Path => {
                reposcope::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                if global {
                    reposcope::cli::commands::config::init_global(force)?;
                } else {
                    reposcope::cli::commands::config::init_project(force)?;
                }
            }
        },
    }

    Ok(())
}
