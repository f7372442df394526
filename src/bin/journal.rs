//! Journal Compiler CLI
//!
//! Compiles journal files and reports every diagnostic per file.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use journal_compiler::{
    compile_files, discover, BatchSummary, Compiler, Document, Features, FileReport,
    JournalConfig,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "journal")]
#[command(about = "Compile journal markup files into validated documents")]
struct Cli {
    /// Config file loaded on top of the default locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile one file or every journal file in a directory
    Compile {
        /// Single file to compile
        #[arg(short, long, conflicts_with = "dir")]
        file: Option<PathBuf>,

        /// Directory to search (defaults to the configured journal dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Content root for local paths (overrides config)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Report every error of a file, not only the first
        #[arg(short, long)]
        verbose: bool,

        /// Print compiled documents as JSON
        #[arg(long)]
        json: bool,

        /// Compile files one after another
        #[arg(long)]
        sequential: bool,
    },

    /// Inspect or create configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show {
        /// Print as TOML (default)
        #[arg(long, conflicts_with = "json")]
        toml: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a config file with default values
    Init {
        /// Output path
        #[arg(short, long, default_value = "journal.toml")]
        output: PathBuf,
    },
}

/// JSON output entry for one compiled file
#[derive(Serialize)]
struct CompiledJournal<'a> {
    path: &'a Path,
    features: Features,
    document: &'a Document,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = JournalConfig::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Compile {
            file,
            dir,
            root,
            verbose,
            json,
            sequential,
        } => {
            if let Some(root) = root {
                config.content.root = root;
            }
            let verbose = verbose || config.compile.verbose;
            let parallel = config.compile.parallel && !sequential;

            let paths = match file {
                Some(file) => vec![file],
                None => {
                    let dir = dir.unwrap_or_else(|| config.journal_dir());
                    discover(&dir, &config.compile.extension)?
                }
            };

            let compiler = Compiler::new(&config.content.root);
            let reports = compile_files(&compiler, &paths, parallel);

            for report in &reports {
                print_report(report, verbose);
            }

            let summary = BatchSummary::from_reports(&reports);

            if json {
                let compiled: Vec<CompiledJournal> = reports
                    .iter()
                    .filter_map(|r| {
                        r.document.as_ref().map(|document| CompiledJournal {
                            path: &r.path,
                            features: Features::resolve(&config.features, document.meta()),
                            document,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&compiled)?);
            }

            if summary.is_success() {
                eprintln!("✅ Compiled {} journal file(s)", summary.compiled);
                Ok(())
            } else {
                eprintln!(
                    "❌ {} of {} journal file(s) failed",
                    summary.failed,
                    summary.total()
                );
                std::process::exit(1);
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show { toml: _, json } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    print!("{}", config.to_toml()?);
                }
                Ok(())
            }

            ConfigAction::Init { output } => {
                if output.exists() {
                    return Err(format!("{} already exists", output.display()).into());
                }
                JournalConfig::default().save(&output)?;
                println!("📝 Wrote default configuration to {}", output.display());
                Ok(())
            }
        },
    }
}

/// Print `    - <error>` lines to stderr; only the first unless verbose
fn print_report(report: &FileReport, verbose: bool) {
    if let Some(failure) = &report.failure {
        eprintln!("    - {}", failure);
    }

    let shown = if verbose { report.errors.len() } else { 1 };
    for error in report.errors.iter().take(shown) {
        eprintln!("    - {}", error);
    }

    if !report.is_success() {
        eprintln!("Parsing failed: {}", report.path.display());
    }
}
