use anyhow::Result;
use clap::{Parser, Subcommand};
use organizer_core::config::{self, OrganizerConfig};
use organizer_core::organizer::SmartOrganizer;
use std::path::PathBuf;

mod watch;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = resolve_config(&cli)?;
    let mut organizer = SmartOrganizer::new(cfg)?;

    match cli.command {
        Commands::Organize { json } => {
            let report = organizer.organize()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report.actions)?);
            } else {
                println!("Moved {} file(s).", report.actions.len());
            }
            for failure in &report.failures {
                eprintln!("failed: {} ({})", failure.path.display(), failure.error);
            }
        }
        Commands::Duplicates { json } => {
            let groups = organizer.detect_duplicates()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else if groups.is_empty() {
                println!("No duplicates found.");
            } else {
                for (digest, files) in &groups {
                    println!("{}:", &digest[..12]);
                    for file in files {
                        println!("  {}", file.display());
                    }
                }
            }
        }
        Commands::Search { query, topk, json } => {
            let results = organizer.semantic_search(&query, topk);
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if results.is_empty() {
                println!("No matching files found.");
            } else {
                for result in results {
                    println!("{:.3}  {}", result.score, result.path.display());
                }
            }
        }
        Commands::Undo => {
            println!("Restored {} file(s).", organizer.undo_last()?);
        }
        Commands::Watch => watch::enabled::watch_source(organizer)?,
    }

    Ok(())
}

/// File config first, CLI flags override. With only `--source` given, no
/// config file is needed at all.
fn resolve_config(cli: &Cli) -> Result<OrganizerConfig> {
    let mut cfg = match (&cli.config, &cli.source) {
        (Some(path), _) => config::load(Some(path.as_str()))?,
        (None, Some(source)) => OrganizerConfig::new(source),
        (None, None) => config::load(None)?,
    };
    if let Some(source) = &cli.source {
        cfg.source_dir = source.clone();
    }
    if let Some(target) = &cli.target {
        cfg.target_root = target.clone();
    }
    Ok(cfg)
}

#[derive(Parser)]
#[command(name = "smart-organizer")]
#[command(about = "Organize files into category folders, with duplicate detection, undo and filename search", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    /// Folder to organize (overrides config)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Target root for category folders (overrides config)
    #[arg(short, long)]
    target: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a one-time organization pass
    Organize {
        /// Output the recorded actions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print duplicate file groups in the source folder
    Duplicates {
        /// Output groups as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search organized filenames (lexical bag-of-words ranking)
    Search {
        /// Query text
        query: String,
        /// Number of results
        #[arg(short, long, default_value_t = 5)]
        topk: usize,
        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Undo the last organization pass
    Undo,
    /// Watch the source folder and organize on file creation (requires the
    /// `watch` feature)
    Watch,
}
