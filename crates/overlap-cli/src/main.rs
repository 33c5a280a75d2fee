//! `overlap` CLI — find common meeting windows across When2Meet pages.
//!
//! ## Usage
//!
//! ```sh
//! # Anchor team against each opponent (30-minute meetings, 15-minute grid)
//! overlap compare https://www.when2meet.com/?29202537-8Ue7q \
//!                 https://www.when2meet.com/?29263246-ePIGh
//!
//! # One window that suits every team at once
//! overlap compare --mode aggregate --duration 60 A_URL B_URL C_URL
//!
//! # Saved pages work too; JSON output in another timezone
//! overlap compare team_a.html team_b.html --timezone Europe/London --format json
//!
//! # Best times of a single page, with who is available
//! overlap best https://www.when2meet.com/?29202537-8Ue7q
//!
//! # Defaults from a file (flags still win)
//! overlap --config overlap.toml compare A_URL B_URL
//! ```

mod config;
mod report;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use when2meet::When2MeetLoader;

use crate::config::{FileConfig, Format, ModeArg, Overrides, Settings};

#[derive(Parser)]
#[command(
    name = "overlap",
    version,
    about = "Find common meeting windows across When2Meet pages"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with default settings (mode, duration_minutes, interval_minutes, timezone, format)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more to stderr (-v info, -vv debug; RUST_LOG overrides)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the best times of two or more pages (the first one is the anchor)
    Compare {
        /// When2Meet links or saved page files
        #[arg(required = true)]
        sources: Vec<String>,
        /// Pairwise (anchor vs. each other page) or aggregate (all pages at once)
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Meeting length in minutes [default: 30]
        #[arg(short, long)]
        duration: Option<i64>,
        /// Slot length of the pages in minutes [default: 15]
        #[arg(long)]
        interval: Option<i64>,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Show the best times of a single page
    Best {
        /// When2Meet link or saved page file
        source: String,
        #[command(flatten)]
        display: DisplayArgs,
    },
}

#[derive(Args)]
struct DisplayArgs {
    /// IANA timezone for printed times [default: America/New_York]
    #[arg(long)]
    timezone: Option<String>,
    /// Output format [default: text]
    #[arg(long, value_enum)]
    format: Option<Format>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    match cli.command {
        Commands::Compare {
            sources,
            mode,
            duration,
            interval,
            display,
        } => {
            let settings = Settings::resolve(
                file,
                Overrides {
                    mode,
                    duration_minutes: duration,
                    interval_minutes: interval,
                    timezone: display.timezone,
                    format: display.format,
                },
            )?;
            debug!(?settings, "resolved settings");

            let loader = When2MeetLoader::new().context("Failed to initialise HTTP client")?;
            let comparison = overlap_engine::process(&sources, &loader, &settings.options)?;

            let output = match settings.format {
                Format::Text => report::comparison_text(&comparison, &settings),
                Format::Json => report::comparison_json(&comparison, &settings)
                    .context("Failed to serialise report")?,
            };
            println!("{output}");
        }
        Commands::Best { source, display } => {
            let settings = Settings::resolve(
                file,
                Overrides {
                    timezone: display.timezone,
                    format: display.format,
                    ..Overrides::default()
                },
            )?;

            let loader = When2MeetLoader::new().context("Failed to initialise HTTP client")?;
            let page = loader
                .load_page(&source)
                .with_context(|| format!("Error processing {source}"))?;

            let output = match settings.format {
                Format::Text => report::best_text(&source, &page, &settings),
                Format::Json => report::best_json(&source, &page, &settings)
                    .context("Failed to serialise report")?,
            };
            println!("{output}");
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
