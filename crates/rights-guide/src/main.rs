//! # Rights Guide CLI (`guide`)
//!
//! ## Usage
//!
//! ```bash
//! guide --config ./config/guide.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `guide generate` | Normalize the source file and write JSON artifacts |
//! | `guide search "<text>"` | Search topics by free text |
//! | `guide scenario [<id>]` | List scenarios, or show the topics one points at |
//! | `guide get <slug>` | Show one topic |
//! | `guide stats` | Summarize the structured artifact |
//! | `guide serve` | Start the JSON HTTP server |

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use rights_guide::{config, generate, get, scenario, search, server, stats};

/// Rights Guide: normalize a rights-topic spreadsheet and search it.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/guide.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "guide",
    about = "Rights Guide: normalize a rights-topic spreadsheet into JSON and search it",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/guide.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the source file, normalize it, and write the JSON artifacts.
    ///
    /// Every artifact is written atomically. A missing required column or
    /// unreadable file aborts before anything is written.
    Generate {
        /// Print counts without writing any file.
        #[arg(long)]
        dry_run: bool,
    },

    /// Search topics by free text.
    ///
    /// Matches case-insensitively against title, category, rights,
    /// identification, and self-help text. An empty query lists everything.
    Search {
        /// Text to search for.
        text: String,

        /// Restrict results to one category (exact name).
        #[arg(long)]
        category: Option<String>,

        /// Maximum number of results to print.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List configured scenarios, or show the topics one resolves to.
    Scenario {
        /// Scenario id.
        id: Option<String>,
    },

    /// Show one topic by slug.
    Get {
        /// Topic slug.
        slug: String,
    },

    /// Show counts and a per-category breakdown of the structured artifact.
    Stats,

    /// Start the JSON HTTP server on `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG > --quiet > --verbose > info
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cfg = config::load_config(&cli.config)?;
    debug!(config = %cli.config.display(), "configuration loaded");

    match cli.command {
        Commands::Generate { dry_run } => {
            generate::run_generate(&cfg, dry_run)?;
        }
        Commands::Search {
            text,
            category,
            limit,
        } => {
            search::run_search(&cfg, &text, category.as_deref(), limit).await?;
        }
        Commands::Scenario { id } => {
            scenario::run_scenario(&cfg, id.as_deref())?;
        }
        Commands::Get { slug } => {
            get::run_get(&cfg, &slug).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
