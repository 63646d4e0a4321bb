//! Pokedex CLI
//!
//! Command-line front end for the Pokedex cache.
//!
//! # Commands
//!
//! - `list` - Filtered, sorted view of the cache
//! - `show` - Details of one entry
//! - `sync` / `refresh` / `reset` - Remote synchronization
//! - `favorite` / `unfavorite` / `toggle` - Favorite flags
//! - `battle` - Paced two-party battle

mod commands;

use clap::{Parser, Subcommand};
use commands::battle::BattleOptions;
use commands::favorite::FavoriteAction;
use commands::list::ListOptions;
use pokedex_sync::{RetryConfig, SyncConfig, DEFAULT_API_BASE_URL};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Offline Pokedex cache and battle simulator.
#[derive(Parser)]
#[command(name = "pokedex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the cache file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Base URL of the REST API
    #[arg(global = true, long, default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Number of entries to fetch
    #[arg(global = true, long, default_value = "50")]
    limit: u32,

    /// Per-request timeout in seconds
    #[arg(global = true, long, default_value = "30")]
    timeout_secs: u64,

    /// Attempts per request, including the first
    #[arg(global = true, long, default_value = "1")]
    attempts: u32,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cached pokemon
    List {
        /// Only show favorites
        #[arg(long)]
        favorites: bool,

        /// Case-insensitive name filter
        #[arg(short, long, default_value = "")]
        search: String,

        /// Type filter (All, Water, Fire, Grass, Electric, ...)
        #[arg(short = 't', long = "type", default_value = "All")]
        type_filter: String,

        /// Sort order (name, strength)
        #[arg(long, default_value = "name")]
        sort: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show one cached pokemon
    Show {
        /// Pokemon id
        id: i64,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Fetch from the remote if the cache is empty
    Sync,

    /// Re-fetch from the remote, keeping favorites
    Refresh,

    /// Delete everything, favorites included, and re-fetch
    Reset,

    /// Mark a pokemon as favorite
    Favorite {
        /// Pokemon id
        id: i64,
    },

    /// Remove a pokemon from favorites
    Unfavorite {
        /// Pokemon id
        id: i64,
    },

    /// Flip a pokemon's favorite flag
    Toggle {
        /// Pokemon id
        id: i64,
    },

    /// Battle a random (or chosen) cached opponent
    Battle {
        /// The player's pokemon id
        id: i64,

        /// Opponent id; random when omitted
        #[arg(short, long)]
        opponent: Option<i64>,

        /// Skip presentation delays
        #[arg(long)]
        instant: bool,

        /// Seed for the opponent draw
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show version information
    Version,
}

impl Cli {
    fn config(&self) -> SyncConfig {
        let retry = if self.attempts > 1 {
            RetryConfig::new(self.attempts)
        } else {
            RetryConfig::no_retry()
        };
        SyncConfig::new(self.api_url.as_str())
            .with_fetch_limit(self.limit)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_retry(retry)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("Pokedex CLI v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let path = cli.path.clone().unwrap_or_else(commands::default_path);
    let dex = commands::open(&path, cli.config())?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::List {
            favorites,
            search,
            type_filter,
            sort,
            format,
        } => {
            let options = ListOptions {
                favorites,
                search,
                type_filter,
                sort,
                format,
            };
            commands::list::run(&dex, &options, &mut out)?;
        }
        Commands::Show { id, format } => {
            commands::show::run(&dex, id, &format, &mut out)?;
        }
        Commands::Sync => commands::sync::populate(&dex, &mut out)?,
        Commands::Refresh => commands::sync::refresh(&dex, &mut out)?,
        Commands::Reset => commands::sync::reset(&dex, &mut out)?,
        Commands::Favorite { id } => {
            commands::favorite::run(&dex, id, FavoriteAction::Add, &mut out)?;
        }
        Commands::Unfavorite { id } => {
            commands::favorite::run(&dex, id, FavoriteAction::Remove, &mut out)?;
        }
        Commands::Toggle { id } => {
            commands::favorite::run(&dex, id, FavoriteAction::Toggle, &mut out)?;
        }
        Commands::Battle {
            id,
            opponent,
            instant,
            seed,
        } => {
            let options = BattleOptions {
                player: id,
                opponent,
                instant,
                seed,
            };
            commands::battle::run(&dex, &options, &mut out)?;
        }
        Commands::Version => {}
    }

    Ok(())
}
