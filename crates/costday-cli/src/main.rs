//! costday CLI
//!
//! Command-line interface for costday - record what you bought and see what
//! it has cost you per day since.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use costday_core::{AssetStore, Config, SortDirection, SortKey, ViewOptions};

mod commands;
mod output;
mod prompt;

use commands::asset::EditArgs;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "costday")]
#[command(about = "costday - what your things cost you per day")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new asset
    #[command(alias = "create")]
    Add {
        /// What was bought
        name: String,
        /// How much it cost
        price: String,
        /// Purchase date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List assets with per-day cost and totals
    #[command(alias = "ls")]
    List {
        /// Only show assets whose name or price contains this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Sort by: name, price, average-daily-price
        #[arg(long, default_value = "name")]
        sort: SortKey,
        /// Sort order: asc, desc
        #[arg(long, default_value = "asc")]
        order: SortDirection,
    },
    /// Show asset details
    Show {
        /// Asset ID (full UUID or prefix)
        id: String,
    },
    /// Edit an asset (prompts when no field is given)
    Edit {
        /// Asset ID (full UUID or prefix)
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New purchase price
        #[arg(long)]
        price: Option<String>,
        /// New purchase date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete one or more assets
    #[command(alias = "rm")]
    Delete {
        /// Asset IDs (full UUID or prefix)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show total value and total cost per day
    Totals {
        /// Only count assets whose name or price contains this text
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, backend, currency_symbol, log_level)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config, cli.verbose);

    let output = Output::new(
        OutputFormat::from_flags(cli.json, cli.quiet),
        config.currency_symbol.clone(),
    );

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    debug!(backend = %config.backend, data_dir = %config.data_dir.display(), "opening store");
    let mut store = AssetStore::open_with_config(&config).context("Failed to open asset store")?;

    match cli.command {
        Commands::Add { name, price, date } => {
            commands::asset::add(&mut store, name, price, date, &output)
        }
        Commands::List {
            search,
            sort,
            order,
        } => commands::asset::list(&store, ViewOptions::new(search, sort, order), &output),
        Commands::Show { id } => commands::asset::show(&store, id, &output),
        Commands::Edit {
            id,
            name,
            price,
            date,
        } => commands::asset::edit(&mut store, id, EditArgs { name, price, date }, &output),
        Commands::Delete { ids, yes } => commands::asset::delete(&mut store, ids, yes, &output),
        Commands::Totals { search } => commands::asset::totals(&store, search, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Send log output to stderr
///
/// RUST_LOG wins when set and no -v flag was given; otherwise the level comes
/// from -v or the configured `log_level`.
fn init_logging(config: &Config, verbose: u8) {
    let level = match verbose {
        0 => config.log_level.as_str(),
        1 => "info",
        _ => "debug",
    };
    let fallback = || EnvFilter::new(format!("costday_core={},costday={}", level, level));

    let env_filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    };

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_writer(std::io::stderr)
        .try_init();
}
