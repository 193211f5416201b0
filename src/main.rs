//! Jetsquad CLI - serve the game API and explore the battle economy offline.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use jetsquad::config::Config;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::prelude::*;

/// Jetsquad - authoritative economy and battle engine
#[derive(Parser, Debug)]
#[command(name = "jetsquad")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the JSON API with a background energy sweep
    Serve {
        /// Listen address (overrides config)
        #[arg(short, long)]
        bind: Option<String>,

        /// Worker threads (overrides config)
        #[arg(short, long)]
        workers: Option<usize>,

        /// JSON profile store (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Sweep interval in milliseconds, 0 disables (overrides config)
        #[arg(long)]
        sweep_ms: Option<u64>,

        /// Seed for combat rolls (default: random)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run many battles in parallel and report win rates
    Simulate {
        /// Mission level
        #[arg(short, long, default_value = "1")]
        wave: u32,

        /// Number of battles to run (default: 1000)
        #[arg(short = 'n', long, default_value = "1000")]
        battles: u64,

        /// Starting seed (increments for each battle)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        #[command(flatten)]
        squad: cli::SquadArgs,

        /// Mothership upgrade levels as stat=count
        #[arg(short, long, value_delimiter = ',')]
        levels: Vec<String>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Run one seeded battle and print the turn log
    Battle {
        /// Mission level
        #[arg(short, long, default_value = "1")]
        wave: u32,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        #[command(flatten)]
        squad: cli::SquadArgs,

        /// Mothership upgrade levels as stat=count
        #[arg(short, long, value_delimiter = ',')]
        levels: Vec<String>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Print the mission table
    Missions {
        /// First level
        #[arg(long, default_value = "1")]
        from: u32,

        /// Last level
        #[arg(long, default_value = "10")]
        to: u32,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TableFormat,
    },

    /// Price an upgrade batch
    Quote {
        /// Requested increments as stat=count
        #[arg(required = true)]
        ops: Vec<String>,

        /// Current mothership levels as stat=count
        #[arg(short, long, value_delimiter = ',')]
        levels: Vec<String>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config, cli::CliError> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<(), cli::CliError> {
    let mut config = load_config(args.config.as_deref())?;

    match args.command {
        Commands::Serve {
            bind,
            workers,
            store,
            sweep_ms,
            seed,
        } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(workers) = workers {
                config.server.workers = workers;
            }
            if store.is_some() {
                config.server.store_path = store;
            }
            if let Some(ms) = sweep_ms {
                config.server.sweep_interval_ms = ms;
            }
            config.validate()?;
            cli::serve::execute(&config, seed)
        }

        Commands::Simulate {
            wave,
            battles,
            seed,
            threads,
            squad,
            levels,
            format,
            progress,
        } => cli::simulate::execute(
            &config, wave, battles, seed, threads, &squad, &levels, format, progress,
        ),

        Commands::Battle {
            wave,
            seed,
            squad,
            levels,
            format,
        } => cli::battle::execute(&config, wave, seed, &squad, &levels, format),

        Commands::Missions { from, to, format } => cli::missions::execute(from, to, format),

        Commands::Quote {
            ops,
            levels,
            format,
        } => cli::quote::execute(&levels, &ops, format),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
