//! CLI for anstoss.
//!
//! Picks the next suggestion, records accept/reject feedback and shows the
//! weight table and audit logs. Every command prints JSON on stdout; logs go to
//! stderr.

mod engine;

use anstoss_bandits::DEFAULT_EPSILON;
use anstoss_core::{FileStore, StoreConfig};
use anstoss_feedback::DEFAULT_ALPHA;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::{Engine, ACCEPT, REJECT};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the weight table and logs
    #[arg(long, env = "ANSTOSS_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Exploration probability for `suggest`
    #[arg(long, env = "ANSTOSS_EPSILON", default_value_t = DEFAULT_EPSILON, global = true)]
    epsilon: f64,

    /// Learning rate for `accept` and `reject`
    #[arg(long, env = "ANSTOSS_ALPHA", default_value_t = DEFAULT_ALPHA, global = true)]
    alpha: f64,

    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick the next suggestion (epsilon-greedy)
    Suggest,
    /// Accept a suggestion and raise its weight
    Accept {
        /// Suggestion id, e.g. SUG-1
        id: String,

        /// What the user was doing
        #[arg(long, default_value = "")]
        context: String,
    },
    /// Reject a suggestion and lower its weight
    Reject {
        /// Suggestion id, e.g. SUG-1
        id: String,

        /// What the user was doing
        #[arg(long, default_value = "")]
        context: String,
    },
    /// Print the current weight table
    Weights,
    /// Print the feedback log
    Feedback {
        /// Only the last N entries
        #[arg(long)]
        tail: Option<usize>,
    },
    /// Print the weight change log
    Improvements {
        /// Only the last N entries
        #[arg(long)]
        tail: Option<usize>,
    },
    /// Print acceptance statistics
    Stats,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("Failed to write output")?;
    writeln!(stdout)?;
    Ok(())
}

fn tail<T>(mut items: Vec<T>, n: Option<usize>) -> Vec<T> {
    if let Some(n) = n {
        let skip = items.len().saturating_sub(n);
        items.drain(..skip);
    }
    items
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!(
        data_dir = %cli.data_dir.display(),
        epsilon = cli.epsilon,
        alpha = cli.alpha,
        "opening store"
    );
    let store = FileStore::new(StoreConfig::new(&cli.data_dir));
    let engine = Engine::new(store, cli.epsilon, cli.alpha);
    let data_dir = cli.data_dir.display();

    match cli.command {
        Commands::Suggest => {
            let choice = engine
                .choose_suggestion()
                .with_context(|| format!("Failed to choose a suggestion from {data_dir}"))?;
            print_json(&choice)?;
        }
        Commands::Accept { id, context } => {
            let record = engine
                .respond_to_id(&id, &context, ACCEPT)
                .with_context(|| format!("Failed to record acceptance of {id}"))?;
            print_json(&record)?;
        }
        Commands::Reject { id, context } => {
            let record = engine
                .respond_to_id(&id, &context, REJECT)
                .with_context(|| format!("Failed to record rejection of {id}"))?;
            print_json(&record)?;
        }
        Commands::Weights => {
            let table = engine
                .get_weight_table()
                .with_context(|| format!("Failed to load weights from {data_dir}"))?;
            print_json(&table)?;
        }
        Commands::Feedback { tail: n } => {
            let log = engine
                .get_feedback_log()
                .with_context(|| format!("Failed to load feedback log from {data_dir}"))?;
            print_json(&tail(log, n))?;
        }
        Commands::Improvements { tail: n } => {
            let log = engine
                .get_improvement_log()
                .with_context(|| format!("Failed to load improvement log from {data_dir}"))?;
            print_json(&tail(log, n))?;
        }
        Commands::Stats => {
            let stats = engine
                .stats()
                .with_context(|| format!("Failed to compute stats for {data_dir}"))?;
            print_json(&stats)?;
        }
    }

    Ok(())
}
