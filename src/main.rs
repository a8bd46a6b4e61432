//! Strata diagnostic CLI.
//!
//! Connects a store from `STRATA_*` environment variables and runs one command against it.

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use serde_json::Value;

use strata::{StoreConfig, TieredStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Command-line arguments for the strata binary.
#[derive(Debug, Parser)]
#[command(name = "strata", version, about = "Inspect and edit a tiered strata store")]
struct Cli {
    /// Connect, report tier health and exit non-zero if a configured tier is unreachable.
    #[arg(long)]
    health_check: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Tier availability and counters (the default).
    Stats,
    /// Print the value for a key.
    Get { key: String },
    /// Store a JSON value, or a plain string when it does not parse as JSON.
    Set {
        key: String,
        value: String,
        /// Lifetime in seconds; the configured Warm TTL when omitted.
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        ttl: Option<u64>,
    },
    /// Delete a key from every tier.
    #[command(name = "del")]
    Del { key: String },
    /// Exit 0 if the key is present, 1 otherwise.
    Exists { key: String },
    /// Evict expired Hot entries.
    Sweep,
    /// Delete expired rows from the persistent store.
    Purge,
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = StoreConfig::from_env()?;
    config.validate()?;

    let store: TieredStore<Value> = TieredStore::new(config)?;

    if cli.health_check {
        return Ok(run_health_check(&store).await);
    }

    let command = cli.command.unwrap_or(Command::Stats);
    store.connect().await.context("failed to connect store")?;
    let code = run(&store, command).await;
    store.disconnect().await;
    code
}

async fn run_health_check(store: &TieredStore<Value>) -> ExitCode {
    let healthy = match store.connect().await {
        Ok(()) => {
            let stats = store.stats();
            let warm_ok = store.config().redis_url.is_none() || stats.warm_available;
            tracing::info!(
                warm = stats.warm_available,
                cold = stats.cold_available,
                "Health check"
            );
            warm_ok
        }
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            false
        }
    };
    store.disconnect().await;

    if healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(store: &TieredStore<Value>, command: Command) -> anyhow::Result<ExitCode> {
    match command {
        Command::Stats => {
            let stats = store.stats();
            println!("connected:      {}", stats.connected);
            println!("warm available: {}", stats.warm_available);
            println!("cold available: {}", stats.cold_available);
            println!("hot keys:       {}", stats.hot_keys);
        }
        Command::Get { key } => match store.lookup(&key).await.into_value() {
            Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            None => {
                eprintln!("(not found)");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Set { key, value, ttl } => {
            store.set(&key, parse_value(&value), ttl).await?;
            println!("OK");
        }
        Command::Del { key } => {
            store.delete(&key).await?;
            println!("OK");
        }
        Command::Exists { key } => {
            let present = store.exists(&key).await;
            println!("{present}");
            if !present {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Sweep => println!("evicted: {}", store.cleanup_expired_memory()),
        Command::Purge => println!("purged: {}", store.purge_expired_persistent().await?),
    }
    Ok(ExitCode::SUCCESS)
}
