//! zipdist - ZIP to congressional district resolver CLI
//!
//! Loads the mapping table, builds the tiered cache in front of it, and
//! runs one command against the resolver. The same library serves embedded
//! use; this binary is the operational surface for spot checks, dataset
//! validation, and cache behavior inspection.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use zipdist::cache::DEFAULT_RUNTIME_CAPACITY;
use zipdist::{CacheConfig, MappingStore, Resolver, Result};

// =============================================================================
// CLI Arguments
// =============================================================================

/// zipdist - resolve US ZIP codes to congressional districts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dataset JSON path (defaults to the embedded table)
    #[arg(long, env = "ZIPDIST_DATASET")]
    dataset: Option<PathBuf>,

    /// Runtime cache capacity in entries
    #[arg(long, env = "ZIPDIST_RUNTIME_CAPACITY", default_value_t = DEFAULT_RUNTIME_CAPACITY)]
    runtime_capacity: usize,

    /// Warm the hot tier before running the command
    #[arg(long, env = "ZIPDIST_WARM_ON_START")]
    warm_on_start: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a ZIP to its candidate districts
    Lookup {
        /// ZIP code, 5-digit or ZIP+4
        zip: String,

        /// Print only the primary district
        #[arg(long)]
        primary: bool,
    },

    /// Resolve only the owning state
    State {
        /// ZIP code, 5-digit or ZIP+4
        zip: String,
    },

    /// Warm the caches and report what was filled
    Warm {
        /// ZIPs to warm; defaults to the hot tier membership
        zips: Vec<String>,
    },

    /// Print dataset coverage statistics
    Coverage,

    /// Replay the whole table through the resolver and print metrics
    Stats {
        /// Lookup passes over the table
        #[arg(long, default_value = "3")]
        passes: usize,
    },
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args);

    info!("Starting zipdist v{}", zipdist::VERSION);
    info!("  Runtime capacity: {}", args.runtime_capacity);
    info!("  Warm on start: {}", args.warm_on_start);

    // A load failure is fatal: never serve from a partial table
    let store = match &args.dataset {
        Some(path) => {
            info!("  Dataset: {}", path.display());
            MappingStore::load_from_path(path).map_err(|err| {
                error!("Failed to load dataset from {}: {err}", path.display());
                err
            })?
        }
        None => {
            info!("  Dataset: embedded");
            MappingStore::load()?
        }
    };

    let config = CacheConfig {
        runtime_capacity: args.runtime_capacity,
        ..CacheConfig::default()
    };
    let resolver = Resolver::new(store, config);

    if args.warm_on_start {
        let report = resolver.warm_hot_members();
        info!(
            warmed = report.warmed,
            already_warm = report.already_warm,
            "startup warm-up finished"
        );
    }

    match args.command {
        Command::Lookup { zip, primary } => lookup(&resolver, &zip, primary),
        Command::State { zip } => state(&resolver, &zip),
        Command::Warm { zips } => warm(&resolver, zips),
        Command::Coverage => coverage(&resolver),
        Command::Stats { passes } => stats(&resolver, passes),
    }
}

// =============================================================================
// Commands
// =============================================================================

fn lookup(resolver: &Resolver, zip: &str, primary_only: bool) -> Result<()> {
    if primary_only {
        print_json(&resolver.resolve_primary(zip)?);
    } else {
        print_json(&resolver.resolve_all(zip)?);
    }
    Ok(())
}

fn state(resolver: &Resolver, zip: &str) -> Result<()> {
    let state = resolver.resolve_state(zip)?;
    print_json(&serde_json::json!({
        "state": state,
        "senateSeats": state.senate_seats(),
    }));
    Ok(())
}

fn warm(resolver: &Resolver, zips: Vec<String>) -> Result<()> {
    let report = if zips.is_empty() {
        resolver.warm_hot_members()
    } else {
        resolver.warm_up(&zips)
    };
    print_json(&report);
    Ok(())
}

fn coverage(resolver: &Resolver) -> Result<()> {
    print_json(&resolver.coverage());
    Ok(())
}

fn stats(resolver: &Resolver, passes: usize) -> Result<()> {
    let zips: Vec<String> = resolver.store().zips().map(ToString::to_string).collect();

    for _ in 0..passes {
        for zip in &zips {
            // every table ZIP resolves; a miss here would be a dataset bug
            let _ = resolver.resolve_all(zip);
        }
    }

    print_json(&serde_json::json!({
        "metrics": resolver.snapshot(),
        "cache": resolver.diagnostics(),
    }));
    Ok(())
}

fn print_json(value: &impl Serialize) {
    // output DTOs serialize infallibly
    println!("{}", serde_json::to_string_pretty(value).expect("serialize output"));
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}
