//! Listing-matcher CLI
//!
//! Main entry point for the `listing-matcher` command.

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "listing-matcher")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Match retailer listings against a canonical product catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve listings against a product catalog and emit matches
    Resolve {
        /// Canonical product catalog, one JSON object per line
        #[arg(long, value_name = "FILE")]
        products: PathBuf,

        /// Retailer listings, one JSON object per line
        #[arg(long, value_name = "FILE")]
        listings: PathBuf,

        /// Optional TOML config file (CLI flags take precedence)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Width factor for Pass B price-coherent disambiguation (default 1.5)
        #[arg(long)]
        disambiguate_k: Option<f64>,

        /// Width factor for Pass C outlier pruning (default 7.0)
        #[arg(long)]
        prune_k: Option<f64>,

        /// Log each listing's resolution decision at debug level
        #[arg(long)]
        debug: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Commands::Resolve {
        products,
        listings,
        config,
        disambiguate_k,
        prune_k,
        debug,
    } = cli.command;

    let filter = if debug {
        EnvFilter::new("warn,listing_matcher=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config_file = config
        .as_deref()
        .map(listing_matcher::config::ConfigFile::load)
        .transpose()
        .into_diagnostic()?;
    let resolved_config = listing_matcher::config::ResolvedConfig::resolve(
        config_file,
        disambiguate_k,
        prune_k,
    );

    let (matches, trace) =
        listing_matcher::resolve_with_trace(&products, &listings, &resolved_config)
            .into_diagnostic()?;

    if debug {
        for entry in &trace {
            tracing::debug!(listing = entry.listing.0, decision = ?entry.decision, "resolution decision");
        }
        tracing::info!(matched_products = matches.len(), "resolution complete (debug mode, output suppressed)");
    } else {
        let stdout = std::io::stdout();
        let writer = std::io::BufWriter::new(stdout.lock());
        listing_matcher::io::write_matches(writer, &matches).into_diagnostic()?;
        tracing::info!(matched_products = matches.len(), "resolution complete");
    }

    Ok(())
}
