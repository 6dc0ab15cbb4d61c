//! MedSearch command-line front end.
//!
//! Every view of the application is a subcommand. Protected views log in
//! first with `--email`/`--password` (the built-in test account by default)
//! and go through the same route gate the TUI uses.
//!
//! Usage:
//!   cargo run -p demo -- search nsaid
//!   cargo run -p demo -- search nsaid --select 0 --ndc 00000-0001-01
//!   cargo run -p demo -- suggest asp
//!   cargo run -p demo -- details 1 --ndc 00000-0001-01
//!   cargo run -p demo -- dashboard --json
//!   cargo run -p demo -- upload sales.xlsx
//!   cargo run -p demo -- walkthrough

mod app;
mod walkthrough;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use medsearch_auth::{DEFAULT_EMAIL, DEFAULT_PASSWORD};

use crate::app::App;

// ── CLI definition ────────────────────────────────────────────────────────────

/// MedSearch: drug search, insurance coverage and pharmacy sales.
#[derive(Parser)]
#[command(
    name = "medsearch",
    about = "Drug search, insurance coverage and pharmacy sales analytics",
    long_about = "Search the drug catalog, resolve insurance options and NDC codes,\n\
                  open drug details, review pharmacy sales and upload sales spreadsheets."
)]
pub struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = DEFAULT_EMAIL)]
    pub email: String,

    #[arg(long, global = true, default_value = DEFAULT_PASSWORD)]
    pub password: String,

    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check credentials and print the session.
    Login,
    /// Search drugs by name or class; optionally select a result and NDC.
    Search {
        query: String,
        /// Index of the result to select.
        #[arg(long)]
        select: Option<usize>,
        /// Insurance id to select after the options load.
        #[arg(long, requires = "select")]
        insurance: Option<String>,
        /// NDC to select; with --select this ends in a navigation path.
        #[arg(long, requires = "select")]
        ndc: Option<String>,
    },
    /// Show the debounced suggestions for a partial query.
    Suggest { query: String },
    /// Open the details view of one drug packaging.
    Details {
        drug_id: String,
        #[arg(long)]
        ndc: String,
    },
    /// Sales totals, below-net-price alerts and per-drug figures.
    Dashboard,
    /// Validate and fingerprint sales spreadsheets.
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Scripted tour: login, type, select, navigate, dashboard, logout.
    Walkthrough,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Set RUST_LOG=debug to watch debouncing and stale-result handling.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match App::open(&cli) {
        Ok(mut app) => app.run(&cli).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("medsearch error: {}", e);
        std::process::exit(1);
    }
}
