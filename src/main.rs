//! # AI Digest
//!
//! Builds a curated HTML digest of AI newsletter articles. It polls a list
//! of RSS/Atom feeds, scores each new article by length and comment
//! engagement, summarizes the best ones with Claude, and remembers what it
//! has already processed so the next run only shows new posts.
//!
//! ## Usage
//!
//! ```sh
//! CLAUDE_API_KEY=... ai_digest --days-back 7 --featured-count 7
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: read every feed, keep recent entries not in the ledger
//! 2. **Extraction**: strip markup, scrape comment counts, flag paywalls
//! 3. **Selection**: score and split into featured and other articles
//! 4. **Summarization**: one Claude call per featured article
//! 5. **Output**: timestamped HTML digest plus the updated ledger
//!
//! Each step degrades per unit of work; only startup problems are fatal.

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod ledger;
mod models;
mod outputs;
mod pipeline;
mod scoring;
mod scrapers;
mod utils;

use api::ClaudeClient;
use cli::Cli;
use config::DigestConfig;
use error::DigestError;
use pipeline::{Pipeline, RunOutcome};
use utils::ensure_writable_dir;

/// Summaries can take a while; page fetches use the shorter configured timeout.
const SUMMARY_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    // .env must be loaded before clap reads env-backed options
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "Loaded .env file");
    }
    let args = Cli::parse();
    debug!(
        config = ?args.config,
        ledger = %args.ledger,
        output_dir = %args.output_dir,
        "Parsed CLI arguments"
    );

    // ---- Fatal startup checks ----
    let Some(api_key) = args.api_key.clone().filter(|key| !key.trim().is_empty()) else {
        error!("CLAUDE_API_KEY is not set");
        return Err(DigestError::MissingCredential.into());
    };

    let config = DigestConfig::load(args.config.as_deref()).await?;
    let model = args.model.clone().unwrap_or_else(|| config.model.clone());

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    // ---- Summarizer ----
    let summary_http = reqwest::Client::builder()
        .timeout(SUMMARY_TIMEOUT)
        .build()?;
    let mut claude = ClaudeClient::new(summary_http, api_key, model);
    if let Some(ref url) = args.api_url {
        claude = claude.with_endpoint(url.clone());
    }
    info!(?claude, "Summarizer ready");

    // ---- Run ----
    let pipeline = Pipeline::new(config, claude)?;
    let outcome = pipeline
        .run(
            Path::new(&args.ledger),
            Path::new(&args.output_dir),
            args.run_params(),
        )
        .await?;

    match outcome {
        RunOutcome::NoNewArticles => info!("Nothing to publish"),
        RunOutcome::Published {
            path,
            featured,
            others,
        } => info!(path = %path.display(), featured, others, "Digest published"),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
