//! Run CLI command: scrape, process and analyze in one pass.

use super::analyze::{analyze_texts, present};
use super::process::process_and_save;
use super::scrape::{scrape, ScrapeArgs};
use anyhow::Result;
use clap::Args;
use market_intel_core::AppConfig;
use market_intel_data::JsonStorage;

/// Arguments for the run command.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub scrape: ScrapeArgs,

    /// Write the rendered signal to this CSV file (overrides config)
    #[arg(long)]
    pub csv: Option<String>,

    /// Do not save the raw JSON snapshot
    #[arg(long)]
    pub no_raw_snapshot: bool,
}

/// Runs the full pipeline.
///
/// Exits early, successfully, when nothing was scraped or nothing survived
/// processing.
///
/// # Errors
/// Returns an error if an output file cannot be written.
pub async fn run_pipeline(args: RunArgs, config: &AppConfig) -> Result<()> {
    tracing::info!("Starting market intelligence run");

    let collector_config = args.scrape.resolve(&config.collector);
    let raw = scrape(&collector_config).await;
    if raw.is_empty() {
        tracing::warn!("No posts were scraped. Exiting.");
        return Ok(());
    }

    if !args.no_raw_snapshot {
        let raw_path = args
            .scrape
            .output
            .clone()
            .unwrap_or_else(|| config.output.raw_data_path.clone());
        JsonStorage::write_raw(&raw_path, &raw)?;
    }

    let processed = process_and_save(
        &raw,
        config.processing.chunk_size,
        &config.output.processed_data_path,
    )?;
    if processed.is_empty() {
        tracing::warn!("No posts remaining after processing. Exiting.");
        return Ok(());
    }

    let texts: Vec<String> = processed.into_iter().map(|r| r.content).collect();
    if let Some(summary) = analyze_texts(&texts, &config.analysis) {
        let csv = args.csv.or_else(|| config.output.signal_csv_path.clone());
        present(&summary, &config.analysis, csv.as_deref(), false);
    }

    tracing::info!("Market intelligence run finished");
    Ok(())
}
