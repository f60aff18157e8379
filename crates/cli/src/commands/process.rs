//! Process CLI command.
//!
//! Cleans, normalizes and dedupes a raw JSON snapshot chunk by chunk and
//! writes the canonical records to Parquet.

use anyhow::Result;
use clap::Args;
use market_intel_core::AppConfig;
use market_intel_data::{CanonicalRecord, JsonStorage, ParquetStorage, RawRecord};
use market_intel_signals::RecordProcessor;

/// Arguments for the process command.
#[derive(Args, Debug, Clone, Default)]
pub struct ProcessArgs {
    /// Raw snapshot to read (overrides config)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Parquet output path (overrides config)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Records per processing chunk (overrides config)
    #[arg(long)]
    pub chunk_size: Option<usize>,
}

/// Runs the chunked pipeline over `raw` and persists the result.
///
/// Cross-chunk duplicates are kept. An empty result writes nothing.
///
/// # Errors
/// Returns an error if the chunk size is zero or the Parquet write fails.
pub fn process_and_save(
    raw: &[RawRecord],
    chunk_size: usize,
    output: &str,
) -> Result<Vec<CanonicalRecord>> {
    let processor = RecordProcessor::new(chunk_size)?;

    let mut processed = Vec::new();
    for chunk in processor.process_in_chunks(raw) {
        processed.extend(chunk);
    }

    tracing::info!(
        "Processed {} raw posts into {} records",
        raw.len(),
        processed.len()
    );

    ParquetStorage::write_records(output, &processed)?;
    Ok(processed)
}

/// Runs the process command.
///
/// # Errors
/// Returns an error if the snapshot cannot be read or the output cannot be written.
pub fn run_process(args: ProcessArgs, config: &AppConfig) -> Result<()> {
    let input = args
        .input
        .unwrap_or_else(|| config.output.raw_data_path.clone());
    let output = args
        .output
        .unwrap_or_else(|| config.output.processed_data_path.clone());
    let chunk_size = args.chunk_size.unwrap_or(config.processing.chunk_size);

    let raw = JsonStorage::read_raw(&input)?;
    let processed = process_and_save(&raw, chunk_size, &output)?;

    if processed.is_empty() {
        tracing::warn!("No posts remaining after processing");
        return Ok(());
    }

    println!("Saved {} processed posts to {}", processed.len(), output);
    Ok(())
}
