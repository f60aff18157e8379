//! JSON snapshots of raw ingestion output.
//!
//! The snapshot lets a collection run be reprocessed offline. Entries are
//! stored as a JSON array of objects, exactly as ingestion produced them.

use crate::models::RawRecord;
use crate::parquet_storage::ensure_parent_dir;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

pub struct JsonStorage;

impl JsonStorage {
    /// Writes raw records to a JSON file as a single array.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or serialization fails.
    pub fn write_raw(path: &str, records: &[RawRecord]) -> Result<()> {
        ensure_parent_dir(path)?;
        let file =
            File::create(path).with_context(|| format!("Failed to create JSON file: {}", path))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;

        tracing::info!("Saved {} raw records to {}", records.len(), path);
        Ok(())
    }

    /// Reads raw records from a JSON array file.
    ///
    /// Array entries that are not JSON objects are logged and skipped;
    /// per-field validation is left to the cleaning stage.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a JSON array.
    pub fn read_raw(path: &str) -> Result<Vec<RawRecord>> {
        let file =
            File::open(path).with_context(|| format!("Failed to open JSON file: {}", path))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse JSON file: {}", path))?;

        let Value::Array(entries) = value else {
            return Err(anyhow!("{} does not contain a JSON array", path));
        };

        let records = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match RawRecord::try_from(entry) {
                Ok(record) => Some(record),
                Err(other) => {
                    tracing::warn!("Skipping entry {} in {}: not an object ({})", index, path, other);
                    None
                }
            })
            .collect();

        Ok(records)
    }
}
