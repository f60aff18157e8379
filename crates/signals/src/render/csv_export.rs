//! CSV export of a (downsampled) signal sequence.

use crate::analysis::sample_indices;
use anyhow::{Context, Result};
use csv::Writer;
use market_intel_core::SignalRenderer;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Writes `index,signal` rows, where `index` is the record position in the
/// full sequence.
#[derive(Debug, Clone)]
pub struct CsvRenderer {
    path: PathBuf,
    seed: Option<u64>,
}

impl CsvRenderer {
    pub fn new(path: impl Into<PathBuf>, seed: Option<u64>) -> Self {
        Self {
            path: path.into(),
            seed,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SignalRenderer for CsvRenderer {
    fn render(&self, values: &[f64], sample_size: usize) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create CSV file: {}", self.path.display()))?;
        let mut writer = Writer::from_writer(file);

        writer.write_record(["index", "signal"])?;
        let indices = sample_indices(values.len(), sample_size, self.seed);
        for &i in &indices {
            writer.write_record(&[i.to_string(), values[i].to_string()])?;
        }

        writer.flush()?;
        tracing::info!("Wrote {} signal points to {}", indices.len(), self.path.display());
        Ok(())
    }
}
