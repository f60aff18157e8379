//! Reduction of a term matrix to one scalar per record plus an interval.
//!
//! The interval is a normal approximation, mean ± 1.96 · σ, where σ is the
//! population standard deviation of the per-record signals. It assumes the
//! signals are roughly normal and is not an exact confidence interval.

use super::corpus_model::TermMatrix;
use serde::{Deserialize, Serialize};

/// Two-sided 95% quantile of the standard normal distribution.
pub const Z_SCORE_95: f64 = 1.96;

/// Normal-approximation range around the mean signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Builds `mean ± z · std_dev`.
    #[must_use]
    pub fn around(mean: f64, std_dev: f64, z: f64) -> Self {
        Self {
            lower: mean - z * std_dev,
            upper: mean + z * std_dev,
        }
    }
}

/// Per-record signals and their corpus-level statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    /// One value per record, in record order
    pub signals: Vec<f64>,
    pub interval: ConfidenceInterval,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

impl SignalSummary {
    #[must_use]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Arithmetic mean; 0.0 for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n); 0.0 for an empty slice.
#[must_use]
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Aggregates a term matrix into per-record signals and an interval.
///
/// Each record's signal is the mean of its row. Returns `None` when there
/// is no matrix or it has no rows.
#[must_use]
pub fn aggregate_signals(matrix: Option<&TermMatrix>) -> Option<SignalSummary> {
    let Some(matrix) = matrix.filter(|m| !m.is_empty()) else {
        tracing::warn!("No term matrix to aggregate");
        return None;
    };

    let signals: Vec<f64> = matrix.rows().map(mean).collect();
    let mean = mean(&signals);
    let std_dev = population_std_dev(&signals);

    Some(SignalSummary {
        signals,
        interval: ConfidenceInterval::around(mean, std_dev, Z_SCORE_95),
        mean,
        std_dev,
    })
}
