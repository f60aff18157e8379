//! Terminal sparkline rendering of a signal sequence.

use crate::analysis::{downsample, mean};
use anyhow::Result;
use colored::Colorize;
use market_intel_core::SignalRenderer;

/// Bar glyphs from lowest to highest.
const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Builds a unicode sparkline scaled between the min and max of `values`.
///
/// A constant sequence renders at mid height.
#[must_use]
pub fn sparkline(values: &[f64]) -> String {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let range = max - min;
    let top = (BARS.len() - 1) as f64;

    values
        .iter()
        .map(|v| {
            if !v.is_finite() {
                ' '
            } else if range <= 0.0 {
                BARS[BARS.len() / 2]
            } else {
                BARS[(((v - min) / range) * top).round() as usize]
            }
        })
        .collect()
}

/// Prints a titled sparkline with summary figures to stdout.
#[derive(Debug, Clone, Default)]
pub struct TerminalRenderer {
    seed: Option<u64>,
}

impl TerminalRenderer {
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    /// Formats the report printed by [`SignalRenderer::render`].
    #[must_use]
    pub fn format(&self, values: &[f64], sample_size: usize) -> String {
        let sampled = downsample(values, sample_size, self.seed);
        let min = sampled.iter().copied().fold(f64::INFINITY, f64::min);
        let max = sampled.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut out = String::new();
        out.push_str(&format!(
            "{}\n",
            "Sampled Post Signal Strengths".bold().white().on_black()
        ));
        out.push_str(&format!("{}\n", sparkline(&sampled).cyan()));
        if sampled.is_empty() {
            out.push_str("(no values)\n");
        } else {
            out.push_str(&format!(
                "points: {} of {}  mean: {:.4}  min: {:.4}  max: {:.4}\n",
                sampled.len(),
                values.len(),
                mean(&sampled),
                min,
                max
            ));
        }
        out
    }
}

impl SignalRenderer for TerminalRenderer {
    fn render(&self, values: &[f64], sample_size: usize) -> Result<()> {
        print!("{}", self.format(values, sample_size));
        Ok(())
    }
}
