//! Analyze CLI command.
//!
//! Fits the corpus model on processed post texts, aggregates the signal and
//! hands it to the configured renderers.

use anyhow::Result;
use clap::Args;
use market_intel_core::{AnalysisConfig, AppConfig, SignalRenderer};
use market_intel_data::ParquetStorage;
use market_intel_signals::{CorpusModelConfig, CsvRenderer, SignalAnalyzer, SignalSummary, TerminalRenderer};

/// Arguments for the analyze command.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Processed Parquet file to read (overrides config)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Write the rendered signal to this CSV file (overrides config)
    #[arg(long)]
    pub csv: Option<String>,

    /// Points to render (overrides config)
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Downsampling seed (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Do not print the terminal chart
    #[arg(long)]
    pub quiet: bool,
}

impl AnalyzeArgs {
    /// Applies command-line overrides to the analysis section.
    pub fn resolve(&self, base: &AnalysisConfig) -> AnalysisConfig {
        let mut config = base.clone();
        if let Some(sample_size) = self.sample_size {
            config.sample_size = sample_size;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config
    }
}

/// Computes the signal for `texts`.
///
/// Returns `None` when the model cannot be fitted or there is nothing to
/// aggregate; the cause is logged.
pub fn analyze_texts(texts: &[String], config: &AnalysisConfig) -> Option<SignalSummary> {
    let mut analyzer = SignalAnalyzer::new(CorpusModelConfig::new(config.max_features));
    analyzer.analyze(texts)
}

/// Sends the signal to every renderer. Render failures are logged only.
pub fn present(summary: &SignalSummary, config: &AnalysisConfig, csv: Option<&str>, quiet: bool) {
    let mut renderers: Vec<Box<dyn SignalRenderer>> = Vec::new();
    if !quiet {
        renderers.push(Box::new(TerminalRenderer::new(config.seed)));
    }
    if let Some(path) = csv {
        renderers.push(Box::new(CsvRenderer::new(path, config.seed)));
    }

    for renderer in &renderers {
        if let Err(e) = renderer.render(&summary.signals, config.sample_size) {
            tracing::warn!("Failed to render signal: {}", e);
        }
    }

    println!(
        "Signal mean: {:.4}  95% interval (normal approx.): ({:.4}, {:.4})",
        summary.mean, summary.interval.lower, summary.interval.upper
    );
}

/// Runs the analyze command.
///
/// # Errors
/// Returns an error if the Parquet file cannot be read.
pub fn run_analyze(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let analysis = args.resolve(&config.analysis);
    let input = args
        .input
        .clone()
        .unwrap_or_else(|| config.output.processed_data_path.clone());
    let csv = args.csv.clone().or_else(|| config.output.signal_csv_path.clone());

    let texts = ParquetStorage::read_contents(&input)?;
    if texts.is_empty() {
        tracing::warn!("No post texts in {}", input);
        return Ok(());
    }

    if let Some(summary) = analyze_texts(&texts, &analysis) {
        present(&summary, &analysis, csv.as_deref(), args.quiet);
    }

    Ok(())
}
