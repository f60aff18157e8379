//! Signal extraction over a corpus of post texts.

use super::aggregate::{aggregate_signals, SignalSummary};
use super::corpus_model::{CorpusModel, CorpusModelConfig, ModelError, TermMatrix};

/// Fits a [`CorpusModel`] and turns texts into signals.
///
/// Model errors are logged and surface as `None`; nothing here aborts a run.
#[derive(Debug, Clone, Default)]
pub struct SignalAnalyzer {
    model: CorpusModel,
}

impl SignalAnalyzer {
    #[must_use]
    pub fn new(config: CorpusModelConfig) -> Self {
        Self {
            model: CorpusModel::new(config),
        }
    }

    #[must_use]
    pub fn model(&self) -> &CorpusModel {
        &self.model
    }

    /// Fits the underlying model on `texts`.
    ///
    /// # Errors
    /// Returns the model error if the corpus has no usable terms.
    pub fn fit_vectorizer<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<(), ModelError> {
        let vocab = self.model.fit(texts)?;
        tracing::info!(
            "Fitted vocabulary of {} terms on {} texts",
            vocab.len(),
            vocab.n_documents()
        );
        Ok(())
    }

    /// Projects `texts` into the fitted vocabulary.
    ///
    /// Returns `None` (after logging) if the model has not been fitted.
    #[must_use]
    pub fn text_to_signal<S: AsRef<str>>(&self, texts: &[S]) -> Option<TermMatrix> {
        match self.model.transform(texts) {
            Ok(matrix) => Some(matrix),
            Err(e) => {
                tracing::error!("Cannot project texts: {}", e);
                None
            }
        }
    }

    /// Fits on `texts`, projects them and aggregates the result.
    ///
    /// Returns `None` if fitting fails or there is nothing to aggregate.
    #[must_use]
    pub fn analyze<S: AsRef<str>>(&mut self, texts: &[S]) -> Option<SignalSummary> {
        if let Err(e) = self.fit_vectorizer(texts) {
            tracing::error!("Failed to fit vectorizer: {}", e);
            return None;
        }

        let matrix = self.text_to_signal(texts);
        let summary = aggregate_signals(matrix.as_ref())?;

        tracing::info!("Aggregated signal mean: {:.4}", summary.mean);
        tracing::info!(
            "Confidence interval: ({:.4}, {:.4})",
            summary.interval.lower,
            summary.interval.upper
        );

        Some(summary)
    }
}
