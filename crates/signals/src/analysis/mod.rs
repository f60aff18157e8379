//! Text signal extraction.
//!
//! - `CorpusModel`: TF-IDF weighting fitted once per corpus
//! - `aggregate_signals`: per-record mean weight plus a normal-approximation interval
//! - `downsample`: seeded random subset for presentation

mod aggregate;
mod analyzer;
mod corpus_model;
mod downsample;
mod tokenizer;

pub use aggregate::{
    aggregate_signals, mean, population_std_dev, ConfidenceInterval, SignalSummary, Z_SCORE_95,
};
pub use analyzer::SignalAnalyzer;
pub use corpus_model::{
    CorpusModel, CorpusModelConfig, FittedVocabulary, ModelError, ModelState, TermMatrix,
    DEFAULT_MAX_FEATURES,
};
pub use downsample::{downsample, sample_indices};
pub use tokenizer::{is_stop_word, tokenize, ENGLISH_STOP_WORDS};
