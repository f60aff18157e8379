//! Post processing, ingestion and text signal extraction.
//!
//! - `processing`: clean, normalize and dedupe raw posts, chunk by chunk
//! - `analysis`: TF-IDF corpus model, signal aggregation, downsampling
//! - `collector`: X API v2 recent-search ingestion
//! - `render`: terminal and CSV presentation

pub mod analysis;
pub mod collector;
pub mod processing;
pub mod render;

// Re-export processing stages for convenience
pub use processing::{
    clean, clean_content, clean_record, dedupe, normalize, normalize_record, strip_urls,
    ChunkedRecords, PipelineError, RecordProcessor, DEFAULT_CHUNK_SIZE,
};

// Re-export analysis
pub use analysis::{
    aggregate_signals, downsample, sample_indices, ConfidenceInterval, CorpusModel,
    CorpusModelConfig, ModelError, ModelState, SignalAnalyzer, SignalSummary, TermMatrix,
};

// Re-export collectors
pub use collector::{collect_all_hashtags, CollectorStats, TwitterCollector, TwitterCollectorConfig};

// Re-export renderers
pub use render::{CsvRenderer, TerminalRenderer};
