//! Record processing stages.
//!
//! Raw posts flow through three stages, always in this order:
//! - Cleaning: URL stripping, NFKC normalization, trimming, typed extraction
//! - Normalization: lower-cased usernames and hashtags
//! - Deduplication: first occurrence per (username, timestamp, content)
//!
//! `RecordProcessor` applies the stages chunk by chunk to bound memory.

mod cleaning;
mod deduplication;
mod normalization;
mod pipeline;

pub use cleaning::{clean, clean_content, clean_record, strip_urls, URL_PREFIX};
pub use deduplication::dedupe;
pub use normalization::{normalize, normalize_record};
pub use pipeline::{ChunkedRecords, PipelineError, RecordProcessor, DEFAULT_CHUNK_SIZE};
