//! Post records and flat-file storage for hashtag market intelligence.
//!
//! This crate provides:
//! - `RawRecord`, the loosely-typed mapping produced by ingestion
//! - `CanonicalRecord`, the typed record produced by the processing stages
//! - Parquet persistence for canonical records
//! - JSON snapshots of raw ingestion output

pub mod json_storage;
pub mod models;
pub mod parquet_storage;

// Re-export commonly used types
pub use json_storage::JsonStorage;
pub use parquet_storage::ParquetStorage;

// Re-export models
pub use models::{
    fields, tokens_with_prefix, CanonicalRecord, DedupKey, Engagement, RawRecord, RecordError,
    SCHEMA_COLUMNS,
};
