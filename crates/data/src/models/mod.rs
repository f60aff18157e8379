//! Data models for collected posts.
//!
//! Ingestion produces `RawRecord` mappings whose fields may be missing or
//! malformed. The processing stages turn them into typed `CanonicalRecord`s.

pub mod canonical;
pub mod raw;

pub use canonical::{CanonicalRecord, DedupKey, Engagement};
pub use raw::{RawRecord, RecordError};

/// Field names shared by raw mappings and the persisted schema.
pub mod fields {
    pub const USERNAME: &str = "username";
    pub const TIMESTAMP: &str = "timestamp";
    pub const CONTENT: &str = "content";
    pub const ENGAGEMENT: &str = "engagement";
    pub const MENTIONS: &str = "mentions";
    pub const HASHTAGS: &str = "hashtags";
}

/// Persisted column order.
pub const SCHEMA_COLUMNS: [&str; 6] = [
    fields::USERNAME,
    fields::TIMESTAMP,
    fields::CONTENT,
    fields::ENGAGEMENT,
    fields::MENTIONS,
    fields::HASHTAGS,
];

/// Returns every whitespace-delimited token of `text` that starts with `prefix`.
///
/// Used to derive mentions (`@`) and hashtags (`#`) from post text.
#[must_use]
pub fn tokens_with_prefix(text: &str, prefix: char) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| token.starts_with(prefix))
        .map(str::to_string)
        .collect()
}
