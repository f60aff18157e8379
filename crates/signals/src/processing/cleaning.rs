//! Cleaning stage: raw mappings to canonical records.

use market_intel_data::{tokens_with_prefix, CanonicalRecord, RawRecord, RecordError};
use unicode_normalization::UnicodeNormalization;

/// Tokens starting with this prefix are treated as links and removed.
/// Covers both `http://` and `https://`.
pub const URL_PREFIX: &str = "http";

/// Removes every whitespace-delimited token that starts with a URL scheme.
///
/// Remaining tokens are re-joined with single spaces.
#[must_use]
pub fn strip_urls(content: &str) -> String {
    content
        .split_whitespace()
        .filter(|token| !token.starts_with(URL_PREFIX))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cleans post text: strips URL tokens, applies NFKC, trims.
///
/// URL tokens are stripped again after normalization so that compatibility
/// forms (e.g. fullwidth `ｈｔｔｐｓ://`) cannot survive a first pass and be
/// removed by a second one.
#[must_use]
pub fn clean_content(content: &str) -> String {
    let normalized: String = strip_urls(content).nfkc().collect();
    strip_urls(&normalized)
}

/// Cleans a single raw record.
///
/// Returns `Ok(None)` when the cleaned content is empty (the record is
/// dropped). Absent `hashtags`/`mentions` are derived from the cleaned text.
///
/// # Errors
/// Returns an error if any present field has the wrong type.
pub fn clean_record(raw: &RawRecord) -> Result<Option<CanonicalRecord>, RecordError> {
    let content = clean_content(raw.content()?.unwrap_or_default());
    if content.is_empty() {
        return Ok(None);
    }

    let username = raw.username()?.unwrap_or_default().to_string();
    let timestamp = raw.timestamp()?;
    let engagement = raw.engagement()?;
    let mentions = raw
        .mentions()?
        .unwrap_or_else(|| tokens_with_prefix(&content, '@'));
    let hashtags = raw
        .hashtags()?
        .unwrap_or_else(|| tokens_with_prefix(&content, '#'));

    Ok(Some(CanonicalRecord {
        username,
        timestamp,
        content,
        engagement,
        mentions: Some(mentions),
        hashtags,
    }))
}

/// Cleans a batch of raw records.
///
/// Malformed records are logged and skipped; they never abort the batch.
/// Records whose content is empty after cleaning are dropped.
#[must_use]
pub fn clean(records: &[RawRecord]) -> Vec<CanonicalRecord> {
    let mut cleaned = Vec::with_capacity(records.len());
    let mut dropped_empty = 0usize;

    for (index, raw) in records.iter().enumerate() {
        match clean_record(raw) {
            Ok(Some(record)) => cleaned.push(record),
            Ok(None) => dropped_empty += 1,
            Err(e) => tracing::warn!("Skipping malformed record {}: {}", index, e),
        }
    }

    if dropped_empty > 0 {
        tracing::debug!("Dropped {} records with empty content", dropped_empty);
    }

    cleaned
}
