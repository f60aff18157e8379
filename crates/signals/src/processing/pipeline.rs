//! Chunked record processing.

use super::{clean, dedupe, normalize};
use market_intel_data::{CanonicalRecord, RawRecord};
use std::slice::Chunks;
use thiserror::Error;

/// Default number of raw records processed per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("chunk size must be at least 1")]
    InvalidChunkSize,
}

/// Runs clean, normalize and dedupe over fixed-size chunks of raw records.
///
/// Deduplication is chunk-local: a duplicate pair split across two chunks
/// is not removed.
#[derive(Debug, Clone, Copy)]
pub struct RecordProcessor {
    chunk_size: usize,
}

impl Default for RecordProcessor {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl RecordProcessor {
    /// # Errors
    /// Returns `PipelineError::InvalidChunkSize` if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Result<Self, PipelineError> {
        if chunk_size == 0 {
            return Err(PipelineError::InvalidChunkSize);
        }
        Ok(Self { chunk_size })
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Processes a single chunk through every stage.
    #[must_use]
    pub fn process_chunk(&self, chunk: &[RawRecord]) -> Vec<CanonicalRecord> {
        dedupe(normalize(clean(chunk)))
    }

    /// Lazily yields one processed batch per chunk, in input order.
    ///
    /// Batches are produced on demand; nothing past the current chunk is
    /// processed until the caller asks for it. Empty input yields nothing.
    #[must_use]
    pub fn process_in_chunks<'a>(&self, records: &'a [RawRecord]) -> ChunkedRecords<'a> {
        ChunkedRecords {
            processor: *self,
            chunks: records.chunks(self.chunk_size),
            index: 0,
        }
    }

    /// Processes every chunk and concatenates the batches.
    #[must_use]
    pub fn process_all(&self, records: &[RawRecord]) -> Vec<CanonicalRecord> {
        let processed: Vec<CanonicalRecord> =
            self.process_in_chunks(records).flatten().collect();

        tracing::info!(
            "Processed {} raw records into {} canonical records (chunk size {})",
            records.len(),
            processed.len(),
            self.chunk_size
        );

        processed
    }
}

/// Iterator returned by [`RecordProcessor::process_in_chunks`].
pub struct ChunkedRecords<'a> {
    processor: RecordProcessor,
    chunks: Chunks<'a, RawRecord>,
    index: usize,
}

impl Iterator for ChunkedRecords<'_> {
    type Item = Vec<CanonicalRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        let batch = self.processor.process_chunk(chunk);

        tracing::debug!(
            "Chunk {}: {} raw -> {} processed",
            self.index,
            chunk.len(),
            batch.len()
        );
        self.index += 1;

        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawRecord {
        RawRecord::try_from(value).unwrap()
    }

    fn sample_posts() -> Vec<RawRecord> {
        vec![
            raw(json!({"username": "Bob", "timestamp": "2025-01-29T12:00:00Z", "content": "Check http://x.co #Nifty50 now"})),
            raw(json!({"username": "bob", "timestamp": "2025-01-29T12:00:00Z", "content": "Check #Nifty50 now"})),
            raw(json!({"username": "amy", "content": "sell banknifty"})),
            raw(json!({"username": "amy", "content": "http://spam.link"})),
            raw(json!({"username": "amy", "content": "sell banknifty"})),
            raw(json!({"username": "cat", "content": 7})),
            raw(json!({"username": "dan", "content": "buy sensex"})),
        ]
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        assert_eq!(
            RecordProcessor::new(0).unwrap_err(),
            PipelineError::InvalidChunkSize
        );
    }

    #[test]
    fn test_default_chunk_size() {
        assert_eq!(RecordProcessor::default().chunk_size(), DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_case_variant_users_collapse_after_normalization() {
        let records = vec![
            raw(json!({"username": "Bob", "timestamp": "2025-01-29T12:00:00Z", "content": "Check http://x.co #Nifty50 now"})),
            raw(json!({"username": "bob", "timestamp": "2025-01-29T12:00:00Z", "content": "Check #Nifty50 now"})),
        ];

        let processor = RecordProcessor::new(10).unwrap();
        let processed = processor.process_all(&records);

        assert_eq!(processed.len(), 1);
        assert_eq!(processed[0].username, "bob");
        assert_eq!(processed[0].content, "Check #Nifty50 now");
        assert_eq!(processed[0].hashtags, vec!["#nifty50".to_string()]);
    }

    #[test]
    fn test_each_batch_matches_its_slice() {
        let records = sample_posts();
        let processor = RecordProcessor::new(3).unwrap();

        let batches: Vec<Vec<CanonicalRecord>> = processor.process_in_chunks(&records).collect();

        assert_eq!(batches.len(), 3);
        for (i, batch) in batches.iter().enumerate() {
            let start = i * 3;
            let end = (start + 3).min(records.len());
            let expected = dedupe(normalize(clean(&records[start..end])));
            assert_eq!(batch, &expected);
        }
    }

    #[test]
    fn test_single_chunk_dedupes_everything() {
        let records = sample_posts();
        let processor = RecordProcessor::new(100).unwrap();

        let processed = processor.process_all(&records);
        let users: Vec<&str> = processed.iter().map(|r| r.username.as_str()).collect();

        assert_eq!(users, vec!["bob", "amy", "dan"]);
    }

    #[test]
    fn test_duplicates_across_chunks_survive() {
        let records = vec![
            raw(json!({"username": "amy", "content": "sell banknifty"})),
            raw(json!({"username": "amy", "content": "sell banknifty"})),
        ];
        let processor = RecordProcessor::new(1).unwrap();

        assert_eq!(processor.process_all(&records).len(), 2);
    }

    #[test]
    fn test_empty_input_yields_no_batches() {
        let processor = RecordProcessor::default();
        assert_eq!(processor.process_in_chunks(&[]).count(), 0);
        assert!(processor.process_all(&[]).is_empty());
    }

    #[test]
    fn test_batches_are_lazy() {
        let records = sample_posts();
        let processor = RecordProcessor::new(2).unwrap();

        let mut iter = processor.process_in_chunks(&records);
        assert_eq!(iter.size_hint(), (4, Some(4)));

        iter.next();
        assert_eq!(iter.size_hint(), (3, Some(3)));
    }
}
