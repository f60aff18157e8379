//! Canonical post record.
//!
//! Produced by the cleaning stage and refined by normalization. Content is
//! URL-stripped, NFKC-normalized, trimmed and never empty.

use super::fields;
use super::raw::RawRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Engagement counters keyed by metric name (e.g. `like_count`).
pub type Engagement = BTreeMap<String, u64>;

/// Composite identity of a post: (username, timestamp, content).
pub type DedupKey = (String, Option<DateTime<Utc>>, String);

/// A cleaned post with typed fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Author handle (lower-cased after normalization)
    pub username: String,
    /// Publication instant, if the source supplied one
    pub timestamp: Option<DateTime<Utc>>,
    /// Cleaned post text
    pub content: String,
    /// Engagement counters, if the source supplied them
    pub engagement: Option<Engagement>,
    /// Mentioned handles, if known
    pub mentions: Option<Vec<String>>,
    /// Hashtags (lower-cased after normalization)
    pub hashtags: Vec<String>,
}

impl CanonicalRecord {
    /// Creates a record with the given content and no metadata.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            username: String::new(),
            timestamp: None,
            content: content.into(),
            engagement: None,
            mentions: None,
            hashtags: Vec::new(),
        }
    }

    /// Builder method to set the username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Builder method to set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Builder method to set engagement counters.
    #[must_use]
    pub fn with_engagement(mut self, engagement: Engagement) -> Self {
        self.engagement = Some(engagement);
        self
    }

    /// Builder method to set mentions.
    #[must_use]
    pub fn with_mentions(mut self, mentions: Vec<String>) -> Self {
        self.mentions = Some(mentions);
        self
    }

    /// Builder method to set hashtags.
    #[must_use]
    pub fn with_hashtags(mut self, hashtags: Vec<String>) -> Self {
        self.hashtags = hashtags;
        self
    }

    /// Returns the deduplication key.
    #[must_use]
    pub fn dedup_key(&self) -> DedupKey {
        (self.username.clone(), self.timestamp, self.content.clone())
    }
}

impl From<&CanonicalRecord> for RawRecord {
    /// Re-expresses a canonical record as a mapping, omitting absent fields.
    fn from(record: &CanonicalRecord) -> Self {
        let mut raw = RawRecord::new()
            .with_field(fields::USERNAME, record.username.clone())
            .with_field(fields::CONTENT, record.content.clone())
            .with_field(fields::HASHTAGS, record.hashtags.clone());

        if let Some(ts) = record.timestamp {
            raw = raw.with_field(
                fields::TIMESTAMP,
                ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            );
        }
        if let Some(ref engagement) = record.engagement {
            let map: serde_json::Map<String, Value> = engagement
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(*v)))
                .collect();
            raw = raw.with_field(fields::ENGAGEMENT, Value::Object(map));
        }
        if let Some(ref mentions) = record.mentions {
            raw = raw.with_field(fields::MENTIONS, mentions.clone());
        }

        raw
    }
}

impl From<CanonicalRecord> for RawRecord {
    fn from(record: CanonicalRecord) -> Self {
        RawRecord::from(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 29, 12, 0, 0).unwrap()
    }

    fn sample_record() -> CanonicalRecord {
        CanonicalRecord::new("buy #nifty50 now")
            .with_username("bob")
            .with_timestamp(sample_timestamp())
            .with_engagement(Engagement::from([
                ("like_count".to_string(), 4),
                ("reply_count".to_string(), 1),
            ]))
            .with_mentions(vec!["@desk".to_string()])
            .with_hashtags(vec!["#nifty50".to_string()])
    }

    #[test]
    fn test_new_has_empty_metadata() {
        let r = CanonicalRecord::new("hello");

        assert_eq!(r.username, "");
        assert!(r.timestamp.is_none());
        assert!(r.engagement.is_none());
        assert!(r.mentions.is_none());
        assert!(r.hashtags.is_empty());
    }

    #[test]
    fn test_dedup_key() {
        let r = sample_record();
        assert_eq!(
            r.dedup_key(),
            (
                "bob".to_string(),
                Some(sample_timestamp()),
                "buy #nifty50 now".to_string()
            )
        );
    }

    #[test]
    fn test_into_raw_record_preserves_fields() {
        let r = sample_record();
        let raw = RawRecord::from(&r);

        assert_eq!(raw.username(), Ok(Some("bob")));
        assert_eq!(raw.content(), Ok(Some("buy #nifty50 now")));
        assert_eq!(raw.timestamp(), Ok(Some(sample_timestamp())));
        assert_eq!(raw.engagement(), Ok(r.engagement.clone()));
        assert_eq!(raw.mentions(), Ok(Some(vec!["@desk".to_string()])));
        assert_eq!(raw.hashtags(), Ok(Some(vec!["#nifty50".to_string()])));
    }

    #[test]
    fn test_into_raw_record_omits_absent_fields() {
        let raw = RawRecord::from(CanonicalRecord::new("hello"));

        assert!(!raw.has("timestamp"));
        assert!(!raw.has("engagement"));
        assert!(!raw.has("mentions"));
        assert!(raw.has("hashtags"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let r = sample_record();
        let json = serde_json::to_string(&r).unwrap();
        let back: CanonicalRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
