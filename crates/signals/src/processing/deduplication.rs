//! Deduplication stage.

use market_intel_data::{CanonicalRecord, DedupKey};
use std::collections::HashSet;

/// Keeps the first occurrence of each (username, timestamp, content) key,
/// preserving the relative order of survivors.
///
/// Comparison is exact; content is case-sensitive.
#[must_use]
pub fn dedupe(records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    let mut seen: HashSet<DedupKey> = HashSet::with_capacity(records.len());
    let before = records.len();

    let unique: Vec<CanonicalRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.dedup_key()))
        .collect();

    if unique.len() < before {
        tracing::debug!("Removed {} duplicate records", before - unique.len());
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn t(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 29, 12, minute, 0).unwrap()
    }

    fn post(user: &str, minute: u32, content: &str) -> CanonicalRecord {
        CanonicalRecord::new(content)
            .with_username(user)
            .with_timestamp(t(minute))
    }

    #[test]
    fn test_removes_later_duplicates() {
        let records = vec![
            post("bob", 0, "buy").with_hashtags(vec!["#first".to_string()]),
            post("amy", 0, "buy"),
            post("bob", 0, "buy").with_hashtags(vec!["#second".to_string()]),
        ];

        let unique = dedupe(records);

        assert_eq!(unique.len(), 2);
        // The first occurrence wins
        assert_eq!(unique[0].hashtags, vec!["#first".to_string()]);
        assert_eq!(unique[1].username, "amy");
    }

    #[test]
    fn test_all_three_fields_must_match() {
        let records = vec![
            post("bob", 0, "buy"),
            post("bob", 1, "buy"),
            post("bob", 0, "sell"),
            post("amy", 0, "buy"),
        ];

        assert_eq!(dedupe(records).len(), 4);
    }

    #[test]
    fn test_content_is_case_sensitive() {
        let records = vec![post("bob", 0, "Buy"), post("bob", 0, "buy")];
        assert_eq!(dedupe(records).len(), 2);
    }

    #[test]
    fn test_missing_timestamps_compare_equal() {
        let records = vec![
            CanonicalRecord::new("buy").with_username("bob"),
            CanonicalRecord::new("buy").with_username("bob"),
        ];
        assert_eq!(dedupe(records).len(), 1);
    }

    #[test]
    fn test_preserves_first_occurrence_order() {
        let records = vec![
            post("c", 0, "x"),
            post("a", 0, "x"),
            post("c", 0, "x"),
            post("b", 0, "x"),
            post("a", 0, "x"),
        ];

        let users: Vec<String> = dedupe(records).into_iter().map(|r| r.username).collect();
        assert_eq!(users, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_is_idempotent() {
        let records = vec![
            post("bob", 0, "buy"),
            post("bob", 0, "buy"),
            post("amy", 1, "sell"),
        ];

        let once = dedupe(records);
        let twice = dedupe(once.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedupe(Vec::new()).is_empty());
    }
}
