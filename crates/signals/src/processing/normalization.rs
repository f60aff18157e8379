//! Normalization stage: case-folds usernames and hashtags.

use market_intel_data::CanonicalRecord;

/// Lower-cases the username and every hashtag of a record.
#[must_use]
pub fn normalize_record(mut record: CanonicalRecord) -> CanonicalRecord {
    record.username = record.username.to_lowercase();
    for tag in &mut record.hashtags {
        *tag = tag.to_lowercase();
    }
    record
}

/// Normalizes a batch of records. Never drops a record.
#[must_use]
pub fn normalize(records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    records.into_iter().map(normalize_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_username_and_hashtags() {
        let record = CanonicalRecord::new("Buy #Nifty50 NOW")
            .with_username("Bob")
            .with_hashtags(vec!["#Nifty50".to_string(), "#SENSEX".to_string()]);

        let normalized = normalize_record(record);

        assert_eq!(normalized.username, "bob");
        assert_eq!(
            normalized.hashtags,
            vec!["#nifty50".to_string(), "#sensex".to_string()]
        );
        // Content case is preserved
        assert_eq!(normalized.content, "Buy #Nifty50 NOW");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let normalized = normalize_record(CanonicalRecord::new("hello"));

        assert_eq!(normalized.username, "");
        assert!(normalized.hashtags.is_empty());
    }

    #[test]
    fn test_unicode_lowercase() {
        let record = CanonicalRecord::new("x").with_username("ÀNDRÉ");
        assert_eq!(normalize_record(record).username, "àndré");
    }

    #[test]
    fn test_normalize_keeps_every_record() {
        let records = vec![
            CanonicalRecord::new("a").with_username("A"),
            CanonicalRecord::new("a").with_username("a"),
            CanonicalRecord::new("b"),
        ];

        assert_eq!(normalize(records).len(), 3);
    }
}
