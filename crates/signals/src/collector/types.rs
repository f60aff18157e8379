//! Shared types for post collectors.

use chrono::{DateTime, Utc};

/// Statistics for a collector across all fetched hashtags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectorStats {
    /// Posts converted into raw records
    pub records_collected: u64,
    /// HTTP requests sent, retries included
    pub requests_sent: u64,
    /// Failed requests and posts that could not be converted
    pub errors_encountered: u64,
    /// Times the API reported a rate limit
    pub rate_limited: u32,
    /// Time of last successful record
    pub last_record_time: Option<DateTime<Utc>>,
}

impl CollectorStats {
    /// Increments the record count.
    pub fn record_collected(&mut self) {
        self.records_collected += 1;
        self.last_record_time = Some(Utc::now());
    }

    /// Increments the request count.
    pub fn request_sent(&mut self) {
        self.requests_sent += 1;
    }

    /// Increments the error count.
    pub fn error_occurred(&mut self) {
        self.errors_encountered += 1;
    }

    /// Increments the rate-limit count.
    pub fn rate_limit_hit(&mut self) {
        self.rate_limited += 1;
    }
}
