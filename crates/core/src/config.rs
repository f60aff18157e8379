use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub collector: CollectorConfig,
    pub processing: ProcessingConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

/// Ingestion settings for the recent-search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// API bearer token
    pub bearer_token: String,
    /// API base URL
    pub api_url: String,
    /// Hashtags to track
    pub hashtags: Vec<String>,
    /// Maximum posts fetched per hashtag
    pub max_records_per_tag: usize,
    /// Client-side request budget
    pub requests_per_minute: u32,
    /// Longest wait honoured when the API reports a rate limit
    pub max_rate_limit_wait_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Records per processing chunk
    pub chunk_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Vocabulary size cap for the term-weighting model
    pub max_features: usize,
    /// Points rendered by presentation
    pub sample_size: usize,
    /// Seed for presentation downsampling (random when absent)
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Raw ingestion snapshot (JSON)
    pub raw_data_path: String,
    /// Processed records (Parquet)
    pub processed_data_path: String,
    /// Optional CSV export of the rendered signal
    pub signal_csv_path: Option<String>,
}

/// Reasons a resolved configuration is unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("processing.chunk_size must be at least 1")]
    ZeroChunkSize,
    #[error("analysis.max_features must be at least 1")]
    ZeroMaxFeatures,
    #[error("analysis.sample_size must be at least 1")]
    ZeroSampleSize,
    #[error("collector.hashtags must name at least one hashtag")]
    NoHashtags,
    #[error("collector.hashtags contains a blank entry")]
    BlankHashtag,
    #[error("collector.requests_per_minute must be at least 1")]
    ZeroRequestRate,
}

impl AppConfig {
    /// Checks the invariants components rely on at construction.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.analysis.max_features == 0 {
            return Err(ConfigError::ZeroMaxFeatures);
        }
        if self.analysis.sample_size == 0 {
            return Err(ConfigError::ZeroSampleSize);
        }
        if self.collector.hashtags.is_empty() {
            return Err(ConfigError::NoHashtags);
        }
        if self.collector.hashtags.iter().any(|h| h.trim().is_empty()) {
            return Err(ConfigError::BlankHashtag);
        }
        if self.collector.requests_per_minute == 0 {
            return Err(ConfigError::ZeroRequestRate);
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            collector: CollectorConfig {
                bearer_token: String::new(),
                api_url: "https://api.twitter.com".to_string(),
                hashtags: ["#nifty50", "#sensex", "#intraday", "#banknifty"]
                    .map(str::to_string)
                    .to_vec(),
                max_records_per_tag: 200,
                requests_per_minute: 60,
                max_rate_limit_wait_secs: 900,
            },
            processing: ProcessingConfig { chunk_size: 500 },
            analysis: AnalysisConfig {
                max_features: 100,
                sample_size: 200,
                seed: None,
            },
            output: OutputConfig {
                raw_data_path: "data/tweets.json".to_string(),
                processed_data_path: "data/processed_tweets.parquet".to_string(),
                signal_csv_path: None,
            },
        }
    }
}
