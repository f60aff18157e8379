//! X (Twitter) API v2 recent-search collector.
//!
//! Fetches posts for a hashtag from `GET /2/tweets/search/recent`, following
//! `meta.next_token` until the requested number of posts is gathered or the
//! results run out. Requests are paced by a client-side governor quota. An
//! HTTP 429 waits until `x-rate-limit-reset` (capped) and retries the same
//! page a bounded number of times.

use crate::collector::types::CollectorStats;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use governor::{
    clock::DefaultClock,
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use market_intel_core::PostSource;
use market_intel_data::{fields, tokens_with_prefix, RawRecord};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;

/// Production API base URL.
pub const TWITTER_API_URL: &str = "https://api.twitter.com";

/// Recent-search endpoint path.
pub const RECENT_SEARCH_PATH: &str = "/2/tweets/search/recent";

/// Page size bounds accepted by the recent-search endpoint.
pub const MIN_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Tweet fields requested for every post.
pub const TWEET_FIELDS: &str = "created_at,author_id,public_metrics";

type GovernorLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Configuration for the recent-search collector.
#[derive(Debug, Clone)]
pub struct TwitterCollectorConfig {
    /// Bearer token for app-only auth
    pub bearer_token: String,
    /// API base URL (overridable for testing)
    pub base_url: String,
    /// Client-side request budget
    pub requests_per_minute: NonZeroU32,
    /// Longest wait honoured for a single rate-limit response
    pub max_rate_limit_wait: Duration,
    /// Consecutive rate-limit retries of one page before giving up
    pub max_rate_limit_retries: u32,
}

impl TwitterCollectorConfig {
    /// Creates a config with the given token and default limits.
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            base_url: TWITTER_API_URL.to_string(),
            requests_per_minute: NonZeroU32::new(60).unwrap_or(NonZeroU32::MIN),
            max_rate_limit_wait: Duration::from_secs(900),
            max_rate_limit_retries: 3,
        }
    }

    /// Sets a custom base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request budget. Zero is clamped to one.
    #[must_use]
    pub fn with_requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = NonZeroU32::new(rpm).unwrap_or(NonZeroU32::MIN);
        self
    }

    /// Sets the maximum rate-limit wait.
    #[must_use]
    pub fn with_max_rate_limit_wait(mut self, wait: Duration) -> Self {
        self.max_rate_limit_wait = wait;
        self
    }

    /// Sets the rate-limit retry budget per page.
    #[must_use]
    pub fn with_max_rate_limit_retries(mut self, retries: u32) -> Self {
        self.max_rate_limit_retries = retries;
        self
    }
}

impl From<&market_intel_core::CollectorConfig> for TwitterCollectorConfig {
    fn from(config: &market_intel_core::CollectorConfig) -> Self {
        Self::new(config.bearer_token.clone())
            .with_base_url(config.api_url.clone())
            .with_requests_per_minute(config.requests_per_minute)
            .with_max_rate_limit_wait(Duration::from_secs(config.max_rate_limit_wait_secs))
    }
}

/// Builds the search query for a hashtag: English, no retweets.
#[must_use]
pub fn build_query(tag: &str) -> String {
    format!("{tag} lang:en -is:retweet")
}

/// Converts one tweet object into a raw record.
///
/// username = author id, content = text, engagement = public metrics;
/// mentions and hashtags are the `@` / `#` tokens of the text.
///
/// # Errors
/// Returns an error if the tweet has no string `text`.
pub fn tweet_to_record(tweet: &Value) -> Result<RawRecord> {
    let text = tweet
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("tweet {} has no text", tweet.get("id").unwrap_or(&Value::Null)))?;

    let mut record = RawRecord::new()
        .with_field(fields::CONTENT, text)
        .with_field(fields::MENTIONS, tokens_with_prefix(text, '@'))
        .with_field(fields::HASHTAGS, tokens_with_prefix(text, '#'));

    if let Some(author) = tweet.get("author_id") {
        record = record.with_field(fields::USERNAME, author.clone());
    }
    if let Some(created_at) = tweet.get("created_at") {
        record = record.with_field(fields::TIMESTAMP, created_at.clone());
    }
    record = record.with_field(
        fields::ENGAGEMENT,
        tweet
            .get("public_metrics")
            .cloned()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
    );

    Ok(record)
}

/// Recent-search collector.
pub struct TwitterCollector {
    config: TwitterCollectorConfig,
    http: reqwest::Client,
    limiter: GovernorLimiter,
    stats: CollectorStats,
}

impl TwitterCollector {
    #[must_use]
    pub fn new(config: TwitterCollectorConfig) -> Self {
        let limiter = RateLimiter::direct(Quota::per_minute(config.requests_per_minute));
        Self {
            config,
            http: reqwest::Client::new(),
            limiter,
            stats: CollectorStats::default(),
        }
    }

    /// Returns a reference to current statistics.
    #[must_use]
    pub fn stats(&self) -> &CollectorStats {
        &self.stats
    }

    #[must_use]
    pub fn config(&self) -> &TwitterCollectorConfig {
        &self.config
    }

    /// Fetches one page of results.
    async fn fetch_page(
        &mut self,
        query: &str,
        page_size: usize,
        next_token: Option<&str>,
    ) -> Result<SearchResponse> {
        let url = format!("{}{}", self.config.base_url, RECENT_SEARCH_PATH);
        let page_size = page_size.to_string();
        let mut retries = 0u32;

        loop {
            self.limiter.until_ready().await;

            let mut params: Vec<(&str, &str)> = vec![
                ("query", query),
                ("tweet.fields", TWEET_FIELDS),
                ("max_results", page_size.as_str()),
            ];
            if let Some(token) = next_token {
                params.push(("next_token", token));
            }

            tracing::debug!("GET {} query={:?} next_token={:?}", url, query, next_token);
            self.stats.request_sent();

            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.config.bearer_token)
                .query(&params)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                self.stats.rate_limit_hit();
                if retries >= self.config.max_rate_limit_retries {
                    return Err(anyhow!(
                        "rate limited {} times in a row, giving up",
                        retries + 1
                    ));
                }
                retries += 1;

                let wait = rate_limit_wait(response.headers(), self.config.max_rate_limit_wait);
                tracing::warn!("Rate limited, waiting {:?} before retrying", wait);
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(anyhow!("API error {}: {}", status, text));
            }

            return Ok(response.json().await?);
        }
    }
}

/// Time until the window in `x-rate-limit-reset` (epoch seconds) opens,
/// capped at `max`. Falls back to `max` if the header is missing.
fn rate_limit_wait(headers: &reqwest::header::HeaderMap, max: Duration) -> Duration {
    headers
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .map(|reset| Duration::from_secs((reset - Utc::now().timestamp()).max(0) as u64))
        .map_or(max, |wait| wait.min(max))
}

#[async_trait]
impl PostSource for TwitterCollector {
    async fn fetch(&mut self, tag: &str, limit: usize) -> Result<Vec<RawRecord>> {
        let query = build_query(tag);
        let mut records = Vec::new();
        let mut next_token: Option<String> = None;

        while records.len() < limit {
            let page_size = (limit - records.len()).clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
            let page = self
                .fetch_page(&query, page_size, next_token.as_deref())
                .await?;

            let tweets = page.data.unwrap_or_default();
            if tweets.is_empty() {
                break;
            }

            for tweet in &tweets {
                if records.len() >= limit {
                    break;
                }
                match tweet_to_record(tweet) {
                    Ok(record) => {
                        records.push(record);
                        self.stats.record_collected();
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse tweet: {}", e);
                        self.stats.error_occurred();
                    }
                }
            }

            next_token = page.meta.and_then(|m| m.next_token);
            if next_token.is_none() {
                break;
            }
        }

        Ok(records)
    }

    fn name(&self) -> &str {
        "twitter"
    }
}

// ========== API Response Types ==========

/// Recent-search response body.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Tweets on this page; absent when there are no results
    pub data: Option<Vec<Value>>,
    pub meta: Option<SearchMeta>,
}

#[derive(Debug, Deserialize)]
pub struct SearchMeta {
    pub next_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tweet(id: &str, text: &str) -> Value {
        json!({
            "id": id,
            "text": text,
            "author_id": format!("user{id}"),
            "created_at": "2025-01-29T12:00:00.000Z",
            "public_metrics": {"like_count": 1, "retweet_count": 0, "reply_count": 0, "quote_count": 0}
        })
    }

    fn collector(server: &MockServer) -> TwitterCollector {
        TwitterCollector::new(
            TwitterCollectorConfig::new("test-token")
                .with_base_url(server.uri())
                .with_requests_per_minute(600)
                .with_max_rate_limit_wait(Duration::from_millis(10)),
        )
    }

    #[test]
    fn test_build_query() {
        assert_eq!(build_query("#nifty50"), "#nifty50 lang:en -is:retweet");
    }

    #[test]
    fn test_config_defaults() {
        let config = TwitterCollectorConfig::new("key");

        assert_eq!(config.base_url, TWITTER_API_URL);
        assert_eq!(config.requests_per_minute.get(), 60);
        assert_eq!(config.max_rate_limit_wait, Duration::from_secs(900));
        assert_eq!(config.max_rate_limit_retries, 3);
    }

    #[test]
    fn test_config_from_app_config() {
        let mut app = market_intel_core::AppConfig::default();
        app.collector.bearer_token = "abc".to_string();
        app.collector.requests_per_minute = 0;

        let config = TwitterCollectorConfig::from(&app.collector);

        assert_eq!(config.bearer_token, "abc");
        assert_eq!(config.base_url, "https://api.twitter.com");
        assert_eq!(config.requests_per_minute.get(), 1);
    }

    #[test]
    fn test_tweet_to_record() {
        let record = tweet_to_record(&json!({
            "id": "1",
            "text": "@desk buy #Nifty50 http://x.co",
            "author_id": "42",
            "created_at": "2025-01-29T12:00:00.000Z",
            "public_metrics": {"like_count": 3}
        }))
        .unwrap();

        assert_eq!(record.username(), Ok(Some("42")));
        assert_eq!(record.content(), Ok(Some("@desk buy #Nifty50 http://x.co")));
        assert!(record.timestamp().unwrap().is_some());
        assert_eq!(record.mentions(), Ok(Some(vec!["@desk".to_string()])));
        assert_eq!(record.hashtags(), Ok(Some(vec!["#Nifty50".to_string()])));
        assert_eq!(record.engagement().unwrap().unwrap().get("like_count"), Some(&3));
    }

    #[test]
    fn test_tweet_without_text_is_error() {
        assert!(tweet_to_record(&json!({"id": "1"})).is_err());
    }

    #[test]
    fn test_rate_limit_wait_is_capped() {
        let mut headers = reqwest::header::HeaderMap::new();
        let far = (Utc::now().timestamp() + 10_000).to_string();
        headers.insert("x-rate-limit-reset", far.parse().unwrap());

        assert_eq!(
            rate_limit_wait(&headers, Duration::from_secs(5)),
            Duration::from_secs(5)
        );

        let past = (Utc::now().timestamp() - 10).to_string();
        headers.insert("x-rate-limit-reset", past.parse().unwrap());
        assert_eq!(rate_limit_wait(&headers, Duration::from_secs(5)), Duration::ZERO);

        let empty = reqwest::header::HeaderMap::new();
        assert_eq!(
            rate_limit_wait(&empty, Duration::from_secs(5)),
            Duration::from_secs(5)
        );
    }

    #[tokio::test]
    async fn test_fetch_single_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RECENT_SEARCH_PATH))
            .and(query_param("query", "#nifty50 lang:en -is:retweet"))
            .and(query_param("tweet.fields", TWEET_FIELDS))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [tweet("1", "buy #Nifty50"), tweet("2", "sell #Nifty50")],
                "meta": {"result_count": 2}
            })))
            .mount(&server)
            .await;

        let mut collector = collector(&server);
        let records = collector.fetch("#nifty50", 50).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].content(), Ok(Some("buy #Nifty50")));
        assert_eq!(collector.stats().records_collected, 2);
        assert_eq!(collector.stats().requests_sent, 1);
    }

    #[tokio::test]
    async fn test_fetch_follows_next_token_until_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RECENT_SEARCH_PATH))
            .and(query_param("next_token", "page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [tweet("3", "three"), tweet("4", "four")],
                "meta": {"result_count": 2, "next_token": "page3"}
            })))
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(RECENT_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [tweet("1", "one"), tweet("2", "two")],
                "meta": {"result_count": 2, "next_token": "page2"}
            })))
            .mount(&server)
            .await;

        let mut collector = collector(&server);
        let records = collector.fetch("#sensex", 3).await.unwrap();

        let contents: Vec<_> = records.iter().map(|r| r.content().unwrap().unwrap()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        assert_eq!(collector.stats().requests_sent, 2);
    }

    #[tokio::test]
    async fn test_fetch_stops_without_next_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RECENT_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [tweet("1", "one")],
                "meta": {"result_count": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut collector = collector(&server);
        assert_eq!(collector.fetch("#intraday", 500).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_empty_results() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RECENT_SEARCH_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"meta": {"result_count": 0}})),
            )
            .mount(&server)
            .await;

        let mut collector = collector(&server);
        assert!(collector.fetch("#intraday", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_tweet_is_skipped() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RECENT_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [tweet("1", "one"), {"id": "2"}, tweet("3", "three")],
                "meta": {"result_count": 3}
            })))
            .mount(&server)
            .await;

        let mut collector = collector(&server);
        let records = collector.fetch("#nifty50", 10).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(collector.stats().errors_encountered, 1);
    }

    #[tokio::test]
    async fn test_rate_limit_then_success_retries_same_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RECENT_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(429).insert_header(
                "x-rate-limit-reset",
                Utc::now().timestamp().to_string().as_str(),
            ))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(RECENT_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [tweet("1", "one")],
                "meta": {"result_count": 1}
            })))
            .mount(&server)
            .await;

        let mut collector = collector(&server);
        let records = collector.fetch("#nifty50", 10).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(collector.stats().rate_limited, 1);
        assert_eq!(collector.stats().requests_sent, 2);
    }

    #[tokio::test]
    async fn test_persistent_rate_limit_gives_up() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RECENT_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let mut collector = collector(&server);
        assert!(collector.fetch("#nifty50", 10).await.is_err());
        assert_eq!(collector.stats().rate_limited, 4);
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RECENT_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let mut collector = collector(&server);
        let err = collector.fetch("#nifty50", 10).await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }
}
