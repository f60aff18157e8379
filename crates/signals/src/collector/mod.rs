//! Post collectors.
//!
//! - `TwitterCollector`: X API v2 recent search, paginated and rate limited
//! - `collect_all_hashtags`: runs any `PostSource` over a hashtag list,
//!   isolating failures per hashtag

mod twitter_collector;
mod types;

pub use twitter_collector::{
    build_query, tweet_to_record, SearchMeta, SearchResponse, TwitterCollector,
    TwitterCollectorConfig, MAX_PAGE_SIZE, MIN_PAGE_SIZE, RECENT_SEARCH_PATH, TWEET_FIELDS,
    TWITTER_API_URL,
};
pub use types::CollectorStats;

use market_intel_core::PostSource;
use market_intel_data::RawRecord;

/// Fetches up to `limit` posts for each tag and concatenates the results.
///
/// A tag whose fetch fails is logged and contributes nothing; the remaining
/// tags are still fetched.
pub async fn collect_all_hashtags(
    source: &mut dyn PostSource,
    tags: &[String],
    limit: usize,
) -> Vec<RawRecord> {
    let mut all = Vec::new();

    for tag in tags {
        tracing::info!("Scraping {} posts for {}", source.name(), tag);
        match source.fetch(tag, limit).await {
            Ok(records) => {
                tracing::info!("Collected {} posts for {}", records.len(), tag);
                all.extend(records);
            }
            Err(e) => {
                tracing::error!("Error fetching posts for {}: {}", tag, e);
            }
        }
    }

    all
}
