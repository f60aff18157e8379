//! Scrape CLI command.
//!
//! Fetches posts for every configured hashtag and saves them as a raw JSON
//! snapshot for offline processing.

use anyhow::Result;
use clap::Args;
use market_intel_core::{AppConfig, CollectorConfig};
use market_intel_data::{JsonStorage, RawRecord};
use market_intel_signals::{
    collect_all_hashtags, CollectorStats, TwitterCollector, TwitterCollectorConfig,
};

/// Arguments for the scrape command.
#[derive(Args, Debug, Clone, Default)]
pub struct ScrapeArgs {
    /// Hashtags to track, comma separated (overrides config)
    #[arg(long, value_delimiter = ',')]
    pub hashtags: Vec<String>,

    /// Maximum posts per hashtag (overrides config)
    #[arg(long)]
    pub limit: Option<usize>,

    /// API bearer token (overrides config)
    #[arg(long, env = "TWITTER_BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    /// Raw snapshot output path (overrides config)
    #[arg(short, long)]
    pub output: Option<String>,
}

impl ScrapeArgs {
    /// Applies command-line overrides to the collector section.
    ///
    /// Blank `--hashtags` entries are dropped; if none remain the configured
    /// hashtags are kept.
    pub fn resolve(&self, base: &CollectorConfig) -> CollectorConfig {
        let mut config = base.clone();
        let hashtags: Vec<String> = self
            .hashtags
            .iter()
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .collect();
        if !hashtags.is_empty() {
            config.hashtags = hashtags;
        }
        if let Some(limit) = self.limit {
            config.max_records_per_tag = limit;
        }
        if let Some(ref token) = self.bearer_token {
            config.bearer_token = token.clone();
        }
        config
    }
}

/// Collects raw posts for every hashtag in `config`.
///
/// Per-tag failures are logged by the collector and never abort the run.
pub async fn scrape(config: &CollectorConfig) -> Vec<RawRecord> {
    if config.bearer_token.is_empty() {
        tracing::warn!("No bearer token configured; requests will be rejected");
    }

    let mut collector = TwitterCollector::new(TwitterCollectorConfig::from(config));
    let records =
        collect_all_hashtags(&mut collector, &config.hashtags, config.max_records_per_tag).await;

    tracing::info!("{}", stats_line(records.len(), collector.stats()));

    records
}

fn stats_line(scraped: usize, stats: &CollectorStats) -> String {
    let last = stats
        .last_record_time
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    format!(
        "Scraped {} posts in {} requests ({} errors, {} rate limits, last post received {})",
        scraped, stats.requests_sent, stats.errors_encountered, stats.rate_limited, last
    )
}

/// Runs the scrape command.
///
/// # Errors
/// Returns an error if the snapshot cannot be written.
pub async fn run_scrape(args: ScrapeArgs, config: &AppConfig) -> Result<()> {
    let collector_config = args.resolve(&config.collector);
    let output = args
        .output
        .unwrap_or_else(|| config.output.raw_data_path.clone());

    let records = scrape(&collector_config).await;
    if records.is_empty() {
        tracing::warn!("No posts were scraped, nothing to save");
        return Ok(());
    }

    JsonStorage::write_raw(&output, &records)?;
    println!("Saved {} raw posts to {}", records.len(), output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_drops_blank_hashtags() {
        let args = ScrapeArgs {
            hashtags: vec!["#sensex".to_string(), "  ".to_string(), String::new()],
            ..Default::default()
        };

        let config = args.resolve(&AppConfig::default().collector);

        assert_eq!(config.hashtags, vec!["#sensex".to_string()]);
    }

    #[test]
    fn test_stats_line_reports_last_record_time() {
        let mut stats = CollectorStats::default();
        assert!(stats_line(0, &stats).ends_with("last post received never"));

        stats.request_sent();
        stats.record_collected();
        let line = stats_line(1, &stats);

        assert!(line.starts_with("Scraped 1 posts in 1 requests (0 errors, 0 rate limits"));
        assert!(line.ends_with(" UTC"));
    }

    #[test]
    fn test_resolve_only_blank_hashtags_keeps_configured() {
        let base = AppConfig::default().collector;
        let args = ScrapeArgs {
            hashtags: vec![" ".to_string()],
            limit: Some(10),
            ..Default::default()
        };

        let config = args.resolve(&base);

        assert_eq!(config.hashtags, base.hashtags);
        assert_eq!(config.max_records_per_tag, 10);
    }
}
