use anyhow::Result;
use async_trait::async_trait;
use market_intel_data::RawRecord;

/// Ingestion collaborator: fetches raw posts for one hashtag.
#[async_trait]
pub trait PostSource: Send {
    /// Fetches at most `limit` posts tagged with `tag`.
    async fn fetch(&mut self, tag: &str, limit: usize) -> Result<Vec<RawRecord>>;
    fn name(&self) -> &str;
}

/// Presentation collaborator: renders a signal sequence, fire-and-forget.
pub trait SignalRenderer {
    /// Renders `values`, downsampled to at most `sample_size` points.
    fn render(&self, values: &[f64], sample_size: usize) -> Result<()>;
}
