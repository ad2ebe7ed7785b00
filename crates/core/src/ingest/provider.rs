use crate::ingest::types::{CompanyProfile, DailyBar, NewsItem};
use anyhow::Result;

/// Upstream market-data provider boundary. All operations can fail; callers
/// propagate the failure with the offending symbol attached.
#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Daily OHLCV bars for `symbol` over a trailing window of `days`
    /// calendar days, in chronological order.
    async fn fetch_daily_bars(&self, symbol: &str, days: u32) -> Result<Vec<DailyBar>>;

    /// Scalar metadata for `symbol`.
    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile>;

    /// Up to `limit` most-recent news items for `symbol`.
    async fn fetch_news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsItem>>;
}
