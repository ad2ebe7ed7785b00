//! In-memory provider doubles for exercising assembly and fx logic.

use crate::ingest::assemble::LogoLookup;
use crate::ingest::provider::MarketDataProvider;
use crate::ingest::types::{CompanyProfile, DailyBar, NewsItem};
use anyhow::Result;
use std::collections::HashMap;

#[derive(Default)]
pub struct MockProvider {
    bars: HashMap<String, Vec<DailyBar>>,
    profiles: HashMap<String, CompanyProfile>,
    news: HashMap<String, Vec<NewsItem>>,
    fail_on: Option<String>,
}

impl MockProvider {
    pub fn with_bars(mut self, symbol: &str, bars: Vec<DailyBar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_profile(mut self, symbol: &str, profile: CompanyProfile) -> Self {
        self.profiles.insert(symbol.to_string(), profile);
        self
    }

    pub fn with_news(mut self, symbol: &str, news: Vec<NewsItem>) -> Self {
        self.news.insert(symbol.to_string(), news);
        self
    }

    /// Any fetch for `symbol` fails, mimicking an upstream outage.
    pub fn failing_on(mut self, symbol: &str) -> Self {
        self.fail_on = Some(symbol.to_string());
        self
    }

    fn check_failure(&self, symbol: &str) -> Result<()> {
        if self.fail_on.as_deref() == Some(symbol) {
            anyhow::bail!("simulated provider outage for {symbol}");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for MockProvider {
    fn provider_name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_daily_bars(&self, symbol: &str, _days: u32) -> Result<Vec<DailyBar>> {
        self.check_failure(symbol)?;
        Ok(self.bars.get(symbol).cloned().unwrap_or_default())
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        self.check_failure(symbol)?;
        Ok(self.profiles.get(symbol).cloned().unwrap_or_default())
    }

    async fn fetch_news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsItem>> {
        self.check_failure(symbol)?;
        let mut news = self.news.get(symbol).cloned().unwrap_or_default();
        news.truncate(limit);
        Ok(news)
    }
}

/// Logo lookup double: every mapped ticker resolves to a fixed fake URL,
/// everything else to the sentinel.
pub struct MockLogos;

#[async_trait::async_trait]
impl LogoLookup for MockLogos {
    async fn logo_url(&self, ticker: &str) -> Result<String> {
        match crate::ingest::logo::LogoClient::domain_for(ticker) {
            Some(domain) => Ok(format!("https://logos.test/{domain}")),
            None => Ok(crate::domain::snapshot::NOT_AVAILABLE.to_string()),
        }
    }
}
