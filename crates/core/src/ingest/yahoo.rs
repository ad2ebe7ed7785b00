use crate::config::Settings;
use crate::ingest::provider::MarketDataProvider;
use crate::ingest::types::{CompanyProfile, DailyBar, NewsItem};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) tickerboard/0.1";

const QUOTE_SUMMARY_MODULES: &str = "price,summaryDetail,financialData";

/// Market-data client for the Yahoo Finance public JSON endpoints.
#[derive(Debug, Clone)]
pub struct YahooFinanceClient {
    http: reqwest::Client,
    base_url: String,
}

impl YahooFinanceClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .market_data_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build market data http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .context("market data request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read market data response")?;
        let json = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("market data response is not valid JSON: {text}"))?;

        if !status.is_success() {
            anyhow::bail!("market data HTTP {status}: {json}");
        }
        Ok(json)
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for YahooFinanceClient {
    fn provider_name(&self) -> &'static str {
        "yahoo_finance"
    }

    async fn fetch_daily_bars(&self, symbol: &str, days: u32) -> Result<Vec<DailyBar>> {
        let url = format!("{}/v8/finance/chart/{symbol}", self.base_url);
        let json = self
            .get_json(
                &url,
                &[
                    ("range", format!("{days}d")),
                    ("interval", "1d".to_string()),
                ],
            )
            .await?;

        let envelope = serde_json::from_value::<ChartEnvelope>(json)
            .context("failed to parse chart response")?;
        bars_from_chart(envelope)
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        let url = format!("{}/v10/finance/quoteSummary/{symbol}", self.base_url);
        let json = self
            .get_json(&url, &[("modules", QUOTE_SUMMARY_MODULES.to_string())])
            .await?;

        let envelope = serde_json::from_value::<QuoteSummaryEnvelope>(json)
            .context("failed to parse quote summary response")?;
        Ok(profile_from_summary(envelope))
    }

    async fn fetch_news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsItem>> {
        let url = format!("{}/v1/finance/search", self.base_url);
        let json = self
            .get_json(
                &url,
                &[
                    ("q", symbol.to_string()),
                    ("newsCount", limit.to_string()),
                    ("quotesCount", "0".to_string()),
                ],
            )
            .await?;

        let envelope = serde_json::from_value::<SearchEnvelope>(json)
            .context("failed to parse news search response")?;

        let mut out: Vec<NewsItem> = envelope
            .news
            .unwrap_or_default()
            .into_iter()
            .map(|n| NewsItem {
                title: n.title,
                summary: n.summary,
            })
            .collect();
        out.truncate(limit);
        Ok(out)
    }
}

// Wire shapes. Every leaf is optional: Yahoo null-fills bars for halted
// days and omits modules it has no data for.

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn bars_from_chart(envelope: ChartEnvelope) -> Result<Vec<DailyBar>> {
    if let Some(err) = envelope.chart.error {
        if !err.is_null() {
            anyhow::bail!("chart endpoint returned error: {err}");
        }
    }

    let Some(mut results) = envelope.chart.result else {
        return Ok(Vec::new());
    };
    let Some(result) = results.drain(..).next() else {
        return Ok(Vec::new());
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let Some(dt) = DateTime::<Utc>::from_timestamp(*ts, 0) else {
            anyhow::bail!("chart bar has out-of-range timestamp: {ts}");
        };
        bars.push(DailyBar {
            date: dt.date_naive(),
            open: quote.open.get(i).copied().flatten(),
            high: quote.high.get(i).copied().flatten(),
            low: quote.low.get(i).copied().flatten(),
            close: quote.close.get(i).copied().flatten(),
            volume: quote.volume.get(i).copied().flatten(),
        });
    }
    Ok(bars)
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSummaryResult {
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(rename = "financialData")]
    financial_data: Option<FinancialDataModule>,
}

#[derive(Debug, Deserialize)]
struct PriceModule {
    #[serde(rename = "shortName")]
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryDetailModule {
    #[serde(rename = "fiftyTwoWeekHigh")]
    fifty_two_week_high: Option<RawValue>,
    #[serde(rename = "fiftyTwoWeekLow")]
    fifty_two_week_low: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct FinancialDataModule {
    #[serde(rename = "recommendationKey")]
    recommendation_key: Option<String>,
}

/// Yahoo wraps numbers as `{"raw": 123.4, "fmt": "123.40"}`.
#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

fn profile_from_summary(envelope: QuoteSummaryEnvelope) -> CompanyProfile {
    let result = envelope
        .quote_summary
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .unwrap_or_default();

    CompanyProfile {
        short_name: result.price.and_then(|p| p.short_name),
        fifty_two_week_high: result
            .summary_detail
            .as_ref()
            .and_then(|d| d.fifty_two_week_high.as_ref())
            .and_then(|v| v.raw),
        fifty_two_week_low: result
            .summary_detail
            .as_ref()
            .and_then(|d| d.fifty_two_week_low.as_ref())
            .and_then(|v| v.raw),
        recommendation_key: result.financial_data.and_then(|f| f.recommendation_key),
    }
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    news: Option<Vec<SearchNewsItem>>,
}

#[derive(Debug, Deserialize)]
struct SearchNewsItem {
    title: Option<String>,
    summary: Option<String>,
}
