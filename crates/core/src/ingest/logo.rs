use crate::config::Settings;
use crate::domain::snapshot::NOT_AVAILABLE;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://logo.clearbit.com";
const LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Company domains keyed by ticker. The logo service resolves logos by
/// domain, so unmapped tickers short-circuit to the `N/A` sentinel without
/// any HTTP call.
const COMPANY_DOMAINS: [(&str, &str); 33] = [
    ("AAPL", "apple.com"),
    ("MSFT", "microsoft.com"),
    ("GOOGL", "google.com"),
    ("AMZN", "amazon.com"),
    ("TSLA", "tesla.com"),
    ("META", "meta.com"),
    ("NVDA", "nvidia.com"),
    ("BRK-B", "berkshirehathaway.com"),
    ("V", "visa.com"),
    ("UNH", "unitedhealthgroup.com"),
    ("JNJ", "jnj.com"),
    ("WMT", "walmart.com"),
    ("MA", "mastercard.com"),
    ("PYPL", "paypal.com"),
    ("DIS", "thewaltdisneycompany.com"),
    ("BA", "boeing.com"),
    ("HD", "homedepot.com"),
    ("PFE", "pfizer.com"),
    ("INTC", "intel.com"),
    ("KO", "coca-cola.com"),
    ("GS", "goldmansachs.com"),
    ("IBM", "ibm.com"),
    ("CVX", "chevron.com"),
    ("XOM", "exxonmobil.com"),
    ("ABT", "abbott.com"),
    ("BTC-USD", "bitcoin.org"),
    ("ETH-USD", "ethereum.org"),
    ("BNB-USD", "binance.org"),
    ("XRP-USD", "ripple.com"),
    ("ADA-USD", "cardano.org"),
    ("DOGE-USD", "dogecoin.com"),
    ("SOL-USD", "solana.com"),
    ("XLM-USD", "stellar.org"),
];

/// Logo lookup collaborator: a keyed HTTP GET by company domain. Success is
/// a 200; anything else yields the sentinel. The short timeout here is
/// deliberate, the primary data fetches carry none.
#[derive(Debug, Clone)]
pub struct LogoClient {
    http: reqwest::Client,
    base_url: String,
}

impl LogoClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .logo_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
            .build()
            .context("failed to build logo http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn domain_for(ticker: &str) -> Option<&'static str> {
        COMPANY_DOMAINS
            .iter()
            .find(|(t, _)| *t == ticker)
            .map(|(_, d)| *d)
    }

    /// Resolves the logo URL for `ticker`, or `"N/A"` when the ticker is
    /// unmapped or the lookup does not answer 200. Transport failures
    /// propagate.
    pub async fn logo_url(&self, ticker: &str) -> Result<String> {
        let Some(domain) = Self::domain_for(ticker) else {
            tracing::warn!(%ticker, "company domain not found for ticker");
            return Ok(NOT_AVAILABLE.to_string());
        };

        let url = format!("{}/{domain}", self.base_url);
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("{ticker}: logo lookup request failed"))?;

        if res.status() == StatusCode::OK {
            Ok(url)
        } else {
            tracing::warn!(%ticker, status = %res.status(), "logo lookup did not resolve");
            Ok(NOT_AVAILABLE.to_string())
        }
    }
}
