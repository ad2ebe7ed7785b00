use crate::domain::series::{convert, last_n_padded, moving_avg_5, percent_change};
use crate::domain::snapshot::{
    display_company_name, display_ticker, PriceMetrics, TickerSnapshot, VolumeMetrics,
    NOT_AVAILABLE, NO_NEWS_SENTINEL,
};
use crate::ingest::logo::LogoClient;
use crate::ingest::provider::MarketDataProvider;
use crate::ingest::types::NewsItem;
use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Calendar days requested per ticker: 5 trading days plus buffer for
/// weekends and holidays.
const BAR_WINDOW_DAYS: u32 = 10;

/// Headlines kept per ticker.
const NEWS_LIMIT: usize = 2;

/// Character cap applied to each news summary.
const SUMMARY_CAP: usize = 200;

/// Seam for the logo collaborator so assembly can be exercised without
/// HTTP.
#[async_trait::async_trait]
pub trait LogoLookup: Send + Sync {
    async fn logo_url(&self, ticker: &str) -> Result<String>;
}

#[async_trait::async_trait]
impl LogoLookup for LogoClient {
    async fn logo_url(&self, ticker: &str) -> Result<String> {
        LogoClient::logo_url(self, ticker).await
    }
}

/// Builds one `TickerSnapshot` for `symbol` using the given per-run
/// conversion rate. Any unrecoverable fetch error propagates with the
/// symbol attached and aborts the whole batch.
pub async fn assemble_snapshot(
    provider: &dyn MarketDataProvider,
    logos: &dyn LogoLookup,
    symbol: &str,
    usd_eur_rate: f64,
    date: NaiveDate,
) -> Result<TickerSnapshot> {
    let bars = provider
        .fetch_daily_bars(symbol, BAR_WINDOW_DAYS)
        .await
        .with_context(|| format!("{symbol}: failed to download daily bars"))?;

    // Trailing 5-point close series, chronological, left-padded with None
    // when history is short (newly listed or illiquid tickers).
    let closes_raw: Vec<Option<f64>> = bars.iter().map(|b| b.close).collect();
    let closes_eur =
        last_n_padded::<5>(&closes_raw).map(|c| c.map(|v| convert(v, usd_eur_rate)));
    let [close_4, close_3, close_2, close_yesterday, close_today] = closes_eur;

    let yesterday_change = percent_change(close_today, close_yesterday);
    // Mean of the raw close series, converted once at the end (equivalent
    // to averaging the unrounded converted closes).
    let close_moving_avg_5d = moving_avg_5(&closes_raw).map(|m| convert(m, usd_eur_rate));

    let (open_today, low_today, high_today) = match bars.last() {
        Some(bar) => (
            bar.open.map(|v| convert(v, usd_eur_rate)),
            bar.low.map(|v| convert(v, usd_eur_rate)),
            bar.high.map(|v| convert(v, usd_eur_rate)),
        ),
        None => (None, None, None),
    };

    // Volume is a share count: same trailing window, never converted.
    let volumes: Vec<Option<f64>> = bars.iter().map(|b| b.volume).collect();
    let [volume_4, volume_3, volume_2, volume_yesterday, volume_today] =
        last_n_padded::<5>(&volumes);
    let volume_change = percent_change(volume_today, volume_yesterday);

    let profile = provider
        .fetch_profile(symbol)
        .await
        .with_context(|| format!("{symbol}: failed to fetch company profile"))?;

    let company_name = display_company_name(
        profile.short_name.as_deref().unwrap_or(NOT_AVAILABLE),
    );
    let high_52wk = convert(profile.fifty_two_week_high.unwrap_or(0.0), usd_eur_rate);
    let low_52wk = convert(profile.fifty_two_week_low.unwrap_or(0.0), usd_eur_rate);
    let analyst_recommendation = profile
        .recommendation_key
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let news_items = provider
        .fetch_news(symbol, NEWS_LIMIT)
        .await
        .with_context(|| format!("{symbol}: failed to fetch news"))?;
    let news = format_news(&news_items);

    let company_logo_url = logos
        .logo_url(symbol)
        .await
        .with_context(|| format!("{symbol}: failed to resolve company logo"))?;

    Ok(TickerSnapshot {
        ticker: display_ticker(symbol),
        date,
        company_name,
        company_logo_url,
        price: PriceMetrics {
            open_today,
            low_today,
            high_today,
            low_52wk,
            high_52wk,
            close_today,
            close_yesterday,
            close_2,
            close_3,
            close_4,
            close_moving_avg_5d,
            yesterday_change,
        },
        volume: VolumeMetrics {
            close_today: volume_today,
            close_yesterday: volume_yesterday,
            close_2: volume_2,
            close_3: volume_3,
            close_4: volume_4,
            yesterday_change: volume_change,
        },
        news,
        analyst_recommendation,
    })
}

/// Assembles one document per ticker, in input order. The first failure
/// aborts the whole batch so nothing from this run gets persisted.
pub async fn assemble_all(
    provider: &dyn MarketDataProvider,
    logos: &dyn LogoLookup,
    tickers: &[String],
    usd_eur_rate: f64,
    date: NaiveDate,
) -> Result<Vec<TickerSnapshot>> {
    let total = tickers.len();
    let mut documents = Vec::with_capacity(total);

    for (idx, ticker) in tickers.iter().enumerate() {
        tracing::info!(%ticker, n = idx + 1, total, "processing ticker");
        let doc = assemble_snapshot(provider, logos, ticker, usd_eur_rate, date)
            .await
            .with_context(|| format!("failed to assemble document for {ticker}"))?;
        documents.push(doc);
    }

    Ok(documents)
}

fn format_news(items: &[NewsItem]) -> Vec<String> {
    if items.is_empty() {
        return vec![NO_NEWS_SENTINEL.to_string()];
    }

    items
        .iter()
        .map(|item| {
            let title = item.title.as_deref().unwrap_or("No title available");
            let summary = item.summary.as_deref().unwrap_or("No summary available");
            let summary: String = summary.chars().take(SUMMARY_CAP).collect();
            format!("{title}: {summary}")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::testutil::{MockLogos, MockProvider};
    use crate::ingest::types::{CompanyProfile, DailyBar};
    use chrono::NaiveDate;

    fn run_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 28).unwrap()
    }

    fn bar(day: u32, close: f64, volume: f64) -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
            open: Some(close - 1.0),
            high: Some(close + 2.0),
            low: Some(close - 2.0),
            close: Some(close),
            volume: Some(volume),
        }
    }

    fn aapl_provider() -> MockProvider {
        MockProvider::default()
            .with_bars(
                "AAPL",
                vec![
                    bar(24, 150.0, 1_000_000.0),
                    bar(25, 152.0, 1_100_000.0),
                    bar(26, 151.0, 900_000.0),
                    bar(27, 153.0, 1_200_000.0),
                    bar(28, 154.0, 1_500_000.0),
                ],
            )
            .with_profile(
                "AAPL",
                CompanyProfile {
                    short_name: Some("Apple Inc.".to_string()),
                    fifty_two_week_high: Some(260.0),
                    fifty_two_week_low: Some(164.0),
                    recommendation_key: Some("buy".to_string()),
                },
            )
            .with_news(
                "AAPL",
                vec![
                    NewsItem {
                        title: Some("Apple ships".to_string()),
                        summary: Some("A product".to_string()),
                    },
                    NewsItem {
                        title: Some("Apple earns".to_string()),
                        summary: None,
                    },
                ],
            )
    }

    #[tokio::test]
    async fn assembles_apple_snapshot_end_to_end() {
        let provider = aapl_provider();
        let doc = assemble_snapshot(&provider, &MockLogos, "AAPL", 0.92, run_date())
            .await
            .unwrap();

        assert_eq!(doc.ticker, "AAPL");
        assert_eq!(doc.date, run_date());
        assert_eq!(doc.company_name, "Apple Inc.");
        assert_eq!(doc.company_logo_url, "https://logos.test/apple.com");

        // Each close converted and rounded independently: raw/0.92.
        assert_eq!(doc.price.close_4, Some(163.04));
        assert_eq!(doc.price.close_3, Some(165.22));
        assert_eq!(doc.price.close_2, Some(164.13));
        assert_eq!(doc.price.close_yesterday, Some(166.3));
        assert_eq!(doc.price.close_today, Some(167.39));

        // (167.39 - 166.30) / 166.30 * 100 = 0.6554... -> 0.66.
        assert_eq!(doc.price.yesterday_change, Some(0.66));

        // Mean of raw closes is 152.0; 152 / 0.92 = 165.217... -> 165.22.
        assert_eq!(doc.price.close_moving_avg_5d, Some(165.22));

        // Last bar OHL, converted: open 153, low 152, high 156.
        assert_eq!(doc.price.open_today, Some(166.3));
        assert_eq!(doc.price.low_today, Some(165.22));
        assert_eq!(doc.price.high_today, Some(169.57));

        // 52-week levels from the profile: 260 / 0.92, 164 / 0.92.
        assert_eq!(doc.price.high_52wk, 282.61);
        assert_eq!(doc.price.low_52wk, 178.26);

        // Volume is unconverted; change (1.5M - 1.2M) / 1.2M = 25%.
        assert_eq!(doc.volume.close_today, Some(1_500_000.0));
        assert_eq!(doc.volume.close_4, Some(1_000_000.0));
        assert_eq!(doc.volume.yesterday_change, Some(25.0));

        assert_eq!(
            doc.news,
            vec![
                "Apple ships: A product".to_string(),
                "Apple earns: No summary available".to_string(),
            ]
        );
        assert_eq!(doc.analyst_recommendation, "buy");
    }

    #[tokio::test]
    async fn short_history_null_fills_instead_of_raising() {
        let provider = MockProvider::default().with_bars(
            "NEWCO",
            vec![bar(27, 100.0, 500.0), bar(28, 110.0, 600.0)],
        );
        let doc = assemble_snapshot(&provider, &MockLogos, "NEWCO", 1.0, run_date())
            .await
            .unwrap();

        assert_eq!(doc.price.close_4, None);
        assert_eq!(doc.price.close_3, None);
        assert_eq!(doc.price.close_2, None);
        assert_eq!(doc.price.close_yesterday, Some(100.0));
        assert_eq!(doc.price.close_today, Some(110.0));
        assert_eq!(doc.price.yesterday_change, Some(10.0));
        // Fewer than 5 bars: no moving average.
        assert_eq!(doc.price.close_moving_avg_5d, None);
    }

    #[tokio::test]
    async fn single_bar_has_no_derived_fields() {
        let provider = MockProvider::default().with_bars("NEWCO", vec![bar(28, 100.0, 500.0)]);
        let doc = assemble_snapshot(&provider, &MockLogos, "NEWCO", 1.0, run_date())
            .await
            .unwrap();

        assert_eq!(doc.price.close_today, Some(100.0));
        assert_eq!(doc.price.yesterday_change, None);
        assert_eq!(doc.volume.yesterday_change, None);
        assert_eq!(doc.price.close_moving_avg_5d, None);
    }

    #[tokio::test]
    async fn empty_window_nulls_ohl_collectively() {
        let provider = MockProvider::default().with_bars("NEWCO", vec![]);
        let doc = assemble_snapshot(&provider, &MockLogos, "NEWCO", 1.0, run_date())
            .await
            .unwrap();

        assert_eq!(doc.price.open_today, None);
        assert_eq!(doc.price.low_today, None);
        assert_eq!(doc.price.high_today, None);
        assert_eq!(doc.price.close_today, None);
    }

    #[tokio::test]
    async fn crypto_suffix_is_stripped_from_ticker_and_name() {
        let provider = MockProvider::default()
            .with_bars("BTC-USD", vec![bar(28, 46_000.0, 100.0)])
            .with_profile(
                "BTC-USD",
                CompanyProfile {
                    short_name: Some("Bitcoin USD".to_string()),
                    ..Default::default()
                },
            );
        let doc = assemble_snapshot(&provider, &MockLogos, "BTC-USD", 1.0, run_date())
            .await
            .unwrap();

        assert_eq!(doc.ticker, "BTC");
        assert_eq!(doc.company_name, "Bitcoin");
        // Crypto has no analyst coverage.
        assert_eq!(doc.analyst_recommendation, "N/A");
        // Missing 52-week levels fall back to 0 before conversion.
        assert_eq!(doc.price.high_52wk, 0.0);
    }

    #[tokio::test]
    async fn no_news_substitutes_sentinel_list() {
        let provider = MockProvider::default().with_bars("AAPL", vec![bar(28, 150.0, 1.0)]);
        let doc = assemble_snapshot(&provider, &MockLogos, "AAPL", 1.0, run_date())
            .await
            .unwrap();
        assert_eq!(doc.news, vec![NO_NEWS_SENTINEL.to_string()]);
    }

    #[tokio::test]
    async fn summary_cap_is_char_boundary_safe() {
        let long_summary: String = "é".repeat(300);
        let provider = MockProvider::default()
            .with_bars("AAPL", vec![bar(28, 150.0, 1.0)])
            .with_news(
                "AAPL",
                vec![NewsItem {
                    title: Some("T".to_string()),
                    summary: Some(long_summary),
                }],
            );
        let doc = assemble_snapshot(&provider, &MockLogos, "AAPL", 1.0, run_date())
            .await
            .unwrap();
        assert_eq!(doc.news[0], format!("T: {}", "é".repeat(200)));
    }

    #[tokio::test]
    async fn one_bad_ticker_aborts_the_whole_batch() {
        let provider = aapl_provider().failing_on("MSFT");
        let tickers = vec!["AAPL".to_string(), "MSFT".to_string(), "GOOGL".to_string()];

        let err = assemble_all(&provider, &MockLogos, &tickers, 0.92, run_date())
            .await
            .unwrap_err();

        // The error names the offending ticker; no documents are produced.
        assert!(format!("{err:#}").contains("MSFT"));
    }
}
