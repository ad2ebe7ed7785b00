use crate::ingest::provider::MarketDataProvider;
use anyhow::{Context, Result};

const FX_SYMBOL: &str = "EURUSD=X";

/// Fetches the most recent daily closing USD->EUR rate. Invoked exactly
/// once per run; the scalar is threaded through every per-ticker
/// conversion so all values in a run use an identical rate.
pub async fn fetch_usd_eur_rate(provider: &dyn MarketDataProvider) -> Result<f64> {
    let bars = provider
        .fetch_daily_bars(FX_SYMBOL, 1)
        .await
        .context("failed to fetch USD/EUR exchange rate")?;

    let rate = bars
        .iter()
        .rev()
        .find_map(|bar| bar.close)
        .context("exchange rate feed returned no closing value")?;

    anyhow::ensure!(
        rate.is_finite() && rate > 0.0,
        "exchange rate must be positive and finite (got {rate})"
    );
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::testutil::MockProvider;
    use chrono::NaiveDate;

    fn bar(close: Option<f64>) -> crate::ingest::types::DailyBar {
        crate::ingest::types::DailyBar {
            date: NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    #[tokio::test]
    async fn returns_latest_available_close() {
        let provider = MockProvider::default().with_bars(FX_SYMBOL, vec![bar(Some(0.92))]);
        let rate = fetch_usd_eur_rate(&provider).await.unwrap();
        assert_eq!(rate, 0.92);
    }

    #[tokio::test]
    async fn empty_feed_is_an_error() {
        let provider = MockProvider::default().with_bars(FX_SYMBOL, vec![]);
        let err = fetch_usd_eur_rate(&provider).await.unwrap_err();
        assert!(err.to_string().contains("no closing value"));
    }

    #[tokio::test]
    async fn non_positive_rate_is_rejected() {
        let provider = MockProvider::default().with_bars(FX_SYMBOL, vec![bar(Some(0.0))]);
        assert!(fetch_usd_eur_rate(&provider).await.is_err());
    }
}
