use anyhow::Context;
use chrono::NaiveDate;
use tickerboard_core::ingest::assemble::{assemble_all, LogoLookup};
use tickerboard_core::ingest::fx::fetch_usd_eur_rate;
use tickerboard_core::ingest::provider::MarketDataProvider;
use tickerboard_core::storage::snapshots;

/// The extraction/transform stage: clear, fetch the rate once, assemble
/// one document per ticker in input order, then bulk-insert everything at
/// the end. A failure on ticker N means tickers 1..N-1 were computed but
/// never persisted.
pub async fn run_extraction(
    pool: &sqlx::PgPool,
    provider: &dyn MarketDataProvider,
    logos: &dyn LogoLookup,
    tickers: &[String],
    run_date: NaiveDate,
) -> anyhow::Result<u64> {
    anyhow::ensure!(!tickers.is_empty(), "ticker list must be non-empty");

    // Clearing happens before any fetch. There is no atomicity between the
    // clear and the insert; a reader in between observes an empty
    // collection.
    let cleared = snapshots::clear_snapshots(pool)
        .await
        .context("failed to clear snapshot collection")?;
    tracing::debug!(cleared, "snapshot collection cleared");

    let rate = fetch_usd_eur_rate(provider).await?;
    tracing::info!(rate, "USD/EUR conversion rate for this run");

    let documents = assemble_all(provider, logos, tickers, rate, run_date).await?;

    let inserted = snapshots::insert_snapshots(pool, &documents).await?;
    snapshots::record_run(pool, run_date, "success", None, tickers.len()).await?;

    Ok(inserted)
}
