use crate::domain::snapshot::TickerSnapshot;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Wipes the snapshot collection. Runs before any fetch begins, so a crash
/// mid-run leaves the collection empty rather than holding the prior run's
/// data. Documented risk, not remediated.
pub async fn clear_snapshots(pool: &sqlx::PgPool) -> anyhow::Result<u64> {
    let res = sqlx::query("DELETE FROM ticker_snapshots")
        .execute(pool)
        .await
        .context("clear ticker_snapshots failed")?;
    Ok(res.rows_affected())
}

/// Bulk-inserts the full run in one transaction. This is the only write of
/// a run: assembly failures upstream mean nothing reaches this call.
pub async fn insert_snapshots(
    pool: &sqlx::PgPool,
    documents: &[TickerSnapshot],
) -> anyhow::Result<u64> {
    anyhow::ensure!(!documents.is_empty(), "documents must be non-empty");

    let mut tx = pool.begin().await.context("begin transaction failed")?;

    let mut qb =
        sqlx::QueryBuilder::new("INSERT INTO ticker_snapshots (ticker, run_date, doc) ");
    let mut docs_json = Vec::with_capacity(documents.len());
    for doc in documents {
        let json = serde_json::to_value(doc)
            .with_context(|| format!("failed to serialize snapshot for {}", doc.ticker))?;
        docs_json.push(json);
    }
    qb.push_values(documents.iter().zip(docs_json), |mut b, (doc, json)| {
        b.push_bind(&doc.ticker).push_bind(doc.date).push_bind(json);
    });

    let res = qb
        .build()
        .persistent(false)
        .execute(&mut *tx)
        .await
        .context("bulk insert ticker_snapshots failed")?;

    tx.commit().await.context("commit transaction failed")?;
    Ok(res.rows_affected())
}

/// Reads the whole collection with no filtering or explicit sort; the
/// dashboard renders in whatever order storage yields.
pub async fn fetch_all_snapshots(pool: &sqlx::PgPool) -> anyhow::Result<Vec<TickerSnapshot>> {
    let rows = sqlx::query_as::<_, (serde_json::Value,)>("SELECT doc FROM ticker_snapshots")
        .fetch_all(pool)
        .await
        .context("read ticker_snapshots failed")?;

    let mut out = Vec::with_capacity(rows.len());
    for (doc,) in rows {
        let snapshot = serde_json::from_value::<TickerSnapshot>(doc)
            .context("stored snapshot document has unexpected shape")?;
        out.push(snapshot);
    }
    Ok(out)
}

pub async fn record_run(
    pool: &sqlx::PgPool,
    run_date: NaiveDate,
    status: &str,
    error: Option<&str>,
    tickers_total: usize,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let generated_at: DateTime<Utc> = Utc::now();

    sqlx::query(
        "INSERT INTO snapshot_runs (id, run_date, generated_at, status, error, tickers_total) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .persistent(false)
    .bind(id)
    .bind(run_date)
    .bind(generated_at)
    .bind(status)
    .bind(error)
    .bind(tickers_total as i32)
    .execute(pool)
    .await
    .context("insert snapshot_runs failed")?;

    Ok(id)
}
