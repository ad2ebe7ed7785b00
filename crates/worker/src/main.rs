use anyhow::Context;
use clap::Parser;
use tickerboard_core::ingest::logo::LogoClient;
use tickerboard_core::ingest::yahoo::YahooFinanceClient;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod extract;

#[derive(Debug, Parser)]
#[command(name = "tickerboard_worker")]
struct Args {
    /// Run date (YYYY-MM-DD). Defaults to today's UTC date.
    #[arg(long)]
    date: Option<String>,

    /// Comma-separated ticker list override. Falls back to the TICKERS env
    /// var, then the built-in universe.
    #[arg(long)]
    tickers: Option<String>,

    /// Assemble every document but skip clearing and writing the database.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = tickerboard_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let run_date = resolve_run_date(args.date.as_deref())?;
    let tickers = tickerboard_core::domain::universe::resolve_tickers(
        args.tickers.as_deref(),
        settings.tickers.as_deref(),
    );

    let provider = YahooFinanceClient::from_settings(&settings)?;
    let logos = LogoClient::from_settings(&settings)?;

    if args.dry_run {
        let rate = tickerboard_core::ingest::fx::fetch_usd_eur_rate(&provider).await?;
        let documents = tickerboard_core::ingest::assemble::assemble_all(
            &provider, &logos, &tickers, rate, run_date,
        )
        .await?;
        tracing::info!(
            %run_date,
            dry_run = true,
            documents_len = documents.len(),
            "extraction dry-run complete; nothing written"
        );
        return Ok(());
    }

    let db_url = settings.require_database_url()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
        .context("connect DATABASE_URL failed")?;

    tickerboard_core::storage::migrate(&pool).await?;

    tracing::info!(%run_date, tickers_len = tickers.len(), "starting extraction run");

    // A failed run terminates with a diagnostic only: the dashboard keeps
    // serving whatever the collection holds (empty, once the clear ran).
    match extract::run_extraction(&pool, &provider, &logos, &tickers, run_date).await {
        Ok(inserted) => {
            tracing::info!(%run_date, inserted, "extraction run persisted");
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            let _ = tickerboard_core::storage::snapshots::record_run(
                &pool,
                run_date,
                "error",
                Some(&format!("{err:#}")),
                tickers.len(),
            )
            .await;
            tracing::error!(%run_date, error = %format!("{err:#}"), "extraction run failed");
        }
    }

    Ok(())
}

fn init_sentry(
    settings: &tickerboard_core::config::Settings,
) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

fn resolve_run_date(date_arg: Option<&str>) -> anyhow::Result<chrono::NaiveDate> {
    if let Some(s) = date_arg {
        return Ok(chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")?);
    }
    Ok(chrono::Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_explicit_run_date() {
        let d = resolve_run_date(Some("2026-08-28")).unwrap();
        assert_eq!(d, chrono::NaiveDate::from_ymd_opt(2026, 8, 28).unwrap());
    }

    #[test]
    fn rejects_malformed_run_date() {
        assert!(resolve_run_date(Some("28/08/2026")).is_err());
    }
}
