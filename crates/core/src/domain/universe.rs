/// Default tracked universe: large-cap US equities plus major crypto pairs.
/// Overridable per run via the `TICKERS` env var or the worker's
/// `--tickers` flag; the per-ticker contract is identical either way.
pub const DEFAULT_TICKERS: [&str; 33] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", //
    "META", "NVDA", "BRK-B", "V", "UNH", //
    "JNJ", "WMT", "MA", "PYPL", "DIS", //
    "BA", "HD", "PFE", "INTC", "KO", //
    "GS", "IBM", "CVX", "XOM", "ABT", //
    "BTC-USD", "ETH-USD", "BNB-USD", "XRP-USD", //
    "ADA-USD", "DOGE-USD", "SOL-USD", "XLM-USD",
];

/// Resolves the run's ticker list: CLI override, then the `TICKERS` env
/// setting, then the built-in default. Comma-separated, whitespace trimmed,
/// empty entries dropped.
pub fn resolve_tickers(cli: Option<&str>, configured: Option<&str>) -> Vec<String> {
    let spec = cli.or(configured);
    match spec {
        Some(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        None => DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
    }
}
