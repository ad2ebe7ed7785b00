//! Arithmetic over small fixed-size daily series.
//!
//! Missing bars are `None` throughout; nothing here raises on short or
//! gappy history.

/// Rounds to 2 decimals with half-away-from-zero ties (`f64::round`).
/// This is the single rounding rule for every reported value.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// USD -> EUR conversion with standard 2-decimal reporting.
pub fn convert(usd: f64, rate: f64) -> f64 {
    round2(usd / rate)
}

/// Takes the last `N` values of a series in chronological order, left-padding
/// with `None` when fewer than `N` values exist. Newly listed or illiquid
/// tickers therefore null-fill instead of raising.
pub fn last_n_padded<const N: usize>(values: &[Option<f64>]) -> [Option<f64>; N] {
    let mut out = [None; N];
    let take = values.len().min(N);
    let src = &values[values.len() - take..];
    out[N - take..].copy_from_slice(src);
    out
}

/// Day-over-day percent change: `(today - yesterday) / yesterday * 100`,
/// rounded to 2 decimals. `None` whenever the denominator day is missing.
pub fn percent_change(today: Option<f64>, yesterday: Option<f64>) -> Option<f64> {
    match (today, yesterday) {
        (Some(t), Some(y)) => Some(round2((t - y) / y * 100.0)),
        _ => None,
    }
}

/// Mean of the available values among the 5 most recent bars, `None` when
/// fewer than 5 bars exist. Computed on the raw series; the caller converts
/// the mean afterwards, which is numerically identical to averaging the
/// unrounded converted values.
pub fn moving_avg_5(values: &[Option<f64>]) -> Option<f64> {
    if values.len() < 5 {
        return None;
    }
    let tail = &values[values.len() - 5..];
    let present: Vec<f64> = tail.iter().filter_map(|v| *v).collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}
