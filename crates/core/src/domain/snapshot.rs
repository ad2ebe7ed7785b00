use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel used wherever display metadata could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Sentinel list stored when a ticker has no recent news.
pub const NO_NEWS_SENTINEL: &str = "No recent news available for this ticker.";

/// One document per ticker per run. The collection is cleared and fully
/// rewritten each run, so a snapshot has no identity beyond its ticker
/// string within a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerSnapshot {
    pub ticker: String,
    pub date: NaiveDate,
    pub company_name: String,
    pub company_logo_url: String,
    pub price: PriceMetrics,
    pub volume: VolumeMetrics,
    pub news: Vec<String>,
    pub analyst_recommendation: String,
}

/// All monetary fields are EUR, converted with the single per-run rate.
/// Trailing closes run `close_4` (oldest) .. `close_today` (newest); a slot
/// is `None` only when fewer than five historical bars exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceMetrics {
    pub open_today: Option<f64>,
    pub low_today: Option<f64>,
    pub high_today: Option<f64>,
    pub low_52wk: f64,
    pub high_52wk: f64,
    pub close_today: Option<f64>,
    pub close_yesterday: Option<f64>,
    pub close_2: Option<f64>,
    pub close_3: Option<f64>,
    pub close_4: Option<f64>,
    pub close_moving_avg_5d: Option<f64>,
    pub yesterday_change: Option<f64>,
}

/// Traded volume is a share count, never currency-converted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeMetrics {
    pub close_today: Option<f64>,
    pub close_yesterday: Option<f64>,
    pub close_2: Option<f64>,
    pub close_3: Option<f64>,
    pub close_4: Option<f64>,
    pub yesterday_change: Option<f64>,
}

impl PriceMetrics {
    /// Trailing close series in chronological order, oldest first.
    pub fn close_series(&self) -> [Option<f64>; 5] {
        [
            self.close_4,
            self.close_3,
            self.close_2,
            self.close_yesterday,
            self.close_today,
        ]
    }
}

impl VolumeMetrics {
    pub fn close_series(&self) -> [Option<f64>; 5] {
        [
            self.close_4,
            self.close_3,
            self.close_2,
            self.close_yesterday,
            self.close_today,
        ]
    }
}

/// Strips the crypto pair suffix for display (`BTC-USD` -> `BTC`).
/// Applies to the stored ticker field only.
pub fn display_ticker(symbol: &str) -> String {
    symbol.strip_suffix("-USD").unwrap_or(symbol).to_string()
}

/// Strips the trailing ` USD` that providers append to crypto pair names
/// (`Bitcoin USD` -> `Bitcoin`). Display-only normalization.
pub fn display_company_name(name: &str) -> String {
    name.replace(" USD", "")
}
