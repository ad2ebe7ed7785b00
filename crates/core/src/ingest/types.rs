use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar as reported by the market-data provider. Any field
/// may be absent for halted or thinly traded days; absence stays `None`
/// through the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

/// Scalar company metadata. Everything is optional on the wire; sentinels
/// are applied during snapshot assembly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub short_name: Option<String>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub recommendation_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: Option<String>,
    pub summary: Option<String>,
}
