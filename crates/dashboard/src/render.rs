//! Static HTML rendering of the stored snapshot collection: one block per
//! document, each with a ticker/logo header, change indicators, 5-point
//! line charts and a fixed-row price table.

use tickerboard_core::domain::snapshot::{PriceMetrics, TickerSnapshot};

const CHART_WIDTH: f64 = 300.0;
const CHART_HEIGHT: f64 = 200.0;
const CHART_PADDING: f64 = 40.0;

/// Chart x positions for the trailing window: 4 days ago through today.
const X_LABELS: [&str; 5] = ["-4", "-3", "-2", "-1", "0"];

pub fn dashboard_page(snapshots: &[TickerSnapshot]) -> String {
    let blocks: String = snapshots.iter().map(ticker_block).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>stocks overview</title>
<style>
body {{ background: #FAF0E6; font-family: Consolas, monospace; margin: 0; padding: 20px; }}
h1 {{ text-align: center; font-size: 36px; color: #FAFAFA; background: #1E1E1E; padding: 20px; border-radius: 10px; }}
.block {{ display: flex; flex-wrap: wrap; align-items: center; justify-content: space-between; gap: 20px; padding: 20px; margin-bottom: 20px; background: #f0f0f0; border-radius: 10px; box-shadow: 0 4px 10px rgba(0, 0, 0, 0.1); }}
.header {{ display: flex; align-items: center; }}
.header h3 {{ font-size: 20px; color: #555; width: 90px; margin-right: 15px; white-space: pre; }}
.indicator {{ display: flex; align-items: center; }}
.indicator .glyph {{ font-size: 24px; margin-right: 5px; }}
.indicator .value {{ font-size: 16px; }}
.up {{ color: green; }}
.down {{ color: red; }}
table {{ border-collapse: collapse; width: 250px; font-size: 12px; }}
th, td {{ padding: 6px; text-align: center; color: white; background: #222; border: 1px solid #444; }}
svg {{ border: 2px solid #000000; border-radius: 5px; }}
</style>
</head>
<body>
<h1>stocks overview</h1>
{blocks}</body>
</html>
"#
    )
}

fn ticker_block(snapshot: &TickerSnapshot) -> String {
    let price_change = change_indicator(snapshot.price.yesterday_change);
    let volume_change = change_indicator(snapshot.volume.yesterday_change);
    let price_chart = line_chart(
        &snapshot.price.close_series(),
        snapshot.price.close_moving_avg_5d,
        "Closed Price",
    );
    let volume_chart = line_chart(&snapshot.volume.close_series(), None, "Closed Volume");
    let table = metric_table(&snapshot.price);

    let logo = if snapshot.company_logo_url == "N/A" {
        String::new()
    } else {
        format!(
            r#"<img src="{}" height="35" width="35" alt="{}">"#,
            escape(&snapshot.company_logo_url),
            escape(&snapshot.company_name),
        )
    };

    format!(
        r#"<div class="block">
<div class="header"><h3>({: <5})</h3>{logo}</div>
{price_change}
{price_chart}
{table}
{volume_change}
{volume_chart}
</div>
"#,
        escape(&snapshot.ticker),
    )
}

/// Directional change indicator: 2-decimal percentage with the integer
/// part zero-padded to two digits, green `▲` for `>= 0`, red `▼` below.
pub fn change_indicator(change: Option<f64>) -> String {
    let Some(change) = change else {
        return r#"<div class="indicator"><span class="value">N/A</span></div>"#.to_string();
    };

    let (class, glyph) = if change >= 0.0 {
        ("up", "▲")
    } else {
        ("down", "▼")
    };
    format!(
        r#"<div class="indicator"><span class="glyph {class}">{glyph}</span><span class="value {class}">{}%</span></div>"#,
        format_change(change)
    )
}

/// `1.31` -> `01.31`, `-3.5` -> `-3.50`, `0.0` -> `00.00`.
fn format_change(change: f64) -> String {
    let formatted = format!("{change:.2}");
    let (int_part, dec_part) = formatted
        .split_once('.')
        .expect("{:.2} always contains a decimal point");
    let mut int_part = int_part.to_string();
    while int_part.len() < 2 {
        int_part.insert(0, '0');
    }
    format!("{int_part}.{dec_part}")
}

/// Inline SVG line chart of the 5-point trailing series, samtrader-style
/// scaling, with an optional dashed flat reference line at the moving
/// average (price charts only). Missing points are skipped.
pub fn line_chart(series: &[Option<f64>; 5], moving_avg: Option<f64>, y_label: &str) -> String {
    let present: Vec<(usize, f64)> = series
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();

    if present.is_empty() {
        return format!("<p>No {} data available.</p>", escape(y_label));
    }

    let mut min_y = present.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let mut max_y = present
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    if let Some(ma) = moving_avg {
        min_y = min_y.min(ma);
        max_y = max_y.max(ma);
    }

    let plot_width = CHART_WIDTH - 2.0 * CHART_PADDING;
    let plot_height = CHART_HEIGHT - 2.0 * CHART_PADDING;

    let range = max_y - min_y;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = plot_width / (series.len() - 1) as f64;

    let to_xy = |i: usize, v: f64| {
        let x = CHART_PADDING + i as f64 * scale_x;
        let y = CHART_HEIGHT - CHART_PADDING - (v - min_y) * scale_y;
        (x, y)
    };

    let polyline_points: String = present
        .iter()
        .map(|(i, v)| {
            let (x, y) = to_xy(*i, *v);
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ");

    let markers: String = present
        .iter()
        .map(|(i, v)| {
            let (x, y) = to_xy(*i, *v);
            format!(
                r##"<circle cx="{x:.1}" cy="{y:.1}" r="3" fill="white" stroke="#00FF00"/>"##
            )
        })
        .collect();

    let ma_line = match moving_avg {
        Some(ma) => {
            let (x0, y) = to_xy(0, ma);
            let x1 = CHART_PADDING + plot_width;
            format!(
                r##"<line x1="{x0:.1}" y1="{y:.1}" x2="{x1:.1}" y2="{y:.1}" stroke="#FFAA00" stroke-width="1.5" stroke-dasharray="6 3"/>"##
            )
        }
        None => String::new(),
    };

    let x_ticks: String = X_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let x = CHART_PADDING + i as f64 * scale_x;
            format!(
                r#"<text x="{x:.1}" y="{:.1}" fill="white" font-size="10" text-anchor="middle">{label}</text>"#,
                CHART_HEIGHT - CHART_PADDING / 2.0
            )
        })
        .collect();

    format!(
        r##"<svg width="{CHART_WIDTH:.0}" height="{CHART_HEIGHT:.0}" xmlns="http://www.w3.org/2000/svg">
<rect width="100%" height="100%" fill="#1E1E1E"/>
<text x="{:.1}" y="15" fill="white" font-size="12" text-anchor="middle">{}</text>
{ma_line}<polyline points="{polyline_points}" fill="none" stroke="#00FF00" stroke-width="2"/>
{markers}{x_ticks}</svg>"##,
        CHART_WIDTH / 2.0,
        escape(y_label),
    )
}

fn metric_table(price: &PriceMetrics) -> String {
    let rows = [
        ("Close Today", fmt_value(price.close_today)),
        ("Open Today", fmt_value(price.open_today)),
        ("Low Today", fmt_value(price.low_today)),
        ("High Today", fmt_value(price.high_today)),
        ("Low 52wk", format!("{:.2}", price.low_52wk)),
        ("High 52wk", format!("{:.2}", price.high_52wk)),
    ];

    let body: String = rows
        .iter()
        .map(|(metric, value)| format!("<tr><td>{metric}</td><td>{value}</td></tr>\n"))
        .collect();

    format!(
        "<table>\n<tr><th>Metric</th><th>Price</th></tr>\n{body}</table>"
    )
}

fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
