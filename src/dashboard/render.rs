// Text rendering of the three result tabs.
use crate::analyzer::{AnalysisResult, ChartSet};
use crate::model::NO_URL;
use crate::news::AggregatedNews;
use crate::utils::{with_thousands, NOT_AVAILABLE};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use std::fmt::Write;

/// Trading days shown in the price table.
pub const CHART_ROWS: usize = 10;

pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{} ({})", result.name, result.symbol);
    out.push_str(&tab_title("Analysis Report"));
    let _ = writeln!(out, "{}\n", result.report);
    out.push_str(&tab_title("Price Charts"));
    out.push_str(&render_charts(result.charts.as_ref()));
    out.push_str(&tab_title("Market News"));
    out.push_str(&render_news(&result.news));
    out
}

fn tab_title(title: &str) -> String {
    format!("\n==================== {title} ====================\n\n")
}

pub fn render_charts(charts: Option<&ChartSet>) -> String {
    let Some(charts) = charts else {
        return "⚠️ No chart data available\n".to_string();
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![
            "Date", "Open", "High", "Low", "Close", "Volume", "50-day MA", "200-day MA",
        ]);

    for row in charts.recent(CHART_ROWS) {
        let bar = row.candle;
        table.add_row(vec![
            bar.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", bar.open),
            format!("{:.2}", bar.high),
            format!("{:.2}", bar.low),
            format!("{:.2}", bar.close),
            with_thousands(bar.volume),
            money(row.sma_short),
            money(row.sma_long),
        ]);
    }

    let (low, high) = charts.price_range();
    let first = charts.candles.first().map(|b| b.date);
    let last = charts.candles.last().map(|b| b.date);
    let mut out = String::from("Price History\n");
    if let (Some(first), Some(last)) = (first, last) {
        let _ = writeln!(
            out,
            "{} trading days from {} to {}, range ${:.2} - ${:.2}",
            charts.candles.len(),
            first,
            last,
            low,
            high
        );
    }
    let _ = writeln!(out, "{table}");
    out
}

fn money(value: Option<f64>) -> String {
    value
        .map(|v| format!("${v:.2}"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn render_news(news: &AggregatedNews) -> String {
    let mut out = String::from("Recent Market News\n\n");
    if news.is_empty() {
        out.push_str("⚠️ No recent news available for this company\n");
        return out;
    }

    for (idx, article) in news.items().iter().enumerate() {
        let _ = writeln!(out, "{}. {}", idx + 1, article.title);
        let _ = writeln!(out, "   Source: {}", article.source);
        if let Some(date) = article.published_at.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "   Date: {date}");
        }
        let _ = writeln!(out, "   {}", article.summary);
        if article.url != NO_URL {
            let _ = writeln!(out, "   Read full article: {}", article.url);
        }
        out.push('\n');
    }
    out
}
