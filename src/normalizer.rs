use crate::model::{NewsItem, RawNewsItem, RawTimestamp, NO_SUMMARY, NO_TITLE, NO_URL};
use crate::utils::format_unix;

/// Keeps the first `cap` raw items that carry a non-empty title and normalizes them.
pub fn normalize_capped(raw: Vec<RawNewsItem>, cap: usize, default_source: &str) -> Vec<NewsItem> {
    raw.into_iter()
        .filter(|item| item.title.as_deref().is_some_and(|t| !t.is_empty()))
        .take(cap)
        .map(|item| normalize_item(item, default_source))
        .collect()
}

pub fn normalize_item(raw: RawNewsItem, default_source: &str) -> NewsItem {
    NewsItem {
        title: trimmed_or(raw.title, NO_TITLE),
        url: trimmed_or(raw.url, NO_URL),
        source: trimmed_or(raw.source, default_source),
        published_at: raw.published.as_ref().and_then(format_timestamp),
        summary: trimmed_or(raw.summary, NO_SUMMARY),
    }
}

/// Numeric timestamps become a readable local date; text passes through untouched.
pub fn format_timestamp(ts: &RawTimestamp) -> Option<String> {
    match ts {
        RawTimestamp::Unix(0) => None,
        RawTimestamp::Unix(secs) => format_unix(*secs),
        RawTimestamp::Fractional(secs) if *secs == 0.0 || !secs.is_finite() => None,
        RawTimestamp::Fractional(secs) => format_unix(secs.trunc() as i64),
        RawTimestamp::Text(text) if text.is_empty() => None,
        RawTimestamp::Text(text) => Some(text.clone()),
    }
}

// A present-but-empty value is kept empty; only a missing one gets the placeholder.
fn trimmed_or(value: Option<String>, placeholder: &str) -> String {
    match value {
        Some(v) => v.trim().to_string(),
        None => placeholder.to_string(),
    }
}
