use crate::model::{NewsError, RawNewsItem, RawTimestamp, SourceOutcome};
use crate::news::NewsSource;
use crate::normalizer::normalize_capped;
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use reqwest::Client;
use serde::Deserialize;

const COMPANY_NEWS_URL: &str = "https://finnhub.io/api/v1/company-news";
const SOURCE_NAME: &str = "Finnhub";
const PER_SOURCE_CAP: usize = 5;
const LOOKBACK_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
struct FinnhubArticle {
    headline: Option<String>,
    url: Option<String>,
    source: Option<String>,
    datetime: Option<RawTimestamp>,
    summary: Option<String>,
}

impl From<FinnhubArticle> for RawNewsItem {
    fn from(a: FinnhubArticle) -> Self {
        RawNewsItem {
            title: a.headline,
            url: a.url,
            source: a.source,
            published: a.datetime,
            summary: a.summary,
        }
    }
}

/// Company news from the Finnhub API. Without an API key the source is unavailable.
pub struct FinnhubSource {
    client: Client,
    api_key: Option<String>,
}

impl FinnhubSource {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    async fn fetch_articles(&self, symbol: &str, api_key: &str) -> Result<String, NewsError> {
        let (from, to) = date_window(Local::now().date_naive());
        let response = self
            .client
            .get(COMPANY_NEWS_URL)
            .query(&[
                ("symbol", symbol),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("token", api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NewsError::Status(response.status().as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl NewsSource for FinnhubSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch(&self, symbol: &str) -> SourceOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            return SourceOutcome::Unavailable("FINNHUB_API_KEY not set".into());
        };

        let body = match self.fetch_articles(symbol, api_key).await {
            Ok(body) => body,
            Err(e) => return SourceOutcome::Failed(e),
        };
        match parse_articles(&body) {
            Ok(raw) => SourceOutcome::Items(normalize_capped(raw, PER_SOURCE_CAP, SOURCE_NAME)),
            Err(e) => SourceOutcome::Failed(e),
        }
    }
}

/// `(week ago, today)` as `YYYY-MM-DD`.
fn date_window(today: NaiveDate) -> (String, String) {
    let from = today - Duration::days(LOOKBACK_DAYS);
    (
        from.format("%Y-%m-%d").to_string(),
        today.format("%Y-%m-%d").to_string(),
    )
}

fn parse_articles(body: &str) -> Result<Vec<RawNewsItem>, NewsError> {
    let articles: Vec<FinnhubArticle> =
        serde_json::from_str(body).map_err(|e| NewsError::Parse(e.to_string()))?;
    Ok(articles.into_iter().map(RawNewsItem::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"[
        {"category": "company", "datetime": 1700000000, "headline": " Apple tops estimates ",
         "id": 1, "image": "", "related": "AAPL", "source": "Reuters",
         "summary": " Quarterly results beat. ", "url": "https://example.com/a"},
        {"category": "company", "datetime": 1700000100, "headline": "", "id": 2,
         "source": "Reuters", "summary": "", "url": "https://example.com/b"},
        {"category": "company", "headline": "Vision Pro ships", "id": 3,
         "url": "https://example.com/c"}
    ]"#;

    #[test]
    fn parses_and_normalizes_company_news() {
        let raw = parse_articles(PAYLOAD).unwrap();
        assert_eq!(raw.len(), 3);

        let items = normalize_capped(raw, PER_SOURCE_CAP, SOURCE_NAME);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Apple tops estimates");
        assert_eq!(items[0].source, "Reuters");
        assert_eq!(items[0].summary, "Quarterly results beat.");
        assert!(items[0].published_at.is_some());
        assert_eq!(items[1].source, "Finnhub");
        assert_eq!(items[1].summary, "Click to read full article");
        assert_eq!(items[1].published_at, None);
    }

    #[test]
    fn caps_at_five_articles() {
        let many: Vec<String> = (0..8)
            .map(|i| format!(r#"{{"headline": "story {i}", "url": "u{i}"}}"#))
            .collect();
        let body = format!("[{}]", many.join(","));
        let items = normalize_capped(parse_articles(&body).unwrap(), PER_SOURCE_CAP, SOURCE_NAME);
        assert_eq!(items.len(), 5);
        assert_eq!(items[4].title, "story 4");
    }

    #[test]
    fn error_payload_is_a_parse_failure() {
        let err = parse_articles(r#"{"error": "Invalid API key"}"#).unwrap_err();
        assert!(matches!(err, NewsError::Parse(_)));
    }

    #[test]
    fn window_spans_the_last_week() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(
            date_window(today),
            ("2025-02-24".to_string(), "2025-03-03".to_string())
        );
    }

    #[tokio::test]
    async fn missing_api_key_means_unavailable() {
        let source = FinnhubSource::new(Client::new(), None);
        assert!(matches!(source.fetch("AAPL").await, SourceOutcome::Unavailable(_)));
    }
}
