use crate::market::MarketDataProvider;
use crate::model::SourceOutcome;
use crate::news::NewsSource;
use crate::normalizer::normalize_capped;
use async_trait::async_trait;
use std::sync::Arc;

const SOURCE_NAME: &str = "Yahoo Finance";
const PER_SOURCE_CAP: usize = 5;

/// The market-data provider's own news feed.
pub struct YahooNewsSource {
    provider: Arc<dyn MarketDataProvider>,
}

impl YahooNewsSource {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl NewsSource for YahooNewsSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch(&self, symbol: &str) -> SourceOutcome {
        match self.provider.news(symbol).await {
            Ok(raw) => SourceOutcome::Items(normalize_capped(raw, PER_SOURCE_CAP, SOURCE_NAME)),
            Err(e) => SourceOutcome::Failed(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::tests::FakeProvider;
    use crate::model::RawNewsItem;

    #[tokio::test]
    async fn provider_feed_is_capped_and_defaults_publisher() {
        let raw = (0..7)
            .map(|i| RawNewsItem {
                title: Some(format!("feed story {i}")),
                ..Default::default()
            })
            .collect();
        let provider = Arc::new(FakeProvider {
            news: Some(raw),
            ..Default::default()
        });

        let SourceOutcome::Items(items) = YahooNewsSource::new(provider).fetch("MSFT").await else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|i| i.source == "Yahoo Finance"));
    }

    #[tokio::test]
    async fn provider_failure_is_reported_as_failed() {
        let provider = Arc::new(FakeProvider::default());
        let outcome = YahooNewsSource::new(provider).fetch("MSFT").await;
        assert!(matches!(outcome, SourceOutcome::Failed(_)));
    }
}
