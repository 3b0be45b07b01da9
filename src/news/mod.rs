// News module: the per-source clients and the aggregator that merges them.

pub mod finnhub;
pub mod newsroom;
pub mod yahoo;

use crate::config::AppConfig;
use crate::market::MarketDataProvider;
use crate::model::{NewsItem, SourceOutcome, NO_TITLE};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

pub use finnhub::FinnhubSource;
pub use newsroom::{NewsroomScraper, WebNewsSource};
pub use yahoo::YahooNewsSource;

/// Global cap on aggregated items.
pub const MAX_NEWS_ITEMS: usize = 5;

#[async_trait]
pub trait NewsSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self, symbol: &str) -> SourceOutcome;
}

/// Deduplicated headlines in source-priority order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedNews {
    items: Vec<NewsItem>,
}

impl AggregatedNews {
    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn top(&self, n: usize) -> &[NewsItem] {
        &self.items[..n.min(self.items.len())]
    }
}

pub struct NewsAggregator {
    sources: Vec<Box<dyn NewsSource>>,
}

impl NewsAggregator {
    pub fn new(sources: Vec<Box<dyn NewsSource>>) -> Self {
        Self { sources }
    }

    /// Finnhub first, then the provider feed, then company newsrooms.
    pub fn with_default_sources(
        config: &AppConfig,
        client: reqwest::Client,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Self {
        Self::new(vec![
            Box::new(FinnhubSource::new(client.clone(), config.finnhub_api_key.clone())),
            Box::new(YahooNewsSource::new(provider)),
            Box::new(WebNewsSource::new(Box::new(NewsroomScraper::new(client)))),
        ])
    }

    /// Walks the sources in order and returns at most five distinct headlines.
    /// A source that fails or is unavailable contributes nothing.
    pub async fn collect(&self, symbol: &str) -> AggregatedNews {
        let mut items = Vec::new();
        let mut seen_titles = HashSet::new();

        for source in &self.sources {
            let candidates = match source.fetch(symbol).await {
                SourceOutcome::Items(candidates) => candidates,
                SourceOutcome::Unavailable(reason) => {
                    info!("News source {} skipped for {}: {}", source.name(), symbol, reason);
                    continue;
                }
                SourceOutcome::Failed(e) => {
                    warn!("⚠️ {} news error for {}: {}", source.name(), symbol, e);
                    continue;
                }
            };

            for item in candidates {
                let title = item.title.trim();
                if title.is_empty() || title == NO_TITLE {
                    continue;
                }
                if !seen_titles.insert(title.to_lowercase()) {
                    continue;
                }
                items.push(item);
                if items.len() >= MAX_NEWS_ITEMS {
                    info!("Collected {} news items for {}", items.len(), symbol);
                    return AggregatedNews { items };
                }
            }
        }

        info!("Collected {} news items for {}", items.len(), symbol);
        AggregatedNews { items }
    }
}
