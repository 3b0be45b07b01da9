// Analyzer module: runs one "Analyze" action end to end.

pub mod charts;
pub mod indicators;

use crate::config::AppConfig;
use crate::market::{MarketDataProvider, YahooFinance};
use crate::model::{AnalysisError, StockSnapshot};
use crate::news::{AggregatedNews, NewsAggregator};
use crate::report::{ContextAssembler, LlmClient, OpenAiClient, ReportGenerator};
use std::sync::Arc;
use tracing::{info, warn};

pub use charts::ChartSet;

/// Everything the dashboard shows for one company.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub name: String,
    pub symbol: String,
    pub report: String,
    pub news: AggregatedNews,
    pub charts: Option<ChartSet>,
}

pub struct StockAnalyzer {
    provider: Arc<dyn MarketDataProvider>,
    aggregator: Arc<NewsAggregator>,
    reports: ReportGenerator,
}

impl StockAnalyzer {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        aggregator: Arc<NewsAggregator>,
        llm: Option<Arc<dyn LlmClient>>,
    ) -> Self {
        let assembler = ContextAssembler::new(provider.clone(), aggregator.clone());
        Self {
            provider,
            aggregator,
            reports: ReportGenerator::new(assembler, llm),
        }
    }

    /// Wires the production clients: Yahoo Finance, the three news sources
    /// and OpenAI when a key is set.
    pub fn from_config(config: &AppConfig, client: reqwest::Client) -> Self {
        let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooFinance::new(client.clone()));
        let aggregator = Arc::new(NewsAggregator::with_default_sources(
            config,
            client.clone(),
            provider.clone(),
        ));
        let llm = config.openai_api_key.clone().map(|key| {
            let model = config.openai_model.clone();
            Arc::new(OpenAiClient::new(client, key, model)) as Arc<dyn LlmClient>
        });
        Self::new(provider, aggregator, llm)
    }

    /// Fundamentals plus six months of daily bars; `None` when either is missing.
    pub async fn get_stock_data(&self, symbol: &str) -> Option<StockSnapshot> {
        let profile = match self.provider.company_profile(symbol).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("❌ Data fetch error for {}: {}", symbol, e);
                return None;
            }
        };
        let history = match self.provider.daily_history(symbol).await {
            Ok(history) => history,
            Err(e) => {
                warn!("❌ Data fetch error for {}: {}", symbol, e);
                return None;
            }
        };

        if history.is_empty() {
            warn!("⚠️ Incomplete data for {}", symbol);
            return None;
        }
        Some(StockSnapshot { profile, history })
    }

    pub async fn analyze(&self, name: &str, symbol: &str) -> Result<AnalysisResult, AnalysisError> {
        info!("Analyzing {} ({})...", name, symbol);
        let snapshot = self
            .get_stock_data(symbol)
            .await
            .ok_or_else(|| AnalysisError::NoStockData(symbol.to_string()))?;
        info!(
            "Loaded {} daily bars for {}",
            snapshot.history.len(),
            snapshot.profile.long_name.as_deref().unwrap_or(symbol)
        );

        let news = self.aggregator.collect(symbol).await;
        let report = self.reports.generate(symbol, name, Some(&news)).await;
        let charts = ChartSet::prepare(&snapshot.history);

        info!("Finished analysis of {} with {} news items", symbol, news.len());
        Ok(AnalysisResult {
            name: name.to_string(),
            symbol: symbol.to_string(),
            report,
            news,
            charts,
        })
    }
}
