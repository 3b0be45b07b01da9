// Builds the plain-text company context handed to the language model.
use crate::analyzer::indicators::TechnicalSnapshot;
use crate::market::MarketDataProvider;
use crate::model::CompanyProfile;
use crate::news::{AggregatedNews, NewsAggregator};
use crate::utils::{or_na, with_thousands, NOT_AVAILABLE};
use std::fmt::Write;
use std::sync::Arc;
use tracing::{info, warn};

/// Headlines quoted in the context.
pub const CONTEXT_HEADLINES: usize = 3;

pub struct ContextAssembler {
    provider: Arc<dyn MarketDataProvider>,
    aggregator: Arc<NewsAggregator>,
}

impl ContextAssembler {
    pub fn new(provider: Arc<dyn MarketDataProvider>, aggregator: Arc<NewsAggregator>) -> Self {
        Self { provider, aggregator }
    }

    /// Gathers news itself, then assembles.
    pub async fn assemble(&self, symbol: &str, company_name: &str) -> String {
        let news = self.aggregator.collect(symbol).await;
        self.assemble_with_news(symbol, company_name, &news).await
    }

    /// Never fails: a lookup that errors drops its sections and assembly goes on.
    pub async fn assemble_with_news(
        &self,
        symbol: &str,
        company_name: &str,
        news: &AggregatedNews,
    ) -> String {
        let mut context = header(symbol, company_name);

        match self.provider.company_profile(symbol).await {
            Ok(profile) => {
                context.push_str(&basic_info_section(&profile));
                context.push_str(&financial_section(&profile));
            }
            Err(e) => warn!("⚠️ Company info unavailable for {}: {}", symbol, e),
        }

        context.push_str(&news_section(news));

        match self.provider.daily_history(symbol).await {
            Ok(bars) => match TechnicalSnapshot::from_bars(&bars) {
                Some(snapshot) => context.push_str(&technical_section(&snapshot)),
                None => info!("No price history for {}, skipping indicators", symbol),
            },
            Err(e) => warn!("⚠️ Price history unavailable for {}: {}", symbol, e),
        }

        context
    }
}

fn header(symbol: &str, company_name: &str) -> String {
    format!("Company: {company_name} ({symbol})\n\n")
}

fn basic_info_section(profile: &CompanyProfile) -> String {
    let market_cap = profile
        .market_cap
        .map(|cap| format!("${}", with_thousands(cap)))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let mut out = String::from("## Basic Information\n");
    let _ = writeln!(out, "- Sector: {}", or_na(profile.sector.as_deref()));
    let _ = writeln!(out, "- Industry: {}", or_na(profile.industry.as_deref()));
    let _ = writeln!(out, "- Market Cap: {market_cap}");
    let _ = writeln!(out, "- Employees: {}\n", or_na(profile.employees));
    out
}

fn financial_section(profile: &CompanyProfile) -> String {
    let mut out = String::from("## Financial Metrics\n");
    let _ = writeln!(out, "- P/E Ratio: {}", or_na(profile.trailing_pe));
    let _ = writeln!(out, "- Profit Margin: {}", or_na(profile.profit_margins));
    let _ = writeln!(out, "- Revenue Growth: {}", or_na(profile.revenue_growth));
    let _ = writeln!(out, "- Debt/Equity: {}\n", or_na(profile.debt_to_equity));
    out
}

fn news_section(news: &AggregatedNews) -> String {
    if news.is_empty() {
        return String::new();
    }
    let mut out = String::from("## Recent News Highlights\n");
    for item in news.top(CONTEXT_HEADLINES) {
        let _ = writeln!(out, "- {} ({})", item.title, item.source);
    }
    out.push('\n');
    out
}

fn technical_section(snapshot: &TechnicalSnapshot) -> String {
    let mut out = String::from("## Technical Indicators\n");
    let _ = writeln!(out, "- Current Price: ${:.2}", snapshot.last_close);
    let _ = writeln!(out, "- 50-day MA: ${:.2}", snapshot.sma_short);
    let _ = writeln!(out, "- 200-day MA: ${:.2}", snapshot.sma_long);
    let _ = writeln!(out, "- Trend: {}\n", snapshot.trend);
    out
}
