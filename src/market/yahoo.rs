use crate::market::MarketDataProvider;
use crate::model::{CompanyProfile, MarketDataError, PriceBar, RawNewsItem, RawTimestamp};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{info, warn};

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const PROFILE_MODULES: &str = "price,assetProfile,summaryDetail,financialData";
const HISTORY_RANGE: &str = "6mo";
const NEWS_COUNT: &str = "10";

/// Needs a client built with a cookie store: the crumb is only valid alongside the session cookie.
pub struct YahooFinance {
    client: Client,
    crumb: Mutex<Option<String>>,
}

impl YahooFinance {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            crumb: Mutex::new(None),
        }
    }

    /// Session crumb for quoteSummary, fetched once and reused.
    async fn crumb(&self) -> Result<String, MarketDataError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // Answers 404, but sets the session cookie
        self.client.get(COOKIE_URL).send().await?;

        let response = self.client.get(CRUMB_URL).send().await?;
        if !response.status().is_success() {
            return Err(MarketDataError::Status(response.status().as_u16()));
        }
        let crumb = parse_crumb(&response.text().await?)?;
        info!("Obtained Yahoo Finance session crumb");
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MarketDataError> {
        let response = self.client.get(url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(MarketDataError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MarketDataError::BadResponse(e.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinance {
    async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile, MarketDataError> {
        let crumb = self.crumb().await?;
        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}");
        let query = profile_query(&crumb);
        let envelope: QuoteSummaryEnvelope = match self.get_json(&url, &query).await {
            Ok(envelope) => envelope,
            Err(MarketDataError::Status(401)) => {
                warn!("Yahoo Finance rejected the session crumb, it will be renewed");
                self.crumb.lock().await.take();
                return Err(MarketDataError::Status(401));
            }
            Err(e) => return Err(e),
        };
        profile_from(symbol, envelope)
    }

    async fn daily_history(&self, symbol: &str) -> Result<Vec<PriceBar>, MarketDataError> {
        let url = format!("{CHART_URL}/{symbol}");
        let envelope: ChartEnvelope = self
            .get_json(&url, &[("range", HISTORY_RANGE), ("interval", "1d")])
            .await?;
        bars_from(symbol, envelope)
    }

    async fn news(&self, symbol: &str) -> Result<Vec<RawNewsItem>, MarketDataError> {
        let envelope: SearchEnvelope = self
            .get_json(SEARCH_URL, &[("q", symbol), ("quotesCount", "0"), ("newsCount", NEWS_COUNT)])
            .await?;
        Ok(envelope.news.into_iter().map(RawNewsItem::from).collect())
    }
}

fn parse_crumb(body: &str) -> Result<String, MarketDataError> {
    let crumb = body.trim();
    if crumb.is_empty() || crumb.contains(char::is_whitespace) || crumb.starts_with('<') {
        return Err(MarketDataError::BadResponse(format!("invalid crumb: {crumb}")));
    }
    Ok(crumb.to_string())
}

fn profile_query(crumb: &str) -> [(&str, &str); 2] {
    [("modules", PROFILE_MODULES), ("crumb", crumb)]
}

// quoteSummary

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryEnvelope {
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<QuoteModules>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteModules {
    #[serde(default)]
    price: PriceModule,
    #[serde(default)]
    asset_profile: AssetProfile,
    #[serde(default)]
    summary_detail: SummaryDetail,
    #[serde(default)]
    financial_data: FinancialData,
}

/// Yahoo wraps numbers as `{"raw": .., "fmt": ..}` and sends `{}` when unknown.
#[derive(Debug, Default, Deserialize)]
struct Figure {
    raw: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    market_cap: Option<Figure>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfile {
    sector: Option<String>,
    industry: Option<String>,
    full_time_employees: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    trailing_p_e: Option<Figure>,
    market_cap: Option<Figure>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    profit_margins: Option<Figure>,
    revenue_growth: Option<Figure>,
    debt_to_equity: Option<Figure>,
}

fn figure(f: Option<Figure>) -> Option<f64> {
    f.and_then(|f| f.raw).filter(|v| v.is_finite())
}

fn profile_from(
    symbol: &str,
    envelope: QuoteSummaryEnvelope,
) -> Result<CompanyProfile, MarketDataError> {
    if let Some(error) = envelope.quote_summary.error.filter(|e| !e.is_null()) {
        return Err(MarketDataError::BadResponse(error.to_string()));
    }
    let modules = envelope
        .quote_summary
        .result
        .and_then(|mut r| r.pop())
        .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))?;

    let market_cap = figure(modules.price.market_cap).or(figure(modules.summary_detail.market_cap));
    let profile = CompanyProfile {
        symbol: symbol.to_string(),
        long_name: modules.price.long_name.or(modules.price.short_name),
        sector: modules.asset_profile.sector,
        industry: modules.asset_profile.industry,
        market_cap: market_cap.filter(|v| *v >= 0.0).map(|v| v.round() as u64),
        employees: modules.asset_profile.full_time_employees,
        trailing_pe: figure(modules.summary_detail.trailing_p_e),
        profit_margins: figure(modules.financial_data.profit_margins),
        revenue_growth: figure(modules.financial_data.revenue_growth),
        debt_to_equity: figure(modules.financial_data.debt_to_equity),
    };

    if profile.is_empty() {
        return Err(MarketDataError::NoData(symbol.to_string()));
    }
    Ok(profile)
}

// chart

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

fn bars_from(symbol: &str, envelope: ChartEnvelope) -> Result<Vec<PriceBar>, MarketDataError> {
    if let Some(error) = envelope.chart.error.filter(|e| !e.is_null()) {
        return Err(MarketDataError::BadResponse(error.to_string()));
    }
    let result = envelope
        .chart
        .result
        .and_then(|mut r| r.pop())
        .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))?;
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| MarketDataError::BadResponse("missing quote".into()))?;

    let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();
    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        // Holidays and half-filled rows come back with a null close.
        let Some(close) = at(&quote.close, i) else { continue };
        let Some(dt) = DateTime::from_timestamp(*ts, 0) else { continue };

        bars.push(PriceBar {
            date: dt.date_naive(),
            open: at(&quote.open, i).unwrap_or(close),
            high: at(&quote.high, i).unwrap_or(close),
            low: at(&quote.low, i).unwrap_or(close),
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

// search news

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    news: Vec<SearchNews>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNews {
    title: Option<String>,
    link: Option<String>,
    publisher: Option<String>,
    provider_publish_time: Option<RawTimestamp>,
    summary: Option<String>,
}

impl From<SearchNews> for RawNewsItem {
    fn from(n: SearchNews) -> Self {
        RawNewsItem {
            title: n.title,
            url: n.link,
            source: n.publisher,
            published: n.provider_publish_time,
            summary: n.summary,
        }
    }
}
