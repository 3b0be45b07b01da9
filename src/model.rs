// Core structs: NewsItem, CompanyProfile, PriceBar and the error types
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

/// Placeholder substituted for a missing title. Items carrying it are rejected.
pub const NO_TITLE: &str = "No title available";
pub const NO_URL: &str = "#";
pub const NO_SUMMARY: &str = "Click to read full article";

#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: Option<String>,
    pub summary: String,
}

/// A news record as a source hands it over, before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawNewsItem {
    pub title: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub published: Option<RawTimestamp>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Unix(i64),
    Fractional(f64),
    Text(String),
}

/// What a single news source produced for one aggregation call.
#[derive(Debug)]
pub enum SourceOutcome {
    Items(Vec<NewsItem>),
    /// The source is not configured for this call (no credential, ticker not covered).
    Unavailable(String),
    Failed(NewsError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyProfile {
    pub symbol: String,
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<u64>,
    pub employees: Option<u64>,
    pub trailing_pe: Option<f64>,
    pub profit_margins: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub debt_to_equity: Option<f64>,
}

impl CompanyProfile {
    pub fn is_empty(&self) -> bool {
        self.long_name.is_none()
            && self.sector.is_none()
            && self.industry.is_none()
            && self.market_cap.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone)]
pub struct StockSnapshot {
    pub profile: CompanyProfile,
    pub history: Vec<PriceBar>,
}

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("unreadable payload: {0}")]
    Parse(String),
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("bad response: {0}")]
    BadResponse(String),
    #[error("no data for {0}")]
    NoData(String),
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("empty completion")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to fetch stock data for {0}")]
    NoStockData(String),
}
