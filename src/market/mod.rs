// Market data: company fundamentals, daily prices and the provider news feed.

pub mod yahoo;

use crate::model::{CompanyProfile, MarketDataError, PriceBar, RawNewsItem};
use async_trait::async_trait;

pub use yahoo::YahooFinance;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile, MarketDataError>;

    /// Daily bars for the trailing six months, oldest first.
    async fn daily_history(&self, symbol: &str) -> Result<Vec<PriceBar>, MarketDataError>;

    async fn news(&self, symbol: &str) -> Result<Vec<RawNewsItem>, MarketDataError>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Serves canned data; a `None` field makes that lookup fail.
    #[derive(Default)]
    pub(crate) struct FakeProvider {
        pub profile: Option<CompanyProfile>,
        pub history: Option<Vec<PriceBar>>,
        pub news: Option<Vec<RawNewsItem>>,
    }

    #[async_trait]
    impl MarketDataProvider for FakeProvider {
        async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile, MarketDataError> {
            self.profile
                .clone()
                .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))
        }

        async fn daily_history(&self, symbol: &str) -> Result<Vec<PriceBar>, MarketDataError> {
            self.history
                .clone()
                .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))
        }

        async fn news(&self, _symbol: &str) -> Result<Vec<RawNewsItem>, MarketDataError> {
            self.news.clone().ok_or(MarketDataError::Status(429))
        }
    }

    /// One bar per day starting 2025-01-01 with the given closes.
    pub(crate) fn bars(closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close - 1.0,
                high: close + 2.0,
                low: close - 2.0,
                close,
                volume: 1_000 + i as u64,
            })
            .collect()
    }
}
