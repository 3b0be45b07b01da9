use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CATALOG_PATH: &str = "us_stocks.json";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Runtime settings, built once at startup and handed to every component.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub finnhub_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub catalog_path: PathBuf,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Reads settings from the process environment. Blank values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            finnhub_api_key: non_blank("FINNHUB_API_KEY"),
            openai_api_key: non_blank("OPENAI_API_KEY"),
            openai_model: non_blank("FINBUDDY_OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            catalog_path: non_blank("FINBUDDY_CATALOG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Shared HTTP client. Every request made through it gives up after the configured timeout.
    /// Keeps cookies so the Yahoo Finance session crumb stays valid.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .cookie_store(true)
            .timeout(self.request_timeout)
            .build()
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0} file not found")]
    NotFound(String),
    #[error("Invalid JSON format in {path}: {source}")]
    InvalidJson {
        path: String,
        source: serde_json::Error,
    },
    #[error("Error loading stock data: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} contains no sectors")]
    Empty(String),
}

/// Sector name -> (company name -> ticker symbol).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct StockCatalog {
    sectors: BTreeMap<String, BTreeMap<String, String>>,
}

impl StockCatalog {
    pub fn sector_names(&self) -> Vec<&str> {
        self.sectors.keys().map(String::as_str).collect()
    }

    /// Companies of a sector as `(name, symbol)` pairs.
    pub fn companies(&self, sector: &str) -> Vec<(&str, &str)> {
        self.sectors
            .get(sector)
            .map(|companies| {
                companies
                    .iter()
                    .map(|(name, symbol)| (name.as_str(), symbol.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub fn parse_catalog(content: &str, origin: &str) -> Result<StockCatalog, CatalogError> {
    let catalog: StockCatalog =
        serde_json::from_str(content).map_err(|source| CatalogError::InvalidJson {
            path: origin.to_string(),
            source,
        })?;
    if catalog.sectors.is_empty() {
        return Err(CatalogError::Empty(origin.to_string()));
    }
    Ok(catalog)
}

pub fn load_catalog(path: &Path) -> Result<StockCatalog, CatalogError> {
    let origin = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CatalogError::NotFound(origin.clone()),
        _ => CatalogError::Io(e),
    })?;
    parse_catalog(&content, &origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CATALOG: &str = r#"{
        "Technology": {"Apple Inc.": "AAPL", "Microsoft Corporation": "MSFT"},
        "Consumer": {"Amazon.com Inc.": "AMZN"}
    }"#;

    #[test]
    fn parses_sectors_and_companies() {
        let catalog = parse_catalog(CATALOG, "inline").unwrap();
        assert_eq!(catalog.sector_names(), vec!["Consumer", "Technology"]);
        assert_eq!(
            catalog.companies("Technology"),
            vec![("Apple Inc.", "AAPL"), ("Microsoft Corporation", "MSFT")]
        );
        assert!(catalog.companies("Energy").is_empty());
    }

    #[test]
    fn malformed_catalog_is_rejected() {
        let err = parse_catalog("{\"Technology\": [1, 2]}", "inline").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidJson { .. }));

        let err = parse_catalog("{}", "inline").unwrap_err();
        assert!(matches!(err, CatalogError::Empty(_)));
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let path = std::env::temp_dir().join("finbuddy-missing-catalog-4f1c.json");
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn catalog_file_round_trips_through_disk() {
        let file_name = format!("finbuddy-catalog-{}.json", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        fs::write(&path, CATALOG).unwrap();
        let catalog = load_catalog(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(catalog.companies("Consumer"), vec![("Amazon.com Inc.", "AMZN")]);
    }

    #[test]
    fn config_treats_blank_credentials_as_missing() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("FINNHUB_API_KEY", "   "),
            ("OPENAI_API_KEY", "sk-test"),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.finnhub_api_key, None);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.catalog_path, PathBuf::from(DEFAULT_CATALOG_PATH));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
