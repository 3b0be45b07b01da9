mod analyzer;
mod config;
mod dashboard;
mod market;
mod model;
mod news;
mod normalizer;
mod report;
mod utils;

use analyzer::StockAnalyzer;
use config::{load_catalog, AppConfig};
use dashboard::Dashboard;
use tokio::io::BufReader;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Credentials may come from a local .env file
    dotenvy::dotenv().ok();

    // Initialize logging; stdout belongs to the dashboard
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = AppConfig::from_env();
    if config.finnhub_api_key.is_none() {
        warn!("FINNHUB_API_KEY not set, Finnhub news disabled");
    }
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not set, reports disabled");
    }

    // The catalog is required for the whole session
    let catalog = match load_catalog(&config.catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Catalog load error: {}", e);
            println!("Error: {e}");
            println!(
                "Failed to load stock data. Please check {} file.",
                config.catalog_path.display()
            );
            return;
        }
    };
    info!(
        "Loaded {} sectors from {}",
        catalog.sector_names().len(),
        config.catalog_path.display()
    );

    let client = match config.http_client() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return;
        }
    };

    let analyzer = StockAnalyzer::from_config(&config, client);
    let mut dashboard = Dashboard::new(
        catalog,
        analyzer,
        BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
    );

    if let Err(e) = dashboard.run().await {
        error!("Dashboard stopped: {}", e);
    }
}
