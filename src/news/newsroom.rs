// Company newsroom scraping. Selectors track the live pages and break when they change.
use crate::model::{NewsError, RawNewsItem, SourceOutcome};
use crate::news::NewsSource;
use crate::normalizer::normalize_capped;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

const SOURCE_NAME: &str = "Company Newsroom";
const PER_SOURCE_CAP: usize = 3;

/// Fetches official headlines for a ticker.
#[async_trait]
pub trait HeadlineScraper: Send + Sync {
    fn covers(&self, ticker: &str) -> bool;
    async fn fetch_headlines(&self, ticker: &str) -> Result<Vec<RawNewsItem>, NewsError>;
}

/// Where a newsroom lives and how to read it.
#[derive(Debug)]
pub struct NewsroomLayout {
    pub ticker: &'static str,
    pub page_url: &'static str,
    pub item_selector: &'static str,
    /// `None` reads the title from the item itself.
    pub title_selector: Option<&'static str>,
    /// `None` reads `href` from the item itself.
    pub link_selector: Option<&'static str>,
    pub link_prefix: &'static str,
    pub source: &'static str,
    pub summary: &'static str,
}

pub static NEWSROOMS: [NewsroomLayout; 3] = [
    NewsroomLayout {
        ticker: "AAPL",
        page_url: "https://www.apple.com/newsroom/",
        item_selector: ".article-link",
        title_selector: None,
        link_selector: None,
        link_prefix: "https://www.apple.com",
        source: "Apple Newsroom",
        summary: "Official Apple press release",
    },
    NewsroomLayout {
        ticker: "MSFT",
        page_url: "https://news.microsoft.com/",
        item_selector: ".article-title",
        title_selector: None,
        link_selector: Some("a"),
        link_prefix: "",
        source: "Microsoft News",
        summary: "Official Microsoft news",
    },
    NewsroomLayout {
        ticker: "AMZN",
        page_url: "https://www.aboutamazon.com/news",
        item_selector: ".post-item",
        title_selector: Some("h2"),
        link_selector: Some("a"),
        link_prefix: "",
        source: "Amazon News",
        summary: "Official Amazon news",
    },
];

pub fn layout_for(ticker: &str) -> Option<&'static NewsroomLayout> {
    NEWSROOMS.iter().find(|layout| layout.ticker == ticker)
}

pub struct NewsroomScraper {
    client: Client,
}

impl NewsroomScraper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HeadlineScraper for NewsroomScraper {
    fn covers(&self, ticker: &str) -> bool {
        layout_for(ticker).is_some()
    }

    async fn fetch_headlines(&self, ticker: &str) -> Result<Vec<RawNewsItem>, NewsError> {
        let Some(layout) = layout_for(ticker) else {
            return Ok(Vec::new());
        };

        let response = self.client.get(layout.page_url).send().await?;
        if !response.status().is_success() {
            return Err(NewsError::Status(response.status().as_u16()));
        }
        let html = response.text().await?;
        parse_headlines(layout, &html)
    }
}

pub fn parse_headlines(layout: &NewsroomLayout, html: &str) -> Result<Vec<RawNewsItem>, NewsError> {
    let document = Html::parse_document(html);
    let item_selector = selector(layout.item_selector)?;
    let title_selector = layout.title_selector.map(selector).transpose()?;
    let link_selector = layout.link_selector.map(selector).transpose()?;

    let mut headlines = Vec::new();
    for element in document.select(&item_selector) {
        let title_node = match &title_selector {
            Some(sel) => element.select(sel).next(),
            None => Some(element),
        };
        let Some(title) = title_node.map(stripped_text).filter(|t| !t.is_empty()) else {
            continue;
        };

        let link_node = match &link_selector {
            Some(sel) => element.select(sel).next(),
            None => Some(element),
        };
        let Some(href) = link_node.and_then(|node| node.value().attr("href")) else {
            continue;
        };

        headlines.push(RawNewsItem {
            title: Some(title),
            url: Some(format!("{}{}", layout.link_prefix, href)),
            source: Some(layout.source.to_string()),
            published: None,
            summary: Some(layout.summary.to_string()),
        });
    }

    Ok(headlines)
}

fn selector(css: &str) -> Result<Selector, NewsError> {
    Selector::parse(css).map_err(|e| NewsError::Parse(e.to_string()))
}

// Each text node trimmed, then joined without a separator.
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Newsroom headlines for the few tickers that have a scraper.
pub struct WebNewsSource {
    scraper: Box<dyn HeadlineScraper>,
}

impl WebNewsSource {
    pub fn new(scraper: Box<dyn HeadlineScraper>) -> Self {
        Self { scraper }
    }
}

#[async_trait]
impl NewsSource for WebNewsSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch(&self, symbol: &str) -> SourceOutcome {
        if !self.scraper.covers(symbol) {
            return SourceOutcome::Unavailable(format!("no newsroom for {symbol}"));
        }
        match self.scraper.fetch_headlines(symbol).await {
            Ok(raw) => SourceOutcome::Items(normalize_capped(raw, PER_SOURCE_CAP, SOURCE_NAME)),
            Err(e) => SourceOutcome::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeScraper {
        ticker: &'static str,
        headlines: Vec<&'static str>,
    }

    #[async_trait]
    impl HeadlineScraper for FakeScraper {
        fn covers(&self, ticker: &str) -> bool {
            ticker == self.ticker
        }

        async fn fetch_headlines(&self, _ticker: &str) -> Result<Vec<RawNewsItem>, NewsError> {
            Ok(self
                .headlines
                .iter()
                .map(|t| RawNewsItem {
                    title: Some(t.to_string()),
                    url: Some("https://example.com".into()),
                    source: Some("Fake Newsroom".into()),
                    ..Default::default()
                })
                .collect())
        }
    }

    #[test]
    fn parses_apple_article_links() {
        let html = r#"
            <section>
              <a class="article-link" href="/newsroom/2025/03/new-macbook/">
                <span>PRESS RELEASE</span> <span> Apple unveils new MacBook </span>
              </a>
              <a class="article-link" href="/newsroom/empty/">   </a>
              <a class="article-link">No href here</a>
            </section>"#;
        let items = parse_headlines(layout_for("AAPL").unwrap(), html).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title.as_deref(), Some("PRESS RELEASEApple unveils new MacBook"));
        assert_eq!(
            items[0].url.as_deref(),
            Some("https://www.apple.com/newsroom/2025/03/new-macbook/")
        );
        assert_eq!(items[0].source.as_deref(), Some("Apple Newsroom"));
        assert_eq!(items[0].summary.as_deref(), Some("Official Apple press release"));
    }

    #[test]
    fn parses_microsoft_titles_with_nested_links() {
        let html = r#"
            <h3 class="article-title"><a href="https://news.microsoft.com/copilot">Copilot expands</a></h3>
            <h3 class="article-title">Title without link</h3>"#;
        let items = parse_headlines(layout_for("MSFT").unwrap(), html).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title.as_deref(), Some("Copilot expands"));
        assert_eq!(items[0].url.as_deref(), Some("https://news.microsoft.com/copilot"));
    }

    #[test]
    fn parses_amazon_post_items() {
        let html = r#"
            <div class="post-item"><a href="https://www.aboutamazon.com/news/aws"><h2> AWS launches region </h2></a></div>
            <div class="post-item"><a href="https://www.aboutamazon.com/news/x">No heading</a></div>"#;
        let items = parse_headlines(layout_for("AMZN").unwrap(), html).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title.as_deref(), Some("AWS launches region"));
        assert_eq!(items[0].source.as_deref(), Some("Amazon News"));
    }

    #[test]
    fn changed_markup_yields_nothing() {
        let html = "<html><body><p>redesign</p></body></html>";
        let items = parse_headlines(layout_for("AAPL").unwrap(), html).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn allowlist_is_exact_match() {
        assert!(layout_for("AAPL").is_some());
        assert!(layout_for("aapl").is_none());
        assert!(layout_for("GOOGL").is_none());
    }

    #[tokio::test]
    async fn uncovered_ticker_is_unavailable() {
        let source = WebNewsSource::new(Box::new(FakeScraper {
            ticker: "AAPL",
            headlines: vec!["x"],
        }));
        assert!(matches!(source.fetch("TSLA").await, SourceOutcome::Unavailable(_)));
    }

    #[tokio::test]
    async fn scraped_headlines_are_capped_at_three() {
        let source = WebNewsSource::new(Box::new(FakeScraper {
            ticker: "AAPL",
            headlines: vec!["a", "b", "c", "d"],
        }));
        let SourceOutcome::Items(items) = source.fetch("AAPL").await else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].source, "Fake Newsroom");
    }
}
