use crate::error::{AppError, AppResult};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::path::Path;
use std::time::Duration;

mod discovery;

pub use discovery::{article_links, discover_article_urls, PageSource};

const USER_AGENT: &str = "Mozilla/5.0 (Podcast Generator Bot)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const UNKNOWN_TITLE: &str = "Unknown Title";

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static CONTENT_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["article", "main", "body"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

static DAY_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Day\s+(\d+)").unwrap());
static PUBLISHED_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},\s+\d{4}")
        .unwrap()
});

/// One article as found on its page
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub sequence_index: u32,
    pub title: String,
    pub date: String,
    pub url: String,
    pub content_html: String,
}

/// Inbound markup source: fetches article pages over HTTP.
pub struct ArticleFetcher {
    http_client: reqwest::Client,
    delay: Duration,
}

impl ArticleFetcher {
    pub fn new(delay: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client, delay })
    }

    /// Fetch raw markup for a page, then wait out the politeness delay
    pub async fn fetch_page(&self, url: &str) -> AppResult<String> {
        tracing::info!(url = url, "Fetching article page");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("{}: {}", url, e)))?
            .error_for_status()
            .map_err(|e| AppError::Fetch(format!("{}: {}", url, e)))?;

        let markup = response
            .text()
            .await
            .map_err(|e| AppError::Fetch(format!("{}: failed to read body: {}", url, e)))?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        tracing::debug!(url = url, size_bytes = markup.len(), "Article page fetched");
        Ok(markup)
    }
}

/// Read markup saved to disk
pub fn read_local_page(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        tracing::error!(error = %e, path = %path.display(), "Failed to read local page");
        AppError::from(e)
    })
}

/// Pull title, sequence index, date and article body out of a page.
///
/// `fallback_index` is used when the title carries no `Day N` marker.
pub fn parse_article(url: &str, markup: &str, fallback_index: u32) -> Article {
    let document = Html::parse_document(markup);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|h1| h1.text().collect::<Vec<_>>().join(" "))
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let sequence_index = DAY_NUMBER
        .captures(&title)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(fallback_index);

    let date = document
        .root_element()
        .text()
        .find_map(|t| PUBLISHED_DATE.find(t).map(|m| m.as_str().to_string()))
        .unwrap_or_default();

    let content_html = CONTENT_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).next())
        .map(|element| element.inner_html())
        .unwrap_or_else(|| markup.to_string());

    Article {
        sequence_index,
        title,
        date,
        url: url.to_string(),
        content_html,
    }
}
