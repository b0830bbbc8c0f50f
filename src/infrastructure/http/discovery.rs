//! Crawl a series site for its article pages.
//!
//! Starting from the home page, every same-site link that carries a sequence
//! index is recorded and then crawled itself, so prev/next navigation on the
//! article pages reaches the rest of the series.

use super::ArticleFetcher;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use scraper::{Html, Selector};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet, VecDeque};

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
/// Dated permalinks: `/2026/01/07/slug/` is article 7
static DATED_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d{4}/\d{2}/(\d{2})/").unwrap());
static DAY_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bDay\s+(\d+)\b").unwrap());

/// Anything that can hand back the markup of a page
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> AppResult<String>;
}

#[async_trait]
impl PageSource for ArticleFetcher {
    async fn fetch_page(&self, url: &str) -> AppResult<String> {
        ArticleFetcher::fetch_page(self, url).await
    }
}

impl ArticleFetcher {
    /// Crawl `site_url` over HTTP for up to `max_articles` article URLs
    pub async fn discover(&self, site_url: &str, max_articles: usize) -> AppResult<Vec<String>> {
        discover_article_urls(self, site_url, max_articles).await
    }
}

/// Article URLs reachable from `site_url`, ordered by sequence index.
///
/// Crawling stops once `max_articles` indexes are known or no links are
/// left. Only a failure to load the home page is an error; broken article
/// pages are logged and skipped.
pub async fn discover_article_urls(
    source: &dyn PageSource,
    site_url: &str,
    max_articles: usize,
) -> AppResult<Vec<String>> {
    let home = Url::parse(site_url)
        .map_err(|e| AppError::Config(format!("invalid site URL '{}': {}", site_url, e)))?;

    tracing::info!(site = %home, "Discovering article URLs");
    let markup = source.fetch_page(home.as_str()).await?;

    let mut found: BTreeMap<u32, Url> = BTreeMap::new();
    let mut queue = VecDeque::new();
    let mut visited = HashSet::from([home.clone()]);
    record_links(&mut found, &mut queue, article_links(&home, &markup));

    while found.len() < max_articles {
        let Some(url) = queue.pop_front() else {
            break;
        };
        if !visited.insert(url.clone()) {
            continue;
        }

        match source.fetch_page(url.as_str()).await {
            Ok(markup) => record_links(&mut found, &mut queue, article_links(&url, &markup)),
            Err(e) => tracing::warn!(url = %url, error = %e, "Skipping unreachable page"),
        }
    }

    tracing::info!(articles = found.len(), "Article discovery finished");
    Ok(found.into_values().map(String::from).collect())
}

/// Same-site links on a page that name a sequence index.
///
/// The index comes from a dated path, else from a `Day N` link label.
pub fn article_links(page_url: &Url, markup: &str) -> Vec<(u32, Url)> {
    let document = Html::parse_document(markup);
    let mut links = Vec::new();

    for anchor in document.select(&LINK_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(mut url) = page_url.join(href) else {
            continue;
        };
        url.set_fragment(None);
        if url.host_str() != page_url.host_str() {
            continue;
        }

        let label = anchor.text().collect::<String>();
        let index = capture_index(&DATED_PATH, url.path())
            .or_else(|| capture_index(&DAY_LABEL, &label));
        if let Some(index) = index {
            links.push((index, url));
        }
    }

    links
}

fn capture_index(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|c| c[1].parse().ok())
        .filter(|index| *index > 0)
}

fn record_links(found: &mut BTreeMap<u32, Url>, queue: &mut VecDeque<Url>, links: Vec<(u32, Url)>) {
    for (index, url) in links {
        if let Entry::Vacant(slot) = found.entry(index) {
            tracing::debug!(index = index, url = %url, "Found article");
            slot.insert(url.clone());
            queue.push_back(url);
        }
    }
}
