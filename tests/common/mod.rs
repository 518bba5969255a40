//! Shared test doubles for crawl tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use listing_harvester::application::search::{SearchParameters, SearchUrlBuilder};
use listing_harvester::domain::errors::TransportError;
use listing_harvester::domain::listing::ListingCard;
use listing_harvester::domain::services::{FetchedPage, ListingExtractor, PageFetcher};
use listing_harvester::domain::variant::ListingCategory;
use listing_harvester::infrastructure::config::SiteConfig;

#[derive(Clone)]
enum Canned {
    Page { body: String, delay: Option<Duration> },
    Status(u16),
    Network,
}

/// Fetcher answering from a URL-keyed table and recording every request
#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, Canned>,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(
            url.into(),
            Canned::Page {
                body: body.into(),
                delay: None,
            },
        );
        self
    }

    pub fn slow_page(mut self, url: impl Into<String>, body: impl Into<String>, delay_ms: u64) -> Self {
        self.responses.insert(
            url.into(),
            Canned::Page {
                body: body.into(),
                delay: Some(Duration::from_millis(delay_ms)),
            },
        );
        self
    }

    pub fn status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), Canned::Status(status));
        self
    }

    pub fn network_failure(mut self, url: impl Into<String>) -> Self {
        self.responses.insert(url.into(), Canned::Network);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.requests.lock().unwrap().iter().any(|u| u == url)
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn get(&self, url: &str) -> Result<FetchedPage, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());

        match self.responses.get(url).cloned() {
            Some(Canned::Page { body, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(FetchedPage::ok(body))
            }
            // Returned as a page so the controller's status check is exercised
            Some(Canned::Status(status)) => Ok(FetchedPage {
                status,
                body: String::new(),
            }),
            Some(Canned::Network) => Err(TransportError::network(url, "connection reset")),
            None => Err(TransportError::status(url, 404)),
        }
    }
}

/// Extractor reading a line-based test format instead of HTML:
/// `CARD <url>|<price>|<location>`, `DESC <text>`, `TOTAL <n>`
pub struct CannedExtractor;

impl ListingExtractor for CannedExtractor {
    fn extract_cards(&self, body: &str, _page: u32) -> Vec<ListingCard> {
        body.lines()
            .filter_map(|line| line.strip_prefix("CARD "))
            .map(|card| {
                let mut fields = card.split('|');
                ListingCard::new(
                    fields.next().unwrap_or_default(),
                    fields.next().unwrap_or("Price not found"),
                    fields.next().unwrap_or("Location not found"),
                )
            })
            .collect()
    }

    fn extract_description(&self, body: &str, _url: &str) -> String {
        body.strip_prefix("DESC ")
            .map_or_else(|| "No description available".to_string(), ToString::to_string)
    }

    fn site_total_pages(&self, body: &str) -> u32 {
        body.strip_prefix("TOTAL ")
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or(1)
    }
}

pub fn ad_url(id: &str) -> String {
    format!("https://www.olx.pt/d/anuncio/{id}.html")
}

/// Search page body listing `(id, price)` cards
pub fn search_page(cards: &[(&str, &str)]) -> String {
    cards
        .iter()
        .map(|(id, price)| format!("CARD {}|{}|Lisboa", ad_url(id), price))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn detail(text: &str) -> String {
    format!("DESC {text}")
}

pub fn url_builder(category: ListingCategory) -> SearchUrlBuilder {
    SearchUrlBuilder::for_category(&SiteConfig::default(), category).unwrap()
}

pub fn page_url(category: ListingCategory, params: &SearchParameters, page: u32) -> String {
    url_builder(category).build(params, Some(page))
}

pub fn probe_url(category: ListingCategory, params: &SearchParameters) -> String {
    url_builder(category).build(params, None)
}
