//! Domain services
//!
//! Narrow seams between the crawl logic and the outside world: fetching a page
//! and reading listing data out of its HTML. Production adapters live in
//! `infrastructure`; tests inject canned doubles.

use async_trait::async_trait;

use super::errors::TransportError;
use super::listing::ListingCard;

/// Body and status of a fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Page retrieval
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`. Implementations report non-2xx responses as
    /// `TransportError::Status`.
    async fn get(&self, url: &str) -> Result<FetchedPage, TransportError>;
}

/// Listing data extraction from raw HTML
pub trait ListingExtractor: Send + Sync {
    /// Cards of one search-results page, in page order
    fn extract_cards(&self, html: &str, page: u32) -> Vec<ListingCard>;

    /// Normalized description of the ad detail page fetched from `url`
    fn extract_description(&self, html: &str, url: &str) -> String;

    /// Total number of result pages the site reports, if any marker exists
    fn site_total_pages(&self, html: &str) -> u32;
}
