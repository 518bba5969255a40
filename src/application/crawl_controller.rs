//! Crawl controller
//!
//! Drives one crawl run: pages are fetched one after another, the cards of a
//! page are deduplicated before any detail fetch starts, and the category's
//! stop heuristic is evaluated once the whole page has been processed.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::search::{SearchParameters, SearchUrlBuilder};
use crate::domain::crawl_state::{CrawlOutcome, CrawlState, PageOutcome, StopReason};
use crate::domain::errors::TransportError;
use crate::domain::listing::{ListingCard, ListingRecord, NO_DESCRIPTION};
use crate::domain::pagination::PageBudget;
use crate::domain::services::{FetchedPage, ListingExtractor, PageFetcher};
use crate::domain::variant::{CrawlProfile, DetailFailurePolicy, TransportErrorPolicy};
use crate::infrastructure::config::CrawlingConfig;

/// Pacing knobs for a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Slept after every fetch
    pub request_delay: Duration,
    /// Detail pages in flight at once (at least 1)
    pub detail_concurrency: usize,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from(&CrawlingConfig::default())
    }
}

impl From<&CrawlingConfig> for CrawlSettings {
    fn from(config: &CrawlingConfig) -> Self {
        Self {
            request_delay: Duration::from_millis(config.request_delay_ms),
            detail_concurrency: config.detail_concurrency.max(1),
        }
    }
}

pub struct CrawlController {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn ListingExtractor>,
    settings: CrawlSettings,
}

impl CrawlController {
    pub fn new(fetcher: Arc<dyn PageFetcher>, extractor: Arc<dyn ListingExtractor>, settings: CrawlSettings) -> Self {
        Self {
            fetcher,
            extractor,
            settings,
        }
    }

    /// Run a crawl to completion. Never fails: transport problems end up in
    /// the returned status according to the profile's policies.
    pub async fn run(
        &self,
        profile: &CrawlProfile,
        urls: &SearchUrlBuilder,
        search: &SearchParameters,
        requested_pages: u32,
    ) -> CrawlOutcome {
        let mut state = match self.page_limit(profile, urls, search, requested_pages).await {
            Ok(limit) => CrawlState::new(limit),
            Err(e) => {
                warn!("Could not read the site page count: {}", e);
                let mut state = CrawlState::new(requested_pages);
                state.stop(StopReason::TransportError);
                return state.into_outcome();
            }
        };

        info!(
            "🚀 Crawling {} (up to {} pages)",
            profile.category.label(),
            state.page_limit()
        );

        while let Some(page) = state.current_page() {
            let url = urls.build(search, Some(page));
            info!("Scraping page {}: {}", page, url);

            let fetched = self.fetch(&url).await;
            state.mark_page_fetched();

            let body = match fetched {
                Ok(fetched) => fetched.body,
                Err(e) => {
                    warn!("Failed to retrieve page {}: {}", page, e);
                    match profile.transport_error_policy {
                        TransportErrorPolicy::Abort => state.stop(StopReason::TransportError),
                        TransportErrorPolicy::SkipPage => state.advance(),
                    }
                    continue;
                }
            };

            let cards = self.extractor.extract_cards(&body, page);
            if cards.is_empty() {
                info!("No listings on page {}, stopping", page);
                state.stop(StopReason::NoContent);
                break;
            }

            let outcome = self.process_page(&mut state, profile, cards).await;
            info!(
                "Page {}: {} cards, {} new, {} duplicates, {} filtered, {} detail failures",
                page,
                outcome.cards_found,
                outcome.accepted,
                outcome.duplicates,
                outcome.filtered_out,
                outcome.detail_failures
            );

            state.finish_page(&outcome, profile.stop_heuristic);
        }

        let outcome = state.into_outcome();
        info!(
            "Crawl finished with {:?} after {} pages, {} listings",
            outcome.status,
            outcome.pages_fetched,
            outcome.records.len()
        );
        outcome
    }

    async fn page_limit(
        &self,
        profile: &CrawlProfile,
        urls: &SearchUrlBuilder,
        search: &SearchParameters,
        requested_pages: u32,
    ) -> Result<u32, TransportError> {
        if !PageBudget::needs_site_probe(profile.page_budget) {
            return Ok(PageBudget::requested(requested_pages).limit());
        }

        let probe = self.fetch(&urls.build(search, None)).await?;
        let site_total = self.extractor.site_total_pages(&probe.body);
        let budget = PageBudget::with_site_total(requested_pages, site_total);
        debug!("Page budget: requested {}, site reports {}", requested_pages, site_total);

        Ok(budget.limit())
    }

    /// Dedup the page's cards, fetch details for the new ones and accept what passes the filter
    async fn process_page(
        &self,
        state: &mut CrawlState,
        profile: &CrawlProfile,
        cards: Vec<ListingCard>,
    ) -> PageOutcome {
        let mut outcome = PageOutcome {
            cards_found: cards.len(),
            ..PageOutcome::default()
        };

        let mut queued = Vec::with_capacity(cards.len());
        for card in cards {
            if state.dedup.add(card.url.as_str()) {
                queued.push(card);
            } else {
                debug!("Already seen: {}", card.url);
                outcome.duplicates += 1;
            }
        }

        let details: Vec<(ListingCard, Result<FetchedPage, TransportError>)> = stream::iter(queued)
            .map(|card| async move {
                let result = self.fetch(&card.url).await;
                (card, result)
            })
            .buffered(self.settings.detail_concurrency.max(1))
            .collect()
            .await;

        for (card, result) in details {
            let description = match result {
                Ok(page) => self.extractor.extract_description(&page.body, &card.url),
                Err(e) => {
                    warn!("Failed to retrieve ad details: {}", e);
                    outcome.detail_failures += 1;
                    match profile.detail_failure_policy {
                        DetailFailurePolicy::SkipListing => continue,
                        DetailFailurePolicy::UsePlaceholder => NO_DESCRIPTION.to_string(),
                    }
                }
            };

            if !profile.content_filter.accepts(&description) {
                debug!("Filtered out: {}", card.url);
                outcome.filtered_out += 1;
                continue;
            }

            state.accept(ListingRecord::from_card(card, description));
            outcome.accepted += 1;
        }

        outcome
    }

    /// One fetch followed by the politeness delay; non-2xx pages become errors
    async fn fetch(&self, url: &str) -> Result<FetchedPage, TransportError> {
        let result = self.fetcher.get(url).await;

        if !self.settings.request_delay.is_zero() {
            tokio::time::sleep(self.settings.request_delay).await;
        }

        match result {
            Ok(page) if !page.is_success() => Err(TransportError::status(url, page.status)),
            other => other,
        }
    }
}
