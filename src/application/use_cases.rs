//! Harvest use case: crawl, rank and export one search
//!
//! Wires the crawl controller to the exporter and turns the outcome into a
//! report for the console.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, warn};

use super::crawl_controller::{CrawlController, CrawlSettings};
use super::search::{SearchRequest, SearchUrlBuilder};
use crate::domain::crawl_state::CrawlStatus;
use crate::domain::listing::RankedListing;
use crate::domain::ranking::rank_listings;
use crate::domain::services::{ListingExtractor, PageFetcher};
use crate::domain::variant::{CrawlProfile, ListingCategory, TransportErrorPolicy};
use crate::infrastructure::config::{AppConfig, SiteConfig};
use crate::infrastructure::export::{ExportReport, ListingExporter};
use crate::infrastructure::http_client::{HttpClient, HttpClientConfig};
use crate::infrastructure::listing_extractor::ScraperListingExtractor;

/// Result of one harvest run
#[derive(Debug)]
pub struct HarvestReport {
    pub category: ListingCategory,
    pub status: CrawlStatus,
    pub pages_fetched: u32,
    pub page_limit: u32,
    pub listings: Vec<RankedListing>,
    pub export: Option<ExportReport>,
}

impl HarvestReport {
    /// Console summary of the run
    pub fn summary(&self) -> String {
        let mut out = String::new();

        match self.status {
            CrawlStatus::Stopped(reason) => {
                let _ = writeln!(out, "Stopped early: {reason}.");
            }
            CrawlStatus::Done | CrawlStatus::Running { .. } => {}
        }

        match &self.export {
            Some(export) => {
                for path in &export.written {
                    let _ = writeln!(out, "Results have been written to {}", path.display());
                }
                for failure in &export.failures {
                    let _ = writeln!(out, "Export failed: {failure}");
                }
            }
            None => {
                let _ = writeln!(out, "Invalid format selected. Please choose 'csv', 'json', or 'both'.");
            }
        }

        if self.listings.is_empty() {
            let _ = write!(
                out,
                "No valid {} listings found across {} pages.",
                self.category.label().to_lowercase(),
                self.pages_fetched
            );
        } else {
            let _ = write!(
                out,
                "Total number of valid listings found across {} pages: {}",
                self.pages_fetched,
                self.listings.len()
            );
        }

        out
    }
}

pub struct HarvestUseCase {
    controller: CrawlController,
    site: SiteConfig,
    exporter: ListingExporter,
    transport_policy_override: Option<TransportErrorPolicy>,
}

impl HarvestUseCase {
    pub fn new(controller: CrawlController, site: SiteConfig, exporter: ListingExporter) -> Self {
        Self {
            controller,
            site,
            exporter,
            transport_policy_override: None,
        }
    }

    pub fn with_transport_policy_override(mut self, policy: Option<TransportErrorPolicy>) -> Self {
        self.transport_policy_override = policy;
        self
    }

    /// Production wiring: reqwest fetcher and scraper-based extractor
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher: Arc<dyn PageFetcher> =
            Arc::new(HttpClient::with_config(HttpClientConfig::from(&config.http))?);
        let extractor: Arc<dyn ListingExtractor> = Arc::new(
            ScraperListingExtractor::new(config.site.base_url.as_str(), &config.parsing)
                .context("Invalid parsing selectors in configuration")?,
        );

        let controller = CrawlController::new(fetcher, extractor, CrawlSettings::from(&config.crawling));

        Ok(Self::new(
            controller,
            config.site.clone(),
            ListingExporter::new(config.export.output_dir.clone()),
        )
        .with_transport_policy_override(config.crawling.transport_error_policy))
    }

    pub fn profile_for(&self, category: ListingCategory) -> CrawlProfile {
        let profile = CrawlProfile::for_category(category);
        match self.transport_policy_override {
            Some(policy) => profile.with_transport_error_policy(policy),
            None => profile,
        }
    }

    pub async fn execute(&self, request: &SearchRequest) -> Result<HarvestReport> {
        let started_at = Utc::now();
        let profile = self.profile_for(request.category);
        let urls = SearchUrlBuilder::for_category(&self.site, request.category)
            .with_context(|| format!("Invalid site URL for {}", request.category.label()))?;

        let outcome = self
            .controller
            .run(&profile, &urls, &request.params, request.requested_pages)
            .await;

        let status = outcome.status;
        let pages_fetched = outcome.pages_fetched;
        let page_limit = outcome.page_limit;
        let listings = rank_listings(outcome.records);

        let export = if request.output.is_empty() {
            warn!("No known output format selected, nothing exported");
            None
        } else {
            Some(
                self.exporter
                    .export(request.category.output_stem(), &listings, request.output),
            )
        };

        let finished_at = Utc::now();
        info!(
            "✅ Harvest of {} finished in {}s with {} listings",
            request.category.label(),
            (finished_at - started_at).num_seconds(),
            listings.len()
        );

        Ok(HarvestReport {
            category: request.category,
            status,
            pages_fetched,
            page_limit,
            listings,
            export,
        })
    }
}
