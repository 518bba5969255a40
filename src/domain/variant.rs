//! Category-specific crawl behavior
//!
//! The three listing categories share one pipeline; what differs between them
//! is captured here as plain values: which heuristic ends pagination, where the
//! page budget comes from, how transport failures are treated and which
//! content filter applies.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingCategory {
    Bike,
    Car,
    Motorcycle,
}

impl ListingCategory {
    pub const fn all() -> [Self; 3] {
        [Self::Bike, Self::Car, Self::Motorcycle]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Bike => "Bicycles",
            Self::Car => "Cars",
            Self::Motorcycle => "Motorcycles & scooters",
        }
    }

    /// File name (without extension) used for exports
    pub const fn output_stem(self) -> &'static str {
        match self {
            Self::Bike => "bike_listings",
            Self::Car => "car_listings",
            Self::Motorcycle => "motorcycle_listings",
        }
    }

    /// Whether searches in this category are scoped by brand/model/year
    pub const fn uses_vehicle_filters(self) -> bool {
        matches!(self, Self::Car | Self::Motorcycle)
    }
}

impl fmt::Display for ListingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rule deciding when pagination ends, evaluated after each page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopHeuristic {
    /// Stop after a page on which any already-seen URL appeared
    DuplicateSeen,
    /// Stop after a page that produced no newly accepted listing
    NoNewListings,
    /// Only the page budget ends the crawl
    PageBudget,
}

/// Where the upper page bound comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBudgetSource {
    /// The page count requested by the user
    Requested,
    /// `min(requested, total pages reported by the site)`
    SiteReported,
}

/// What a failed search-page fetch does to the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorPolicy {
    /// End the whole crawl
    Abort,
    /// Count the page as empty and continue with the next one
    SkipPage,
}

/// What a failed detail-page fetch does to that listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailFailurePolicy {
    /// Drop the listing
    SkipListing,
    /// Keep the listing with the placeholder description
    UsePlaceholder,
}

/// Post-extraction filter on the listing description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentFilter {
    AcceptAll,
    /// Reject when the description contains this literal substring
    ExcludeDescriptionSubstring(String),
}

impl ContentFilter {
    pub fn accepts(&self, description: &str) -> bool {
        match self {
            Self::AcceptAll => true,
            Self::ExcludeDescriptionSubstring(needle) => !description.contains(needle.as_str()),
        }
    }
}

/// Wheel-size exclusion applied to bicycle ads
pub const BIKE_EXCLUDED_SUBSTRING: &str = "26";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlProfile {
    pub category: ListingCategory,
    pub stop_heuristic: StopHeuristic,
    pub page_budget: PageBudgetSource,
    pub transport_error_policy: TransportErrorPolicy,
    pub detail_failure_policy: DetailFailurePolicy,
    pub content_filter: ContentFilter,
}

impl CrawlProfile {
    pub fn for_category(category: ListingCategory) -> Self {
        match category {
            ListingCategory::Bike => Self {
                category,
                stop_heuristic: StopHeuristic::DuplicateSeen,
                page_budget: PageBudgetSource::Requested,
                transport_error_policy: TransportErrorPolicy::SkipPage,
                detail_failure_policy: DetailFailurePolicy::SkipListing,
                content_filter: ContentFilter::ExcludeDescriptionSubstring(
                    BIKE_EXCLUDED_SUBSTRING.to_string(),
                ),
            },
            ListingCategory::Car => Self {
                category,
                stop_heuristic: StopHeuristic::PageBudget,
                page_budget: PageBudgetSource::SiteReported,
                transport_error_policy: TransportErrorPolicy::SkipPage,
                detail_failure_policy: DetailFailurePolicy::UsePlaceholder,
                content_filter: ContentFilter::AcceptAll,
            },
            ListingCategory::Motorcycle => Self {
                category,
                stop_heuristic: StopHeuristic::NoNewListings,
                page_budget: PageBudgetSource::Requested,
                transport_error_policy: TransportErrorPolicy::Abort,
                detail_failure_policy: DetailFailurePolicy::UsePlaceholder,
                content_filter: ContentFilter::AcceptAll,
            },
        }
    }

    /// Override the category default, e.g. from configuration
    pub fn with_transport_error_policy(mut self, policy: TransportErrorPolicy) -> Self {
        self.transport_error_policy = policy;
        self
    }
}
