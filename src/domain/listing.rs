//! Listing entities
//!
//! A `ListingCard` is what a search-results page tells us about an ad; a
//! `ListingRecord` is the card enriched with the detail page description and a
//! numeric sort key; a `RankedListing` is a record with its final position.

use super::normalizers::parse_price;

/// Placeholder used when a card carries no price element
pub const PRICE_NOT_FOUND: &str = "Price not found";

/// Placeholder used when a card carries no location element
pub const LOCATION_NOT_FOUND: &str = "Location not found";

/// Placeholder used when the detail page has no usable description
pub const NO_DESCRIPTION: &str = "No description available";

/// Summary of one ad as shown on a search-results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCard {
    /// Canonical absolute URL of the ad detail page
    pub url: String,

    /// Price text exactly as displayed on the card
    pub raw_price: String,

    /// Normalized location (date portion discarded)
    pub location: String,
}

impl ListingCard {
    pub fn new(url: impl Into<String>, raw_price: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            raw_price: raw_price.into(),
            location: location.into(),
        }
    }
}

/// One discovered ad, ready for filtering and ranking
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub url: String,
    pub raw_price: String,
    /// `f64::INFINITY` when the raw price could not be parsed
    pub numeric_price: f64,
    pub location: String,
    pub description: String,
}

impl ListingRecord {
    /// Combine a card with the description pulled from its detail page
    pub fn from_card(card: ListingCard, description: impl Into<String>) -> Self {
        let numeric_price = parse_price(&card.raw_price);
        Self {
            url: card.url,
            raw_price: card.raw_price,
            numeric_price,
            location: card.location,
            description: description.into(),
        }
    }
}

/// A record with its 1-based position in the final sorted export
#[derive(Debug, Clone, PartialEq)]
pub struct RankedListing {
    pub rank: usize,
    pub record: ListingRecord,
}
