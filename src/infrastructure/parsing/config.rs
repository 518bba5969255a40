//! Parsing configuration for HTML extraction
//!
//! CSS selector lists per extracted field. Each list is tried in order and the
//! first selector that matches wins, so site markup changes can be absorbed
//! from the config file without a rebuild.

use serde::{Deserialize, Serialize};

fn selectors(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    pub listing_card: ListingCardSelectors,
    pub detail: DetailSelectors,
    pub pagination: PaginationSelectors,
}

/// CSS selectors for search-results pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingCardSelectors {
    /// One element per ad card
    pub card: Vec<String>,

    /// Ad detail link inside a card
    pub link: Vec<String>,

    pub price: Vec<String>,

    /// "location - date" text
    pub location_date: Vec<String>,
}

impl Default for ListingCardSelectors {
    fn default() -> Self {
        Self {
            card: selectors(&[r#"div[data-cy="l-card"]"#]),
            link: selectors(&["a.css-z3gu2d[href]", "a[href]"]),
            price: selectors(&[r#"p[data-testid="ad-price"]"#]),
            location_date: selectors(&[r#"p[data-testid="location-date"]"#]),
        }
    }
}

/// CSS selectors for ad detail pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    pub description: Vec<String>,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            description: selectors(&[r#"div[data-cy="ad_description"]"#]),
        }
    }
}

/// CSS selectors used to read the site's total page count
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSelectors {
    /// Numbered page links; the last one carries the total
    pub page_links: Vec<String>,

    /// "next page" link whose href carries `page=N`
    pub forward_link: Vec<String>,
}

impl Default for PaginationSelectors {
    fn default() -> Self {
        Self {
            page_links: selectors(&["ul.pagination-list a"]),
            forward_link: selectors(&[r#"a[data-cy="pagination-forward"]"#]),
        }
    }
}
