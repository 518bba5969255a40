//! Parsing error types
//!
//! Per-card and per-page problems are reported with these and then resolved
//! to a skip or a placeholder by the caller; none of them reach the crawl loop.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Required field '{field}' not found in HTML")]
    RequiredFieldMissing {
        field: String,
        context: Option<String>,
    },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("No usable selector for '{field}'")]
    NoValidSelectors { field: String, errors: Vec<String> },

    #[error("No listings found on page {page}")]
    NoListingsFound { page: u32, tried_selectors: Vec<String> },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed {
        url: String,
        reason: String,
        base_url: Option<String>,
    },
}

impl ParsingError {
    pub fn required_field_missing(field: &str, context: Option<&str>) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            context: context.map(ToString::to_string),
        }
    }

    pub fn invalid_selector(selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn no_listings_found(page: u32, tried_selectors: Vec<String>) -> Self {
        Self::NoListingsFound { page, tried_selectors }
    }

    pub fn url_resolution_failed(url: &str, reason: &str, base_url: &str) -> Self {
        Self::UrlResolutionFailed {
            url: url.to_string(),
            reason: reason.to_string(),
            base_url: Some(base_url.to_string()),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
