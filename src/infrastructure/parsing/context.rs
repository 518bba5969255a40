//! Parsing context for HTML extraction

/// Context for parsing one search-results page
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// 1-based page number, for logging
    pub page: u32,

    /// Base URL for resolving relative links
    pub base_url: String,
}

impl ParseContext {
    pub fn new(page: u32, base_url: impl Into<String>) -> Self {
        Self {
            page,
            base_url: base_url.into(),
        }
    }
}

/// Context for parsing an ad detail page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Ad URL the page was fetched from, for logging
    pub url: String,
}

impl DetailParseContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}
