//! `ListingExtractor` backed by the scraper-based parsers

use scraper::Html;
use tracing::{debug, warn};

use super::parsing::{
    ContextualParser, DetailParseContext, DetailParser, ListingCardParser, PaginationParser, ParseContext,
    ParsingConfig, ParsingError, ParsingResult,
};
use crate::domain::listing::{ListingCard, NO_DESCRIPTION};
use crate::domain::services::ListingExtractor;

pub struct ScraperListingExtractor {
    base_url: String,
    cards: ListingCardParser,
    detail: DetailParser,
    pagination: PaginationParser,
}

impl ScraperListingExtractor {
    pub fn new(base_url: impl Into<String>, config: &ParsingConfig) -> ParsingResult<Self> {
        Ok(Self {
            base_url: base_url.into(),
            cards: ListingCardParser::with_config(&config.listing_card)?,
            detail: DetailParser::with_config(&config.detail)?,
            pagination: PaginationParser::with_config(&config.pagination)?,
        })
    }
}

impl ListingExtractor for ScraperListingExtractor {
    fn extract_cards(&self, html: &str, page: u32) -> Vec<ListingCard> {
        let document = Html::parse_document(html);
        let context = ParseContext::new(page, self.base_url.as_str());

        match self.cards.parse_with_context(&document, &context) {
            Ok(cards) => cards,
            Err(e @ ParsingError::NoListingsFound { .. }) => {
                debug!("{}", e);
                Vec::new()
            }
            Err(e) => {
                warn!("Card extraction failed on page {}: {}", page, e);
                Vec::new()
            }
        }
    }

    fn extract_description(&self, html: &str, url: &str) -> String {
        let document = Html::parse_document(html);
        self.detail
            .parse_with_context(&document, &DetailParseContext::new(url))
            .unwrap_or_else(|e| {
                warn!("Description extraction failed for {}: {}", url, e);
                NO_DESCRIPTION.to_string()
            })
    }

    fn site_total_pages(&self, html: &str) -> u32 {
        let document = Html::parse_document(html);
        self.pagination
            .parse_with_context(&document, &ParseContext::new(1, self.base_url.as_str()))
            .unwrap_or(1)
    }
}
