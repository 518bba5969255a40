//! Listing card parser for search-results pages
//!
//! Extracts link, price and location from every ad card. Cards that cannot
//! yield a usable link are skipped; missing price or location fall back to
//! fixed placeholders.

use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use super::config::ListingCardSelectors;
use super::html_query::{SelectorChain, attribute, joined_text};
use super::{ContextualParser, ParseContext, ParsingError, ParsingResult};
use crate::domain::listing::{LOCATION_NOT_FOUND, ListingCard, PRICE_NOT_FOUND};
use crate::domain::normalizers::format_location;
use crate::infrastructure::config::utils::resolve_url;

pub struct ListingCardParser {
    card: SelectorChain,
    link: SelectorChain,
    price: SelectorChain,
    location_date: SelectorChain,
}

impl ListingCardParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ListingCardSelectors::default())
    }

    pub fn with_config(selectors: &ListingCardSelectors) -> ParsingResult<Self> {
        Ok(Self {
            card: SelectorChain::compile("card", &selectors.card)?,
            link: SelectorChain::compile("link", &selectors.link)?,
            price: SelectorChain::compile("price", &selectors.price)?,
            location_date: SelectorChain::compile("location_date", &selectors.location_date)?,
        })
    }

    fn extract_card(&self, element: ElementRef<'_>, context: &ParseContext) -> ParsingResult<ListingCard> {
        let href = self
            .link
            .select_first(element)
            .and_then(|link| attribute(link, "href"))
            .ok_or_else(|| ParsingError::required_field_missing("link", Some("listing card")))?;

        let url = resolve_url(href, &context.base_url)
            .map_err(|e| ParsingError::url_resolution_failed(href, &e.to_string(), &context.base_url))?;

        let raw_price = self
            .price
            .select_first(element)
            .map_or_else(|| PRICE_NOT_FOUND.to_string(), |p| joined_text(p, ""));

        let location = self
            .location_date
            .select_first(element)
            .map_or_else(|| LOCATION_NOT_FOUND.to_string(), |l| format_location(&joined_text(l, "")));

        Ok(ListingCard::new(url, raw_price, location))
    }
}

impl ContextualParser for ListingCardParser {
    type Output = Vec<ListingCard>;
    type Context = ParseContext;

    /// Cards in page order. An empty result is reported as `NoListingsFound`.
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let elements = self.card.select_all(html.root_element());

        if elements.is_empty() {
            return Err(ParsingError::no_listings_found(context.page, self.card.sources().to_vec()));
        }

        debug!("Found {} listing cards on page {}", elements.len(), context.page);

        let mut cards = Vec::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            match self.extract_card(element, context) {
                Ok(card) => cards.push(card),
                Err(e @ ParsingError::RequiredFieldMissing { .. }) => {
                    debug!("Skipping card {} on page {}: {}", index, context.page, e);
                }
                Err(e) => {
                    warn!("Skipping card {} on page {}: {}", index, context.page, e);
                }
            }
        }

        Ok(cards)
    }
}
