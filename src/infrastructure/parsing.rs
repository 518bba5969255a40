//! HTML parsing infrastructure
//!
//! One `ContextualParser` per page kind, each built from a configurable list
//! of fallback selectors.

pub mod config;
pub mod context;
pub mod detail_parser;
pub mod html_query;
pub mod listing_card_parser;
pub mod pagination_parser;

pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use config::ParsingConfig;
pub use context::{DetailParseContext, ParseContext};
pub use detail_parser::DetailParser;
pub use listing_card_parser::ListingCardParser;
pub use pagination_parser::PaginationParser;

use scraper::Html;

/// Parser trait with context support
pub trait ContextualParser {
    type Output;
    type Context;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}
