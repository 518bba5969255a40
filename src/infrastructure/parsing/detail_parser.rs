//! Ad detail page parser

use scraper::Html;
use tracing::debug;

use super::config::DetailSelectors;
use super::html_query::SelectorChain;
use super::{ContextualParser, DetailParseContext, ParsingResult};
use crate::domain::normalizers::normalize_description;

pub struct DetailParser {
    description: SelectorChain,
}

impl DetailParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&DetailSelectors::default())
    }

    pub fn with_config(selectors: &DetailSelectors) -> ParsingResult<Self> {
        Ok(Self {
            description: SelectorChain::compile("description", &selectors.description)?,
        })
    }
}

impl ContextualParser for DetailParser {
    type Output = String;
    type Context = DetailParseContext;

    /// Description text with segments joined by newlines, or the placeholder
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let block = self.description.select_first(html.root_element());
        if block.is_none() {
            debug!("No description block on {}", context.url);
        }

        Ok(normalize_description(block.map(|b| b.text())))
    }
}
