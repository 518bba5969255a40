//! Site-reported total page count

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;
use tracing::debug;

use super::config::PaginationSelectors;
use super::html_query::{SelectorChain, attribute, joined_text};
use super::{ContextualParser, ParseContext, ParsingResult};

lazy_static! {
    static ref PAGE_PARAM: Regex = Regex::new(r"page=(\d+)").unwrap();
}

pub struct PaginationParser {
    page_links: SelectorChain,
    forward_link: SelectorChain,
}

impl PaginationParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&PaginationSelectors::default())
    }

    pub fn with_config(selectors: &PaginationSelectors) -> ParsingResult<Self> {
        Ok(Self {
            page_links: SelectorChain::compile("page_links", &selectors.page_links)?,
            forward_link: SelectorChain::compile("forward_link", &selectors.forward_link)?,
        })
    }

    fn from_forward_link(&self, html: &Html) -> Option<u32> {
        let href = attribute(self.forward_link.select_first(html.root_element())?, "href")?;
        let next: u32 = PAGE_PARAM.captures(href)?.get(1)?.as_str().parse().ok()?;
        Some(next.saturating_add(1))
    }
}

impl ContextualParser for PaginationParser {
    type Output = u32;
    type Context = ParseContext;

    /// Last numbered page link, else forward link `page=N` plus one, else 1.
    /// A last link whose text is not a number also yields 1.
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let links = self.page_links.select_all(html.root_element());

        let total = if let Some(last) = links.last() {
            joined_text(*last, "").parse::<u32>().unwrap_or(1)
        } else {
            self.from_forward_link(html).unwrap_or(1)
        };

        debug!("Site reports {} result pages (probe of page {})", total, context.page);
        Ok(total)
    }
}
