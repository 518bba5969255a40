//! HTML query helpers over `scraper`
//!
//! A `SelectorChain` is an ordered list of compiled selectors for one field;
//! lookups use the first selector that matches anything.

use scraper::{ElementRef, Selector};
use tracing::{debug, warn};

use super::{ParsingError, ParsingResult};
use crate::domain::normalizers::join_text_segments;

#[derive(Debug, Clone)]
pub struct SelectorChain {
    field: String,
    selectors: Vec<Selector>,
    sources: Vec<String>,
}

impl SelectorChain {
    /// Compile `sources`, skipping invalid entries. Fails only when none compile.
    pub fn compile(field: &str, sources: &[String]) -> ParsingResult<Self> {
        let mut selectors = Vec::new();
        let mut compiled_sources = Vec::new();
        let mut errors = Vec::new();

        for source in sources {
            match Selector::parse(source) {
                Ok(selector) => {
                    selectors.push(selector);
                    compiled_sources.push(source.clone());
                }
                Err(e) => {
                    let err = ParsingError::invalid_selector(source, &e.to_string());
                    warn!("Failed to compile selector for '{}': {}", field, err);
                    errors.push(err.to_string());
                }
            }
        }

        if selectors.is_empty() {
            return Err(ParsingError::NoValidSelectors {
                field: field.to_string(),
                errors,
            });
        }

        if !errors.is_empty() {
            debug!("Some '{}' selectors failed to compile: {}", field, errors.join(", "));
        }

        Ok(Self {
            field: field.to_string(),
            selectors,
            sources: compiled_sources,
        })
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// All matches of the first selector that matches anything under `scope`
    pub fn select_all<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.selectors
            .iter()
            .map(|selector| scope.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }

    pub fn select_first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let (index, element) = self
            .selectors
            .iter()
            .enumerate()
            .find_map(|(index, selector)| scope.select(selector).next().map(|element| (index, element)))?;

        if index > 0 {
            debug!("'{}' matched fallback selector {}", self.field, self.sources[index]);
        }
        Some(element)
    }
}

/// Visible text of `element`: each text node trimmed, blanks dropped, joined with `separator`
pub fn joined_text(element: ElementRef<'_>, separator: &str) -> String {
    join_text_segments(element.text(), separator)
}

pub fn attribute<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}
