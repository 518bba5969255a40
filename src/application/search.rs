//! Search request and URL construction

use url::Url;

use crate::domain::variant::ListingCategory;
use crate::infrastructure::config::{CategorySite, SiteConfig, olx::params};
use crate::infrastructure::export::OutputSelection;

/// User-supplied search filters. Blank values mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParameters {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year_from: Option<String>,
    pub year_to: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl SearchParameters {
    /// Optional filter pairs, in query order
    fn filter_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            (params::MODEL, self.model.as_ref()),
            (params::YEAR_FROM, self.year_from.as_ref()),
            (params::YEAR_TO, self.year_to.as_ref()),
            (params::PRICE_FROM, self.price_min.as_ref()),
            (params::PRICE_TO, self.price_max.as_ref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| non_blank(value).map(|v| (key, v)))
        .collect()
    }

    pub fn brand_segment(&self) -> Option<String> {
        non_blank(self.brand.as_ref()).map(str::to_lowercase)
    }
}

/// Everything one harvest run needs from the user
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub category: ListingCategory,
    pub params: SearchParameters,
    pub requested_pages: u32,
    pub output: OutputSelection,
}

/// Builds search-results URLs for one category
#[derive(Debug, Clone)]
pub struct SearchUrlBuilder {
    category_url: Url,
    brand_in_path: bool,
    fixed_params: Vec<(String, String)>,
}

impl SearchUrlBuilder {
    pub fn new(base_url: &str, site: &CategorySite) -> Result<Self, url::ParseError> {
        let category_url = Url::parse(base_url)?.join(&site.path)?;

        Ok(Self {
            category_url,
            brand_in_path: site.brand_in_path,
            fixed_params: site
                .fixed_params
                .iter()
                .map(|p| (p.key.clone(), p.value.clone()))
                .collect(),
        })
    }

    pub fn for_category(site: &SiteConfig, category: ListingCategory) -> Result<Self, url::ParseError> {
        Self::new(&site.base_url, site.category(category))
    }

    /// Search URL for `page`; `None` leaves out the page parameter (site probe)
    pub fn build(&self, search: &SearchParameters, page: Option<u32>) -> String {
        let mut url = self.category_url.clone();

        if self.brand_in_path {
            if let Some(brand) = search.brand_segment() {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().push(&brand).push("");
                }
            }
        }

        let mut pairs: Vec<(String, String)> = Vec::new();
        if let Some(page) = page {
            pairs.push((params::PAGE.to_string(), page.to_string()));
        }
        pairs.extend(self.fixed_params.iter().cloned());
        pairs.extend(
            search
                .filter_pairs()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );

        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        url.to_string()
    }
}
