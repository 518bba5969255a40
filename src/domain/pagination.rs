//! Page budget calculation

use super::variant::PageBudgetSource;

/// Upper bound on the pages a crawl may request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBudget {
    pub requested: u32,
    pub site_reported: Option<u32>,
}

impl PageBudget {
    pub const fn requested(requested: u32) -> Self {
        Self {
            requested,
            site_reported: None,
        }
    }

    pub const fn with_site_total(requested: u32, site_total: u32) -> Self {
        Self {
            requested,
            site_reported: Some(site_total),
        }
    }

    /// Effective page limit. A site total of zero still allows one page.
    pub fn limit(&self) -> u32 {
        match self.site_reported {
            Some(site) => self.requested.min(site.max(1)),
            None => self.requested,
        }
    }

    pub const fn needs_site_probe(source: PageBudgetSource) -> bool {
        matches!(source, PageBudgetSource::SiteReported)
    }
}
