//! Application layer - Use cases and application services
//!
//! Builds search URLs, drives the crawl and hands the result to the exporter.

pub mod crawl_controller;
pub mod search;
pub mod use_cases;

// Re-export commonly used items
pub use crawl_controller::{CrawlController, CrawlSettings};
pub use search::{SearchParameters, SearchRequest, SearchUrlBuilder};
pub use use_cases::{HarvestReport, HarvestUseCase};
