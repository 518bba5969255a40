//! Infrastructure layer for HTTP, HTML parsing, export and configuration
//!
//! Adapters behind the domain service traits plus the ambient pieces
//! (configuration loading and logging setup).

pub mod config; // Configuration sections, site constants and loader
pub mod export;
pub mod http_client;
pub mod listing_extractor;
pub mod logging;
pub mod parsing;
pub mod parsing_error;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, olx};
pub use export::{ExportError, ListingExporter, OutputSelection};
pub use http_client::{HttpClient, HttpClientConfig};
pub use listing_extractor::ScraperListingExtractor;
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{ParsingConfig, ParsingError, ParsingResult};
