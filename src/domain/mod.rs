//! Domain module - Core listing logic and entities
//!
//! Entities, normalizers, crawl state and the service traits the application
//! layer drives. Nothing here performs I/O.

pub mod crawl_state;
pub mod dedup;
pub mod errors;
pub mod listing;
pub mod normalizers;
pub mod pagination;
pub mod ranking;
pub mod services;
pub mod variant;

// Re-export commonly used items
pub use crawl_state::{CrawlOutcome, CrawlState, CrawlStatus, PageOutcome, StopReason};
pub use dedup::DedupTracker;
pub use errors::TransportError;
pub use listing::{ListingCard, ListingRecord, RankedListing};
pub use variant::{CrawlProfile, ListingCategory, TransportErrorPolicy};
