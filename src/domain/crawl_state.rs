//! Crawl run state machine
//!
//! `Running { page }` is the only non-terminal status. The controller owns one
//! `CrawlState` per run and drives it with `finish_page` / `advance` / `stop`.

use std::fmt;

use super::dedup::DedupTracker;
use super::listing::ListingRecord;
use super::variant::StopHeuristic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TransportError,
    NoContent,
    DuplicateFound,
    NoNewListings,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TransportError => "a search page could not be fetched",
            Self::NoContent => "a search page had no listings",
            Self::DuplicateFound => "a search page repeated already-seen listings",
            Self::NoNewListings => "a search page produced no new listings",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStatus {
    Running { page: u32 },
    Stopped(StopReason),
    Done,
}

impl CrawlStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running { .. })
    }
}

/// Per-page tallies used for stop evaluation and progress logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOutcome {
    pub cards_found: usize,
    pub duplicates: usize,
    pub accepted: usize,
    pub filtered_out: usize,
    pub detail_failures: usize,
}

impl PageOutcome {
    /// Which stop reason, if any, this page triggers under `heuristic`
    pub const fn stop_reason(&self, heuristic: StopHeuristic) -> Option<StopReason> {
        match heuristic {
            StopHeuristic::DuplicateSeen if self.duplicates > 0 => Some(StopReason::DuplicateFound),
            StopHeuristic::NoNewListings if self.accepted == 0 => Some(StopReason::NoNewListings),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct CrawlState {
    pub dedup: DedupTracker,
    accepted: Vec<ListingRecord>,
    status: CrawlStatus,
    page_limit: u32,
    pages_fetched: u32,
}

impl CrawlState {
    pub fn new(page_limit: u32) -> Self {
        let status = if page_limit == 0 {
            CrawlStatus::Done
        } else {
            CrawlStatus::Running { page: 1 }
        };

        Self {
            dedup: DedupTracker::new(),
            accepted: Vec::new(),
            status,
            page_limit,
            pages_fetched: 0,
        }
    }

    pub const fn status(&self) -> CrawlStatus {
        self.status
    }

    pub const fn current_page(&self) -> Option<u32> {
        match self.status {
            CrawlStatus::Running { page } => Some(page),
            _ => None,
        }
    }

    pub const fn page_limit(&self) -> u32 {
        self.page_limit
    }

    pub fn accept(&mut self, record: ListingRecord) {
        self.accepted.push(record);
    }

    pub fn mark_page_fetched(&mut self) {
        self.pages_fetched += 1;
    }

    pub fn stop(&mut self, reason: StopReason) {
        if !self.status.is_terminal() {
            self.status = CrawlStatus::Stopped(reason);
        }
    }

    /// Move to the next page, or to `Done` once the limit is passed
    pub fn advance(&mut self) {
        if let CrawlStatus::Running { page } = self.status {
            self.status = if page >= self.page_limit {
                CrawlStatus::Done
            } else {
                CrawlStatus::Running { page: page + 1 }
            };
        }
    }

    /// Apply the stop heuristic to a finished page, then advance if still running
    pub fn finish_page(&mut self, outcome: &PageOutcome, heuristic: StopHeuristic) {
        match outcome.stop_reason(heuristic) {
            Some(reason) => self.stop(reason),
            None => self.advance(),
        }
    }

    pub fn into_outcome(self) -> CrawlOutcome {
        CrawlOutcome {
            records: self.accepted,
            status: self.status,
            pages_fetched: self.pages_fetched,
            page_limit: self.page_limit,
        }
    }
}

/// Result of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Accepted records in discovery order
    pub records: Vec<ListingRecord>,
    pub status: CrawlStatus,
    pub pages_fetched: u32,
    pub page_limit: u32,
}
