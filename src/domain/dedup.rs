//! Run-scoped set of canonical listing URLs

use std::collections::HashSet;

/// Tracks which ad URLs a crawl run has already taken for processing
#[derive(Debug, Default, Clone)]
pub struct DedupTracker {
    seen: HashSet<String>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Record a URL. Returns `true` if it was not tracked before.
    pub fn add(&mut self, url: impl Into<String>) -> bool {
        self.seen.insert(url.into())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
