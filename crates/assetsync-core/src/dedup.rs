//! Run-scoped URL → local path table.
//!
//! Consulted before every fetch so a URL referenced by several products (or by
//! one product's main image and gallery) is fetched at most once per run.

use std::collections::HashMap;

/// Outcome previously recorded for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Written (or found on disk) at this catalog-relative path.
    Written(String),
    /// Fetch failed earlier in this run.
    Failed,
}

#[derive(Debug, Default)]
pub struct DedupTable {
    entries: HashMap<String, Resolved>,
}

impl DedupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previously recorded outcome for `url`, if any.
    pub fn resolve(&self, url: &str) -> Option<&Resolved> {
        self.entries.get(url.trim())
    }

    pub fn record(&mut self, url: &str, local_path: impl Into<String>) {
        self.entries
            .insert(url.trim().to_string(), Resolved::Written(local_path.into()));
    }

    pub fn record_failure(&mut self, url: &str) {
        self.entries.insert(url.trim().to_string(), Resolved::Failed);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
