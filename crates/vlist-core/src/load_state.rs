#![forbid(unsafe_code)]

//! Page-load bookkeeping: the in-flight flag, the page cursor and counters.
//!
//! # Invariants
//!
//! 1. At most one request is in flight.
//! 2. The cursor advances only after a successful, non-empty page.
//! 3. Every way a request can end (page, empty page, failure, abandonment)
//!    clears the in-flight flag.

use std::fmt;

/// What a loader is asked for.
///
/// Loaders that only understand "give me more" can ignore every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page number; counts successful non-empty pages.
    pub page: usize,
    /// Global index the first returned item will receive.
    pub start_index: usize,
    /// Configured page size (a hint, not a contract).
    pub page_size: usize,
}

/// Result of one load attempt as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Items were appended.
    Appended {
        /// Page number that was loaded.
        page: usize,
        /// Number of items appended.
        count: usize,
        /// Global index of the first appended item.
        start_index: usize,
    },
    /// The loader returned nothing for this page.
    Empty {
        /// Page number that was requested.
        page: usize,
    },
    /// The loader failed; the same page will be requested next time.
    Failed {
        /// Page number that was requested.
        page: usize,
        /// Rendered loader error.
        error: String,
    },
    /// Another load was already in flight; nothing was requested.
    Skipped,
}

impl LoadOutcome {
    /// Whether new items arrived.
    #[must_use]
    pub fn is_appended(&self) -> bool {
        matches!(self, Self::Appended { .. })
    }

    /// Whether the loader reported an error.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Appended { page, count, .. } => write!(f, "page {page}: {count} items"),
            Self::Empty { page } => write!(f, "page {page}: empty"),
            Self::Failed { page, error } => write!(f, "page {page}: failed: {error}"),
            Self::Skipped => f.write_str("skipped: load already in flight"),
        }
    }
}

/// Load lifecycle state owned by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadState {
    in_flight: bool,
    cursor: usize,
    empty_responses: u64,
    failures: u64,
}

impl LoadState {
    /// Whether a request is outstanding.
    #[inline]
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Page number the next request will ask for.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Successful non-empty pages so far (equal to the cursor).
    #[must_use]
    pub fn pages_loaded(&self) -> usize {
        self.cursor
    }

    /// Loads that came back empty.
    #[must_use]
    pub fn empty_responses(&self) -> u64 {
        self.empty_responses
    }

    /// Loads that failed.
    #[must_use]
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Mark a request as outstanding. Returns `false` if one already was.
    pub(crate) fn try_begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub(crate) fn clear(&mut self) {
        self.in_flight = false;
    }

    pub(crate) fn advance(&mut self) {
        self.cursor += 1;
    }

    pub(crate) fn record_empty(&mut self) {
        self.empty_responses += 1;
    }

    pub(crate) fn record_failure(&mut self) {
        self.failures += 1;
    }
}
