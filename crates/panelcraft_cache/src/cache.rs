//! Image cache implementation.

use derive_getters::Getters;
use std::collections::HashMap;

/// Lifecycle of one depiction's image.
///
/// A depiction with no entry is Absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    /// Claimed; a fetch is in flight
    Pending,
    /// Base64 payload ready to render
    Ready(String),
    /// Fetch failed; the reason is shown next to the retry affordance
    Failed(String),
}

impl ImageState {
    /// True once the fetch has settled either way.
    pub fn is_settled(&self) -> bool {
        !matches!(self, ImageState::Pending)
    }
}

/// Counts of entries per state, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct CacheSummary {
    pending: usize,
    ready: usize,
    failed: usize,
}

/// Map from depiction text to image state.
///
/// Entries are never evicted; the cache lives for one reading session.
///
/// # Example
///
/// ```
/// use panelcraft_cache::{ImageCache, ImageState};
///
/// let mut cache = ImageCache::default();
///
/// assert!(cache.claim("a red boat at sunset"));
/// // Second claim is refused; the first fetch will fill the entry.
/// assert!(!cache.claim("a red boat at sunset"));
///
/// cache.fulfil("a red boat at sunset", "aGVsbG8=");
/// assert_eq!(
///     cache.state("a red boat at sunset"),
///     Some(&ImageState::Ready("aGVsbG8=".to_string()))
/// );
/// ```
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<String, ImageState>,
}

impl ImageCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an Absent depiction, moving it to Pending.
    ///
    /// Returns false if the depiction already has an entry in any state.
    #[tracing::instrument(skip(self), fields(cache_size = self.entries.len()))]
    pub fn claim(&mut self, depiction: &str) -> bool {
        if self.entries.contains_key(depiction) {
            tracing::trace!("Depiction already tracked, skipping claim");
            return false;
        }
        self.entries
            .insert(depiction.to_string(), ImageState::Pending);
        tracing::debug!("Claimed depiction");
        true
    }

    /// Move a Failed depiction back to Pending for a retry.
    ///
    /// Returns false for any other state, including Absent.
    pub fn reclaim_failed(&mut self, depiction: &str) -> bool {
        match self.entries.get_mut(depiction) {
            Some(state @ ImageState::Failed(_)) => {
                *state = ImageState::Pending;
                tracing::debug!(depiction, "Reclaimed failed depiction");
                true
            }
            _ => false,
        }
    }

    /// Store a ready payload.
    pub fn fulfil(&mut self, depiction: &str, payload: impl Into<String>) {
        self.entries
            .insert(depiction.to_string(), ImageState::Ready(payload.into()));
    }

    /// Record a failed fetch.
    pub fn fail(&mut self, depiction: &str, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(depiction, reason = %reason, "Image marked failed");
        self.entries
            .insert(depiction.to_string(), ImageState::Failed(reason));
    }

    /// Current state, or None when Absent.
    pub fn state(&self, depiction: &str) -> Option<&ImageState> {
        self.entries.get(depiction)
    }

    /// Count entries per state.
    pub fn summary(&self) -> CacheSummary {
        self.entries
            .values()
            .fold(CacheSummary::default(), |mut summary, state| {
                match state {
                    ImageState::Pending => summary.pending += 1,
                    ImageState::Ready(_) => summary.ready += 1,
                    ImageState::Failed(_) => summary.failed += 1,
                }
                summary
            })
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        tracing::info!(cleared = count, "Cleared image cache");
    }

    /// Get number of tracked depictions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
