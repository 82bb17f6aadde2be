use crate::index::TermIndexConfig;

/// Why the cursor is loading terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadMode {
    /// Position at the first term >= target. Scans open-ended with the small
    /// initial cap, since most seeks only look at a term or two.
    Seek,
    /// Continue a field after a chunk boundary. Scans up to the field's
    /// boundary key with the full chunk cap.
    Resume,
}

impl LoadMode {
    pub(crate) fn scan_cap(&self, config: &TermIndexConfig) -> usize {
        match self {
            LoadMode::Seek => config.max_init_size,
            LoadMode::Resume => config.max_chunk_size,
        }
    }
}

/// Store-fetch progress of the current skip-to lineage.
///
/// ```text
/// Unpositioned --scan--> Fetching { fetches: 1, exhausted }
/// Fetching { n, _ } --scan--> Fetching { n + 1, exhausted }
/// any --skip_to / restart--> Unpositioned
/// ```
///
/// Cache hits do not move the state: only real store scans count. The state
/// is bookkeeping for callers and tests; paging itself is driven by the
/// boundary that ends each buffered chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    /// No store scan issued since the last skip-to.
    #[default]
    Unpositioned,
    /// `fetches` scans issued; `exhausted` once the latest one returned fewer
    /// rows than its cap.
    Fetching { fetches: usize, exhausted: bool },
}

impl FetchState {
    pub(crate) fn record_scan(self, exhausted: bool) -> Self {
        FetchState::Fetching { fetches: self.fetches() + 1, exhausted }
    }

    pub fn fetches(&self) -> usize {
        match self {
            FetchState::Unpositioned => 0,
            FetchState::Fetching { fetches, .. } => *fetches,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, FetchState::Fetching { exhausted: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{FetchState, LoadMode};
    use crate::index::TermIndexConfig;

    #[test]
    fn test_transitions() {
        let state = FetchState::default();
        assert_eq!(state.fetches(), 0);
        assert!(!state.is_exhausted());

        let state = state.record_scan(false);
        assert_eq!(state, FetchState::Fetching { fetches: 1, exhausted: false });
        let state = state.record_scan(true);
        assert_eq!(state, FetchState::Fetching { fetches: 2, exhausted: true });
        assert!(state.is_exhausted());
    }

    #[test]
    fn test_scan_cap() {
        let config = TermIndexConfig::default();
        assert_eq!(LoadMode::Seek.scan_cap(&config), 2);
        assert_eq!(LoadMode::Resume.scan_cap(&config), 1024);
    }
}
