use std::thread;

use log::{debug, error, warn};
use measure_time::debug_time;

use super::term_cursor::Boundary;
use super::TermCursor;
use crate::common::errors::{StoreError, TermIndexError};
use crate::core::{ConsistencyLevel, NamedColumnsRead, PostingSet, RangeStore, Row, Term};
use crate::index::TermIndexConfig;

impl TermCursor {
    /// Load the postings of exactly `term` restricted to `document_keys`.
    ///
    /// Uses a single point read instead of a range scan and leaves the shared
    /// cache untouched. On success the cursor is positioned on `term` and
    /// returns `true`, or holds no term and returns `false` when none of the
    /// documents has a posting. Either way the following `next()` is `false`.
    pub fn load_filtered_terms<K: AsRef<[u8]>>(&mut self, term: &Term, document_keys: &[K]) -> crate::Result<bool> {
        let index_name = self.reader().index_name();
        let config = self.reader().config();
        let request = NamedColumnsRead {
            keyspace: config.keyspace.clone(),
            column_family: config.term_column_family.clone(),
            key: self.reader().key_codec().encode_key(index_name, term)?,
            column_names: document_keys.iter().map(|key| key.as_ref().to_vec()).collect(),
            consistency: ConsistencyLevel::One,
        };

        let row = {
            debug_time!("filtered read of {} documents for {}", document_keys.len(), term);
            read_with_retry(self.reader().store(), &request, config)?
        };

        self.set_field(term.field());
        match row {
            Some(row) if !row.is_tombstone() => {
                debug!("Filtered read of {} found {} postings", term, row.columns.len());
                self.fill_buffer(vec![(term.clone(), PostingSet::new(row.columns))], Boundary::Lookup);
                self.position_on_first();
                Ok(true)
            }
            _ => {
                debug!("Filtered read of {} found no postings", term);
                self.fill_buffer(vec![], Boundary::Lookup);
                self.position_on_first();
                Ok(false)
            }
        }
    }
}

/// Point read retried a fixed number of times on transient failures.
///
/// IO errors are returned immediately. Attempts are spaced by the configured
/// interval, with no sleep after the last one.
pub(crate) fn read_with_retry(
    store: &dyn RangeStore,
    request: &NamedColumnsRead,
    config: &TermIndexConfig,
) -> crate::Result<Option<Row>> {
    let attempts = config.read_retry_attempts;
    let mut last_error: Option<StoreError> = None;
    for attempt in 1..=attempts {
        match store.read_named_columns(request) {
            Ok(row) => return Ok(row),
            Err(e) if e.is_transient() => {
                warn!("Read attempt {}/{} failed: {}", attempt, attempts, e);
                last_error = Some(e);
                if attempt < attempts {
                    thread::sleep(config.read_retry_interval());
                }
            }
            Err(e) => {
                error!("Read failed with a fatal error: {}", e);
                return Err(TermIndexError::Store(e));
            }
        }
    }

    let last_error = last_error.unwrap_or_else(|| StoreError::Unavailable("no read attempted".to_string()));
    error!("Read failed after {} attempts", attempts);
    Err(TermIndexError::ReadRetriesExhausted { attempts, last_error })
}
