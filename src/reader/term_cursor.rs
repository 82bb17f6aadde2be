use std::collections::BTreeMap;

use log::{debug, error, warn};
use measure_time::debug_time;

use super::fetch_state::{FetchState, LoadMode};
use super::IndexReader;
use crate::common::errors::TermIndexError;
use crate::core::{ConsistencyLevel, Posting, PostingSet, ScanRequest, Term};
use crate::index::ChunkEnd;

/// Forward, sorted iteration over the terms of a field.
pub trait TermEnum {
    /// Seek to the first term >= `target`. Returns whether such a term
    /// exists; the following [`next`](TermEnum::next) moves onto it.
    fn skip_to(&mut self, target: &Term) -> crate::Result<bool>;

    /// Move onto the next term. Returns `false` once the field is exhausted.
    fn next(&mut self) -> crate::Result<bool>;

    /// The current term.
    fn term(&self) -> crate::Result<&Term>;

    /// Number of postings of the current term, 0 when unpositioned.
    fn doc_freq(&self) -> usize;

    fn close(&mut self) -> crate::Result<()>;
}

/// Marks the end of a term buffer. Never visible through [`TermEnum::term`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Boundary {
    /// More terms may follow, a follow-up load resumes at this term.
    Resume(Term),
    /// The field has no further terms.
    FieldEnd,
    /// The buffer holds a single point lookup and nothing follows.
    Lookup,
}

impl From<ChunkEnd> for Boundary {
    fn from(end: ChunkEnd) -> Self {
        match end {
            ChunkEnd::Resume(term) => Boundary::Resume(term),
            ChunkEnd::FieldEnd => Boundary::FieldEnd,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BufferEntry {
    Term(Term),
    Boundary(Boundary),
}

/// Result of one store scan after row filtering.
struct FetchedChunk {
    entries: BTreeMap<Term, PostingSet>,
    end: ChunkEnd,
}

/// Term cursor over a dictionary stored as sorted rows in a [`RangeStore`](crate::core::RangeStore).
///
/// The store only offers capped key-range scans, so the cursor pages through
/// a field itself: a seek scans a couple of rows (most seeks look at very few
/// terms), and walking past the end of the buffer resumes with a scan of up
/// to `max_chunk_size` rows bounded by the field's boundary key. Every scan is
/// merged into the reader's shared [`TermCache`](crate::index::TermCache),
/// and loads that the cache can answer never reach the store.
///
/// When the field is exhausted `next` returns `false` and re-seeks to the
/// first term requested for the field, so the next `next` starts over.
///
/// A cursor is not meant to be shared between threads without external
/// synchronization.
pub struct TermCursor {
    reader: IndexReader,
    field: Option<String>,

    buffer: Vec<BufferEntry>,
    postings: BTreeMap<Term, PostingSet>,
    // `None` sits before the first buffer entry.
    position: Option<usize>,
    last_yielded: Option<Term>,

    state: FetchState,
    init_term: Option<Term>,
    chunk_boundary_term: Option<Term>,
    last_scan_rows: Option<usize>,
}

impl TermCursor {
    pub(crate) fn new(reader: IndexReader) -> Self {
        Self {
            reader,
            field: None,
            buffer: vec![],
            postings: BTreeMap::new(),
            position: None,
            last_yielded: None,
            state: FetchState::Unpositioned,
            init_term: None,
            chunk_boundary_term: None,
            last_scan_rows: None,
        }
    }

    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    /// Field the cursor iterates, once positioned.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn fetch_state(&self) -> FetchState {
        self.state
    }

    /// Last term returned by the most recent store scan.
    pub fn chunk_boundary_term(&self) -> Option<&Term> {
        self.chunk_boundary_term.as_ref()
    }

    /// Row count of the most recent store scan, filtered rows included.
    pub fn last_scan_rows(&self) -> Option<usize> {
        self.last_scan_rows
    }

    /// Postings summed over every term of the buffered chunk.
    ///
    /// A coarse sizing hint, not the frequency of the current term. It counts
    /// postings rather than buffered entries, and the chunk boundary adds
    /// nothing.
    pub fn chunk_doc_freq(&self) -> usize {
        self.postings.values().map(|postings| postings.len()).sum()
    }

    /// Terms currently buffered, in order.
    pub fn buffered_terms(&self) -> impl Iterator<Item = &Term> {
        self.buffer.iter().filter_map(|entry| match entry {
            BufferEntry::Term(term) => Some(term),
            BufferEntry::Boundary(_) => None,
        })
    }

    /// Snapshot of the shared cache's terms.
    pub fn cached_terms(&self) -> std::collections::BTreeSet<Term> {
        self.reader.cached_terms()
    }

    /// Postings of the current term ordered by ascending document id.
    pub fn term_doc_freq(&self) -> crate::Result<Vec<Posting>> {
        let term = self.term()?;
        let sorted = match self.postings.get(term) {
            Some(postings) => postings.sorted_by_doc_id(self.reader.resolver(), term.field()),
            None => vec![],
        };
        Ok(sorted)
    }

    fn current_entry(&self) -> Option<&BufferEntry> {
        self.position.and_then(|position| self.buffer.get(position))
    }

    pub(crate) fn fill_buffer(&mut self, entries: Vec<(Term, PostingSet)>, boundary: Boundary) {
        self.buffer.clear();
        self.postings.clear();
        for (term, postings) in entries {
            self.buffer.push(BufferEntry::Term(term.clone()));
            self.postings.insert(term, postings);
        }
        self.buffer.push(BufferEntry::Boundary(boundary));
        self.position = None;
    }

    pub(crate) fn position_on_first(&mut self) {
        self.position = Some(0);
        if let Some(BufferEntry::Term(term)) = self.buffer.first() {
            self.last_yielded = Some(term.clone());
        }
    }

    pub(crate) fn set_field(&mut self, field: &str) {
        if self.field.as_deref() != Some(field) {
            self.init_term = None;
            self.field = Some(field.to_string());
        }
    }

    /// Follow resume boundaries until the buffer holds a term or the field ends.
    fn load_until_term(&mut self) -> crate::Result<bool> {
        loop {
            if self.buffered_terms().next().is_some() {
                return Ok(true);
            }
            match self.buffer.last().cloned() {
                Some(BufferEntry::Boundary(Boundary::Resume(resume))) => self.load_terms(&resume, LoadMode::Resume)?,
                _ => return Ok(false),
            }
        }
    }

    /// Start over at the field's first requested term.
    fn restart(&mut self) -> crate::Result<()> {
        self.last_yielded = None;
        self.state = FetchState::Unpositioned;
        match self.init_term.clone() {
            Some(init_term) => self.load_terms(&init_term, LoadMode::Seek),
            None => {
                self.fill_buffer(vec![], Boundary::FieldEnd);
                Ok(())
            }
        }
    }

    fn load_terms(&mut self, target: &Term, mode: LoadMode) -> crate::Result<()> {
        if self.init_term.is_none() {
            self.init_term = Some(target.clone());
        }

        if let Some(cached) = self.reader.term_cache().lookup(target, mode == LoadMode::Resume) {
            debug!("Found {} in cache, {} terms", target, cached.entries.len());
            self.fill_buffer(cached.entries, cached.end.into());
            return Ok(());
        }

        let chunk = self.fetch_chunk(target, mode)?;
        self.reader.term_cache().insert_chunk(target, &chunk.entries, &chunk.end);
        if let Some((last, _)) = chunk.entries.last_key_value() {
            self.chunk_boundary_term = Some(last.clone());
        }
        self.fill_buffer(chunk.entries.into_iter().collect(), chunk.end.into());
        Ok(())
    }

    /// One range scan starting at `target`, filtered down to genuine terms of its field.
    fn fetch_chunk(&mut self, target: &Term, mode: LoadMode) -> crate::Result<FetchedChunk> {
        let index_name = self.reader.index_name();
        let codec = self.reader.key_codec();
        let config = self.reader.config();

        let start_key = codec.encode_key(index_name, target)?;
        let boundary_key = codec.encode_field_boundary_key(index_name, target.field())?;
        let max_rows = mode.scan_cap(config);
        let end_key = match mode {
            LoadMode::Seek => None,
            LoadMode::Resume => Some(boundary_key),
        };
        let request = ScanRequest {
            keyspace: config.keyspace.clone(),
            column_family: config.term_column_family.clone(),
            start_key,
            end_key,
            max_rows,
            consistency: ConsistencyLevel::One,
        };

        let rows = {
            debug_time!("scan of up to {} terms from {}", max_rows, target);
            self.reader.store().scan(&request).map_err(|e| {
                error!("Range scan from {} failed: {}", target, e);
                TermIndexError::Store(e)
            })?
        };
        let scanned = rows.len();
        debug!("Found {} keys in range from {} (limit {})", scanned, target, max_rows);

        let mut entries = BTreeMap::new();
        let mut resume: Option<Term> = None;
        for row in rows {
            let term = match codec.decode_key(&row.key) {
                Ok(term) => term,
                Err(e) => {
                    warn!("Skipping row with undecodable key: {}", e);
                    continue;
                }
            };
            if !term.same_field(target) {
                debug!("Skipping {} while scanning field {}", term, target.field());
                continue;
            }
            // Partitioning can surface same-field keys of other indexes.
            if codec.encode_key(index_name, &term)? != row.key {
                debug!("Skipping {}, key belongs to another index", term);
                continue;
            }
            if resume.as_ref().map_or(true, |r| &term > r) {
                resume = Some(term.clone());
            }
            if row.is_tombstone() {
                debug!("Skipping tombstone {}", term);
                continue;
            }
            debug!("{} has {} postings", term, row.columns.len());
            entries.insert(term, PostingSet::new(row.columns));
        }

        let exhausted = scanned < max_rows;
        let end = match resume {
            _ if exhausted => ChunkEnd::FieldEnd,
            Some(resume) if resume > *target => ChunkEnd::Resume(resume),
            // Rows of other fields or indexes filled the small seek scan.
            _ if mode == LoadMode::Seek => ChunkEnd::Resume(target.clone()),
            _ => {
                warn!("Full scan from {} made no progress within the field, treating it as exhausted", target);
                ChunkEnd::FieldEnd
            }
        };

        self.last_scan_rows = Some(scanned);
        self.state = self.state.record_scan(exhausted);
        Ok(FetchedChunk { entries, end })
    }
}

impl TermEnum for TermCursor {
    fn skip_to(&mut self, target: &Term) -> crate::Result<bool> {
        self.set_field(target.field());
        self.state = FetchState::Unpositioned;
        self.last_yielded = None;
        self.load_terms(target, LoadMode::Seek)?;
        self.load_until_term()
    }

    fn next(&mut self) -> crate::Result<bool> {
        if self.field.is_none() {
            self.skip_to(&Term::field_start(""))?;
        }
        if let Some(BufferEntry::Boundary(Boundary::Lookup)) = self.current_entry() {
            return Ok(false);
        }

        let mut position = self.position.map_or(0, |p| p + 1);
        loop {
            match self.buffer.get(position).cloned() {
                Some(BufferEntry::Term(term)) => {
                    // A resumed scan starts on the term we stopped at.
                    if self.last_yielded.as_ref().is_some_and(|last| &term <= last) {
                        position += 1;
                        continue;
                    }
                    self.position = Some(position);
                    self.last_yielded = Some(term);
                    return Ok(true);
                }
                Some(BufferEntry::Boundary(Boundary::Resume(resume))) => {
                    self.load_terms(&resume, LoadMode::Resume)?;
                    position = 0;
                }
                Some(BufferEntry::Boundary(Boundary::Lookup)) => {
                    self.position = Some(position);
                    return Ok(false);
                }
                Some(BufferEntry::Boundary(Boundary::FieldEnd)) | None => {
                    self.restart()?;
                    return Ok(false);
                }
            }
        }
    }

    fn term(&self) -> crate::Result<&Term> {
        match self.current_entry() {
            Some(BufferEntry::Term(term)) => Ok(term),
            _ => Err(TermIndexError::Unpositioned),
        }
    }

    fn doc_freq(&self) -> usize {
        self.term().ok().and_then(|term| self.postings.get(term)).map_or(0, |postings| postings.len())
    }

    fn close(&mut self) -> crate::Result<()> {
        self.buffer.clear();
        self.postings.clear();
        self.position = None;
        Ok(())
    }
}
