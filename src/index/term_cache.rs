use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::{PostingSet, Term};

/// How a chunk of terms ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkEnd {
    /// The field may hold more terms; a follow-up scan resumes at this term.
    Resume(Term),
    /// No term of the field sorts after the chunk.
    FieldEnd,
}

impl ChunkEnd {
    /// Whether the chunk also covers terms strictly after `target`.
    fn reaches_past(&self, target: &Term) -> bool {
        match self {
            ChunkEnd::Resume(resume) => resume > target,
            ChunkEnd::FieldEnd => true,
        }
    }

    fn covers(&self, target: &Term) -> bool {
        match self {
            ChunkEnd::Resume(resume) => target <= resume,
            ChunkEnd::FieldEnd => true,
        }
    }

    fn extends_beyond(&self, other: &ChunkEnd) -> bool {
        match (self, other) {
            (ChunkEnd::FieldEnd, ChunkEnd::FieldEnd) => false,
            (ChunkEnd::FieldEnd, ChunkEnd::Resume(_)) => true,
            (ChunkEnd::Resume(_), ChunkEnd::FieldEnd) => false,
            (ChunkEnd::Resume(a), ChunkEnd::Resume(b)) => a > b,
        }
    }
}

/// A contiguous run of terms served from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedChunk {
    pub entries: Vec<(Term, PostingSet)>,
    pub end: ChunkEnd,
}

#[derive(Default)]
struct TermCacheInner {
    postings: BTreeMap<Term, PostingSet>,
    // chunk start -> how far the scan that fetched it got
    spans: BTreeMap<Term, ChunkEnd>,
}

/// Term dictionary cache shared by every cursor of one index reader.
///
/// It only grows: chunks are merged in and never evicted while the reader
/// lives. Alongside the postings it remembers the key span each scan
/// covered, so a lookup is answered only when the cache has seen every term
/// between the target and the end of the span. Concurrent cursors may insert
/// the same chunk twice; re-inserting identical entries is harmless.
#[derive(Clone, Default)]
pub struct TermCache {
    inner: Arc<RwLock<TermCacheInner>>,
}

impl TermCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached terms from `target` (inclusive) up to the end of the furthest
    /// reaching span that contains `target`, or `None` when no scanned span
    /// contains it.
    ///
    /// With `continuation` set the span must also reach strictly past
    /// `target`, so resuming at the end of one span moves to the next.
    pub fn lookup(&self, target: &Term, continuation: bool) -> Option<CachedChunk> {
        let inner = self.inner.read();

        let mut best: Option<&ChunkEnd> = None;
        for (start, end) in inner.spans.range(..=target.clone()).rev() {
            if !start.same_field(target) {
                break;
            }
            let usable = if continuation { end.reaches_past(target) } else { end.covers(target) };
            if usable && best.map_or(true, |b| end.extends_beyond(b)) {
                best = Some(end);
            }
        }
        let end = best?.clone();

        let entries = inner
            .postings
            .range(target.clone()..)
            .take_while(|(term, _)| term.same_field(target) && end.covers(term))
            .map(|(term, postings)| (term.clone(), postings.clone()))
            .collect();
        Some(CachedChunk { entries, end })
    }

    /// Merge one fetched chunk that started at `start`.
    pub fn insert_chunk(&self, start: &Term, entries: &BTreeMap<Term, PostingSet>, end: &ChunkEnd) {
        let mut inner = self.inner.write();
        for (term, postings) in entries {
            inner.postings.insert(term.clone(), postings.clone());
        }
        match inner.spans.get(start) {
            Some(existing) if !end.extends_beyond(existing) => {}
            _ => {
                inner.spans.insert(start.clone(), end.clone());
            }
        }
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.inner.read().postings.contains_key(term)
    }

    /// Number of postings cached for `term`.
    pub fn doc_freq(&self, term: &Term) -> Option<usize> {
        self.inner.read().postings.get(term).map(|postings| postings.len())
    }

    /// Snapshot of every cached term.
    pub fn cached_terms(&self) -> BTreeSet<Term> {
        self.inner.read().postings.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
