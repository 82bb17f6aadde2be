//! Chunked, cache-aware term dictionary cursor over a range-scannable
//! key-value store.
//!
//! Terms live as one store row per `(index, field, text)`, the row's columns
//! holding the term's postings. An [`IndexReader`] hands out [`TermCursor`]s
//! which page through a field with small seek scans and larger continuation
//! scans, sharing everything they fetch through the reader's [`TermCache`].

#[macro_use]
mod macros;

pub mod common;
pub mod core;
pub mod index;
pub mod reader;

pub use crate::common::errors::{StoreError, TermIndexError};
pub use crate::common::{DocId, RowKey};
pub use crate::core::{
    Column, ConsistencyLevel, DelimitedKeyCodec, DocumentIdResolver, KeyCodec, MemoryRangeStore, NamedColumnsRead,
    Posting, PostingSet, RangeStore, Row, ScanRequest, SequentialDocIdResolver, Term,
};
pub use crate::index::{ChunkEnd, TermCache, TermIndexConfig};
pub use crate::reader::{FetchState, IndexReader, IndexReaderOptions, TermCursor, TermEnum};

pub type Result<T> = std::result::Result<T, TermIndexError>;
