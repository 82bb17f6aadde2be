use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use log::info;
use typed_builder::TypedBuilder;

use super::{TermCursor, TermEnum};
use crate::common::errors::TermIndexError;
use crate::core::{DelimitedKeyCodec, DocumentIdResolver, KeyCodec, RangeStore, SequentialDocIdResolver, Term};
use crate::index::{TermCache, TermIndexConfig};

/// Everything an [`IndexReader`] is opened with.
#[derive(TypedBuilder)]
pub struct IndexReaderOptions {
    /// Logical index name, the first component of every row key.
    #[builder(setter(into))]
    index_name: String,

    /// Store holding the term rows.
    store: Arc<dyn RangeStore>,

    #[builder(default = Arc::new(DelimitedKeyCodec) as Arc<dyn KeyCodec>)]
    key_codec: Arc<dyn KeyCodec>,

    /// Numbers documents for posting output.
    #[builder(default = Arc::new(SequentialDocIdResolver::new()) as Arc<dyn DocumentIdResolver>)]
    resolver: Arc<dyn DocumentIdResolver>,

    #[builder(default)]
    config: TermIndexConfig,
}

struct IndexReaderInner {
    index_name: String,
    store: Arc<dyn RangeStore>,
    key_codec: Arc<dyn KeyCodec>,
    resolver: Arc<dyn DocumentIdResolver>,
    config: TermIndexConfig,
    term_cache: TermCache,
}

/// Read access to one index's term dictionary.
///
/// Cloning is cheap and clones share the same [`TermCache`], so every
/// [`TermCursor`] handed out by a reader (or its clones) benefits from the
/// chunks the others fetched. The cache lives exactly as long as the reader.
#[derive(Clone)]
pub struct IndexReader {
    inner: Arc<IndexReaderInner>,
}

impl IndexReader {
    pub fn open(options: IndexReaderOptions) -> crate::Result<IndexReader> {
        options.config.is_valid()?;
        if options.index_name.is_empty() {
            return Err(TermIndexError::InvalidArgument("index name can't be empty".to_string()));
        }
        // Fails early on names the key codec can't represent.
        options.key_codec.encode_field_boundary_key(&options.index_name, "")?;

        info!(
            "Opening term index reader for '{}', init size {}, chunk size {}",
            options.index_name, options.config.max_init_size, options.config.max_chunk_size
        );
        Ok(IndexReader {
            inner: Arc::new(IndexReaderInner {
                index_name: options.index_name,
                store: options.store,
                key_codec: options.key_codec,
                resolver: options.resolver,
                config: options.config,
                term_cache: TermCache::new(),
            }),
        })
    }

    /// A fresh, unpositioned cursor over this reader's terms.
    pub fn term_cursor(&self) -> TermCursor {
        TermCursor::new(self.clone())
    }

    /// A cursor positioned with [`TermCursor::skip_to`].
    pub fn terms_from(&self, target: &Term) -> crate::Result<TermCursor> {
        let mut cursor = self.term_cursor();
        cursor.skip_to(target)?;
        Ok(cursor)
    }

    pub fn index_name(&self) -> &str {
        &self.inner.index_name
    }

    pub fn config(&self) -> &TermIndexConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &dyn RangeStore {
        self.inner.store.as_ref()
    }

    pub fn key_codec(&self) -> &dyn KeyCodec {
        self.inner.key_codec.as_ref()
    }

    pub fn resolver(&self) -> &dyn DocumentIdResolver {
        self.inner.resolver.as_ref()
    }

    pub fn term_cache(&self) -> &TermCache {
        &self.inner.term_cache
    }

    /// Snapshot of every term any cursor of this reader has fetched.
    pub fn cached_terms(&self) -> BTreeSet<Term> {
        self.inner.term_cache.cached_terms()
    }

    /// Posting count of a cached term. `None` if no cursor fetched it yet.
    pub fn doc_freq(&self, term: &Term) -> Option<usize> {
        self.inner.term_cache.doc_freq(term)
    }
}

impl fmt::Debug for IndexReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexReader({}, {} cached terms)", self.inner.index_name, self.inner.term_cache.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{IndexReader, IndexReaderOptions};
    use crate::common::errors::TermIndexError;
    use crate::core::{MemoryRangeStore, Term};
    use crate::index::TermIndexConfig;

    #[test]
    fn test_open_validates_options() {
        let store = Arc::new(MemoryRangeStore::new());

        let options = IndexReaderOptions::builder().index_name("").store(store.clone()).build();
        assert!(matches!(IndexReader::open(options), Err(TermIndexError::InvalidArgument(_))));

        let options = IndexReaderOptions::builder().index_name("wiki\0pedia").store(store.clone()).build();
        assert!(IndexReader::open(options).is_err());

        let config = TermIndexConfig { max_init_size: 0, ..Default::default() };
        let options = IndexReaderOptions::builder().index_name("wikipedia").store(store.clone()).config(config).build();
        assert!(matches!(IndexReader::open(options), Err(TermIndexError::InvalidConfig(_))));

        let options = IndexReaderOptions::builder().index_name("wikipedia").store(store).build();
        let reader = IndexReader::open(options).expect("open reader");
        assert_eq!(reader.index_name(), "wikipedia");
        assert_eq!(reader.config(), &TermIndexConfig::default());
        assert!(reader.cached_terms().is_empty());
        assert_eq!(reader.doc_freq(&Term::new("body", "wiki")), None);
    }
}
