use fnv::FnvHashMap;
use parking_lot::Mutex;

use crate::core::Column;
use crate::DocId;

/// Turns a stored posting into a reader-local document id.
///
/// Must be deterministic per document: the same posting column always maps
/// to the same id for the lifetime of the reader.
pub trait DocumentIdResolver: Send + Sync {
    fn resolve(&self, posting: &Column, field: &str) -> DocId;
}

#[derive(Default)]
struct ResolverInner {
    ids: FnvHashMap<Vec<u8>, DocId>,
    keys: Vec<Vec<u8>>,
}

/// Numbers documents in the order they are first observed, keyed by the
/// posting column name (the document key).
#[derive(Default)]
pub struct SequentialDocIdResolver {
    inner: Mutex<ResolverInner>,
}

impl SequentialDocIdResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of a document key, assigning the next free id on first sight.
    pub fn resolve_key(&self, document_key: &[u8]) -> DocId {
        let mut inner = self.inner.lock();
        if let Some(doc_id) = inner.ids.get(document_key) {
            return *doc_id;
        }
        let doc_id = inner.keys.len() as DocId;
        inner.ids.insert(document_key.to_vec(), doc_id);
        inner.keys.push(document_key.to_vec());
        doc_id
    }

    pub fn document_key(&self, doc_id: DocId) -> Option<Vec<u8>> {
        self.inner.lock().keys.get(doc_id as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentIdResolver for SequentialDocIdResolver {
    fn resolve(&self, posting: &Column, _field: &str) -> DocId {
        self.resolve_key(&posting.name)
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentIdResolver, SequentialDocIdResolver};
    use crate::core::Column;

    #[test]
    fn test_first_seen_numbering() {
        let resolver = SequentialDocIdResolver::new();
        assert!(resolver.is_empty());
        assert_eq!(resolver.resolve(&Column::new("doc-b", "x"), "body"), 0);
        assert_eq!(resolver.resolve(&Column::new("doc-a", "y"), "title"), 1);
        // Same document under another field and payload keeps its id.
        assert_eq!(resolver.resolve(&Column::new("doc-b", "z"), "title"), 0);
        assert_eq!(resolver.len(), 2);
        assert_eq!(resolver.document_key(1), Some(b"doc-a".to_vec()));
        assert_eq!(resolver.document_key(7), None);
    }
}
