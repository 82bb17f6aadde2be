use std::fmt;

use itertools::Itertools;

use crate::core::{Column, DocumentIdResolver};
use crate::DocId;

/// The stored postings of one term, one column per document, in whatever
/// order the store returned them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostingSet {
    columns: Vec<Column>,
}

impl PostingSet {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Resolve every posting to a document id and order them by ascending id.
    pub fn sorted_by_doc_id(&self, resolver: &dyn DocumentIdResolver, field: &str) -> Vec<Posting> {
        self.columns
            .iter()
            .map(|column| Posting { doc_id: resolver.resolve(column, field), column: column.clone() })
            .sorted_by_key(|posting| posting.doc_id)
            .collect()
    }
}

impl From<Vec<Column>> for PostingSet {
    fn from(columns: Vec<Column>) -> Self {
        Self::new(columns)
    }
}

/// A posting paired with the reader-local document id it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub column: Column,
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Posting[{}]{}", self.doc_id, String::from_utf8_lossy(&self.column.name))
    }
}
