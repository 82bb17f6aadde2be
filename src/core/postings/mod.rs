mod doc_id_resolver;
mod posting_set;

pub use doc_id_resolver::{DocumentIdResolver, SequentialDocIdResolver};
pub use posting_set::{Posting, PostingSet};
