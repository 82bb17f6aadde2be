mod fetch_state;
mod filtered_lookup;
mod index_reader;
mod term_cursor;

pub use fetch_state::FetchState;
pub use index_reader::{IndexReader, IndexReaderOptions};
pub use term_cursor::{TermCursor, TermEnum};
