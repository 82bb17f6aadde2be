mod term_cache;
mod term_index_config;

pub use term_cache::{CachedChunk, ChunkEnd, TermCache};
pub use term_index_config::TermIndexConfig;
