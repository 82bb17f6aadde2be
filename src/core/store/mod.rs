mod memory_range_store;
mod traits;

pub use memory_range_store::MemoryRangeStore;
pub use traits::*;
