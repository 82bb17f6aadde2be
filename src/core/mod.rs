pub mod key_codec;
pub mod postings;
pub mod store;
pub mod term;

pub use key_codec::*;
pub use postings::*;
pub use store::*;
pub use term::*;
