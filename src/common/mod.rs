pub mod constants;
pub mod errors;
pub mod file_operations;
mod types;

pub use types::*;
