#[allow(clippy::module_inception)]
mod term;

pub use term::Term;
