//! Lookup tables and character classes generated from flattened UCD data.

mod indexer;
mod compile;
mod classes;
mod output;

pub use indexer::*;
pub use compile::*;
pub use classes::*;
pub use output::*;

#[cfg(test)]
mod tests;
