//! libris-text
//!
//! Keyword (substring) predicate evaluation and the tantivy-backed weighted
//! full-text index.
pub mod index;
pub mod substring;
pub mod tantivy_utils;

pub use index::TextRankIndex;
pub use substring::SearchableText;
