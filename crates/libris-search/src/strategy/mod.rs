//! The three matching strategies. Each one turns a normalized query into a
//! result set of its own kind; only the orchestrator decides which one wins.
pub mod fulltext;
pub mod keyword;
pub mod semantic;

pub use fulltext::FullTextRanker;
pub use keyword::KeywordMatcher;
pub use semantic::{SemanticMatcher, Strictness};
