//! libris-search
//!
//! Candidate store composition, the keyword / full-text / semantic strategies,
//! the fallback orchestrator with its result cache, and suggestions.
pub mod cache;
pub mod metrics;
pub mod orchestrator;
pub mod store;
pub mod strategy;
pub mod suggest;

pub use cache::MemoryResultCache;
pub use metrics::{MetricsSnapshot, SearchMetrics};
pub use orchestrator::SearchOrchestrator;
pub use store::CatalogStore;
pub use suggest::{suggest, Suggestion};
