//! Query normalization shared by the cache key and every strategy.

use crate::types::{Filters, SearchMode};

/// Trims and collapses internal whitespace runs to a single space.
pub fn normalize_query(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-delimited terms of an already normalized query.
pub fn query_terms(normalized: &str) -> Vec<String> {
    normalized.split_whitespace().map(str::to_string).collect()
}

/// Whether a query carries enough characters to justify an embedding call.
pub fn has_min_signal(normalized: &str, min_chars: usize) -> bool {
    normalized.chars().count() >= min_chars
}

/// Canonical signature of a search request.
///
/// Built from the normalized query, mode, canonical filters and the effective
/// page window. Requests that differ in any component never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(normalized: &str, mode: SearchMode, filters: &Filters, offset: usize, limit: usize) -> Self {
        let filters = filters.canonical();
        let signature = serde_json::json!({
            "q": normalized,
            "mode": mode.as_str(),
            "categories": filters.categories,
            "language": filters.language,
            "year": filters.year,
            "file_type": filters.file_type,
            "published_only": filters.published_only,
            "offset": offset,
            "limit": limit,
        });
        Self(format!("search:v1:{signature}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
