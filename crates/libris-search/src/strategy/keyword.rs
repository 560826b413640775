use std::collections::HashSet;

use libris_core::error::Result;
use libris_core::query::query_terms;
use libris_core::traits::CandidateStore;
use libris_core::types::{Filters, KeywordHit, KeywordPredicate};

/// Case-insensitive substring matching over the primary and secondary text.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordMatcher;

impl KeywordMatcher {
    pub fn new() -> Self {
        Self
    }

    /// `None` when the query has no terms; such a query matches nothing.
    pub fn predicate(&self, normalized: &str) -> Option<KeywordPredicate> {
        let terms: Vec<String> = query_terms(normalized).into_iter().map(|t| t.to_lowercase()).collect();
        if terms.is_empty() {
            return None;
        }
        Some(KeywordPredicate { phrase: normalized.to_lowercase(), terms })
    }

    pub async fn run(&self, store: &dyn CandidateStore, normalized: &str, filters: &Filters) -> Result<Vec<KeywordHit>> {
        let Some(predicate) = self.predicate(normalized) else {
            return Ok(Vec::new());
        };
        let candidates = store.substring_match(&predicate, filters).await?;
        let mut seen = HashSet::with_capacity(candidates.len());
        Ok(candidates
            .into_iter()
            .filter(|c| seen.insert(c.id.clone()))
            .map(KeywordHit::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_lowercases_phrase_and_terms() {
        let p = KeywordMatcher::new().predicate("Machine Learning").unwrap();
        assert_eq!(p.phrase, "machine learning");
        assert_eq!(p.terms, vec!["machine", "learning"]);
    }

    #[test]
    fn blank_query_has_no_predicate() {
        assert!(KeywordMatcher::new().predicate("").is_none());
    }
}
