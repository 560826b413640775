use std::collections::HashSet;

use libris_core::error::Result;
use libris_core::traits::CandidateStore;
use libris_core::types::{FieldWeights, Filters, RankedHit};

/// Weighted full-text ranking with a relevance floor.
#[derive(Debug, Clone, Copy)]
pub struct FullTextRanker {
    weights: FieldWeights,
    min_relevance: f32,
}

impl FullTextRanker {
    pub fn new(weights: FieldWeights, min_relevance: f32) -> Self {
        Self { weights, min_relevance }
    }

    pub async fn run(&self, store: &dyn CandidateStore, normalized: &str, filters: &Filters) -> Result<Vec<RankedHit>> {
        if normalized.is_empty() {
            return Ok(Vec::new());
        }
        let ranked = store.weighted_text_rank(normalized, &self.weights, filters).await?;
        let mut seen = HashSet::with_capacity(ranked.len());
        Ok(ranked
            .into_iter()
            .filter(|(_, relevance)| *relevance >= self.min_relevance)
            .filter(|(c, _)| seen.insert(c.id.clone()))
            .map(|(c, relevance)| RankedHit { id: c.id, relevance, view_count: c.view_count })
            .collect())
    }
}
