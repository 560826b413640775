use std::collections::HashSet;

use libris_core::error::Result;
use libris_core::traits::CandidateStore;
use libris_core::types::{Filters, SemanticHit};

/// Distance ceiling in force for a semantic run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Silent fallback in the auto chain: tight ceiling, never widened.
    Strict,
    /// Caller asked for semantic search: looser ceiling, widened to the
    /// nearest neighbors when nothing falls under it.
    Explicit,
}

#[derive(Debug, Clone, Copy)]
pub struct SemanticMatcher {
    strict_max_distance: f32,
    explicit_max_distance: f32,
    top_k: usize,
}

impl SemanticMatcher {
    pub fn new(strict_max_distance: f32, explicit_max_distance: f32, top_k: usize) -> Self {
        Self { strict_max_distance, explicit_max_distance, top_k }
    }

    pub fn max_distance(&self, strictness: Strictness) -> f32 {
        match strictness {
            Strictness::Strict => self.strict_max_distance,
            Strictness::Explicit => self.explicit_max_distance,
        }
    }

    /// At most `top_k` hits, ascending by distance.
    pub async fn run(
        &self,
        store: &dyn CandidateStore,
        query_vector: &[f32],
        filters: &Filters,
        strictness: Strictness,
    ) -> Result<Vec<SemanticHit>> {
        let mut neighbors: Vec<SemanticHit> = store
            .nearest_neighbors(query_vector, self.top_k, filters)
            .await?
            .into_iter()
            .filter(|(_, d)| d.is_finite())
            .map(|(c, distance)| SemanticHit { id: c.id, distance })
            .collect();
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance).then_with(|| a.id.cmp(&b.id)));
        let mut seen = HashSet::with_capacity(neighbors.len());
        neighbors.retain(|h| seen.insert(h.id.clone()));
        neighbors.truncate(self.top_k);

        let ceiling = self.max_distance(strictness);
        let within: Vec<SemanticHit> = neighbors.iter().filter(|h| h.distance <= ceiling).cloned().collect();
        if !within.is_empty() || strictness == Strictness::Strict {
            return Ok(within);
        }
        if !neighbors.is_empty() {
            tracing::debug!(ceiling, nearest = neighbors[0].distance, "no neighbor under the ceiling; widening");
        }
        Ok(neighbors)
    }
}
