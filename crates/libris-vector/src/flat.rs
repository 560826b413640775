use async_trait::async_trait;

use libris_core::types::{CatalogEntry, DocumentId};

use crate::VectorBackend;

/// Cosine distance `1 - cos(a, b)`, in `[0, 2]`. Zero vectors are maximally distant.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut na, mut nb) = (0f32, 0f32, 0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    (1.0 - dot / (na.sqrt() * nb.sqrt())).clamp(0.0, 2.0)
}

/// Exhaustive in-memory index; exact results, suited to catalog-sized corpora.
#[derive(Debug, Default, Clone)]
pub struct FlatVectorIndex {
    rows: Vec<(DocumentId, Vec<f32>)>,
}

impl FlatVectorIndex {
    /// Indexes every entry whose embedding has exactly `dim` values; the rest are skipped.
    pub fn from_entries(entries: &[CatalogEntry], dim: usize) -> Self {
        let rows: Vec<(DocumentId, Vec<f32>)> = entries
            .iter()
            .filter_map(|e| e.embedding.as_ref().filter(|v| v.len() == dim).map(|v| (e.id.clone(), v.clone())))
            .collect();
        let skipped = entries.iter().filter(|e| e.embedding.is_some()).count() - rows.len();
        if skipped > 0 {
            tracing::warn!(skipped, dim, "entries with mismatched embedding length were not indexed");
        }
        Self { rows }
    }

    pub fn search(&self, vector: &[f32], limit: usize) -> Vec<(DocumentId, f32)> {
        let mut scored: Vec<(DocumentId, f32)> =
            self.rows.iter().map(|(id, v)| (id.clone(), cosine_distance(vector, v))).collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(limit);
        scored
    }
}

#[async_trait]
impl VectorBackend for FlatVectorIndex {
    async fn nearest(&self, vector: &[f32], limit: usize) -> anyhow::Result<Vec<(DocumentId, f32)>> {
        Ok(self.search(vector, limit))
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}
