use anyhow::Result as AnyResult;
use async_trait::async_trait;
use std::collections::HashMap;

use libris_core::error::{Error, Result};
use libris_core::traits::CandidateStore;
use libris_core::types::{Candidate, CatalogEntry, DocumentId, FieldWeights, Filters, KeywordPredicate};
use libris_text::{SearchableText, TextRankIndex};
use libris_vector::{FlatVectorIndex, VectorBackend};

/// Candidate store over a loaded catalog: substring scans in memory, weighted
/// ranking through the text index, nearest neighbors through a vector backend.
pub struct CatalogStore {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<DocumentId, usize>,
    searchable: Vec<SearchableText>,
    text: TextRankIndex,
    vectors: Box<dyn VectorBackend>,
}

impl CatalogStore {
    pub fn new(entries: Vec<CatalogEntry>, text: TextRankIndex, vectors: Box<dyn VectorBackend>) -> Self {
        let by_id = entries.iter().enumerate().map(|(i, e)| (e.id.clone(), i)).collect();
        let searchable = entries.iter().map(SearchableText::from_entry).collect();
        Self { entries, by_id, searchable, text, vectors }
    }

    /// RAM text index plus exact vector index over the `dim`-length embeddings of `entries`.
    pub fn in_memory(entries: Vec<CatalogEntry>, dim: usize) -> AnyResult<Self> {
        let text = TextRankIndex::in_ram(&entries)?;
        let vectors = FlatVectorIndex::from_entries(&entries, dim);
        Ok(Self::new(entries, text, Box::new(vectors)))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    pub fn embedded_count(&self) -> usize {
        self.vectors.len()
    }

    fn in_scope(&self, id: &str, filters: &Filters) -> Option<&CatalogEntry> {
        self.get(id).filter(|e| filters.matches(e))
    }
}

#[async_trait]
impl CandidateStore for CatalogStore {
    async fn substring_match(&self, predicate: &KeywordPredicate, filters: &Filters) -> Result<Vec<Candidate>> {
        Ok(self
            .entries
            .iter()
            .zip(&self.searchable)
            .filter(|(entry, text)| filters.matches(entry) && text.matches(predicate))
            .map(|(entry, _)| entry.candidate())
            .collect())
    }

    async fn weighted_text_rank(
        &self,
        query: &str,
        weights: &FieldWeights,
        filters: &Filters,
    ) -> Result<Vec<(Candidate, f32)>> {
        let limit = usize::try_from(self.text.num_docs()).unwrap_or(usize::MAX);
        let ranked = self.text.rank(query, weights, limit).map_err(Error::store)?;
        Ok(ranked
            .into_iter()
            .filter_map(|(id, score)| self.in_scope(&id, filters).map(|e| (e.candidate(), score)))
            .collect())
    }

    async fn nearest_neighbors(&self, vector: &[f32], k: usize, filters: &Filters) -> Result<Vec<(Candidate, f32)>> {
        // Out-of-scope neighbors are dropped after the search, so widen the pool when a filter bites.
        let whole_catalog_in_scope = filters.is_unrestricted() || self.entries.iter().all(|e| filters.matches(e));
        let pool = if whole_catalog_in_scope { k } else { self.vectors.len() };
        let neighbors = self.vectors.nearest(vector, pool).await.map_err(Error::store)?;
        Ok(neighbors
            .into_iter()
            .filter_map(|(id, distance)| self.in_scope(&id, filters).map(|e| (e.candidate(), distance)))
            .take(k)
            .collect())
    }
}
