use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Candidate, CachedSearch, FieldWeights, Filters, KeywordPredicate};

/// Black-box text → vector model. Output length is whatever the model yields;
/// fitting to the catalog dimensionality is the embedding client's job.
pub trait EmbeddingProvider: Send + Sync {
    /// Stable identifier for the provider/model (e.g., `fake:d1024`).
    fn provider_id(&self) -> &str;
    /// Native output dimensionality.
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// The datastore capabilities the strategies are built on.
///
/// Every capability honours `filters` and returns the secondary ordering keys
/// of each matching document.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Documents satisfying the keyword predicate, in no particular order.
    async fn substring_match(&self, predicate: &KeywordPredicate, filters: &Filters) -> Result<Vec<Candidate>>;

    /// `(candidate, relevance)` pairs from the store's weighted text ranking.
    async fn weighted_text_rank(
        &self,
        query: &str,
        weights: &FieldWeights,
        filters: &Filters,
    ) -> Result<Vec<(Candidate, f32)>>;

    /// Up to `k` embedded documents as `(candidate, distance)`, ascending by distance.
    async fn nearest_neighbors(&self, vector: &[f32], k: usize, filters: &Filters) -> Result<Vec<(Candidate, f32)>>;
}

/// Memoized orchestrator output keyed by a canonical request signature.
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<CachedSearch>>;
    fn put(&self, key: &str, value: CachedSearch) -> Result<()>;
}
