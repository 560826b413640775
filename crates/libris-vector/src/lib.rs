//! libris-vector
//!
//! Nearest-neighbor backends over catalog embeddings (exact in-memory index,
//! LanceDB table) and the embedding backfill job.
use async_trait::async_trait;

use libris_core::types::DocumentId;

pub mod backfill;
pub mod flat;
pub mod schema;
pub mod table;

pub use backfill::{backfill_embeddings, BackfillOptions, BackfillReport};
pub use flat::{cosine_distance, FlatVectorIndex};
pub use table::LanceVectorIndex;

#[async_trait]
pub trait VectorBackend: Send + Sync {
    /// Up to `limit` `(id, cosine distance)` pairs, ascending by distance.
    async fn nearest(&self, vector: &[f32], limit: usize) -> anyhow::Result<Vec<(DocumentId, f32)>>;

    /// Number of indexed vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
