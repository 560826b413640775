//! The embedding boundary seen by the orchestrator.
//!
//! Wraps a provider with a timeout and fits its output to the catalog
//! dimensionality: extra values are truncated, too few is an error. Every
//! provider failure, panic or timeout surfaces as `EmbeddingUnavailable`; there
//! is no retry at this layer.
use std::sync::Arc;
use std::time::{Duration, Instant};

use libris_core::config::EmbeddingSettings;
use libris_core::error::{Error, Result};
use libris_core::traits::EmbeddingProvider;

#[derive(Clone)]
pub struct EmbeddingClient {
    provider: Arc<dyn EmbeddingProvider>,
    dim: usize,
    timeout: Duration,
}

impl EmbeddingClient {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, dim: usize, timeout: Duration) -> Self {
        Self { provider, dim, timeout }
    }

    pub fn from_settings(provider: Arc<dyn EmbeddingProvider>, settings: &EmbeddingSettings) -> Self {
        Self::new(provider, settings.dim, settings.timeout())
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn provider_id(&self) -> &str {
        self.provider.provider_id()
    }

    /// Embeds one text into exactly `dim` values.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let provider = Arc::clone(&self.provider);
        let input = vec![text.to_string()];
        let started = Instant::now();
        let task = tokio::task::spawn_blocking(move || provider.embed_batch(&input));
        let outcome = tokio::time::timeout(self.timeout, task).await;
        let mut vectors = match outcome {
            Ok(Ok(Ok(vectors))) => vectors,
            Ok(Ok(Err(e))) => {
                return Err(Error::EmbeddingUnavailable(format!("{}: {e:#}", self.provider_id())));
            }
            Ok(Err(join)) => return Err(Error::EmbeddingUnavailable(format!("embedding task failed: {join}"))),
            Err(_) => {
                return Err(Error::EmbeddingUnavailable(format!("timed out after {} ms", self.timeout.as_millis())));
            }
        };
        tracing::debug!(
            provider = self.provider_id(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "query embedded"
        );
        if vectors.is_empty() {
            return Err(Error::EmbeddingUnavailable(format!("{} returned no embeddings", self.provider_id())));
        }
        fit_dimension(vectors.swap_remove(0), self.dim)
    }
}

/// Keeps the first `dim` values; fewer than `dim` is a dimension error.
pub fn fit_dimension(mut raw: Vec<f32>, dim: usize) -> Result<Vec<f32>> {
    if raw.len() < dim {
        return Err(Error::EmbeddingDimension { expected: dim, actual: raw.len() });
    }
    raw.truncate(dim);
    Ok(raw)
}
