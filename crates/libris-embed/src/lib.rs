//! libris-embed
//!
//! Embedding providers (deterministic fake, local BGE-M3 via candle) and the
//! `EmbeddingClient` that fits provider output to the catalog dimensionality.
use anyhow::Result;
use std::sync::Arc;

use libris_core::config::{EmbeddingSettings, ProviderKind};
use libris_core::traits::EmbeddingProvider;

pub mod client;
pub mod device;
pub mod fake;
pub mod local;
pub mod pool;
pub mod tokenize;

pub use client::{fit_dimension, EmbeddingClient};
pub use fake::FakeEmbedder;
pub use local::LocalModelProvider;
pub use pool::masked_mean_l2;

/// Builds the configured provider. `APP_USE_FAKE_EMBEDDINGS=1` forces the fake one.
pub fn provider_from_settings(settings: &EmbeddingSettings) -> Result<Arc<dyn EmbeddingProvider>> {
    let force_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if force_fake || settings.provider == ProviderKind::Fake {
        tracing::info!(dim = settings.dim, "using fake embedder");
        return Ok(Arc::new(FakeEmbedder::new(settings.dim)));
    }
    let model_dir = local::resolve_model_dir(settings.model_dir.as_deref())?;
    Ok(Arc::new(LocalModelProvider::load(&model_dir, settings.max_len)?))
}
