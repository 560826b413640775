use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use libris_core::catalog::CatalogLoader;
use libris_embed::{EmbeddingClient, FakeEmbedder};
use libris_vector::{backfill_embeddings, BackfillOptions};

// Usage: cargo run -p libris-vector --example backfill -- <catalog.json>
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("../dev_data/catalog.json"));
    let loader = CatalogLoader::new();
    let mut entries = loader.load(&path)?;
    let client = EmbeddingClient::new(Arc::new(FakeEmbedder::new(1024)), 1024, Duration::from_secs(5));
    let report = backfill_embeddings(&mut entries, &client, &BackfillOptions { regenerate_all: false, show_progress: true }).await;
    println!("selected={} succeeded={} failed={}", report.selected, report.succeeded, report.failed);
    Ok(())
}
