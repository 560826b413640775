use std::path::PathBuf;
use std::sync::Arc;

use libris_core::catalog::CatalogLoader;
use libris_core::config::SearchSettings;
use libris_core::types::{SearchMode, SearchRequest};
use libris_embed::{EmbeddingClient, FakeEmbedder};
use libris_search::{CatalogStore, MemoryResultCache, SearchOrchestrator};
use libris_vector::{backfill_embeddings, BackfillOptions};

// Usage: cargo run -p libris-search --example search -- <catalog.json> <query> [auto|semantic]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let catalog = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("../dev_data/catalog.json"));
    let query = args.next().unwrap_or_else(|| "machine learning".to_string());
    let mode = args.next().map(|m| SearchMode::parse(&m)).unwrap_or_default();

    let mut entries = CatalogLoader::new().load(&catalog)?;
    let client = EmbeddingClient::new(Arc::new(FakeEmbedder::new(256)), 256, std::time::Duration::from_secs(5));
    backfill_embeddings(&mut entries, &client, &BackfillOptions::default()).await;

    let store = CatalogStore::in_memory(entries, client.dim())?;
    let cache = Arc::new(MemoryResultCache::new(64, std::time::Duration::from_secs(300)));
    let search = SearchOrchestrator::new(Arc::new(store), client, SearchSettings::default())?.with_cache(cache);

    for _ in 0..2 {
        let response = search.search(&SearchRequest::new(query.clone()).with_mode(mode)).await?;
        println!("{} via {} (cached: {}): {:?}", query, response.strategy, response.from_cache, response.document_ids);
    }
    println!("{:?}", search.metrics());
    Ok(())
}
