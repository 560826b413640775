use std::sync::Arc;
use std::time::Duration;

use libris_core::traits::EmbeddingProvider;
use libris_core::types::CatalogEntry;
use libris_embed::{EmbeddingClient, FakeEmbedder};
use libris_vector::{
    backfill_embeddings, cosine_distance, BackfillOptions, FlatVectorIndex, LanceVectorIndex, VectorBackend,
};

fn embedded(id: &str, v: Vec<f32>) -> CatalogEntry {
    let mut e = CatalogEntry::new(id, id);
    e.embedding = Some(v);
    e
}

#[test]
fn cosine_distance_bounds() {
    assert!(cosine_distance(&[1.0, 0.0], &[2.0, 0.0]).abs() < 1e-6);
    assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
    assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
    assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
}

#[tokio::test]
async fn flat_index_skips_unembedded_and_orders_ascending() {
    let entries = vec![
        embedded("far", vec![0.0, 1.0]),
        CatalogEntry::new("plain", "no vector"),
        embedded("near", vec![1.0, 0.1]),
        embedded("mid", vec![1.0, 1.0]),
    ];
    let index = FlatVectorIndex::from_entries(&entries, 2);
    assert_eq!(index.len(), 3);
    let hits = index.nearest(&[1.0, 0.0], 2).await.unwrap();
    let ids: Vec<&str> = hits.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["near", "mid"]);
    assert!(hits[0].1 <= hits[1].1);
}

#[tokio::test]
async fn flat_index_skips_wrong_length_embeddings() {
    let entries = vec![
        embedded("ok", vec![0.0, 1.0, 0.0]),
        embedded("short", vec![1.0, 0.0]),
        embedded("long", vec![1.0, 0.0, 0.0, 0.0]),
    ];
    let index = FlatVectorIndex::from_entries(&entries, 3);
    assert_eq!(index.len(), 1);
    let hits = index.nearest(&[1.0, 0.0, 0.0], 5).await.unwrap();
    let ids: Vec<&str> = hits.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["ok"], "prefix-matching vectors are never scored");
}

#[tokio::test]
async fn backfill_embeds_missing_published_entries_only() {
    let mut entries = vec![
        CatalogEntry::new("new", "Cosmos"),
        embedded("done", vec![9.0; 3]),
        CatalogEntry { is_published: false, ..CatalogEntry::new("draft", "Unreleased") },
    ];
    // Provider emits more dimensions than the catalog keeps.
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(FakeEmbedder::new(16));
    let client = EmbeddingClient::new(provider, 8, Duration::from_secs(5));

    let report = backfill_embeddings(&mut entries, &client, &BackfillOptions::default()).await;
    assert_eq!((report.selected, report.succeeded, report.failed), (1, 1, 0));
    assert_eq!(entries[0].embedding.as_ref().map(Vec::len), Some(8));
    assert_eq!(entries[1].embedding, Some(vec![9.0; 3]), "existing vectors untouched");
    assert!(entries[2].embedding.is_none(), "unpublished entries skipped");

    let all = BackfillOptions { regenerate_all: true, show_progress: false };
    let report = backfill_embeddings(&mut entries, &client, &all).await;
    assert_eq!(report.selected, 2);
    assert_eq!(entries[1].embedding.as_ref().map(Vec::len), Some(8));
}

#[tokio::test]
async fn backfill_counts_dimension_failures() {
    let mut entries = vec![CatalogEntry::new("b1", "Cosmos")];
    let client = EmbeddingClient::new(Arc::new(FakeEmbedder::new(4)), 8, Duration::from_secs(5));
    let report = backfill_embeddings(&mut entries, &client, &BackfillOptions::default()).await;
    assert_eq!((report.succeeded, report.failed), (0, 1));
    assert!(entries[0].embedding.is_none());
}

#[tokio::test]
async fn lance_table_round_trip() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let uri = tmp.path().to_string_lossy().to_string();
    let entries = vec![
        embedded("x", vec![1.0, 0.0, 0.0, 0.0]),
        embedded("y", vec![0.0, 1.0, 0.0, 0.0]),
        embedded("xy", vec![1.0, 1.0, 0.0, 0.0]),
        CatalogEntry::new("plain", "no vector"),
    ];
    let written = LanceVectorIndex::write(&uri, "vectors", 4, &entries).await?;
    assert_eq!(written.len(), 3);

    let index = LanceVectorIndex::open(&uri, "vectors").await?;
    let hits = index.nearest(&[1.0, 0.05, 0.0, 0.0], 2).await?;
    let ids: Vec<&str> = hits.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["x", "xy"]);
    assert!(hits[0].1 < 0.01);

    // Rewriting replaces rather than appends.
    let rewritten = LanceVectorIndex::write(&uri, "vectors", 4, &entries[..1]).await?;
    assert_eq!(rewritten.len(), 1);
    assert_eq!(LanceVectorIndex::open(&uri, "vectors").await?.len(), 1);
    Ok(())
}
