use anyhow::{ensure, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libris_core::catalog::CatalogLoader;
use libris_core::config::{expand_path, Config, Settings};
use libris_core::types::{CatalogEntry, SearchRequest};
use libris_embed::{provider_from_settings, EmbeddingClient};
use libris_search::{suggest, CatalogStore, MemoryResultCache, SearchOrchestrator};
use libris_text::TextRankIndex;
use libris_vector::{backfill_embeddings, BackfillOptions, FlatVectorIndex, LanceVectorIndex, VectorBackend};

mod cli;

use cli::{Cli, Command, SearchArgs};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn embedding_client(settings: &Settings) -> anyhow::Result<EmbeddingClient> {
    let provider = provider_from_settings(&settings.embedding)?;
    Ok(EmbeddingClient::from_settings(provider, &settings.embedding))
}

fn lance_uri(settings: &Settings) -> String {
    expand_path(&settings.data.lancedb_dir).to_string_lossy().to_string()
}

async fn index(settings: &Settings, catalog: &Path, limit_files: Option<usize>) -> anyhow::Result<()> {
    let loader = CatalogLoader::new();
    let entries = match limit_files {
        Some(limit) => {
            println!("🔢 Limiting to the first {} catalog files", limit);
            loader.load_limited(catalog, limit)?
        }
        None => loader.load(catalog)?,
    };
    println!("Catalog: {} ({} entries)", catalog.display(), entries.len());

    let text_dir = expand_path(&settings.data.text_index_dir);
    let text = TextRankIndex::create_in_dir(&text_dir, &entries)?;
    println!("📊 Indexed {} entries into {}", text.num_docs(), text_dir.display());

    let uri = lance_uri(settings);
    let vectors = LanceVectorIndex::write(&uri, &settings.data.lancedb_table, settings.embedding.dim, &entries).await?;
    println!("📊 Wrote {} vectors to {} ({})", vectors.len(), uri, settings.data.lancedb_table);
    let missing = entries.iter().filter(|e| e.is_published && e.embedding.is_none()).count();
    if missing > 0 {
        println!("💡 {} published entries have no embedding yet; run `libris embed` first", missing);
    }
    println!("\n✅ Indexing completed successfully!");
    Ok(())
}

async fn embed(settings: &Settings, catalog: &Path, all: bool) -> anyhow::Result<()> {
    ensure!(catalog.is_file(), "embed rewrites a single catalog file; {} is not one", catalog.display());
    let loader = CatalogLoader::new();
    let mut entries = loader.load(catalog)?;
    let client = embedding_client(settings)?;
    println!("Embedding with {} (dim {})", client.provider_id(), client.dim());

    let options = BackfillOptions { regenerate_all: all, show_progress: true };
    let report = backfill_embeddings(&mut entries, &client, &options).await;
    if report.succeeded > 0 {
        loader.save(catalog, &entries)?;
    }
    println!("\n✅ Embedded {}/{} entries ({} failed)", report.succeeded, report.selected, report.failed);
    Ok(())
}

/// Persisted indexes when present, otherwise in-memory ones built from the catalog.
async fn open_store(settings: &Settings, entries: Vec<CatalogEntry>) -> anyhow::Result<CatalogStore> {
    let text_dir = expand_path(&settings.data.text_index_dir);
    let text = match TextRankIndex::open_in_dir(&text_dir) {
        Ok(text) => text,
        Err(e) => {
            tracing::info!(error = %e, "no persisted text index; building in memory");
            TextRankIndex::in_ram(&entries)?
        }
    };
    let vectors: Box<dyn VectorBackend> = match LanceVectorIndex::open(&lance_uri(settings), &settings.data.lancedb_table).await {
        Ok(table) => Box::new(table),
        Err(e) => {
            tracing::info!(error = %e, "no vector table; using in-memory vectors");
            Box::new(FlatVectorIndex::from_entries(&entries, settings.embedding.dim))
        }
    };
    Ok(CatalogStore::new(entries, text, vectors))
}

async fn search(settings: &Settings, catalog: &Path, args: &SearchArgs) -> anyhow::Result<()> {
    let entries = CatalogLoader::new().load(catalog)?;
    let store = open_store(settings, entries).await?;
    let mut orchestrator = SearchOrchestrator::new(Arc::new(store), embedding_client(settings)?, settings.search.clone())?;
    if settings.cache.enabled {
        orchestrator = orchestrator.with_cache(Arc::new(MemoryResultCache::from_settings(&settings.cache)));
    }

    let mut request = SearchRequest::new(args.query.clone())
        .with_mode(args.mode.into())
        .with_offset(args.offset)
        .with_filters(args.filters());
    if let Some(limit) = args.limit {
        request = request.with_limit(limit);
    }
    let response = orchestrator.search(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }
    println!("🔍 Query: {}", args.query);
    println!(
        "Strategy: {}  cached: {}  showing {} of {}",
        response.strategy,
        response.from_cache,
        response.document_ids.len(),
        response.total
    );
    for (i, id) in response.document_ids.iter().enumerate() {
        println!("  {}. {}", args.offset + i + 1, id);
    }
    tracing::debug!(metrics = ?orchestrator.metrics(), "search metrics");
    Ok(())
}

fn print_suggestions(catalog: &Path, query: &str) -> anyhow::Result<()> {
    let entries = CatalogLoader::new().load(catalog)?;
    let suggestions = suggest(&entries, query);
    if suggestions.is_empty() {
        println!("No suggestions for \"{}\"", query);
    }
    for s in &suggestions {
        println!("  [{}] {}", s.kind(), s.text());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;
    let settings = config.settings()?;
    let catalog: PathBuf = cli.catalog.clone().unwrap_or_else(|| expand_path(&settings.data.catalog_path));

    match &cli.command {
        Command::Index { limit_files } => index(&settings, &catalog, *limit_files).await,
        Command::Embed { all } => embed(&settings, &catalog, *all).await,
        Command::Search(args) => search(&settings, &catalog, args).await,
        Command::Suggest { query } => print_suggestions(&catalog, query),
    }
}
