//! Embedding backfill over an in-memory catalog.
//!
//! Selects published entries lacking a vector (or all published entries when
//! regenerating), embeds their labelled text through the `EmbeddingClient` so
//! every stored vector has the catalog dimensionality, and keeps going past
//! per-entry failures.
use indicatif::{ProgressBar, ProgressStyle};

use libris_core::types::CatalogEntry;
use libris_embed::EmbeddingClient;

#[derive(Debug, Clone, Copy, Default)]
pub struct BackfillOptions {
    pub regenerate_all: bool,
    pub show_progress: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub selected: usize,
    pub succeeded: usize,
    pub failed: usize,
}

fn needs_embedding(entry: &CatalogEntry, regenerate_all: bool) -> bool {
    entry.is_published && (regenerate_all || entry.embedding.is_none())
}

pub async fn backfill_embeddings(
    entries: &mut [CatalogEntry],
    client: &EmbeddingClient,
    options: &BackfillOptions,
) -> BackfillReport {
    let selected: Vec<usize> =
        (0..entries.len()).filter(|&i| needs_embedding(&entries[i], options.regenerate_all)).collect();
    let mut report = BackfillReport { selected: selected.len(), ..BackfillReport::default() };
    if selected.is_empty() {
        tracing::info!(regenerate_all = options.regenerate_all, "no entries need embeddings");
        return report;
    }

    let pb = if options.show_progress { ProgressBar::new(selected.len() as u64) } else { ProgressBar::hidden() };
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    for i in selected {
        let entry = &mut entries[i];
        pb.set_message(entry.id.clone());
        match client.embed(&entry.embedding_text()).await {
            Ok(vector) => {
                entry.embedding = Some(vector);
                report.succeeded += 1;
            }
            Err(e) => {
                tracing::warn!(id = %entry.id, error = %e, "embedding failed; entry left unchanged");
                report.failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");
    tracing::info!(selected = report.selected, succeeded = report.succeeded, failed = report.failed, "embedding backfill complete");
    report
}
