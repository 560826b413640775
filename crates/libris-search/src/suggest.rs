//! Type-ahead suggestions over the loaded catalog.
use serde::Serialize;
use std::collections::BTreeSet;

use libris_core::query::normalize_query;
use libris_core::types::{CatalogEntry, DocumentId};

const MIN_QUERY_CHARS: usize = 2;
const MAX_DOCUMENT_SUGGESTIONS: usize = 10;
const MAX_TAG_SUGGESTIONS: usize = 5;
const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Suggestion {
    Title { text: String, id: DocumentId },
    Author { text: String, id: DocumentId },
    Tag { text: String },
}

impl Suggestion {
    pub fn text(&self) -> &str {
        match self {
            Suggestion::Title { text, .. } | Suggestion::Author { text, .. } | Suggestion::Tag { text } => text,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Suggestion::Title { .. } => "title",
            Suggestion::Author { .. } => "author",
            Suggestion::Tag { .. } => "tag",
        }
    }
}

/// Title/author matches by popularity, then distinct matching tags.
pub fn suggest(entries: &[CatalogEntry], query: &str) -> Vec<Suggestion> {
    let needle = normalize_query(query).to_lowercase();
    if needle.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let mut documents: Vec<&CatalogEntry> = entries
        .iter()
        .filter(|e| e.is_published)
        .filter(|e| e.title.to_lowercase().contains(&needle) || e.author.to_lowercase().contains(&needle))
        .collect();
    documents.sort_by(|a, b| b.view_count.cmp(&a.view_count).then_with(|| a.id.cmp(&b.id)));

    let mut out: Vec<Suggestion> = documents
        .into_iter()
        .take(MAX_DOCUMENT_SUGGESTIONS)
        .map(|e| {
            if e.title.to_lowercase().contains(&needle) {
                Suggestion::Title { text: e.title.clone(), id: e.id.clone() }
            } else {
                Suggestion::Author { text: e.author.clone(), id: e.id.clone() }
            }
        })
        .collect();

    let tags: BTreeSet<&str> = entries
        .iter()
        .filter(|e| e.is_published)
        .flat_map(|e| e.tags.iter())
        .map(|t| t.trim())
        .filter(|t| t.to_lowercase().contains(&needle))
        .collect();
    out.extend(tags.into_iter().take(MAX_TAG_SUGGESTIONS).map(|t| Suggestion::Tag { text: t.to_string() }));
    out.truncate(MAX_SUGGESTIONS);
    out
}
