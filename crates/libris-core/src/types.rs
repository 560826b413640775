//! Domain types shared by the store backends, the strategies and the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type DocumentId = String;

fn default_true() -> bool {
    true
}

/// A searchable catalog record.
///
/// - `title`/`author`/`tags`/`ai_tags`: primary text, highest weight tier
/// - `description`/`ai_summary`: secondary text, lower weight tier
/// - `categories`/`language`/`year`/`file_type`/`is_published`: filterable scope
/// - `view_count`/`created_at`: secondary ordering signals
/// - `embedding`: present only once computed; entries without one are
///   invisible to semantic matching
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub id: DocumentId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ai_summary: String,
    #[serde(default)]
    pub ai_tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default = "default_true")]
    pub is_published: bool,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<DocumentId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: String::new(),
            description: String::new(),
            tags: Vec::new(),
            ai_summary: String::new(),
            ai_tags: Vec::new(),
            categories: Vec::new(),
            language: None,
            year: None,
            file_type: None,
            is_published: true,
            view_count: 0,
            created_at: DateTime::<Utc>::default(),
            embedding: None,
        }
    }

    pub fn candidate(&self) -> Candidate {
        Candidate { id: self.id.clone(), view_count: self.view_count, created_at: self.created_at }
    }

    pub fn tags_text(&self) -> String {
        join_non_blank(&self.tags)
    }

    pub fn ai_tags_text(&self) -> String {
        join_non_blank(&self.ai_tags)
    }

    /// Text sent to the embedding provider: one labelled line per non-empty field.
    pub fn embedding_text(&self) -> String {
        let parts = [
            ("Title", self.title.clone()),
            ("Author", self.author.clone()),
            ("Description", self.description.clone()),
            ("Categories", join_non_blank(&self.categories)),
            ("Tags", self.tags_text()),
            ("AI Summary", self.ai_summary.clone()),
            ("AI Tags", self.ai_tags_text()),
        ];
        parts
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(label, value)| format!("{label}: {}", value.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn join_non_blank(values: &[String]) -> String {
    values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()).collect::<Vec<_>>().join(", ")
}

/// Secondary ordering keys returned with every store hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: DocumentId,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Substring predicate: the whole phrase matches, or every term matches some field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordPredicate {
    pub phrase: String,
    pub terms: Vec<String>,
}

/// Weight tiers for the full-text representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldWeights {
    pub primary: f32,
    pub secondary: f32,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self { primary: 1.0, secondary: 0.4 }
    }
}

/// Scope restrictions applied by every strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default = "default_true")]
    pub published_only: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Self { categories: Vec::new(), language: None, year: None, file_type: None, published_only: true }
    }
}

impl Filters {
    /// Case-folded, sorted and deduplicated form; equal scopes compare equal.
    pub fn canonical(&self) -> Filters {
        let mut categories: Vec<String> = self
            .categories
            .iter()
            .map(|c| fold(c))
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        Filters {
            categories,
            language: self.language.as_deref().map(fold),
            year: self.year,
            file_type: self.file_type.as_deref().map(fold),
            published_only: self.published_only,
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.categories.is_empty()
            && self.language.is_none()
            && self.year.is_none()
            && self.file_type.is_none()
            && !self.published_only
    }

    /// Compares on the same folded values as [`Filters::canonical`], so raw and canonical scopes agree.
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if self.published_only && !entry.is_published {
            return false;
        }
        let wanted: Vec<String> = self.categories.iter().map(|c| fold(c)).filter(|c| !c.is_empty()).collect();
        if !wanted.is_empty() && !entry.categories.iter().any(|c| wanted.contains(&fold(c))) {
            return false;
        }
        if let Some(lang) = &self.language {
            if !entry.language.as_deref().is_some_and(|l| fold(l) == fold(lang)) {
                return false;
            }
        }
        if self.year.is_some() && entry.year != self.year {
            return false;
        }
        if let Some(kind) = &self.file_type {
            if !entry.file_type.as_deref().is_some_and(|t| fold(t) == fold(kind)) {
                return false;
            }
        }
        true
    }
}

fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Auto,
    Semantic,
}

impl SearchMode {
    /// `semantic`, `vector` and `ai` select semantic mode; anything else is auto.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "semantic" | "vector" | "ai" => SearchMode::Semantic,
            _ => SearchMode::Auto,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Auto => "auto",
            SearchMode::Semantic => "semantic",
        }
    }
}

/// Which strategy produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Keyword,
    FullText,
    Semantic,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Keyword => "keyword",
            Strategy::FullText => "fulltext",
            Strategy::Semantic => "semantic",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordHit {
    pub id: DocumentId,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
}

impl From<Candidate> for KeywordHit {
    fn from(c: Candidate) -> Self {
        Self { id: c.id, view_count: c.view_count, created_at: c.created_at }
    }
}

/// Full-text hit. `relevance` is higher-is-better and only comparable with other `RankedHit`s.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedHit {
    pub id: DocumentId,
    pub relevance: f32,
    pub view_count: u64,
}

/// Semantic hit. `distance` is smaller-is-better and only comparable with other `SemanticHit`s.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticHit {
    pub id: DocumentId,
    pub distance: f32,
}

/// A terminal answer from exactly one strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSet {
    Keyword(Vec<KeywordHit>),
    FullText(Vec<RankedHit>),
    Semantic(Vec<SemanticHit>),
}

impl ResultSet {
    pub fn empty() -> Self {
        ResultSet::Keyword(Vec::new())
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            ResultSet::Keyword(_) => Strategy::Keyword,
            ResultSet::FullText(_) => Strategy::FullText,
            ResultSet::Semantic(_) => Strategy::Semantic,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResultSet::Keyword(h) => h.len(),
            ResultSet::FullText(h) => h.len(),
            ResultSet::Semantic(h) => h.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies the strategy's own ordering and drops the scores.
    pub fn into_ordered_ids(self) -> Vec<DocumentId> {
        match self {
            ResultSet::Keyword(mut hits) => {
                hits.sort_by(|a, b| {
                    b.view_count
                        .cmp(&a.view_count)
                        .then_with(|| b.created_at.cmp(&a.created_at))
                        .then_with(|| a.id.cmp(&b.id))
                });
                hits.into_iter().map(|h| h.id).collect()
            }
            ResultSet::FullText(mut hits) => {
                hits.sort_by(|a, b| {
                    b.relevance
                        .total_cmp(&a.relevance)
                        .then_with(|| b.view_count.cmp(&a.view_count))
                        .then_with(|| a.id.cmp(&b.id))
                });
                hits.into_iter().map(|h| h.id).collect()
            }
            ResultSet::Semantic(mut hits) => {
                hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then_with(|| a.id.cmp(&b.id)));
                hits.into_iter().map(|h| h.id).collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchRequest {
    pub query: String,
    pub mode: SearchMode,
    pub limit: Option<usize>,
    pub offset: usize,
    pub filters: Filters,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Self::default() }
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub document_ids: Vec<DocumentId>,
    pub strategy: Strategy,
    pub from_cache: bool,
    /// Size of the terminal result set before pagination.
    pub total: usize,
}

/// Value stored by a [`crate::traits::ResultCache`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSearch {
    pub document_ids: Vec<DocumentId>,
    pub strategy: Strategy,
    pub total: usize,
}
