//! The search entry point: cache lookup, then the strategy chain.
//!
//! Auto mode runs keyword, then full-text, then strict semantic, stopping at
//! the first non-empty answer. Explicit semantic mode runs the widening
//! semantic matcher and falls back to keyword on any failure. Only a keyword
//! failure with nothing left to fall back to reaches the caller.
use std::sync::Arc;

use libris_core::config::SearchSettings;
use libris_core::error::Result;
use libris_core::query::{has_min_signal, normalize_query, CacheKey};
use libris_core::traits::{CandidateStore, ResultCache};
use libris_core::types::{
    CachedSearch, Filters, ResultSet, SearchMode, SearchRequest, SearchResponse, SemanticHit, Strategy,
};
use libris_embed::EmbeddingClient;

use crate::metrics::{MetricsSnapshot, SearchMetrics};
use crate::strategy::{FullTextRanker, KeywordMatcher, SemanticMatcher, Strictness};

pub struct SearchOrchestrator {
    store: Arc<dyn CandidateStore>,
    embedder: EmbeddingClient,
    cache: Option<Arc<dyn ResultCache>>,
    settings: SearchSettings,
    keyword: KeywordMatcher,
    fulltext: FullTextRanker,
    semantic: SemanticMatcher,
    metrics: SearchMetrics,
}

impl SearchOrchestrator {
    pub fn new(store: Arc<dyn CandidateStore>, embedder: EmbeddingClient, settings: SearchSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            keyword: KeywordMatcher::new(),
            fulltext: FullTextRanker::new(settings.field_weights(), settings.min_relevance),
            semantic: SemanticMatcher::new(
                settings.strict_max_distance,
                settings.explicit_max_distance,
                settings.semantic_top_k,
            ),
            store,
            embedder,
            cache: None,
            settings,
            metrics: SearchMetrics::default(),
        })
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(mode = request.mode.as_str()))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        self.metrics.request();
        let query = normalize_query(&request.query);
        if query.is_empty() {
            return Ok(SearchResponse {
                document_ids: Vec::new(),
                strategy: Strategy::Keyword,
                from_cache: false,
                total: 0,
            });
        }

        let limit = self.settings.effective_limit(request.limit);
        let filters = request.filters.canonical();
        let key = CacheKey::new(&query, request.mode, &filters, request.offset, limit);
        if let Some(hit) = self.cached(&key) {
            return Ok(SearchResponse {
                document_ids: hit.document_ids,
                strategy: hit.strategy,
                from_cache: true,
                total: hit.total,
            });
        }

        let result = match request.mode {
            SearchMode::Semantic => self.explicit_semantic(&query, &filters).await?,
            SearchMode::Auto => self.auto(&query, &filters).await?,
        };
        let strategy = result.strategy();
        self.metrics.answered_by(strategy);

        let ordered = result.into_ordered_ids();
        let total = ordered.len();
        let document_ids: Vec<_> = ordered.into_iter().skip(request.offset).take(limit).collect();
        tracing::info!(%strategy, total, returned = document_ids.len(), "search answered");

        self.store_in_cache(&key, CachedSearch { document_ids: document_ids.clone(), strategy, total });
        Ok(SearchResponse { document_ids, strategy, from_cache: false, total })
    }

    fn cached(&self, key: &CacheKey) -> Option<CachedSearch> {
        let cache = self.cache.as_ref()?;
        match cache.get(key.as_str()) {
            Ok(Some(hit)) => {
                self.metrics.cache_hit();
                tracing::debug!(strategy = %hit.strategy, "cache hit");
                Some(hit)
            }
            Ok(None) => {
                self.metrics.cache_miss();
                None
            }
            Err(e) => {
                self.metrics.cache_error();
                tracing::warn!(error = %e, "result cache lookup failed; treating as miss");
                None
            }
        }
    }

    fn store_in_cache(&self, key: &CacheKey, value: CachedSearch) {
        let Some(cache) = self.cache.as_ref() else { return };
        if let Err(e) = cache.put(key.as_str(), value) {
            self.metrics.cache_error();
            tracing::warn!(error = %e, "result cache write failed");
        }
    }

    async fn explicit_semantic(&self, query: &str, filters: &Filters) -> Result<ResultSet> {
        match self.semantic_hits(query, filters, Strictness::Explicit).await {
            Ok(hits) => Ok(ResultSet::Semantic(hits)),
            Err(e) => {
                if e.is_embedding() {
                    self.metrics.embedding_degraded();
                }
                tracing::warn!(error = %e, "semantic search failed; falling back to keyword");
                let hits = self.keyword.run(self.store.as_ref(), query, filters).await?;
                Ok(ResultSet::Keyword(hits))
            }
        }
    }

    async fn auto(&self, query: &str, filters: &Filters) -> Result<ResultSet> {
        let keyword = self.keyword.run(self.store.as_ref(), query, filters).await?;
        if !keyword.is_empty() {
            return Ok(ResultSet::Keyword(keyword));
        }
        tracing::debug!("no keyword match; trying full-text");

        match self.fulltext.run(self.store.as_ref(), query, filters).await {
            Ok(ranked) if !ranked.is_empty() => return Ok(ResultSet::FullText(ranked)),
            Ok(_) => tracing::debug!("no full-text match above the relevance floor"),
            Err(e) => {
                self.metrics.fulltext_degraded();
                tracing::warn!(error = %e, "full-text ranking failed; continuing");
            }
        }

        if !has_min_signal(query, self.settings.min_semantic_query_chars) {
            tracing::debug!(min_chars = self.settings.min_semantic_query_chars, "query too short for semantic fallback");
            return Ok(ResultSet::Keyword(keyword));
        }

        match self.semantic_hits(query, filters, Strictness::Strict).await {
            Ok(hits) if !hits.is_empty() => Ok(ResultSet::Semantic(hits)),
            Ok(_) => {
                tracing::debug!("no semantic match under the strict ceiling");
                Ok(ResultSet::Keyword(keyword))
            }
            Err(e) => {
                if e.is_embedding() {
                    self.metrics.embedding_degraded();
                }
                self.metrics.semantic_fallback_failed();
                tracing::warn!(error = %e, "semantic fallback failed; returning the empty keyword result");
                Ok(ResultSet::Keyword(keyword))
            }
        }
    }

    async fn semantic_hits(&self, query: &str, filters: &Filters, strictness: Strictness) -> Result<Vec<SemanticHit>> {
        let vector = self.embedder.embed(query).await?;
        self.semantic.run(self.store.as_ref(), &vector, filters, strictness).await
    }
}
