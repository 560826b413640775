use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use libris_core::types::Strategy;

/// Per-orchestrator counters. Degradations are the failures the chain
/// absorbed instead of surfacing.
#[derive(Debug, Default)]
pub struct SearchMetrics {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    cache_errors: AtomicU64,
    keyword_results: AtomicU64,
    fulltext_results: AtomicU64,
    semantic_results: AtomicU64,
    fulltext_degradations: AtomicU64,
    embedding_degradations: AtomicU64,
    semantic_fallback_failures: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_errors: u64,
    pub keyword_results: u64,
    pub fulltext_results: u64,
    pub semantic_results: u64,
    pub fulltext_degradations: u64,
    pub embedding_degradations: u64,
    pub semantic_fallback_failures: u64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

impl SearchMetrics {
    pub fn request(&self) {
        bump(&self.requests)
    }

    pub fn cache_hit(&self) {
        bump(&self.cache_hits)
    }

    pub fn cache_miss(&self) {
        bump(&self.cache_misses)
    }

    pub fn cache_error(&self) {
        bump(&self.cache_errors)
    }

    pub fn fulltext_degraded(&self) {
        bump(&self.fulltext_degradations)
    }

    pub fn embedding_degraded(&self) {
        bump(&self.embedding_degradations)
    }

    pub fn semantic_fallback_failed(&self) {
        bump(&self.semantic_fallback_failures)
    }

    pub fn answered_by(&self, strategy: Strategy) {
        match strategy {
            Strategy::Keyword => bump(&self.keyword_results),
            Strategy::FullText => bump(&self.fulltext_results),
            Strategy::Semantic => bump(&self.semantic_results),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        MetricsSnapshot {
            requests: load(&self.requests),
            cache_hits: load(&self.cache_hits),
            cache_misses: load(&self.cache_misses),
            cache_errors: load(&self.cache_errors),
            keyword_results: load(&self.keyword_results),
            fulltext_results: load(&self.fulltext_results),
            semantic_results: load(&self.semantic_results),
            fulltext_degradations: load(&self.fulltext_degradations),
            embedding_degradations: load(&self.embedding_degradations),
            semantic_fallback_failures: load(&self.semantic_fallback_failures),
        }
    }
}

impl MetricsSnapshot {
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 { 0.0 } else { self.cache_hits as f64 / total as f64 }
    }
}
