//! Configuration loader, typed settings and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_SEARCH__SEMANTIC_TOP_K=8`).
//! Every section falls back to its `Default` when absent.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::FieldWeights;

/// Tunables of the strategy chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Max cosine distance for semantic matches used as a silent fallback.
    pub strict_max_distance: f32,
    /// Max cosine distance when the caller asked for semantic search.
    pub explicit_max_distance: f32,
    pub semantic_top_k: usize,
    /// Full-text hits below this relevance are discarded.
    pub min_relevance: f32,
    /// Shorter queries never pay for an embedding call in auto mode.
    pub min_semantic_query_chars: usize,
    pub primary_weight: f32,
    pub secondary_weight: f32,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            strict_max_distance: 0.48,
            explicit_max_distance: 0.62,
            semantic_top_k: 12,
            min_relevance: 0.01,
            min_semantic_query_chars: 3,
            primary_weight: 1.0,
            secondary_weight: 0.4,
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl SearchSettings {
    pub fn field_weights(&self) -> FieldWeights {
        FieldWeights { primary: self.primary_weight, secondary: self.secondary_weight }
    }

    /// Requested page size, defaulted and clamped.
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_page_size).clamp(1, self.max_page_size)
    }

    pub fn validate(&self) -> Result<()> {
        let in_range = |d: f32| (0.0..=2.0).contains(&d);
        if !in_range(self.strict_max_distance) || !in_range(self.explicit_max_distance) {
            return Err(Error::InvalidConfig("semantic distances must lie in [0, 2]".into()));
        }
        if self.strict_max_distance > self.explicit_max_distance {
            return Err(Error::InvalidConfig(format!(
                "strict_max_distance ({}) must not exceed explicit_max_distance ({})",
                self.strict_max_distance, self.explicit_max_distance
            )));
        }
        if self.semantic_top_k == 0 {
            return Err(Error::InvalidConfig("semantic_top_k must be positive".into()));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(Error::InvalidConfig(format!(
                "default_page_size ({}) must be within 1..={}",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl_secs: u64,
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { enabled: true, ttl_secs: 300, capacity: 1024 }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Fake,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub provider: ProviderKind,
    /// Catalog vector dimensionality; provider output is truncated to it.
    pub dim: usize,
    pub timeout_ms: u64,
    pub max_len: usize,
    pub model_dir: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { provider: ProviderKind::Fake, dim: 1024, timeout_ms: 10_000, max_len: 256, model_dir: None }
    }
}

impl EmbeddingSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dim == 0 {
            return Err(Error::InvalidConfig("embedding.dim must be positive".into()));
        }
        if self.timeout_ms == 0 {
            return Err(Error::InvalidConfig("embedding.timeout_ms must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub catalog_path: String,
    pub text_index_dir: String,
    pub lancedb_dir: String,
    pub lancedb_table: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            catalog_path: "../dev_data/catalog.json".to_string(),
            text_index_dir: "../dev_data/indexes/tantivy".to_string(),
            lancedb_dir: "../dev_data/indexes/lancedb".to_string(),
            lancedb_table: "catalog_vectors".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub cache: CacheSettings,
    pub embedding: EmbeddingSettings,
    pub data: DataSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.embedding.validate()
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment.extract().map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
