use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Upstream embedding provider failed, timed out or returned nothing.
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Embedding has {actual} dimensions, expected at least {expected}")]
    EmbeddingDimension { expected: usize, actual: usize },

    #[error("Candidate store unavailable: {0}")]
    StoreUnavailable(String),

    /// Never surfaced by the orchestrator; a failing cache is a forced miss.
    #[error("Result cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True for failures raised by the embedding boundary.
    pub fn is_embedding(&self) -> bool {
        matches!(self, Error::EmbeddingUnavailable(_) | Error::EmbeddingDimension { .. })
    }

    pub fn store<E: std::fmt::Display>(err: E) -> Self {
        Error::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
