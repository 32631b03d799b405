//! Error types for the newsflow workspace.
//!
//! Per-domain enums wrapped by a single `NewsflowError`; every fallible
//! operation returns `NewsflowResult<T>`.

mod config_error;
mod embedding_error;
mod storage_error;

pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use storage_error::StorageError;

/// Workspace-wide result alias.
pub type NewsflowResult<T> = Result<T, NewsflowError>;

/// Top-level error: one variant per subsystem.
#[derive(Debug, thiserror::Error)]
pub enum NewsflowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
