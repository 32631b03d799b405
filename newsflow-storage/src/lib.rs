//! # newsflow-storage
//!
//! SQLite-backed article and event stores. Documents are stored as JSON
//! columns (unknown fields survive upserts untouched) next to indexed
//! compact time columns for window queries.

pub mod article_store;
pub mod event_store;
pub mod migrations;

pub use article_store::SqliteArticleStore;
pub use event_store::SqliteEventStore;

use newsflow_core::errors::{NewsflowError, StorageError};

pub(crate) fn to_storage_err(message: impl Into<String>) -> NewsflowError {
    StorageError::SqliteError {
        message: message.into(),
    }
    .into()
}
