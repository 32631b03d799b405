/// Storage-layer errors for the article and event stores.
/// Any of these surfacing mid-run fails the run atomically.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("malformed document {id}: {reason}")]
    MalformedDocument { id: String, reason: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("failed to write {path}: {reason}")]
    OutputUnwritable { path: String, reason: String },
}
