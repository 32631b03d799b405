/// Word-embedding table errors. Raised while loading the table at
/// engine construction; a missing or malformed table is fatal.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("failed to read word table {path}: {reason}")]
    TableUnreadable { path: String, reason: String },

    #[error("word table {path} is empty")]
    EmptyTable { path: String },

    #[error("word table {path} line {line}: expected {expected} dimensions, got {got}")]
    DimensionMismatch {
        path: String,
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("word table {path} line {line}: unparseable component {value:?}")]
    BadComponent {
        path: String,
        line: usize,
        value: String,
    },
}
