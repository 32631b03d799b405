/// Configuration errors. All of these are fatal at construction,
/// before any store or file I/O happens.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("threshold {name} out of range: {value} (expected 0 < t <= 1)")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("vector dimension must be positive")]
    ZeroDimension,

    #[error("history window must be at least one day")]
    ZeroWindow,

    #[error("invalid time string: {value:?} (expected %Y-%m-%d %H:%M:%S)")]
    InvalidTimeString { value: String },

    #[error("failed to read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("failed to parse config file {path}: {reason}")]
    Malformed { path: String, reason: String },
}
