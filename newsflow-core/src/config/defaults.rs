//! Default values for `NewsflowConfig`.

/// Word-embedding dimensionality.
pub const DEFAULT_DIM: usize = 300;

/// Similarity threshold for the initial clustering pass.
pub const DEFAULT_SIM_THRESHOLD: f64 = 0.6;

/// Similarity threshold for merging new clusters into history.
pub const DEFAULT_MERGE_SIM_THRESHOLD: f64 = 0.7;

/// Stricter threshold used when re-clustering a diffuse cluster.
pub const DEFAULT_SUBEVENT_SIM_THRESHOLD: f64 = 0.8;

/// Cosine standard deviation above which a cluster is diffuse.
pub const DEFAULT_COS_STD_THRESHOLD: f64 = 0.15;

/// Floor for linking relatedEvents.
pub const DEFAULT_COS_THRESHOLD: f64 = 0.6;

/// Look-back window in days for historical events.
pub const DEFAULT_WINDOW_DAYS: u32 = 10;

/// Minimum combined stemmed title+content length for clustering.
pub const DEFAULT_SHORT_ARTICLE_THRESHOLD: usize = 80;

/// Where debug dumps land.
pub const DEFAULT_OUTPUT_PATH: &str = "output";

/// Where per-run log files land.
pub const DEFAULT_LOG_PATH: &str = "log";
