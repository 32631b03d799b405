/// Newsflow system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Canonical wall-clock format used in run inputs and persisted records.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Geometric decay applied per member when aggregating entities.
/// Members are ordered by descending similarity to the centroid.
pub const ENTITY_DECAY: f64 = 0.99;

/// How many aggregated entities survive per list (keywords, NER, ...).
pub const TOP_ENTITIES: usize = 20;

/// How many keyword words make up the event label.
pub const LABEL_KEYWORDS: usize = 5;

/// Cap on relatedEvents entries per persisted event.
pub const MAX_RELATED_EVENTS: usize = 15;

/// Seconds per day, used for history-window arithmetic.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Vectoriser progress is logged every this many articles.
pub const PROGRESS_LOG_EVERY: usize = 500;
