use serde::{Deserialize, Serialize};

/// The time window one run covers, canonical `%Y-%m-%d %H:%M:%S` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunWindow {
    pub start: String,
    pub end: String,
}

impl RunWindow {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

/// Per-run summary written to `log_<date>.json` and `log.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub cost_seconds: i64,
    pub start: String,
    pub end: String,
    pub clustering_sim: f64,
    pub merge_sim: f64,
    pub subevent_sim: f64,
    pub cos: f64,
    pub n_news: usize,
    pub n_single_event: usize,
    pub n_events: usize,
}
