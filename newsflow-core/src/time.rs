//! Canonical time-string helpers.
//!
//! All run inputs and persisted timestamps use `%Y-%m-%d %H:%M:%S`.
//! Stores compare times in separator-stripped compact form, which sorts
//! lexicographically.

use chrono::{Duration, NaiveDateTime};

use crate::constants::TIME_FORMAT;
use crate::errors::{ConfigError, NewsflowResult};

/// Parse a canonical time string.
pub fn parse_time_string(value: &str) -> NewsflowResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIME_FORMAT).map_err(|_| {
        ConfigError::InvalidTimeString {
            value: value.to_string(),
        }
        .into()
    })
}

/// Format a time back to the canonical string form.
pub fn format_time_string(time: &NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Strip separators: `2017-06-20 17:00:00` becomes `20170620170000`.
/// Used as the run date prefix in log and output file names, and for
/// compact time comparison in the stores.
pub fn compact_time(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '-' | ':' | ' '))
        .collect()
}

/// The canonical start of the history window: `t` minus `window_days`.
pub fn window_start(t: &str, window_days: u32) -> NewsflowResult<String> {
    let parsed = parse_time_string(t)?;
    Ok(format_time_string(&(parsed - Duration::days(window_days as i64))))
}
