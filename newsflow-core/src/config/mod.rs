//! Engine configuration.

pub mod defaults;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, NewsflowResult};

/// Full engine configuration. Every threshold has a default; a config
/// file only needs to override what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsflowConfig {
    /// Word-embedding dimensionality.
    pub dim: usize,
    /// Similarity threshold for the initial clustering pass.
    pub sim_threshold: f64,
    /// Similarity threshold for merging new clusters into history.
    pub merge_sim_threshold: f64,
    /// Stricter threshold used when splitting a diffuse cluster.
    pub subevent_sim_threshold: f64,
    /// Cosine standard deviation above which a cluster must split.
    pub cos_std_threshold: f64,
    /// Minimum centroid similarity for relatedEvents links.
    pub cos_threshold: f64,
    /// Look-back window in days for historical events.
    pub window_days: u32,
    /// Articles with combined stemmed text at or below this length are dropped.
    pub short_article_threshold: usize,
    /// Path to the word-embedding table.
    pub embeddings_path: PathBuf,
    /// Directory for debug dumps.
    pub output_path: PathBuf,
    /// Directory for per-run log files.
    pub log_path: PathBuf,
}

impl Default for NewsflowConfig {
    fn default() -> Self {
        Self {
            dim: defaults::DEFAULT_DIM,
            sim_threshold: defaults::DEFAULT_SIM_THRESHOLD,
            merge_sim_threshold: defaults::DEFAULT_MERGE_SIM_THRESHOLD,
            subevent_sim_threshold: defaults::DEFAULT_SUBEVENT_SIM_THRESHOLD,
            cos_std_threshold: defaults::DEFAULT_COS_STD_THRESHOLD,
            cos_threshold: defaults::DEFAULT_COS_THRESHOLD,
            window_days: defaults::DEFAULT_WINDOW_DAYS,
            short_article_threshold: defaults::DEFAULT_SHORT_ARTICLE_THRESHOLD,
            embeddings_path: PathBuf::from("embeddings.txt"),
            output_path: PathBuf::from(defaults::DEFAULT_OUTPUT_PATH),
            log_path: PathBuf::from(defaults::DEFAULT_LOG_PATH),
        }
    }
}

impl NewsflowConfig {
    /// Load configuration from a TOML file, then validate it.
    pub fn from_toml_file(path: &Path) -> NewsflowResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| ConfigError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate thresholds and dimensions. Fatal before any I/O.
    pub fn validate(&self) -> NewsflowResult<()> {
        if self.dim == 0 {
            return Err(ConfigError::ZeroDimension.into());
        }
        if self.window_days == 0 {
            return Err(ConfigError::ZeroWindow.into());
        }
        for (name, value) in [
            ("sim_threshold", self.sim_threshold),
            ("merge_sim_threshold", self.merge_sim_threshold),
            ("subevent_sim_threshold", self.subevent_sim_threshold),
            ("cos_std_threshold", self.cos_std_threshold),
            ("cos_threshold", self.cos_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::ThresholdOutOfRange { name, value }.into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        NewsflowConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_zero_dimension() {
        let config = NewsflowConfig {
            dim: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_threshold_above_one() {
        let config = NewsflowConfig {
            merge_sim_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_threshold() {
        let config = NewsflowConfig {
            cos_std_threshold: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_overrides_partial() {
        let config: NewsflowConfig =
            toml::from_str("sim_threshold = 0.55\nwindow_days = 3").unwrap();
        assert_eq!(config.sim_threshold, 0.55);
        assert_eq!(config.window_days, 3);
        assert_eq!(config.dim, defaults::DEFAULT_DIM);
    }
}
