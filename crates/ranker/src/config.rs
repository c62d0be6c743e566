//! Tunable constants of the ranking routine.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Weights, sizes and jitter bounds used by [`crate::Ranker`].
///
/// Deserializes from JSON; any field left out keeps its default.
///
/// ```ignore
/// let config = RankerConfig::default()
///     .with_batch_size(8)
///     .without_jitter();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    /// Movies returned per call
    pub batch_size: usize,
    /// How many of the best-scored movies are eligible for a batch
    pub top_pool_size: usize,

    pub genre_weight: f64,
    pub popularity_weight: f64,
    pub rating_weight: f64,

    /// Popularity is divided by this before weighting
    pub popularity_scale: f64,
    /// Rating is divided by this before weighting
    pub rating_scale: f64,

    /// Jitter is drawn from `[jitter_min, jitter_max)`; equal bounds fix it
    pub jitter_min: f64,
    pub jitter_max: f64,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            top_pool_size: 15,
            genre_weight: 0.7,
            popularity_weight: 0.2,
            rating_weight: 0.1,
            popularity_scale: 100.0,
            rating_scale: 10.0,
            jitter_min: 0.8,
            jitter_max: 1.2,
        }
    }
}

impl RankerConfig {
    /// Configure the batch size (default: 5)
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Configure the top pool size (default: 15)
    pub fn with_top_pool_size(mut self, size: usize) -> Self {
        self.top_pool_size = size;
        self
    }

    /// Configure the jitter range (default: 0.8..1.2)
    pub fn with_jitter(mut self, min: f64, max: f64) -> Self {
        self.jitter_min = min;
        self.jitter_max = max;
        self
    }

    /// Fix the jitter at 1.0 so scores are the plain weighted sum
    pub fn without_jitter(self) -> Self {
        self.with_jitter(1.0, 1.0)
    }

    pub fn has_jitter(&self) -> bool {
        self.jitter_max > self.jitter_min
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        if self.top_pool_size == 0 {
            bail!("top_pool_size must be at least 1");
        }
        for (name, value) in [
            ("genre_weight", self.genre_weight),
            ("popularity_weight", self.popularity_weight),
            ("rating_weight", self.rating_weight),
        ] {
            if !value.is_finite() {
                bail!("{} must be finite, got {}", name, value);
            }
        }
        for (name, value) in [
            ("popularity_scale", self.popularity_scale),
            ("rating_scale", self.rating_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("{} must be positive, got {}", name, value);
            }
        }
        if !self.jitter_min.is_finite() || !self.jitter_max.is_finite() {
            bail!("jitter bounds must be finite");
        }
        if self.jitter_min <= 0.0 || self.jitter_min > self.jitter_max {
            bail!(
                "jitter range must satisfy 0 < min <= max, got {}..{}",
                self.jitter_min,
                self.jitter_max
            );
        }
        Ok(())
    }

    /// Read and validate a JSON config file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read ranker config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse ranker config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid ranker config {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = RankerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.top_pool_size, 15);
        assert!(config.has_jitter());
    }

    #[test]
    fn test_without_jitter() {
        let config = RankerConfig::default().without_jitter();
        assert!(!config.has_jitter());
        assert_eq!(config.jitter_min, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(RankerConfig::default().with_batch_size(0).validate().is_err());
        assert!(RankerConfig::default().with_top_pool_size(0).validate().is_err());
        assert!(RankerConfig::default().with_jitter(1.2, 0.8).validate().is_err());
        assert!(RankerConfig::default().with_jitter(0.0, 1.0).validate().is_err());

        let mut config = RankerConfig::default();
        config.rating_scale = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RankerConfig =
            serde_json::from_str(r#"{"batch_size": 8, "jitter_min": 1.0, "jitter_max": 1.0}"#)
                .unwrap();
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.top_pool_size, 15);
        assert_eq!(config.genre_weight, 0.7);
        assert!(!config.has_jitter());
    }

    #[test]
    fn test_from_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ranker.json");

        fs::write(&path, r#"{"top_pool_size": 0}"#).unwrap();
        let err = RankerConfig::from_json_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("top_pool_size"));

        fs::write(&path, r#"{"batch_size": 3}"#).unwrap();
        let config = RankerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.top_pool_size, 15);
    }
}
