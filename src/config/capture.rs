//! Capture policy configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::capture::CurationPolicy;

use super::error::ValidationError;

/// Knobs for the capture core.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    /// Seconds between expiry sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Photos kept per category
    #[serde(default = "default_max_per_category")]
    pub max_photos_per_category: usize,

    /// Photos kept in total
    #[serde(default = "default_max_total")]
    pub max_photos_total: usize,
}

impl CaptureConfig {
    /// Sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Curation policy from the configured caps
    pub fn curation_policy(&self) -> CurationPolicy {
        CurationPolicy {
            max_per_category: self.max_photos_per_category,
            max_total: self.max_photos_total,
        }
    }

    /// Validate capture configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sweep_interval_secs < 60 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        if self.max_photos_per_category == 0 || self.max_photos_total == 0 {
            return Err(ValidationError::InvalidCurationCaps);
        }
        Ok(())
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
            max_photos_per_category: default_max_per_category(),
            max_photos_total: default_max_total(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    3600
}

fn default_max_per_category() -> usize {
    2
}

fn default_max_total() -> usize {
    10
}
