//! Scan settings shared by tree builders.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VolumeError};

/// Dumps with at least this many lines are decoded in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Settings for one volume scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanConfig {
    /// Path the stat dump was rooted at; stripped from every record.
    pub mountpoint: String,
    pub parallel_threshold: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mountpoint: "/".to_string(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ScanConfig {
    pub fn new(mountpoint: impl Into<String>) -> Self {
        Self {
            mountpoint: mountpoint.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.mountpoint.trim().is_empty() {
            return Err(VolumeError::InvalidConfig(
                "mountpoint must not be empty".to_string(),
            ));
        }
        if self.parallel_threshold == 0 {
            return Err(VolumeError::InvalidConfig(
                "parallelThreshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
