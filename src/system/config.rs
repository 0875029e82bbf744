//! Frame-loop configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::geometry::DistanceUnit;

/// Configuration for the [`FrameCoordinator`](crate::coordinator::FrameCoordinator).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Frames to keep retrying image acquisition while a scan is armed.
    /// `None` retries forever.
    pub max_image_acquire_attempts: Option<u32>,

    /// Drop results dispatched before the last backend switch or reset.
    pub discard_stale_results: bool,

    /// Unit of the distance shown in labels.
    pub distance_unit: DistanceUnit,

    /// Warn when an anchor is closer than this many meters.
    pub proximity_warning_m: Option<f64>,

    /// Near clip plane for the projection matrix.
    pub near_plane: f64,

    /// Far clip plane for the projection matrix.
    pub far_plane: f64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_image_acquire_attempts: Some(60),
            discard_stale_results: false,
            distance_unit: DistanceUnit::Centimeters,
            proximity_warning_m: Some(1.0),
            near_plane: 0.01,
            far_plane: 100.0,
        }
    }
}

impl CoordinatorConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: CoordinatorConfig =
            serde_yaml::from_str(text).context("invalid coordinator config")?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&text)
    }
}
