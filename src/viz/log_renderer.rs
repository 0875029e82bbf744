//! Logging renderer for headless runs.

use nalgebra::Matrix4;
use tracing::debug;

use crate::geometry::SE3;

use super::{LabelDraw, LabelRenderer};

/// Renderer that logs labels and keeps the last batch.
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
    last: Vec<LabelDraw>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches received.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_batch(&self) -> &[LabelDraw] {
        &self.last
    }
}

impl LabelRenderer for LogRenderer {
    fn draw_labels(&mut self, _view_projection: &Matrix4<f64>, _camera_pose: &SE3, labels: &[LabelDraw]) {
        self.frames += 1;
        for label in labels {
            debug!(
                "{} at [{:.2}, {:.2}, {:.2}]: {}",
                label.anchor,
                label.pose.translation.x,
                label.pose.translation.y,
                label.pose.translation.z,
                label.text
            );
        }
        self.last = labels.to_vec();
    }
}
