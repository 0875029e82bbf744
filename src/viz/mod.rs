//! Hand-off of anchor labels to the renderer.
//!
//! Rasterization happens elsewhere; the frame loop only produces one batch
//! of `(pose, text)` pairs per frame.

pub mod log_renderer;

pub use log_renderer::LogRenderer;

use nalgebra::Matrix4;

use crate::geometry::SE3;
use crate::tracking::AnchorHandle;

/// One label to draw at an anchor's pose.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelDraw {
    pub anchor: AnchorHandle,
    pub pose: SE3,
    pub text: String,
}

/// Receives the label batch of each frame.
pub trait LabelRenderer {
    fn draw_labels(&mut self, view_projection: &Matrix4<f64>, camera_pose: &SE3, labels: &[LabelDraw]);
}
