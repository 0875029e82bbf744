//! Contract with the AR tracking subsystem.
//!
//! The subsystem owns the camera, the pose estimate, the reconstructed scene
//! and the anchors placed in it. The frame loop only reads from it through
//! this trait; all queries refer to the frame produced by the last
//! successful [`TrackingSession::update`].

use nalgebra::{Matrix4, Point2};
use thiserror::Error;

use super::snapshot::{AnchorHandle, CameraImage, FrameSnapshot, HitResult, TrackedPose};

/// Failure to produce a frame.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Camera is held by another client or was disconnected.
    #[error("camera not available")]
    CameraNotAvailable,

    #[error("tracking session error: {0}")]
    Other(String),
}

/// Pose-estimation and scene-query interface used once per rendered frame.
pub trait TrackingSession {
    /// Advance to the latest camera frame.
    fn update(&mut self) -> Result<FrameSnapshot, SessionError>;

    /// Projection matrix of the current frame for the given clip planes.
    fn projection_matrix(&self, near: f64, far: f64) -> Matrix4<f64>;

    /// Converts image-pixel coordinates to view (screen) coordinates.
    fn image_pixel_to_view(&self, image: Point2<f64>) -> Point2<f64>;

    /// Intersects the ray through a view coordinate with the scene and
    /// returns the nearest hit.
    fn hit_test(&self, view: Point2<f64>) -> Option<HitResult>;

    /// CPU image of the current frame; `None` if it is not ready yet.
    fn try_acquire_camera_image(&mut self) -> Option<CameraImage>;

    /// Clockwise rotation in degrees from the image sensor to the display.
    fn camera_sensor_to_display_rotation(&self) -> i32;

    /// Places a persistent anchor at a hit. `None` if the trackable refused it.
    fn create_anchor(&mut self, hit: &HitResult) -> Option<AnchorHandle>;

    /// Latest pose and tracking state of an anchor.
    fn anchor_pose(&self, handle: AnchorHandle) -> Option<TrackedPose>;
}
