//! Per-frame data handed over by the tracking subsystem.

use nalgebra::Matrix4;

use crate::geometry::SE3;
use crate::tracking::TrackingState;

/// Handle to a trackable surface (plane, mesh patch, feature point) that a
/// hit test intersected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackableId(pub u64);

/// Opaque handle to an anchor owned by the tracking subsystem.
///
/// The subsystem keeps refining the anchor's pose; the handle is how the
/// core asks for the latest value each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorHandle(pub u64);

impl std::fmt::Display for AnchorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "A{}", self.0)
    }
}

/// Pose snapshot of one frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub timestamp_ns: u64,
    /// Camera pose `T_wc`.
    pub camera_pose: SE3,
    pub tracking_state: TrackingState,
}

impl FrameSnapshot {
    /// View matrix: world to camera.
    pub fn view_matrix(&self) -> Matrix4<f64> {
        self.camera_pose.inverse().to_matrix()
    }
}

/// First surface intersected by a hit test.
#[derive(Debug, Clone)]
pub struct HitResult {
    pub hit_pose: SE3,
    pub trackable: TrackableId,
}

/// Latest pose and tracking state of an anchor.
#[derive(Debug, Clone)]
pub struct TrackedPose {
    pub pose: SE3,
    pub state: TrackingState,
}

/// CPU copy of the camera image for one frame.
///
/// Dropping it releases the image back to the tracking subsystem.
#[derive(Debug, Clone)]
pub struct CameraImage {
    pub width: u32,
    pub height: u32,
    pub timestamp_ns: u64,
    pub data: Vec<u8>,
}

impl CameraImage {
    pub fn new(width: u32, height: u32, timestamp_ns: u64, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            timestamp_ns,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_view_matrix_maps_camera_to_origin() {
        let snapshot = FrameSnapshot {
            timestamp_ns: 0,
            camera_pose: SE3::from_translation(1.0, 2.0, 3.0),
            tracking_state: TrackingState::Tracking,
        };
        let camera_in_view = snapshot.view_matrix() * Point3::new(1.0, 2.0, 3.0).to_homogeneous();
        assert_relative_eq!(camera_in_view.xyz(), nalgebra::Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_anchor_handle_display() {
        assert_eq!(format!("{}", AnchorHandle(7)), "A7");
    }
}
