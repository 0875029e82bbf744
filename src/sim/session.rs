//! Scripted tracking session.
//!
//! Replays a [`SceneConfig`]: one script entry per `update`, holding the
//! last entry once the script runs out. Hit tests cast a pinhole ray from
//! the camera through the view coordinate and return the nearest plane in
//! front of it. The hit pose has its Y axis along the plane normal.

use nalgebra::{Matrix4, Point2, UnitQuaternion, Vector3};

use crate::geometry::SE3;
use crate::tracking::{
    AnchorHandle, CameraImage, FrameSnapshot, HitResult, SessionError, TrackableId, TrackedPose,
    TrackingSession, TrackingState,
};

use super::scene::{FrameScript, ImageSize, SceneConfig};

const FRAME_PERIOD_NS: u64 = 33_333_333;

struct SimAnchor {
    pose: SE3,
    lost: bool,
}

pub struct ScriptedSession {
    scene: SceneConfig,
    /// Index of the next script entry.
    cursor: usize,
    current: Option<FrameScript>,
    timestamp_ns: u64,
    anchors: Vec<SimAnchor>,
    images_acquired: usize,
}

impl ScriptedSession {
    pub fn new(scene: SceneConfig) -> Self {
        Self {
            scene,
            cursor: 0,
            current: None,
            timestamp_ns: 0,
            anchors: Vec::new(),
            images_acquired: 0,
        }
    }

    /// Number of `update` calls so far.
    pub fn frames_elapsed(&self) -> usize {
        self.cursor
    }

    pub fn images_acquired(&self) -> usize {
        self.images_acquired
    }

    pub fn num_anchors(&self) -> usize {
        self.anchors.len()
    }

    /// Mark an anchor as no longer tracked (or tracked again).
    pub fn set_anchor_lost(&mut self, handle: AnchorHandle, lost: bool) {
        if let Some(anchor) = self.anchors.get_mut(handle.0 as usize) {
            anchor.lost = lost;
        }
    }

    fn current_frame(&self) -> Option<&FrameScript> {
        self.current.as_ref()
    }

    fn camera_pose(&self) -> SE3 {
        self.current_frame()
            .map(FrameScript::camera_pose)
            .unwrap_or_default()
    }
}

/// Bytes of a one-byte-per-pixel image.
fn image_len(size: ImageSize) -> usize {
    size.width as usize * size.height as usize
}

impl TrackingSession for ScriptedSession {
    fn update(&mut self) -> Result<FrameSnapshot, SessionError> {
        let script = self
            .scene
            .frames
            .get(self.cursor)
            .or_else(|| self.scene.frames.last())
            .cloned()
            .ok_or_else(|| SessionError::Other("scene has no frames".to_string()))?;
        self.cursor += 1;
        self.timestamp_ns += FRAME_PERIOD_NS;

        if !script.camera_available {
            self.current = None;
            return Err(SessionError::CameraNotAvailable);
        }

        let snapshot = FrameSnapshot {
            timestamp_ns: self.timestamp_ns,
            camera_pose: script.camera_pose(),
            tracking_state: script.tracking_state,
        };
        self.current = Some(script);
        Ok(snapshot)
    }

    #[rustfmt::skip]
    fn projection_matrix(&self, near: f64, far: f64) -> Matrix4<f64> {
        let view = self.scene.view;
        let fx = 2.0 * view.focal_px / view.width;
        let fy = 2.0 * view.focal_px / view.height;
        Matrix4::new(
            fx,  0.0, 0.0,                          0.0,
            0.0, fy,  0.0,                          0.0,
            0.0, 0.0, -(far + near) / (far - near), -2.0 * far * near / (far - near),
            0.0, 0.0, -1.0,                         0.0,
        )
    }

    fn image_pixel_to_view(&self, image: Point2<f64>) -> Point2<f64> {
        let view = self.scene.view;
        let iw = self.scene.image.width as f64;
        let ih = self.scene.image.height as f64;
        // Normalized image coordinates, rotated onto the display.
        let (u, v) = match self.scene.display_rotation_deg.rem_euclid(360) {
            90 => (1.0 - image.y / ih, image.x / iw),
            180 => (1.0 - image.x / iw, 1.0 - image.y / ih),
            270 => (image.y / ih, 1.0 - image.x / iw),
            _ => (image.x / iw, image.y / ih),
        };
        Point2::new(u * view.width, v * view.height)
    }

    fn hit_test(&self, view_point: Point2<f64>) -> Option<HitResult> {
        self.current_frame()?;
        let view = self.scene.view;
        let camera = self.camera_pose();

        // Camera looks down -Z with +Y up; view Y grows downward.
        let ray_cam = Vector3::new(
            (view_point.x - view.width / 2.0) / view.focal_px,
            -(view_point.y - view.height / 2.0) / view.focal_px,
            -1.0,
        );
        let dir = camera.rotation * ray_cam.normalize();
        let origin = camera.translation;

        let mut best: Option<(f64, usize)> = None;
        for (idx, plane) in self.scene.planes.iter().enumerate() {
            let denom = plane.normal.dot(&dir);
            if denom.abs() < 1e-9 {
                continue;
            }
            let s = (plane.offset - plane.normal.dot(&origin)) / denom;
            if s <= 0.0 {
                continue;
            }
            if best.map_or(true, |(best_s, _)| s < best_s) {
                best = Some((s, idx));
            }
        }

        let (s, idx) = best?;
        let normal = self.scene.planes[idx].normal.normalize();
        let rotation = UnitQuaternion::rotation_between(&Vector3::y(), &normal)
            .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI));
        Some(HitResult {
            hit_pose: SE3::new(rotation, origin + dir * s),
            trackable: TrackableId(idx as u64),
        })
    }

    fn try_acquire_camera_image(&mut self) -> Option<CameraImage> {
        let ready = self.current_frame()?.image_ready;
        if !ready {
            return None;
        }
        self.images_acquired += 1;
        let size = self.scene.image;
        Some(CameraImage::new(
            size.width,
            size.height,
            self.timestamp_ns,
            vec![0; image_len(size)],
        ))
    }

    fn camera_sensor_to_display_rotation(&self) -> i32 {
        self.scene.display_rotation_deg
    }

    fn create_anchor(&mut self, hit: &HitResult) -> Option<AnchorHandle> {
        let handle = AnchorHandle(self.anchors.len() as u64);
        self.anchors.push(SimAnchor {
            pose: hit.hit_pose.clone(),
            lost: false,
        });
        Some(handle)
    }

    fn anchor_pose(&self, handle: AnchorHandle) -> Option<TrackedPose> {
        let anchor = self.anchors.get(handle.0 as usize)?;
        let frame_state = self
            .current_frame()
            .map_or(TrackingState::Stopped, |f| f.tracking_state);
        let state = if anchor.lost {
            TrackingState::Paused
        } else {
            frame_state
        };
        Some(TrackedPose {
            pose: anchor.pose.clone(),
            state,
        })
    }
}
