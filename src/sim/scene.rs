//! Scene description for scripted runs.
//!
//! A scene is a set of planes, a pinhole view and a per-frame script of
//! camera poses and tracking conditions. It can be written in YAML:
//!
//! ```yaml
//! view: { width: 640, height: 480, focal_px: 500 }
//! image: { width: 640, height: 480 }
//! planes:
//!   - { normal: [0, 0, 1], offset: -1.5 }
//! frames:
//!   - { position: [0, 0, 0] }
//!   - { position: [0, 0, 0.2], yaw_deg: 10 }
//! scan_at_frames: [1]
//! on_device:
//!   name: on-device
//!   default_model: true
//!   detections:
//!     - { label: cup, x: 320, y: 240 }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use nalgebra::{UnitQuaternion, Vector3};
use serde::Deserialize;

use crate::geometry::SE3;
use crate::system::CoordinatorConfig;
use crate::tracking::TrackingState;

/// Screen size and focal length in view pixels.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ViewConfig {
    pub width: f64,
    pub height: f64,
    pub focal_px: f64,
}

/// Camera image size in pixels.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Infinite plane `{p : normal · p = offset}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaneConfig {
    pub normal: Vector3<f64>,
    pub offset: f64,
}

/// Conditions for one frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrameScript {
    pub position: Vector3<f64>,
    pub roll_deg: f64,
    pub pitch_deg: f64,
    pub yaw_deg: f64,
    pub tracking_state: TrackingState,
    /// Camera image can be acquired this frame.
    pub image_ready: bool,
    /// `false` makes `update` fail with `CameraNotAvailable`.
    pub camera_available: bool,
}

impl Default for FrameScript {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            roll_deg: 0.0,
            pitch_deg: 0.0,
            yaw_deg: 0.0,
            tracking_state: TrackingState::Tracking,
            image_ready: true,
            camera_available: true,
        }
    }
}

impl FrameScript {
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::default()
        }
    }

    pub fn camera_pose(&self) -> SE3 {
        SE3::new(
            UnitQuaternion::from_euler_angles(
                self.roll_deg.to_radians(),
                self.pitch_deg.to_radians(),
                self.yaw_deg.to_radians(),
            ),
            self.position,
        )
    }
}

/// Detector output for scripted runs.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorScript {
    pub name: String,
    #[serde(default)]
    pub detections: Vec<DetectionScript>,
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(default)]
    pub default_model: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectionScript {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    pub view: ViewConfig,
    pub image: ImageSize,
    #[serde(default)]
    pub display_rotation_deg: i32,
    #[serde(default)]
    pub planes: Vec<PlaneConfig>,
    pub frames: Vec<FrameScript>,
    #[serde(default)]
    pub scan_at_frames: Vec<u64>,
    pub on_device: DetectorScript,
    #[serde(default)]
    pub cloud: Option<DetectorScript>,
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
}

impl SceneConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scene {}", path.display()))?;
        let scene: SceneConfig = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing scene {}", path.display()))?;
        Ok(scene)
    }

    /// Built-in scene: a wall 1.5 m in front of a camera that walks toward
    /// it while tilting down; two objects on the wall.
    pub fn demo() -> Self {
        let frames = (0..90)
            .map(|i| {
                let t = i as f64 / 90.0;
                FrameScript {
                    position: Vector3::new(0.0, 0.0, -0.8 * t),
                    roll_deg: -15.0 * t,
                    image_ready: i % 3 != 1,
                    ..FrameScript::default()
                }
            })
            .collect();

        Self {
            view: ViewConfig {
                width: 1080.0,
                height: 1920.0,
                focal_px: 1400.0,
            },
            image: ImageSize {
                width: 640,
                height: 480,
            },
            display_rotation_deg: 90,
            planes: vec![
                PlaneConfig {
                    normal: Vector3::new(0.0, 0.0, 1.0),
                    offset: -1.5,
                },
                PlaneConfig {
                    normal: Vector3::new(0.0, 1.0, 0.0),
                    offset: -1.2,
                },
            ],
            frames,
            scan_at_frames: vec![5, 40],
            on_device: DetectorScript {
                name: "on-device".to_string(),
                detections: vec![
                    DetectionScript {
                        label: "cup".to_string(),
                        x: 320.0,
                        y: 240.0,
                    },
                    DetectionScript {
                        label: "plant".to_string(),
                        x: 200.0,
                        y: 400.0,
                    },
                ],
                delay_ms: 50,
                default_model: true,
            },
            cloud: None,
            coordinator: CoordinatorConfig::default(),
        }
    }
}
