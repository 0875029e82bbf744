//! Interface to the AR tracking subsystem.
//!
//! Pose estimation, scene reconstruction and hit testing live outside this
//! crate. This module defines what the frame loop needs from them:
//! - per-frame camera pose and tracking state
//! - image-pixel to view coordinate conversion and hit testing
//! - non-blocking access to the camera image
//! - persistent anchors whose pose keeps being refined

pub mod session;
pub mod snapshot;
pub mod state;

pub use session::{SessionError, TrackingSession};
pub use snapshot::{AnchorHandle, CameraImage, FrameSnapshot, HitResult, TrackableId, TrackedPose};
pub use state::TrackingState;
