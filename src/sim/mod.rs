//! Scripted stand-ins for the tracking subsystem and detection backends.
//!
//! Used by the demo binary and by tests to drive the frame loop without a
//! device.

pub mod detector;
pub mod scene;
pub mod session;

pub use detector::FixedDetector;
pub use scene::{FrameScript, SceneConfig};
pub use session::ScriptedSession;
