//! Object-detection backends.
//!
//! A backend turns one camera image into labeled 2D detections. Two kinds
//! are wired up: an on-device model that is always available and a cloud
//! service that only exists when credentials are configured.

use std::sync::Arc;

use anyhow::Result;
use nalgebra::Point2;

use crate::tracking::CameraImage;

/// One labeled region found in a camera image.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub label: String,
    /// Center of the detected region, in image pixels.
    pub center: Point2<f64>,
}

impl Detection {
    pub fn new(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            label: label.into(),
            center: Point2::new(x, y),
        }
    }
}

/// Image to detections.
///
/// Called on a background thread, never on the frame loop.
pub trait ObjectDetector: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Detect objects in `image`, which must be rotated by `rotation_degrees`
    /// clockwise to appear upright on the display.
    fn analyze(&self, image: &CameraImage, rotation_degrees: i32) -> Result<Vec<Detection>>;

    /// True when the backend runs a generic bundled model rather than one
    /// configured for the application. Only affects user messaging.
    fn uses_default_model(&self) -> bool {
        false
    }
}

/// Which backend the next scan will use.
///
/// Switching only affects later dispatches; a call already running keeps
/// the backend it was started with.
pub struct DetectorSelection {
    on_device: Arc<dyn ObjectDetector>,
    cloud: Option<Arc<dyn ObjectDetector>>,
    use_cloud: bool,
}

impl DetectorSelection {
    /// Prefers the cloud backend when one is configured.
    pub fn new(on_device: Arc<dyn ObjectDetector>, cloud: Option<Arc<dyn ObjectDetector>>) -> Self {
        let use_cloud = cloud.is_some();
        Self {
            on_device,
            cloud,
            use_cloud,
        }
    }

    pub fn cloud_configured(&self) -> bool {
        self.cloud.is_some()
    }

    pub fn is_using_cloud(&self) -> bool {
        self.use_cloud
    }

    /// Select cloud or on-device. Returns false (and changes nothing) when
    /// cloud is requested but not configured.
    pub fn set_use_cloud(&mut self, use_cloud: bool) -> bool {
        if use_cloud && self.cloud.is_none() {
            return false;
        }
        self.use_cloud = use_cloud;
        true
    }

    pub fn current(&self) -> Arc<dyn ObjectDetector> {
        match (&self.cloud, self.use_cloud) {
            (Some(cloud), true) => Arc::clone(cloud),
            _ => Arc::clone(&self.on_device),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl ObjectDetector for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn analyze(&self, _image: &CameraImage, _rotation_degrees: i32) -> Result<Vec<Detection>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_selection_prefers_configured_cloud() {
        let selection = DetectorSelection::new(Arc::new(Named("local")), Some(Arc::new(Named("cloud"))));
        assert!(selection.is_using_cloud());
        assert_eq!(selection.current().name(), "cloud");
    }

    #[test]
    fn test_selection_without_cloud() {
        let mut selection = DetectorSelection::new(Arc::new(Named("local")), None);
        assert!(!selection.cloud_configured());
        assert!(!selection.set_use_cloud(true));
        assert_eq!(selection.current().name(), "local");
    }

    #[test]
    fn test_selection_toggle() {
        let mut selection = DetectorSelection::new(Arc::new(Named("local")), Some(Arc::new(Named("cloud"))));
        assert!(selection.set_use_cloud(false));
        assert_eq!(selection.current().name(), "local");
        assert!(selection.set_use_cloud(true));
        assert_eq!(selection.current().name(), "cloud");
    }

    #[test]
    fn test_default_model_flag_defaults_false() {
        assert!(!Named("local").uses_default_model());
    }
}
