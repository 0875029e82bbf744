//! Detector that returns a fixed list of detections.

use std::thread;
use std::time::Duration;

use anyhow::{Result, bail};

use crate::detection::{Detection, ObjectDetector};
use crate::tracking::CameraImage;

use super::scene::DetectorScript;

pub struct FixedDetector {
    name: String,
    detections: Vec<Detection>,
    delay: Duration,
    default_model: bool,
    fail: bool,
}

impl FixedDetector {
    pub fn new(name: impl Into<String>, detections: Vec<Detection>) -> Self {
        Self {
            name: name.into(),
            detections,
            delay: Duration::ZERO,
            default_model: false,
            fail: false,
        }
    }

    pub fn from_script(script: &DetectorScript) -> Self {
        let detections = script
            .detections
            .iter()
            .map(|d| Detection::new(d.label.clone(), d.x, d.y))
            .collect();
        Self::new(script.name.clone(), detections)
            .with_delay(Duration::from_millis(script.delay_ms))
            .with_default_model(script.default_model)
    }

    /// Simulated inference latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_default_model(mut self, default_model: bool) -> Self {
        self.default_model = default_model;
        self
    }

    /// Make every call fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl ObjectDetector for FixedDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn analyze(&self, image: &CameraImage, _rotation_degrees: i32) -> Result<Vec<Detection>> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.fail {
            bail!("{} could not process {}x{} image", self.name, image.width, image.height);
        }
        Ok(self.detections.clone())
    }

    fn uses_default_model(&self) -> bool {
        self.default_model
    }
}
