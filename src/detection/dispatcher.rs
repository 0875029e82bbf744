//! Launches inference calls off the frame loop.
//!
//! Each dispatch runs on its own short-lived thread and publishes its result
//! into the [`PendingResultSlot`]. The frame loop never waits on it. Backend
//! errors and panics are turned into an empty batch flagged `failed`, so
//! nothing escapes the background thread.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{info, warn};

use crate::tracking::CameraImage;

use super::detector::{Detection, ObjectDetector};
use super::slot::{DetectionBatch, PendingResultSlot};

/// Everything a single inference call needs, captured at dispatch time.
pub struct DispatchRequest {
    pub detector: Arc<dyn ObjectDetector>,
    pub image: CameraImage,
    pub rotation_degrees: i32,
    pub generation: u64,
}

pub struct InferenceDispatcher {
    slot: Arc<PendingResultSlot>,
    worker: Option<JoinHandle<()>>,
    dispatched: u64,
}

impl InferenceDispatcher {
    pub fn new(slot: Arc<PendingResultSlot>) -> Self {
        Self {
            slot,
            worker: None,
            dispatched: 0,
        }
    }

    /// Start one inference call and return immediately.
    pub fn dispatch(&mut self, request: DispatchRequest) {
        self.dispatched += 1;
        let call_id = self.dispatched;
        let backend = request.detector.name().to_string();
        let default_model = request.detector.uses_default_model();
        let generation = request.generation;

        // A previous worker has already published by the time the gate
        // allows another dispatch; reap it so handles don't pile up.
        if let Some(done) = self.worker.take() {
            let _ = done.join();
        }

        let slot = Arc::clone(&self.slot);
        let spawned = thread::Builder::new()
            .name(format!("inference-{call_id}"))
            .spawn(move || {
                let batch = run_inference(call_id, request);
                slot.publish(batch);
            });

        match spawned {
            Ok(handle) => {
                info!("Dispatched inference #{} on {}", call_id, backend);
                self.worker = Some(handle);
            }
            Err(e) => {
                warn!("Failed to spawn inference thread: {}", e);
                self.slot.publish(DetectionBatch {
                    generation,
                    backend,
                    default_model,
                    detections: Vec::new(),
                    failed: true,
                });
            }
        }
    }

    /// Block until the running inference call, if any, has published.
    pub fn join(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("Inference thread terminated abnormally");
            }
        }
    }

    /// Total number of dispatches started.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn slot(&self) -> &Arc<PendingResultSlot> {
        &self.slot
    }
}

fn run_inference(call_id: u64, request: DispatchRequest) -> DetectionBatch {
    let DispatchRequest {
        detector,
        image,
        rotation_degrees,
        generation,
    } = request;

    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        detector.analyze(&image, rotation_degrees)
    }));
    // Release the camera image as soon as the backend is done with it.
    drop(image);

    let (detections, failed): (Vec<Detection>, bool) = match outcome {
        Ok(Ok(detections)) => (detections, false),
        Ok(Err(e)) => {
            warn!("Inference #{} on {} failed: {:#}", call_id, detector.name(), e);
            (Vec::new(), true)
        }
        Err(_) => {
            warn!("Inference #{} on {} panicked", call_id, detector.name());
            (Vec::new(), true)
        }
    };

    info!(
        "Inference #{} on {} returned {} detections in {:.1} ms",
        call_id,
        detector.name(),
        detections.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    DetectionBatch {
        generation,
        backend: detector.name().to_string(),
        default_model: detector.uses_default_model(),
        detections,
        failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};

    struct Fixed(Vec<Detection>);

    impl ObjectDetector for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn analyze(&self, _image: &CameraImage, _rotation_degrees: i32) -> Result<Vec<Detection>> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl ObjectDetector for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn analyze(&self, _image: &CameraImage, _rotation_degrees: i32) -> Result<Vec<Detection>> {
            bail!("backend unreachable")
        }
    }

    struct Panicking;

    impl ObjectDetector for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn analyze(&self, _image: &CameraImage, _rotation_degrees: i32) -> Result<Vec<Detection>> {
            panic!("model crashed")
        }
    }

    struct RotationEcho;

    impl ObjectDetector for RotationEcho {
        fn name(&self) -> &str {
            "echo"
        }

        fn analyze(&self, image: &CameraImage, rotation_degrees: i32) -> Result<Vec<Detection>> {
            Ok(vec![Detection::new(
                format!("{}x{}@{}", image.width, image.height, rotation_degrees),
                0.0,
                0.0,
            )])
        }
    }

    fn request(detector: Arc<dyn ObjectDetector>) -> DispatchRequest {
        DispatchRequest {
            detector,
            image: CameraImage::new(4, 2, 0, vec![0; 8]),
            rotation_degrees: 90,
            generation: 3,
        }
    }

    #[test]
    fn test_dispatch_publishes_result() {
        let slot = Arc::new(PendingResultSlot::new());
        let mut dispatcher = InferenceDispatcher::new(Arc::clone(&slot));

        dispatcher.dispatch(request(Arc::new(Fixed(vec![Detection::new("cup", 10.0, 20.0)]))));
        dispatcher.join();

        let batch = slot.take().unwrap();
        assert_eq!(batch.backend, "fixed");
        assert_eq!(batch.generation, 3);
        assert!(!batch.failed);
        assert_eq!(batch.detections, vec![Detection::new("cup", 10.0, 20.0)]);
        assert_eq!(dispatcher.dispatched(), 1);
    }

    #[test]
    fn test_backend_error_becomes_empty_batch() {
        let slot = Arc::new(PendingResultSlot::new());
        let mut dispatcher = InferenceDispatcher::new(Arc::clone(&slot));

        dispatcher.dispatch(request(Arc::new(Failing)));
        dispatcher.join();

        let batch = slot.take().unwrap();
        assert!(batch.failed);
        assert!(batch.detections.is_empty());
    }

    #[test]
    fn test_backend_panic_becomes_empty_batch() {
        let slot = Arc::new(PendingResultSlot::new());
        let mut dispatcher = InferenceDispatcher::new(Arc::clone(&slot));

        dispatcher.dispatch(request(Arc::new(Panicking)));
        dispatcher.join();

        let batch = slot.take().unwrap();
        assert!(batch.failed);
        assert!(batch.detections.is_empty());
    }

    #[test]
    fn test_image_and_rotation_reach_backend() {
        let slot = Arc::new(PendingResultSlot::new());
        let mut dispatcher = InferenceDispatcher::new(Arc::clone(&slot));

        dispatcher.dispatch(request(Arc::new(RotationEcho)));
        dispatcher.join();

        assert_eq!(slot.take().unwrap().detections[0].label, "4x2@90");
    }

    #[test]
    fn test_join_without_dispatch() {
        let mut dispatcher = InferenceDispatcher::new(Arc::new(PendingResultSlot::new()));
        dispatcher.join();
        assert_eq!(dispatcher.dispatched(), 0);
    }
}
