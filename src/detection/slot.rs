//! Single-slot inbox for inference results.
//!
//! Background inference threads publish here; the frame loop drains it once
//! per frame. The slot holds at most one batch. Publishing into a full slot
//! replaces the unconsumed batch, so only the newest result survives and
//! older ones are dropped (counted in [`PendingResultSlot::overwritten`]).

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::warn;

use super::detector::Detection;

/// Result of one inference call.
#[derive(Debug, Clone)]
pub struct DetectionBatch {
    /// Generation current when the call was dispatched.
    pub generation: u64,
    /// Name of the backend that produced the batch.
    pub backend: String,
    /// Backend ran its generic bundled model.
    pub default_model: bool,
    pub detections: Vec<Detection>,
    /// Backend failed; `detections` is empty.
    pub failed: bool,
}

pub struct PendingResultSlot {
    tx: Sender<DetectionBatch>,
    rx: Receiver<DetectionBatch>,
    overwritten: AtomicU64,
}

impl PendingResultSlot {
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self {
            tx,
            rx,
            overwritten: AtomicU64::new(0),
        }
    }

    /// Store `batch`, replacing any batch not yet taken.
    pub fn publish(&self, batch: DetectionBatch) {
        let mut batch = batch;
        loop {
            match self.tx.try_send(batch) {
                Ok(()) => return,
                Err(TrySendError::Full(rejected)) => {
                    if let Ok(stale) = self.rx.try_recv() {
                        self.overwritten.fetch_add(1, Ordering::Relaxed);
                        warn!(
                            "Dropping undrained result from {} ({} detections)",
                            stale.backend,
                            stale.detections.len()
                        );
                    }
                    batch = rejected;
                }
                // Both ends live in `self`.
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }

    /// Take the pending batch, if any.
    pub fn take(&self) -> Option<DetectionBatch> {
        self.rx.try_recv().ok()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Number of batches replaced before they were drained.
    pub fn overwritten(&self) -> u64 {
        self.overwritten.load(Ordering::Relaxed)
    }
}

impl Default for PendingResultSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn batch(label: &str) -> DetectionBatch {
        DetectionBatch {
            generation: 0,
            backend: "test".to_string(),
            default_model: false,
            detections: vec![Detection::new(label, 1.0, 2.0)],
            failed: false,
        }
    }

    #[test]
    fn test_empty_slot() {
        let slot = PendingResultSlot::new();
        assert!(slot.is_empty());
        assert!(slot.take().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let slot = PendingResultSlot::new();
        slot.publish(batch("a"));
        slot.publish(batch("b"));

        let drained = slot.take().unwrap();
        assert_eq!(drained.detections[0].label, "b");
        assert!(slot.take().is_none());
        assert_eq!(slot.overwritten(), 1);
    }

    #[test]
    fn test_take_clears() {
        let slot = PendingResultSlot::new();
        slot.publish(batch("a"));
        assert!(slot.take().is_some());
        assert!(slot.is_empty());
        assert_eq!(slot.overwritten(), 0);
    }

    #[test]
    fn test_publish_from_background_thread() {
        let slot = Arc::new(PendingResultSlot::new());
        let producer = Arc::clone(&slot);
        thread::spawn(move || producer.publish(batch("bg")))
            .join()
            .unwrap();

        assert_eq!(slot.take().unwrap().detections[0].label, "bg");
    }
}
