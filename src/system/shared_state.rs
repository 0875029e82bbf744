//! Flags and handles the UI thread and the frame loop both touch.
//!
//! The UI only arms the gate, picks a backend or asks for a reset; every
//! change to the anchors themselves happens on the frame loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::anchors::AnchorStore;
use crate::detection::{DetectionGate, DetectorSelection, ObjectDetector};

pub struct SharedState {
    /// Scan request gate. Armed by the UI, consumed by the frame loop.
    pub gate: DetectionGate,

    /// Anchors placed so far. Mutated only by the frame loop.
    pub anchors: AnchorStore,

    /// Backend used by the next dispatch.
    /// Protected by RwLock: UI writes, frame loop reads.
    detectors: RwLock<DetectorSelection>,

    /// Bumped on backend switch and reset; dispatches carry the value
    /// current at dispatch time.
    generation: AtomicU64,

    /// Reset requested by the UI, performed by the frame loop.
    reset_requested: AtomicBool,
}

impl SharedState {
    pub fn new(detectors: DetectorSelection) -> Arc<Self> {
        Arc::new(Self {
            gate: DetectionGate::new(),
            anchors: AnchorStore::new(),
            detectors: RwLock::new(detectors),
            generation: AtomicU64::new(0),
            reset_requested: AtomicBool::new(false),
        })
    }

    /// Backend the next dispatch will use.
    pub fn current_detector(&self) -> Arc<dyn ObjectDetector> {
        self.detectors.read().current()
    }

    pub fn cloud_configured(&self) -> bool {
        self.detectors.read().cloud_configured()
    }

    pub fn is_using_cloud(&self) -> bool {
        self.detectors.read().is_using_cloud()
    }

    /// Switch backend. Returns false if the switch was refused.
    pub fn set_use_cloud(&self, use_cloud: bool) -> bool {
        let mut detectors = self.detectors.write();
        let changed = detectors.is_using_cloud() != use_cloud;
        if !detectors.set_use_cloud(use_cloud) {
            return false;
        }
        if changed {
            self.bump_generation();
        }
        true
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn request_reset(&self) {
        self.reset_requested.store(true, Ordering::SeqCst);
    }

    /// Consume a pending reset request.
    pub fn take_reset_request(&self) -> bool {
        self.reset_requested.swap(false, Ordering::SeqCst)
    }
}
