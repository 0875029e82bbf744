//! User-facing controls: scan button, backend switch, reset button.
//!
//! `ScanControls` is cheap to clone and safe to use from the UI thread.
//! It only flips flags; the frame loop acts on them on its next frame.

use std::sync::Arc;

use tracing::info;

use crate::detection::GateState;

use super::shared_state::SharedState;

#[derive(Clone)]
pub struct ScanControls {
    shared: Arc<SharedState>,
}

impl ScanControls {
    pub fn new(shared: Arc<SharedState>) -> Self {
        Self { shared }
    }

    /// Arm the detection gate. Returns false while an inference is in flight.
    pub fn request_scan(&self) -> bool {
        let accepted = self.shared.gate.request_scan();
        if accepted {
            info!("Scan requested");
        } else {
            info!("Scan request ignored: inference still in flight");
        }
        accepted
    }

    /// Choose the backend for the next scan. Returns false when cloud is
    /// requested but not configured.
    pub fn set_use_cloud(&self, use_cloud: bool) -> bool {
        self.shared.set_use_cloud(use_cloud)
    }

    /// Clear all anchors on the next frame.
    pub fn request_reset(&self) {
        self.shared.request_reset();
    }

    pub fn gate_state(&self) -> GateState {
        self.shared.gate.state()
    }

    /// Scanning indicator: a scan is armed or its inference is running.
    pub fn scan_active(&self) -> bool {
        self.gate_state() != GateState::Idle
    }

    /// Reset button enablement.
    pub fn has_anchors(&self) -> bool {
        !self.shared.anchors.is_empty()
    }

    pub fn anchor_count(&self) -> usize {
        self.shared.anchors.len()
    }

    /// Whether the cloud switch should be enabled at all.
    pub fn cloud_configured(&self) -> bool {
        self.shared.cloud_configured()
    }

    pub fn is_using_cloud(&self) -> bool {
        self.shared.is_using_cloud()
    }
}
