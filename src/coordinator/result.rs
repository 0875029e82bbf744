//! Per-frame report and running statistics of the frame loop.

use crate::geometry::SE3;
use crate::system::Notification;
use crate::tracking::TrackingState;

/// What happened during one call to `process_frame`.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// 1-based frame counter.
    pub frame: u64,
    /// `None` when the tracking subsystem failed to produce a frame.
    pub tracking_state: Option<TrackingState>,
    pub camera_pose: Option<SE3>,
    /// Anchors cleared by a reset at the start of this frame.
    pub anchors_cleared: usize,
    /// An inference call was started.
    pub dispatched: bool,
    /// A result batch was drained.
    pub drained: bool,
    /// The drained batch was dropped as stale.
    pub discarded: bool,
    pub detections_received: usize,
    pub anchors_created: usize,
    pub labels_drawn: usize,
    /// A scan is armed or running (scanning indicator).
    pub scan_active: bool,
    /// The store holds anchors (reset control enabled).
    pub has_anchors: bool,
    pub notifications: Vec<Notification>,
    pub total_ms: f64,
}

impl FrameReport {
    pub fn count_notifications<F>(&self, pred: F) -> usize
    where
        F: Fn(&Notification) -> bool,
    {
        self.notifications.iter().filter(|n| pred(n)).count()
    }
}

/// Counters accumulated over the lifetime of a coordinator.
#[derive(Debug, Default, Clone)]
pub struct CoordinatorStats {
    pub frames_processed: u64,
    /// Frames the tracking subsystem failed to produce.
    pub frames_failed: u64,
    /// Frames skipped because tracking was not active.
    pub frames_skipped: u64,
    pub dispatches: u64,
    pub scans_timed_out: u64,
    pub batches_drained: u64,
    pub batches_discarded: u64,
    /// Drained batches whose backend call errored or panicked.
    pub backend_failures: u64,
    pub anchors_created: u64,
    /// Detections without a hit-test result.
    pub detections_dropped: u64,
    pub resets: u64,
}
