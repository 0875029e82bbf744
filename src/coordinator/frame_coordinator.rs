//! Frame coordinator: runs once per rendered frame.
//!
//! Each frame:
//! 1. Apply a pending reset, then fetch pose and tracking state
//! 2. If a scan is armed, try to grab the camera image and dispatch inference
//! 3. Drain a finished inference result into new anchors via hit testing
//! 4. Refresh every tracked anchor's label and hand the batch to the renderer
//!
//! Nothing here blocks on inference and nothing here fails the frame loop;
//! problems surface as [`Notification`]s in the returned [`FrameReport`].

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::anchors::{AnchorLabel, LabeledAnchor};
use crate::detection::{
    Detection, DetectionBatch, DispatchRequest, InferenceDispatcher, PendingResultSlot,
};
use crate::geometry::{SE3, distance, format_distance, relative_rotation_degrees};
use crate::system::{CoordinatorConfig, Notification, ScanControls, SharedState};
use crate::tracking::{AnchorHandle, FrameSnapshot, TrackingSession};
use crate::viz::{LabelDraw, LabelRenderer};

use super::result::{CoordinatorStats, FrameReport};

pub struct FrameCoordinator {
    shared: Arc<SharedState>,
    dispatcher: InferenceDispatcher,
    config: CoordinatorConfig,

    /// Consecutive frames a scan has been armed without a camera image.
    acquire_attempts: u32,

    /// Anchors currently inside the proximity threshold.
    near_anchors: HashSet<AnchorHandle>,

    /// Delivered with the next report.
    pending_notifications: Vec<Notification>,

    frame_count: u64,
    stats: CoordinatorStats,
}

impl FrameCoordinator {
    pub fn new(shared: Arc<SharedState>, config: CoordinatorConfig) -> Self {
        let mut pending_notifications = Vec::new();
        if !shared.cloud_configured() {
            info!("Cloud detection not configured, using on-device backend");
            pending_notifications.push(Notification::CloudNotConfigured);
        }

        let slot = Arc::new(PendingResultSlot::new());
        Self {
            shared,
            dispatcher: InferenceDispatcher::new(slot),
            config,
            acquire_attempts: 0,
            near_anchors: HashSet::new(),
            pending_notifications,
            frame_count: 0,
            stats: CoordinatorStats::default(),
        }
    }

    /// Handle for the UI thread.
    pub fn controls(&self) -> ScanControls {
        ScanControls::new(Arc::clone(&self.shared))
    }

    pub fn shared_state(&self) -> &Arc<SharedState> {
        &self.shared
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn stats(&self) -> &CoordinatorStats {
        &self.stats
    }

    /// Batches replaced in the inbox before they were drained.
    pub fn results_overwritten(&self) -> u64 {
        self.dispatcher.slot().overwritten()
    }

    /// Process one rendered frame.
    pub fn process_frame<S, R>(&mut self, session: &mut S, renderer: &mut R) -> FrameReport
    where
        S: TrackingSession + ?Sized,
        R: LabelRenderer + ?Sized,
    {
        let t_start = Instant::now();
        self.frame_count += 1;
        self.stats.frames_processed += 1;

        let mut report = FrameReport {
            frame: self.frame_count,
            notifications: std::mem::take(&mut self.pending_notifications),
            ..FrameReport::default()
        };

        // Reset runs here so clearing never races the frame loop's appends.
        if self.shared.take_reset_request() {
            report.anchors_cleared = self.reset();
        }

        // Step 1: pose and tracking state
        let frame = match session.update() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Frame {}: tracking subsystem failed: {}", self.frame_count, e);
                self.stats.frames_failed += 1;
                report.notifications.push(Notification::CameraUnavailable {
                    reason: e.to_string(),
                });
                if self.shared.gate.is_armed() && !self.shared.gate.is_in_flight() {
                    self.count_missed_image(&mut report);
                }
                return self.finish(report, t_start);
            }
        };
        report.tracking_state = Some(frame.tracking_state);
        report.camera_pose = Some(frame.camera_pose.clone());

        if !frame.tracking_state.is_tracking() {
            debug!("Frame {}: tracking {}, skipping", self.frame_count, frame.tracking_state);
            self.stats.frames_skipped += 1;
            return self.finish(report, t_start);
        }

        // Step 2: consume an armed scan
        self.maybe_dispatch(session, &mut report);

        // Step 3: turn a finished result into anchors
        let pending = self.dispatcher.slot().take();
        if let Some(batch) = pending {
            self.drain_batch(batch, session, &frame, &mut report);
        }

        // Step 4: refresh labels and draw
        let projection = session.projection_matrix(self.config.near_plane, self.config.far_plane);
        let view_projection = projection * frame.view_matrix();
        let labels = self.refresh_labels(&*session, &frame.camera_pose, &mut report);
        report.labels_drawn = labels.len();
        renderer.draw_labels(&view_projection, &frame.camera_pose, &labels);

        self.finish(report, t_start)
    }

    /// Block until the running inference call, if any, has delivered its
    /// result. The result is still drained by the next frame.
    pub fn wait_for_inference(&mut self) {
        self.dispatcher.join();
    }

    /// Stop: wait for the in-flight inference call and log totals.
    pub fn shutdown(&mut self) {
        self.dispatcher.join();
        info!(
            "Frame loop stopped. Stats: frames={}, dispatches={}, drained={}, anchors={}, dropped={}",
            self.stats.frames_processed,
            self.stats.dispatches,
            self.stats.batches_drained,
            self.stats.anchors_created,
            self.stats.detections_dropped
        );
    }

    fn reset(&mut self) -> usize {
        let removed = self.shared.anchors.clear();
        self.near_anchors.clear();
        let generation = self.shared.bump_generation();
        self.stats.resets += 1;
        info!("Reset: cleared {} anchors (generation {})", removed, generation);
        removed
    }

    fn maybe_dispatch<S>(&mut self, session: &mut S, report: &mut FrameReport)
    where
        S: TrackingSession + ?Sized,
    {
        let gate = &self.shared.gate;
        // A request that slipped in while inference was running waits
        // until that result has been drained.
        if !gate.is_armed() || gate.is_in_flight() {
            return;
        }

        let Some(image) = session.try_acquire_camera_image() else {
            self.count_missed_image(report);
            return;
        };

        if !self.shared.gate.begin_dispatch() {
            return;
        }
        self.acquire_attempts = 0;

        let request = DispatchRequest {
            detector: self.shared.current_detector(),
            image,
            rotation_degrees: session.camera_sensor_to_display_rotation(),
            generation: self.shared.generation(),
        };
        self.dispatcher.dispatch(request);
        self.stats.dispatches += 1;
        report.dispatched = true;
    }

    /// An armed scan got no image this frame. Cancels the scan once the
    /// configured number of attempts is reached.
    fn count_missed_image(&mut self, report: &mut FrameReport) {
        self.acquire_attempts += 1;
        debug!("Camera image not yet available (attempt {})", self.acquire_attempts);
        let Some(max) = self.config.max_image_acquire_attempts else {
            return;
        };
        if self.acquire_attempts >= max {
            warn!("No camera image after {} frames, cancelling scan", self.acquire_attempts);
            self.shared.gate.disarm();
            report.notifications.push(Notification::ScanTimedOut {
                attempts: self.acquire_attempts,
            });
            self.stats.scans_timed_out += 1;
            self.acquire_attempts = 0;
        }
    }

    fn drain_batch<S>(
        &mut self,
        batch: DetectionBatch,
        session: &mut S,
        frame: &FrameSnapshot,
        report: &mut FrameReport,
    ) where
        S: TrackingSession + ?Sized,
    {
        self.shared.gate.finish_inference();
        self.stats.batches_drained += 1;
        report.drained = true;

        if self.config.discard_stale_results && batch.generation != self.shared.generation() {
            info!(
                "Discarding stale result from {} (generation {} != {})",
                batch.backend,
                batch.generation,
                self.shared.generation()
            );
            self.stats.batches_discarded += 1;
            report.discarded = true;
            return;
        }

        if batch.failed {
            warn!("{} failed, treating as no results", batch.backend);
            self.stats.backend_failures += 1;
        } else {
            info!("{} got objects: {:?}", batch.backend, batch.detections);
        }

        let mut created = Vec::with_capacity(batch.detections.len());
        for detection in &batch.detections {
            match place_anchor(session, detection) {
                Some((handle, pose)) => {
                    info!("Created anchor {} at {:?} from hit test", handle, pose.translation);
                    let distance_m = distance(&pose, &frame.camera_pose);
                    let label = AnchorLabel::new(
                        detection.label.clone(),
                        format_distance(distance_m, self.config.distance_unit),
                    );
                    created.push(LabeledAnchor::new(handle, label));
                }
                None => {
                    debug!("No hit for {} at {:?}", detection.label, detection.center);
                    self.stats.detections_dropped += 1;
                }
            }
        }

        let detected = batch.detections.len();
        let anchored = created.len();
        report.detections_received = detected;
        report.anchors_created = anchored;
        self.stats.anchors_created += anchored as u64;
        self.shared.anchors.extend(created);

        if detected == 0 {
            report.notifications.push(Notification::NoResults {
                default_model: batch.default_model,
            });
        } else if anchored != detected {
            report
                .notifications
                .push(Notification::AnchorsMissing { detected, anchored });
        }
    }

    fn refresh_labels<S>(
        &mut self,
        session: &S,
        camera_pose: &SE3,
        report: &mut FrameReport,
    ) -> Vec<LabelDraw>
    where
        S: TrackingSession + ?Sized,
    {
        let unit = self.config.distance_unit;
        let threshold = self.config.proximity_warning_m;
        let near_anchors = &mut self.near_anchors;
        let mut labels = Vec::new();

        self.shared.anchors.update_each(|anchor| {
            let Some(tracked) = session.anchor_pose(anchor.handle) else {
                return;
            };
            if !tracked.state.is_tracking() {
                return;
            }

            let distance_m = distance(&tracked.pose, camera_pose);
            let rotation = relative_rotation_degrees(&tracked.pose, camera_pose);
            anchor.label.update(rotation, format_distance(distance_m, unit));

            if let Some(threshold_m) = threshold {
                if distance_m < threshold_m {
                    if near_anchors.insert(anchor.handle) {
                        report.notifications.push(Notification::TooClose {
                            label: anchor.label.base_text().to_string(),
                            distance_m,
                            threshold_m,
                        });
                    }
                } else {
                    near_anchors.remove(&anchor.handle);
                }
            }

            labels.push(LabelDraw {
                anchor: anchor.handle,
                pose: tracked.pose,
                text: anchor.label.to_string(),
            });
        });

        labels
    }

    fn finish(&self, mut report: FrameReport, t_start: Instant) -> FrameReport {
        report.scan_active = self.shared.gate.is_armed() || self.shared.gate.is_in_flight();
        report.has_anchors = !self.shared.anchors.is_empty();
        report.total_ms = t_start.elapsed().as_secs_f64() * 1000.0;
        report
    }
}

/// Image pixel -> view -> hit test -> anchor.
fn place_anchor<S>(session: &mut S, detection: &Detection) -> Option<(AnchorHandle, SE3)>
where
    S: TrackingSession + ?Sized,
{
    let view = session.image_pixel_to_view(detection.center);
    let hit = session.hit_test(view)?;
    let handle = session.create_anchor(&hit)?;
    Some((handle, hit.hit_pose))
}

impl Drop for FrameCoordinator {
    fn drop(&mut self) {
        self.dispatcher.join();
    }
}
