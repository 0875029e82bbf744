//! Asynchronous object detection.
//!
//! # Threading Model
//!
//! - The scan control arms the [`DetectionGate`] from the UI thread.
//! - The frame loop consumes the request and hands one [`DispatchRequest`]
//!   to the [`InferenceDispatcher`], which runs it on a background thread.
//! - The finished [`DetectionBatch`] lands in the [`PendingResultSlot`],
//!   which the frame loop drains on a later frame.
//!
//! At most one inference is in flight: the gate refuses new requests until
//! the frame loop has drained the previous batch.

pub mod detector;
pub mod dispatcher;
pub mod gate;
pub mod slot;

pub use detector::{Detection, DetectorSelection, ObjectDetector};
pub use dispatcher::{DispatchRequest, InferenceDispatcher};
pub use gate::{DetectionGate, GateState};
pub use slot::{DetectionBatch, PendingResultSlot};
