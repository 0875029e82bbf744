//! One-shot scan request gate.
//!
//! The scan control arms the gate from the UI thread. The frame loop
//! consumes the request once a camera image is available and starts a
//! single inference call. While that call is in flight new requests are
//! refused; the frame loop reopens the gate when it drains the result.

use std::sync::atomic::{AtomicBool, Ordering};

/// Observable state of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No scan pending, no inference running.
    Idle,
    /// Scan requested, waiting for a camera image.
    Armed,
    /// Inference running or its result not yet drained.
    InFlight,
}

#[derive(Debug, Default)]
pub struct DetectionGate {
    scan_requested: AtomicBool,
    in_flight: AtomicBool,
}

impl DetectionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the gate. Refused while an inference is in flight.
    pub fn request_scan(&self) -> bool {
        if self.in_flight.load(Ordering::SeqCst) {
            return false;
        }
        self.scan_requested.store(true, Ordering::SeqCst);
        true
    }

    pub fn is_armed(&self) -> bool {
        self.scan_requested.load(Ordering::SeqCst)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> GateState {
        if self.is_in_flight() {
            GateState::InFlight
        } else if self.is_armed() {
            GateState::Armed
        } else {
            GateState::Idle
        }
    }

    /// Armed -> InFlight. Returns false if the gate was not armed.
    pub(crate) fn begin_dispatch(&self) -> bool {
        if self
            .scan_requested
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        self.in_flight.store(true, Ordering::SeqCst);
        true
    }

    /// Armed -> Idle without dispatching.
    pub(crate) fn disarm(&self) {
        self.scan_requested.store(false, Ordering::SeqCst);
    }

    /// InFlight -> Idle, once the result has been drained.
    pub(crate) fn finish_inference(&self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}
