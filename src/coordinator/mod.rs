//! Per-frame orchestration.

pub mod frame_coordinator;
pub mod result;

pub use frame_coordinator::FrameCoordinator;
pub use result::{CoordinatorStats, FrameReport};
