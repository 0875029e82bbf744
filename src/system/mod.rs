//! Configuration, cross-thread state and user-facing controls.
//!
//! This module contains the state shared between the frame loop, the UI
//! thread and background inference threads, along with the notifications
//! the frame loop reports back to the UI.

pub mod config;
pub mod controls;
pub mod messages;
pub mod shared_state;

pub use config::CoordinatorConfig;
pub use controls::ScanControls;
pub use messages::Notification;
pub use shared_state::SharedState;
