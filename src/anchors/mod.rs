//! Persistent spatial anchors with live labels.

pub mod label;
pub mod store;

pub use label::AnchorLabel;
pub use store::{AnchorStore, LabeledAnchor};
