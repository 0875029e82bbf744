pub mod anchors;
pub mod coordinator;
pub mod detection;
pub mod geometry;
pub mod sim;
pub mod system;
pub mod tracking;
pub mod viz;
