//! Geometry utilities: SE3 transforms, distance and rotation measurements.

pub mod measure;
pub mod se3;

pub use measure::{
    DistanceUnit, distance, format_distance, format_distance_label, normalize_rotation_degrees,
    orientation_angles, parse_distance_label, relative_rotation_degrees,
};
pub use se3::SE3;
