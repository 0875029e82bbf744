//! Distance and rotation measurements between two poses.
//!
//! These feed the live text attached to every anchor: how far the anchor is
//! from the camera and how much the camera is turned relative to it.

use nalgebra::{Matrix3, Vector3};
use serde::Deserialize;

use super::SE3;

/// Unit used when turning a metric distance into label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Meters,
    #[default]
    Centimeters,
    Millimeters,
}

impl DistanceUnit {
    /// Multiplier from meters to this unit.
    pub fn scale(self) -> f64 {
        match self {
            DistanceUnit::Meters => 1.0,
            DistanceUnit::Centimeters => 100.0,
            DistanceUnit::Millimeters => 1000.0,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Centimeters => "cm",
            DistanceUnit::Millimeters => "mm",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "m" => Some(DistanceUnit::Meters),
            "cm" => Some(DistanceUnit::Centimeters),
            "mm" => Some(DistanceUnit::Millimeters),
            _ => None,
        }
    }
}

/// Euclidean distance between the translation parts of two poses, in meters.
pub fn distance(a: &SE3, b: &SE3) -> f64 {
    (a.translation - b.translation).norm()
}

/// Formats a metric distance in `unit` with two decimals, e.g. `"123.45 cm"`.
pub fn format_distance(distance_m: f64, unit: DistanceUnit) -> String {
    format!("{:.2} {}", distance_m * unit.scale(), unit.suffix())
}

/// Label text for a distance in centimeters: 1.2345 m becomes `"123.45 cm"`.
pub fn format_distance_label(distance_m: f64) -> String {
    format_distance(distance_m, DistanceUnit::Centimeters)
}

/// Reads back the trailing `"<value> <unit>"` pair of a label, in meters.
///
/// Returns `None` when the text does not end with a known unit preceded by
/// a number.
pub fn parse_distance_label(text: &str) -> Option<f64> {
    let mut tokens = text.split_whitespace().rev();
    let unit = DistanceUnit::from_suffix(tokens.next()?)?;
    let value: f64 = tokens.next()?.parse().ok()?;
    Some(value / unit.scale())
}

/// Orientation decomposition of a rotation matrix into three angles
/// (radians): `[azimuth, pitch, roll]`.
///
/// Component 1 is `asin(-r12)`, the tilt used for the label rotation.
pub fn orientation_angles(r: &Matrix3<f64>) -> Vector3<f64> {
    let azimuth = r[(1, 0)].atan2(r[(1, 1)]);
    let pitch = (-r[(1, 2)]).clamp(-1.0, 1.0).asin();
    let roll = (-r[(0, 2)]).atan2(r[(2, 2)]);
    Vector3::new(azimuth, pitch, roll)
}

/// Wraps an angle in degrees into `(-180, 180]`, truncated toward zero to
/// whole degrees.
pub fn normalize_rotation_degrees(degrees: f64) -> i32 {
    // 1e-9 away from zero keeps exact angles (asin round trips land just short).
    let whole = (degrees + 1e-9_f64.copysign(degrees)).trunc() as i64;
    let wrapped = whole.rem_euclid(360) as i32;
    if wrapped > 180 {
        wrapped - 360
    } else {
        wrapped
    }
}

/// Signed rotation of the camera relative to an object around the vertical
/// axis, in whole degrees within `(-180, 180]`.
///
/// Computed as camera angle minus object angle.
pub fn relative_rotation_degrees(object_pose: &SE3, camera_pose: &SE3) -> i32 {
    let object_angles = orientation_angles(&object_pose.rotation_matrix());
    let camera_angles = orientation_angles(&camera_pose.rotation_matrix());
    let relative = camera_angles - object_angles;
    normalize_rotation_degrees(relative[1].to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{UnitQuaternion, Vector3};

    fn pitched(deg: f64) -> SE3 {
        SE3::new(
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), deg.to_radians()),
            Vector3::zeros(),
        )
    }

    #[test]
    fn test_distance_between_translations() {
        let a = SE3::from_translation(1.0, 2.0, 3.0);
        let b = SE3::from_translation(4.0, 6.0, 3.0);
        assert_relative_eq!(distance(&a, &b), 5.0, epsilon = 1e-12);
        assert_relative_eq!(distance(&b, &a), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_ignores_rotation() {
        let mut a = pitched(45.0);
        a.translation = Vector3::new(0.0, 0.0, -0.5);
        let b = SE3::identity();
        assert_relative_eq!(distance(&a, &b), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_format_distance_label_exact() {
        assert_eq!(format_distance_label(1.2345), "123.45 cm");
        assert_eq!(format_distance_label(0.5), "50.00 cm");
        assert_eq!(format_distance_label(0.0), "0.00 cm");
    }

    #[test]
    fn test_format_distance_other_units() {
        assert_eq!(format_distance(0.25, DistanceUnit::Millimeters), "250.00 mm");
        assert_eq!(format_distance(2.5, DistanceUnit::Meters), "2.50 m");
    }

    #[test]
    fn test_parse_distance_label() {
        assert_relative_eq!(parse_distance_label("cup 50.00 cm").unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(parse_distance_label("250.00 mm").unwrap(), 0.25, epsilon = 1e-12);
        assert!(parse_distance_label("cup").is_none());
        assert!(parse_distance_label("cup 12 parsecs").is_none());
        assert!(parse_distance_label("cup cm").is_none());
    }

    #[test]
    fn test_normalize_wraps_above_180() {
        assert_eq!(normalize_rotation_degrees(190.0), -170);
        assert_eq!(normalize_rotation_degrees(180.0), 180);
        assert_eq!(normalize_rotation_degrees(-180.0), 180);
        assert_eq!(normalize_rotation_degrees(-179.0), -179);
        assert_eq!(normalize_rotation_degrees(360.0), 0);
        assert_eq!(normalize_rotation_degrees(-190.0), 170);
    }

    #[test]
    fn test_normalize_truncates_fractions() {
        assert_eq!(normalize_rotation_degrees(29.7), 29);
        assert_eq!(normalize_rotation_degrees(-29.7), -29);
        assert_eq!(normalize_rotation_degrees(0.6), 0);
        assert_eq!(normalize_rotation_degrees(-0.6), 0);
        assert_eq!(normalize_rotation_degrees(190.9), -170);
    }

    #[test]
    fn test_relative_rotation_fractional_angle_truncates() {
        let object = SE3::identity();
        assert_eq!(relative_rotation_degrees(&object, &pitched(29.7)), 29);
        assert_eq!(relative_rotation_degrees(&object, &pitched(-29.7)), -29);
        assert_eq!(relative_rotation_degrees(&object, &pitched(0.6)), 0);
    }

    #[test]
    fn test_relative_rotation_same_pose_is_zero() {
        let pose = pitched(20.0);
        assert_eq!(relative_rotation_degrees(&pose, &pose), 0);
    }

    #[test]
    fn test_relative_rotation_sign() {
        let object = SE3::identity();
        let camera = pitched(30.0);
        assert_eq!(relative_rotation_degrees(&object, &camera), 30);
        assert_eq!(relative_rotation_degrees(&camera, &object), -30);
    }

    #[test]
    fn test_orientation_angles_identity() {
        let angles = orientation_angles(&Matrix3::identity());
        assert_relative_eq!(angles, Vector3::zeros(), epsilon = 1e-12);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_format_roundtrip(meters in 0.0..1000.0_f64) {
                let text = format_distance_label(meters);
                let parsed = parse_distance_label(&text).unwrap();
                prop_assert!(
                    (parsed * 100.0 - meters * 100.0).abs() <= 0.01,
                    "{} -> {} -> {}", meters, text, parsed
                );
            }

            #[test]
            fn test_format_monotonic(a in 0.0..100.0_f64, b in 0.0..100.0_f64) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let lo_cm = parse_distance_label(&format_distance_label(lo)).unwrap();
                let hi_cm = parse_distance_label(&format_distance_label(hi)).unwrap();
                prop_assert!(lo_cm <= hi_cm);
            }

            #[test]
            fn test_normalized_range(degrees in -10_000.0..10_000.0_f64) {
                let d = normalize_rotation_degrees(degrees);
                prop_assert!(d > -180 && d <= 180, "{} -> {}", degrees, d);
            }

            #[test]
            fn test_relative_rotation_range(
                a in -3.0..3.0_f64, b in -1.5..1.5_f64, c in -3.0..3.0_f64,
                d in -3.0..3.0_f64, e in -1.5..1.5_f64, f in -3.0..3.0_f64,
            ) {
                let object = SE3::new(UnitQuaternion::from_euler_angles(a, b, c), Vector3::zeros());
                let camera = SE3::new(UnitQuaternion::from_euler_angles(d, e, f), Vector3::zeros());
                let deg = relative_rotation_degrees(&object, &camera);
                prop_assert!(deg > -180 && deg <= 180);
            }
        }
    }
}
