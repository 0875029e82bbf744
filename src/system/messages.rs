//! User-facing notifications produced by the frame loop.
//!
//! None of these are fatal. The UI shows them as dismissible messages.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// The tracking subsystem could not produce a frame.
    CameraUnavailable { reason: String },

    /// No cloud backend; detection stays on-device.
    CloudNotConfigured,

    /// A drained batch contained no detections.
    NoResults { default_model: bool },

    /// Some detections could not be attached to the scene.
    AnchorsMissing { detected: usize, anchored: usize },

    /// No camera image became available while a scan was armed.
    ScanTimedOut { attempts: u32 },

    /// An anchor is closer than the configured threshold.
    TooClose {
        label: String,
        distance_m: f64,
        threshold_m: f64,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::CameraUnavailable { reason } => {
                write!(f, "Camera not available ({}). Try restarting the app.", reason)
            }
            Notification::CloudNotConfigured => f.write_str(
                "Cloud detection isn't configured. The cloud switch will be disabled.",
            ),
            Notification::NoResults { default_model: true } => f.write_str(
                "Default classification model returned no results. \
                 Configure a custom model for better classification performance.",
            ),
            Notification::NoResults { default_model: false } => {
                f.write_str("Classification model returned no results.")
            }
            Notification::AnchorsMissing { detected, anchored } => write!(
                f,
                "{} of {} objects were classified but could not be attached to an anchor. \
                 Try moving your device around to obtain a better understanding of the environment.",
                detected - anchored,
                detected
            ),
            Notification::ScanTimedOut { attempts } => write!(
                f,
                "No camera image after {} frames. Scan cancelled, please try again.",
                attempts
            ),
            Notification::TooClose {
                label,
                distance_m,
                threshold_m,
            } => write!(
                f,
                "{} is {:.2} cm away, less than {:.0} cm",
                label,
                distance_m * 100.0,
                threshold_m * 100.0
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_results_messages_differ_by_model() {
        let default_model = Notification::NoResults { default_model: true }.to_string();
        let custom = Notification::NoResults { default_model: false }.to_string();
        assert!(default_model.starts_with("Default"));
        assert_eq!(custom, "Classification model returned no results.");
    }

    #[test]
    fn test_anchors_missing_counts() {
        let text = Notification::AnchorsMissing { detected: 3, anchored: 1 }.to_string();
        assert!(text.starts_with("2 of 3 objects"));
    }
}
