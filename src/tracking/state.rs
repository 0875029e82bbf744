//! Tracking state reported by the pose-estimation subsystem.

/// Whether the tracking subsystem currently has a valid, drift-corrected pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    /// Pose is valid and being updated.
    Tracking,
    /// Tracking temporarily lost; may resume.
    #[default]
    Paused,
    /// Tracking has stopped and will not resume.
    Stopped,
}

impl TrackingState {
    pub fn is_tracking(self) -> bool {
        self == TrackingState::Tracking
    }
}

impl std::fmt::Display for TrackingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TrackingState::Tracking => "TRACKING",
            TrackingState::Paused => "PAUSED",
            TrackingState::Stopped => "STOPPED",
        };
        f.write_str(name)
    }
}
