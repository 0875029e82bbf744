//! Structured anchor label.
//!
//! The label shown next to an anchor combines a fixed part (what the
//! detector called the object) with two live readings recomputed every
//! frame. Keeping the parts separate means the text is formatted at draw
//! time and never has to be parsed back.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorLabel {
    base_text: String,
    rotation_degrees: Option<i32>,
    distance_text: String,
}

impl AnchorLabel {
    /// Label at creation time: rotation is not known yet.
    pub fn new(base_text: impl Into<String>, distance_text: impl Into<String>) -> Self {
        Self {
            base_text: base_text.into(),
            rotation_degrees: None,
            distance_text: distance_text.into(),
        }
    }

    pub fn base_text(&self) -> &str {
        &self.base_text
    }

    pub fn rotation_degrees(&self) -> Option<i32> {
        self.rotation_degrees
    }

    pub fn distance_text(&self) -> &str {
        &self.distance_text
    }

    /// Replace the live readings.
    pub fn update(&mut self, rotation_degrees: i32, distance_text: impl Into<String>) {
        self.rotation_degrees = Some(rotation_degrees);
        self.distance_text = distance_text.into();
    }
}

/// `"<base> <rotation>° <distance>"`, or `"<base> <distance>"` before the
/// first update.
impl fmt::Display for AnchorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_text)?;
        if let Some(rotation) = self.rotation_degrees {
            write!(f, " {}°", rotation)?;
        }
        if !self.distance_text.is_empty() {
            write!(f, " {}", self.distance_text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_label() {
        let label = AnchorLabel::new("cup", "50.00 cm");
        assert_eq!(label.to_string(), "cup 50.00 cm");
        assert_eq!(label.rotation_degrees(), None);
    }

    #[test]
    fn test_updated_label_replaces_distance() {
        let mut label = AnchorLabel::new("cup", "50.00 cm");
        label.update(-12, "48.20 cm");
        assert_eq!(label.to_string(), "cup -12° 48.20 cm");

        label.update(3, "47.00 cm");
        assert_eq!(label.to_string(), "cup 3° 47.00 cm");
        assert_eq!(label.base_text(), "cup");
        assert_eq!(label.distance_text(), "47.00 cm");
    }

    #[test]
    fn test_base_text_with_digits_is_kept() {
        let mut label = AnchorLabel::new("bottle 2 cm", "10.00 cm");
        label.update(0, "9.00 cm");
        assert_eq!(label.to_string(), "bottle 2 cm 0° 9.00 cm");
    }

    #[test]
    fn test_empty_distance() {
        let label = AnchorLabel::new("chair", "");
        assert_eq!(label.to_string(), "chair");
    }
}
