//! §4.1 Units
//!
//! Three arithmetic value types with total orderings and closed, pure
//! conversions between them. Grounded on the teacher's `value_objects.rs`
//! newtype-over-`f64`-with-smart-constructor idiom, generalized from a
//! single MIDI-pitch domain into the three engraving scales this spec
//! needs (staff-spaces, tenths, points).

use serde::{Deserialize, Serialize};

/// Semantic engraving unit: distance measured in staff-spaces (the gap
/// between two adjacent staff lines).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct StaffSpaces(pub f64);

impl StaffSpaces {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Convert to points given the staff height in points.
    /// One staff-space = staff-height / 4.
    pub fn to_points(self, staff_height_points: f64) -> Points {
        Points(self.0 * (staff_height_points / 4.0))
    }
}

/// MusicXML's internal scale unit; 40 tenths = 1 staff-space by convention.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Tenths(pub f64);

impl Tenths {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// `tenths / tenths_per_staff_space` (MusicXML convention: 40).
    pub fn to_staff_spaces(self, tenths_per_staff_space: f64) -> StaffSpaces {
        StaffSpaces(self.0 / tenths_per_staff_space)
    }
}

/// Output unit: typographic points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Points(pub f64);

impl Points {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn to_staff_spaces(self, staff_height_points: f64) -> StaffSpaces {
        StaffSpaces(self.0 / (staff_height_points / 4.0))
    }
}

/// Carries the three scale anchors needed to convert between units for one
/// score: staff height in points, tenths-per-staff-space (fixed at 40 by
/// MusicXML convention), and millimetres-per-staff-space (from the score's
/// defaults, kept for completeness though not used by any conversion here).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingContext {
    pub staff_height_points: f64,
    pub tenths_per_staff_space: f64,
    pub millimeters_per_staff_space: f64,
}

impl ScalingContext {
    pub const DEFAULT_TENTHS_PER_STAFF_SPACE: f64 = 40.0;

    pub fn new(staff_height_points: f64, millimeters_per_staff_space: f64) -> Self {
        Self {
            staff_height_points,
            tenths_per_staff_space: Self::DEFAULT_TENTHS_PER_STAFF_SPACE,
            millimeters_per_staff_space,
        }
    }

    /// Points per staff-space: `staff_height / 4`.
    pub fn points_per_staff_space(&self) -> f64 {
        self.staff_height_points / 4.0
    }

    pub fn tenths_to_points(&self, tenths: Tenths) -> Points {
        tenths
            .to_staff_spaces(self.tenths_per_staff_space)
            .to_points(self.staff_height_points)
    }

    pub fn staff_spaces_to_points(&self, spaces: StaffSpaces) -> Points {
        spaces.to_points(self.staff_height_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenths_round_trip_to_staff_spaces() {
        let t = Tenths::new(40.0);
        let spaces = t.to_staff_spaces(40.0);
        assert!((spaces.0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn staff_spaces_round_trip_through_points() {
        let staff_height = 40.0;
        let spaces = StaffSpaces::new(2.5);
        let points = spaces.to_points(staff_height);
        let back = points.to_staff_spaces(staff_height);
        assert!((back.0 - spaces.0).abs() < 1e-9);
    }

    #[test]
    fn points_per_staff_space_is_quarter_of_staff_height() {
        let ctx = ScalingContext::new(40.0, 7.0);
        assert!((ctx.points_per_staff_space() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn tenths_to_points_uses_both_scale_anchors() {
        let ctx = ScalingContext::new(40.0, 7.0);
        // 40 tenths = 1 staff space = 10 points at staff_height=40.
        let p = ctx.tenths_to_points(Tenths::new(40.0));
        assert!((p.0 - 10.0).abs() < 1e-9);
    }
}
