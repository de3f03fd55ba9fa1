//! Stem direction and geometry (§4.7).
//!
//! Grounded on the teacher's `layout::stems`, which computed direction from
//! a pixel Y position against a hardcoded per-clef middle-line Y and a
//! single hardcoded `STEM_LENGTH`/`NOTEHEAD_WIDTH`/`STEM_THICKNESS` set.
//! Generalized to work from a note's diatonic staff position directly
//! (avoiding a round trip through pixels) and to read its lengths from
//! [`crate::layout::config::StemConfiguration`] rather than constants, so
//! callers can retune stem weight per house style.

use crate::domain::NoteId;
use crate::layout::config::StemConfiguration;
use crate::layout::geometry::{EngravedStem, StemDirection};

/// §4.7 direction rule: a note on or above the staff's centre line
/// (`staff_position >= 0`) takes a downward stem; below it, an upward
/// stem — the same "toward the middle" convention the teacher's pixel
/// comparison implemented, expressed directly in staff positions.
pub fn compute_stem_direction(staff_position: i32) -> StemDirection {
    if staff_position >= 0 {
        StemDirection::Down
    } else {
        StemDirection::Up
    }
}

/// Builds stem geometry attached to a notehead at `(notehead_x,
/// notehead_y)` in points. Up-stems attach at the notehead's right edge
/// and extend upward (decreasing y); down-stems attach at the left edge
/// and extend downward.
pub fn create_stem(
    notehead_x: f64,
    notehead_y: f64,
    direction: StemDirection,
    config: &StemConfiguration,
    points_per_staff_space: f64,
    source_note: Option<NoteId>,
) -> EngravedStem {
    let notehead_width_points = config.notehead_width * points_per_staff_space;
    let length_points = config.length * points_per_staff_space;
    let thickness_points = config.thickness * points_per_staff_space;

    let x = match direction {
        StemDirection::Up => notehead_x + notehead_width_points,
        StemDirection::Down => notehead_x - notehead_width_points,
    };
    let (y_start, y_end) = match direction {
        StemDirection::Up => (notehead_y, notehead_y - length_points),
        StemDirection::Down => (notehead_y, notehead_y + length_points),
    };

    EngravedStem {
        x,
        y_start,
        y_end,
        direction,
        thickness: thickness_points,
        source_note,
    }
}

/// Extends a beamed or ledger-adjacent stem to at least the configured
/// minimum length, preserving its attachment point and direction. Beamed
/// notes need longer stems to reach a beam sitting a fixed distance from
/// the staff; notes sitting on ledger lines need extra clearance so the
/// stem doesn't visually merge with the ledger lines it crosses.
pub fn enforce_minimum_length(stem: &mut EngravedStem, minimum_points: f64) {
    let current_length = (stem.y_end - stem.y_start).abs();
    if current_length >= minimum_points {
        return;
    }
    let extra = minimum_points - current_length;
    match stem.direction {
        StemDirection::Up => stem.y_end -= extra,
        StemDirection::Down => stem.y_end += extra,
    }
}
