//! Vertical spacing (§4.4): nominal staff stacking within a system, system
//! stacking within a page, and inter-staff collision resolution by
//! minimum-clearance shifting.
//!
//! Grounded on the teacher's `breaker::create_system`, which computes a
//! system's `y_position` as `index * (height + spacing)` — the same
//! stacking idiom generalized here to staves within a system and widened
//! with a clearance-resolution pass the teacher's flat layout never
//! needed (it had no notion of per-staff content extent).

use crate::layout::config::StaffConfiguration;

/// Nominal (pre-clearance) Y offset of each staff within a system, stacked
/// top to bottom.
pub fn stack_staff_offsets(staff_count: usize, config: &StaffConfiguration) -> Vec<f64> {
    (0..staff_count)
        .map(|i| i as f64 * (config.staff_height_points + config.inter_staff_spacing))
        .collect()
}

/// Total height a system of `staff_count` staves occupies before any
/// clearance adjustment.
pub fn nominal_system_height(staff_count: usize, config: &StaffConfiguration) -> f64 {
    if staff_count == 0 {
        return 0.0;
    }
    staff_count as f64 * config.staff_height_points
        + (staff_count as f64 - 1).max(0.0) * config.inter_staff_spacing
}

/// Y offset of each system within a page, stacked top to bottom by its own
/// height plus inter-system spacing.
pub fn stack_system_offsets(system_heights: &[f64], config: &StaffConfiguration) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(system_heights.len());
    let mut y = 0.0;
    for &height in system_heights {
        offsets.push(y);
        y += height + config.inter_system_spacing;
    }
    offsets
}

/// Distributes one page's systems top to bottom within `content_height`,
/// spacing them by at least `system_distance` and, when slack remains,
/// equalizing the gap to `max(available / (count - 1), system_distance)`
/// (§4.4.3).
pub fn distribute_systems_on_page(
    system_heights: &[f64],
    content_height: f64,
    system_distance: f64,
) -> Vec<f64> {
    if system_heights.is_empty() {
        return Vec::new();
    }
    let count = system_heights.len();
    let total_height: f64 = system_heights.iter().sum();
    let gap = if count > 1 {
        let available = (content_height - total_height).max(0.0);
        (available / (count - 1) as f64).max(system_distance)
    } else {
        system_distance
    };
    let mut offsets = Vec::with_capacity(count);
    let mut y = 0.0;
    for &height in system_heights {
        offsets.push(y);
        y += height + gap;
    }
    offsets
}

/// Pushes staves apart when engraved content reaches further than the
/// nominal gap allows: `extents_below[i]` is how far staff `i`'s lowest
/// content (ledger lines, stems, lyrics) reaches below its own nominal
/// baseline; `extents_above[i]` is how far staff `i`'s highest content
/// reaches above it. Where the remaining gap between consecutive staves
/// would be under `min_clearance`, every staff from that point down is
/// shifted by the shortfall — a cascading push, since opening a gap
/// higher up must not silently reintroduce a collision further down.
pub fn resolve_vertical_clearances(
    offsets: &mut [f64],
    extents_below: &[f64],
    extents_above: &[f64],
    min_clearance: f64,
) {
    for i in 1..offsets.len() {
        let previous_bottom = offsets[i - 1] + extents_below[i - 1];
        let this_top = offsets[i] - extents_above[i];
        let gap = this_top - previous_bottom;
        if gap < min_clearance {
            let shift = min_clearance - gap;
            for offset in offsets.iter_mut().skip(i) {
                *offset += shift;
            }
        }
    }
}
