//! Collision detection and resolution primitives (§4.6): bounding-box
//! tests, minimum-axis displacement, a spatial hash grid accelerator, and
//! the placement algorithms for stacked accidentals, articulations/
//! dynamics, and curve (tie/slur) clearance.
//!
//! Bounding-box intersection and minimum-axis displacement live on
//! [`crate::layout::geometry::Rect`] itself, grounded on the teacher's
//! `layout::types::BoundingBox::{contains, intersects}`. Everything else
//! here is new — the teacher never resolved collisions past detecting
//! them.

use std::collections::HashMap;

use crate::domain::Placement;
use crate::layout::geometry::{CurveSegment, Point, Rect, StemDirection};

/// Minimum vertical gap, in staff-spaces, two stacked accidentals must
/// keep between their staff positions before they're considered clear of
/// each other.
pub const MINIMUM_ACCIDENTAL_GAP: i32 = 4;

/// Assigns each accidental in a chord to a column (0 = closest to the
/// notehead, increasing columns stepping further left), such that no two
/// accidentals sharing a column sit within [`MINIMUM_ACCIDENTAL_GAP`] staff
/// positions of each other. Processes from the highest pitch down, which
/// is the order a chord's accidentals are conventionally read.
pub fn stack_accidental_columns(staff_positions: &[i32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..staff_positions.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(staff_positions[i]));

    let mut columns: Vec<Vec<i32>> = Vec::new();
    let mut result = vec![0usize; staff_positions.len()];

    for i in order {
        let pos = staff_positions[i];
        let slot = columns
            .iter()
            .position(|col| col.iter().all(|&p| (p - pos).abs() >= MINIMUM_ACCIDENTAL_GAP));
        match slot {
            Some(c) => {
                columns[c].push(pos);
                result[i] = c;
            }
            None => {
                columns.push(vec![pos]);
                result[i] = columns.len() - 1;
            }
        }
    }
    result
}

/// Places the next stacked element (articulation mark, dynamic) beyond a
/// running clearance frontier, returning its position and the frontier's
/// new value. Above-placed marks grow the frontier upward (decreasing y);
/// below-placed marks grow it downward.
pub fn place_next_stacked(
    frontier: f64,
    item_height: f64,
    gap: f64,
    placement: Placement,
) -> (f64, f64) {
    match placement {
        Placement::Above => {
            let position = frontier - gap - item_height;
            (position, position)
        }
        Placement::Below => {
            let position = frontier + gap;
            (position, position + item_height)
        }
    }
}

/// Stem extension (§4.6): the lengthening a stem rectangle needs, in the
/// direction it already points, to clear every obstacle it currently
/// overlaps. An up-stem clears by growing upward (shrinking its top past
/// the obstacle's top); a down-stem grows downward. Returns the largest
/// lengthening any single hit demands, 0.0 if the stem already clears.
pub fn stem_clearance_extension(stem: Rect, obstacles: &[Rect], direction: StemDirection) -> f64 {
    obstacles
        .iter()
        .filter(|o| stem.intersects(o))
        .map(|o| match direction {
            StemDirection::Up => (stem.top() - o.top()).max(0.0),
            StemDirection::Down => (o.bottom() - stem.bottom()).max(0.0),
        })
        .fold(0.0, f64::max)
}

/// Beam shift (§4.6): the same search as [`stem_clearance_extension`], but
/// for a beam segment that needs to move away from an inner notehead it
/// collides with rather than a stem that needs to lengthen.
pub fn beam_shift(beam: Rect, obstacles: &[Rect], direction: StemDirection) -> f64 {
    stem_clearance_extension(beam, obstacles, direction)
}

/// Whether a curve (tie or slur) clears a set of obstacle bounding boxes by
/// at least `clearance`, approximating the curve's bulge by its control
/// polygon's bounding box rather than sampling the Bezier itself — cheap,
/// and conservative in the direction that matters (it never reports a
/// false clear).
pub fn curve_clears(curve: &CurveSegment, obstacles: &[Rect], clearance: f64) -> bool {
    let xs = [
        curve.start.x,
        curve.control1.x,
        curve.control2.x,
        curve.end.x,
    ];
    let ys = [
        curve.start.y,
        curve.control1.y,
        curve.control2.y,
        curve.end.y,
    ];
    let envelope = Rect::new(
        xs.iter().cloned().fold(f64::INFINITY, f64::min) - clearance,
        ys.iter().cloned().fold(f64::INFINITY, f64::min) - clearance,
        xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - xs.iter().cloned().fold(f64::INFINITY, f64::min)
            + 2.0 * clearance,
        ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - ys.iter().cloned().fold(f64::INFINITY, f64::min)
            + 2.0 * clearance,
    );
    !obstacles.iter().any(|o| envelope.intersects(o))
}

/// Bumps a curve's control points further from the chord (in the
/// direction implied by its existing bulge) until it clears every
/// obstacle or a bounded number of attempts is exhausted, whichever comes
/// first. Returning `false` after exhausting attempts means the caller
/// should record a [`crate::error::WarningCategory::CollisionResolution`]
/// warning rather than loop forever.
pub fn resolve_curve_clearance(
    curve: &mut CurveSegment,
    obstacles: &[Rect],
    clearance: f64,
    step: f64,
    max_attempts: u32,
) -> bool {
    let direction = if curve.control1.y <= curve.start.y {
        -1.0
    } else {
        1.0
    };
    for _ in 0..max_attempts {
        if curve_clears(curve, obstacles, clearance) {
            return true;
        }
        curve.control1.y += direction * step;
        curve.control2.y += direction * step;
    }
    curve_clears(curve, obstacles, clearance)
}

/// Uniform-grid spatial index accelerating broad-phase collision queries
/// over a large glyph set, so the resolver need not compare every pair.
/// Each inserted item is keyed by every cell its bounding box touches.
#[derive(Debug, Clone, Default)]
pub struct SpatialHashGrid {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialHashGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
        }
    }

    fn cell_of(&self, p: Point) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }

    pub fn insert(&mut self, index: usize, rect: Rect) {
        let min_cell = self.cell_of(Point::new(rect.left(), rect.top()));
        let max_cell = self.cell_of(Point::new(rect.right(), rect.bottom()));
        for cx in min_cell.0..=max_cell.0 {
            for cy in min_cell.1..=max_cell.1 {
                self.cells.entry((cx, cy)).or_default().push(index);
            }
        }
    }

    /// Indices of every item whose bounding box shares a cell with
    /// `rect` — a candidate set the caller still narrows with an exact
    /// [`Rect::intersects`] check.
    pub fn query_candidates(&self, rect: Rect) -> Vec<usize> {
        let min_cell = self.cell_of(Point::new(rect.left(), rect.top()));
        let max_cell = self.cell_of(Point::new(rect.right(), rect.bottom()));
        let mut found = Vec::new();
        for cx in min_cell.0..=max_cell.0 {
            for cy in min_cell.1..=max_cell.1 {
                if let Some(indices) = self.cells.get(&(cx, cy)) {
                    found.extend(indices.iter().copied());
                }
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_accidentals_go_to_different_columns() {
        let columns = stack_accidental_columns(&[0, 1, 2]);
        assert_ne!(columns[0], columns[1]);
    }

    #[test]
    fn far_apart_accidentals_share_a_column() {
        let columns = stack_accidental_columns(&[0, 20]);
        assert_eq!(columns[0], columns[1]);
    }

    #[test]
    fn stacked_marks_grow_the_frontier_outward() {
        let (first, frontier1) = place_next_stacked(0.0, 2.0, 1.0, Placement::Below);
        assert_eq!(first, 1.0);
        let (second, _) = place_next_stacked(frontier1, 2.0, 1.0, Placement::Below);
        assert!(second > first);
    }

    #[test]
    fn stem_lengthens_only_enough_to_clear_an_obstacle() {
        let stem = Rect::new(0.0, 10.0, 2.0, 20.0); // y: 10..30, pointing down
        let obstacle = Rect::new(0.0, 25.0, 2.0, 10.0); // y: 25..35, overlaps the stem's tail
        let extension = stem_clearance_extension(stem, &[obstacle], StemDirection::Down);
        assert!((extension - 5.0).abs() < 1e-9);
    }

    #[test]
    fn stem_needs_no_extension_when_already_clear() {
        let stem = Rect::new(0.0, 10.0, 2.0, 20.0);
        let obstacle = Rect::new(0.0, 100.0, 2.0, 10.0);
        let extension = stem_clearance_extension(stem, &[obstacle], StemDirection::Down);
        assert_eq!(extension, 0.0);
    }

    #[test]
    fn spatial_hash_finds_overlapping_neighbor() {
        let mut grid = SpatialHashGrid::new(10.0);
        grid.insert(0, Rect::new(0.0, 0.0, 5.0, 5.0));
        grid.insert(1, Rect::new(100.0, 100.0, 5.0, 5.0));
        let candidates = grid.query_candidates(Rect::new(1.0, 1.0, 2.0, 2.0));
        assert!(candidates.contains(&0));
        assert!(!candidates.contains(&1));
    }
}
