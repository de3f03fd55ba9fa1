//! Beam tracking and geometry (§4.7).
//!
//! Grounded on the teacher's `layout::beams`: the `Begin`/`Continue`/`End`
//! state machine (`build_beam_groups_from_musicxml`), the beat-boundary
//! grouping for simple/compound/asymmetric meters (`compute_beat_boundaries`,
//! `group_beamable_by_time_signature`), the majority-rule stem direction
//! (`compute_group_stem_direction`), and the slope-clamped beam line
//! (`compute_beam_slope`). Per this spec's scope, only the primary beam is
//! given geometry — the teacher's multi-level hook/sub-beam rendering
//! (`create_multi_level_beams`, `create_level_beam`, `create_beam_hook`) is
//! not reproduced; secondary beam levels are carried as reserved data on
//! [`crate::layout::geometry::EngravedBeamGroup`] instead.

use crate::domain::{Attributes, BeamEntryKind, MeasureElement, NoteId, TimeSignature};
use crate::layout::config::{BeamConfiguration, StemConfiguration};
use crate::layout::geometry::{BeamSegment, EngravedBeamGroup, Point, StemDirection};

/// One beamable note as the beamer sees it: enough geometry to compute a
/// slope, without needing the full [`crate::domain::Note`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamPoint {
    pub note_id: NoteId,
    pub tick: u32,
    pub x: f64,
    pub notehead_y: f64,
    pub direction: StemDirection,
}

/// Tick offsets, from the start of a measure, marking beat boundaries —
/// the natural grouping unit auto-beaming respects so a group never spans
/// a beat it shouldn't.
pub fn compute_beat_boundaries(time: TimeSignature, divisions: u32) -> Vec<u32> {
    let quarter = divisions;
    if time.is_compound() {
        // 6/8, 9/8, 12/8: each beat is a dotted quarter (three eighths).
        let beat_ticks = (quarter * 3) / 2;
        let beat_count = time.numerator / 3;
        (0..beat_count).map(|b| b as u32 * beat_ticks).collect()
    } else if time.denominator == 8 && !matches!(time.numerator, 2 | 4 | 8) {
        // Asymmetric meters (5/8, 7/8, ...): conventionally grouped in
        // runs of two and three eighths, longest groups first.
        let eighth = quarter / 2;
        let mut boundaries = vec![0u32];
        let mut remaining = time.numerator;
        let mut tick = 0u32;
        while remaining > 0 {
            let group = if remaining % 3 == 0 || remaining < 2 { 3 } else { 2 };
            let group = group.min(remaining);
            tick += eighth * group as u32;
            remaining -= group;
            if remaining > 0 {
                boundaries.push(tick);
            }
        }
        boundaries
    } else {
        let beat_ticks = quarter * 4 / time.denominator as u32;
        (0..time.numerator).map(|b| b as u32 * beat_ticks).collect()
    }
}

fn beat_index_for_tick(tick: u32, boundaries: &[u32]) -> usize {
    boundaries.iter().rposition(|&b| b <= tick).unwrap_or(0)
}

/// Groups beamable notes (those whose visual duration is an eighth note or
/// shorter) that fall within the same beat, per the time signature's beat
/// boundaries. Only groups of two or more notes are returned — a single
/// eighth alone in a beat keeps its flag. Operates on tick position alone,
/// since grouping membership doesn't depend on engraved geometry; callers
/// compute beam geometry afterward with [`create_beam`] once each note's
/// stem position is known.
pub fn auto_group_by_time_signature(
    entries: &[(NoteId, u32)],
    beamable: &[bool],
    time: TimeSignature,
    divisions: u32,
) -> Vec<Vec<NoteId>> {
    let boundaries = compute_beat_boundaries(time, divisions);
    let mut groups: Vec<Vec<NoteId>> = Vec::new();
    let mut current: Vec<NoteId> = Vec::new();
    let mut current_beat = usize::MAX;

    for (i, &(note_id, tick)) in entries.iter().enumerate() {
        if !beamable[i] {
            if current.len() > 1 {
                groups.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            current_beat = usize::MAX;
            continue;
        }
        let beat = beat_index_for_tick(tick, &boundaries);
        if beat != current_beat && !current.is_empty() {
            if current.len() > 1 {
                groups.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
        current_beat = beat;
        current.push(note_id);
    }
    if current.len() > 1 {
        groups.push(current);
    }
    groups
}

/// Reconstructs beam groups from a measure's explicit `Begin`/`Continue`/
/// `End` beam entries (level 1 only — secondary levels don't change
/// grouping, only geometry detail this engine doesn't render).
pub fn explicit_groups_from_measure(elements: &[MeasureElement]) -> Vec<Vec<NoteId>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();

    for element in elements {
        if let MeasureElement::Note(note) = element {
            let primary = note.beams.iter().find(|b| b.level == 1);
            match primary.map(|b| b.kind) {
                Some(BeamEntryKind::Begin) => {
                    current = vec![note.id];
                }
                Some(BeamEntryKind::Continue) => {
                    current.push(note.id);
                }
                Some(BeamEntryKind::End) => {
                    current.push(note.id);
                    if current.len() > 1 {
                        groups.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
                _ => {
                    if !current.is_empty() {
                        current.clear();
                    }
                }
            }
        }
    }
    groups
}

/// Whether a measure carries any explicit beam data at all — if not, the
/// director falls back to [`auto_group_by_time_signature`].
pub fn has_explicit_beam_data(elements: &[MeasureElement]) -> bool {
    elements
        .iter()
        .any(|e| matches!(e, MeasureElement::Note(n) if n.beams.iter().any(|b| b.level == 1)))
}

/// Majority-rule stem direction for a beam group: the direction most of
/// its notes would take individually, Up on a tie.
pub fn group_stem_direction(points: &[BeamPoint]) -> StemDirection {
    let up = points
        .iter()
        .filter(|p| p.direction == StemDirection::Up)
        .count();
    let down = points.len() - up;
    if down > up {
        StemDirection::Down
    } else {
        StemDirection::Up
    }
}

fn clamp_slope(slope: f64, max_slope: f64) -> f64 {
    slope.clamp(-max_slope, max_slope)
}

/// The result of beaming one group: the rendered primary beam plus each
/// note's stem tip shifted to reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamResult {
    pub group: EngravedBeamGroup,
    pub stem_ends: Vec<(NoteId, f64)>,
}

/// Builds a beam's geometry for a group of notes sharing one direction:
/// the natural slope between the first and last note's un-beamed stem
/// tips, clamped to `config.max_slope`, then every note's stem is
/// "shifted to reach" that clamped line rather than only the two
/// endpoints getting beam contact.
pub fn create_beam(
    points: &[BeamPoint],
    direction: StemDirection,
    stem_config: &StemConfiguration,
    beam_config: &BeamConfiguration,
    points_per_staff_space: f64,
) -> Option<BeamResult> {
    if points.len() < 2 {
        return None;
    }
    let stem_reach = stem_config.minimum_beamed_length * points_per_staff_space;
    let base_y = |p: &BeamPoint| match direction {
        StemDirection::Up => p.notehead_y - stem_reach,
        StemDirection::Down => p.notehead_y + stem_reach,
    };

    let first = points.first().unwrap();
    let last = points.last().unwrap();
    let dx = last.x - first.x;
    let natural_slope = if dx.abs() > f64::EPSILON {
        (base_y(last) - base_y(first)) / dx
    } else {
        0.0
    };
    let slope = clamp_slope(natural_slope, beam_config.max_slope);
    let anchor_y = base_y(first);
    let y_at = |x: f64| anchor_y + slope * (x - first.x);

    let stem_ends = points
        .iter()
        .map(|p| (p.note_id, y_at(p.x)))
        .collect::<Vec<_>>();

    let group = EngravedBeamGroup {
        note_ids: points.iter().map(|p| p.note_id).collect(),
        primary_beam: BeamSegment {
            start: Point::new(first.x, y_at(first.x)),
            end: Point::new(last.x, y_at(last.x)),
            thickness: beam_config.thickness * points_per_staff_space,
        },
        reserved_secondary_levels: Vec::new(),
    };

    Some(BeamResult { group, stem_ends })
}

/// Every distinct beam level an explicitly-beamed note set reserves beyond
/// the primary, so a future renderer can add sub-beams without the notes
/// needing to be re-grouped.
pub fn reserved_secondary_levels(elements: &[MeasureElement], group: &[NoteId]) -> Vec<u8> {
    let mut levels: Vec<u8> = elements
        .iter()
        .filter_map(|e| match e {
            MeasureElement::Note(n) if group.contains(&n.id) => {
                Some(n.beams.iter().filter(|b| b.level > 1).map(|b| b.level))
            }
            _ => None,
        })
        .flatten()
        .collect();
    levels.sort_unstable();
    levels.dedup();
    levels
}

/// Attributes-derived time signature a measure should auto-beam against,
/// defaulting to common time when none is known yet (§4.8 carry-forward
/// applies before this is ever called in practice).
pub fn effective_time_signature(attributes: &Attributes) -> TimeSignature {
    attributes.time.unwrap_or_else(TimeSignature::common_time)
}
