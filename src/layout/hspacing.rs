//! Horizontal note spacing (§4.2).
//!
//! Grounded on the teacher's `layout::spacer` (`SpacingConfig` with a
//! `Default` impl, `compute_note_spacing`, `compute_measure_width`), but
//! replacing its linear `base + (duration/960)*factor` formula with the
//! logarithmic one this spec calls for:
//! `width = quarter_note_spacing · (1 + spacing_factor · log2(quarter_notes))`.
//! Columns are spaced by time-to-next-onset rather than a note's own
//! printed duration, which is what keeps a measure's visual rhythm
//! proportional when voices interleave.

use std::collections::BTreeMap;

use crate::domain::{Measure, MeasureElement};
use crate::layout::config::SpacingConfiguration;

/// Minimum width, in staff-spaces, any single spacing column is allowed to
/// shrink to — prevents the logarithmic term from collapsing very short
/// note-to-note gaps to zero or negative width.
const MINIMUM_COLUMN_WIDTH: f64 = 0.6;

/// Width, in staff-spaces, a gap of `duration_ticks` (at the measure's
/// current `divisions`) should occupy before justification.
pub fn duration_spacing(duration_ticks: u32, divisions: u32, config: &SpacingConfiguration) -> f64 {
    if divisions == 0 || duration_ticks == 0 {
        return MINIMUM_COLUMN_WIDTH;
    }
    let quarter_notes = duration_ticks as f64 / divisions as f64;
    let width =
        config.quarter_note_spacing * (1.0 + config.spacing_factor * quarter_notes.log2());
    width.max(MINIMUM_COLUMN_WIDTH)
}

/// One onset column within a measure: the earliest tick at which any voice
/// attacks a note, and the tick of the next distinct onset (or the
/// measure's end, for the last column).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteColumn {
    pub tick: u32,
    pub gap_to_next: u32,
}

/// Walks a measure's element stream, tracking each voice's running tick via
/// `Forward`/`Backup`, and collects the distinct onset ticks any voice
/// attacks a note at (rests included — a rest still reserves space).
fn collect_onset_ticks(measure: &Measure) -> BTreeMap<u32, ()> {
    let mut onsets = BTreeMap::new();
    let mut tick: u32 = 0;
    for element in &measure.elements {
        match element {
            MeasureElement::Note(note) => {
                onsets.insert(tick, ());
                if !note.is_chord_tone {
                    tick += note.duration_ticks;
                }
            }
            MeasureElement::Forward(delta) => tick += delta,
            MeasureElement::Backup(delta) => tick = tick.saturating_sub(*delta),
            _ => {}
        }
    }
    onsets
}

/// Onset columns across a measure's full element stream, each carrying the
/// tick gap to the next column (or to `measure_duration_ticks` for the
/// last one).
pub fn extract_columns(measure: &Measure, measure_duration_ticks: u32) -> Vec<NoteColumn> {
    let onsets = collect_onset_ticks(measure);
    let ticks: Vec<u32> = onsets.keys().copied().collect();
    ticks
        .iter()
        .enumerate()
        .map(|(i, &tick)| {
            let next = ticks.get(i + 1).copied().unwrap_or(measure_duration_ticks);
            NoteColumn {
                tick,
                gap_to_next: next.saturating_sub(tick).max(1),
            }
        })
        .collect()
}

/// Total duration, in ticks, implied by a measure's time signature and
/// divisions: `numerator · divisions · 4 / denominator`.
pub fn measure_duration_ticks(divisions: u32, numerator: u8, denominator: u8) -> u32 {
    if denominator == 0 {
        return 0;
    }
    ((numerator as u64 * divisions as u64 * 4) / denominator as u64) as u32
}

/// Natural (unjustified) width of a measure, in staff-spaces: the sum of
/// every column's spacing.
pub fn natural_measure_width(
    measure: &Measure,
    divisions: u32,
    measure_duration_ticks: u32,
    config: &SpacingConfiguration,
) -> f64 {
    let columns = extract_columns(measure, measure_duration_ticks);
    if columns.is_empty() {
        return config.minimum_measure_width;
    }
    let total: f64 = columns
        .iter()
        .map(|c| duration_spacing(c.gap_to_next, divisions, config))
        .sum();
    total.max(config.minimum_measure_width)
}

/// Justified onset positions (in staff-spaces, relative to the measure's
/// left edge) for every column, scaling the natural spacing to fill
/// `target_width` exactly. Used once the breaker (§4.3) has assigned each
/// measure its final width within a system.
pub fn justify_columns(
    measure: &Measure,
    divisions: u32,
    measure_duration_ticks: u32,
    target_width: f64,
    config: &SpacingConfiguration,
) -> BTreeMap<u32, f64> {
    let columns = extract_columns(measure, measure_duration_ticks);
    if columns.is_empty() {
        return BTreeMap::new();
    }
    let natural = natural_measure_width(measure, divisions, measure_duration_ticks, config);
    let scale = if natural > 0.0 {
        target_width / natural
    } else {
        1.0
    };

    let mut positions = BTreeMap::new();
    let mut x = 0.0;
    for column in &columns {
        positions.insert(column.tick, x);
        x += duration_spacing(column.gap_to_next, divisions, config) * scale;
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DurationKind, MeasureId, Note, NoteId, PitchKind, Step};

    fn quarter_note(tick_voice: u8) -> MeasureElement {
        MeasureElement::Note(Note::new(
            NoteId::new(),
            PitchKind::Pitched {
                step: Step::C,
                alter: 0,
                octave: 4,
            },
            960,
            DurationKind::Quarter,
            tick_voice,
            1,
        ))
    }

    #[test]
    fn wider_duration_gets_wider_spacing() {
        let config = SpacingConfiguration::default();
        let quarter = duration_spacing(960, 960, &config);
        let half = duration_spacing(1920, 960, &config);
        assert!(half > quarter);
    }

    #[test]
    fn four_quarters_produce_four_columns() {
        let mut measure = Measure::new(MeasureId::new(), 1);
        for _ in 0..4 {
            measure.elements.push(quarter_note(1));
        }
        let columns = extract_columns(&measure, measure_duration_ticks(960, 4, 4));
        assert_eq!(columns.len(), 4);
        assert_eq!(columns[0].tick, 0);
        assert_eq!(columns[3].tick, 2880);
    }

    #[test]
    fn justified_width_matches_target() {
        let config = SpacingConfiguration::default();
        let mut measure = Measure::new(MeasureId::new(), 1);
        for _ in 0..4 {
            measure.elements.push(quarter_note(1));
        }
        let duration = measure_duration_ticks(960, 4, 4);
        let positions = justify_columns(&measure, 960, duration, 40.0, &config);
        assert_eq!(positions.len(), 4);
        assert!((positions[&0] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn empty_measure_uses_minimum_width() {
        let measure = Measure::new(MeasureId::new(), 1);
        let config = SpacingConfiguration::default();
        let width = natural_measure_width(&measure, 960, 0, &config);
        assert_eq!(width, config.minimum_measure_width);
    }
}
