//! Literal end-to-end scenarios: one measure of plain quarter notes, and a
//! chord whose accidentals must stack into separate columns rather than
//! collide.

mod common;

use musicore_layout::domain::{
    Attributes, Clef, ClefChange, DurationKind, KeySignature, Measure, MeasureElement, MeasureId,
    Note, NoteId, Part, PartId, PitchKind, Score, Step, TimeSignature,
};
use musicore_layout::layout::geometry::EngravedElement;
use musicore_layout::{layout_score, LayoutConfiguration};

/// A single 4/4 measure of four quarter notes, divisions=4 (one quarter
/// note is exactly one division tick).
#[test]
fn single_measure_of_four_quarters_lands_on_one_system_with_stems_and_no_flags() {
    let part = common::part_with_measures("Horn", 1, 4);
    let score = Score::new(vec![part]);
    let config = LayoutConfiguration::letter_size();

    let output = layout_score(&score, &config);
    assert_eq!(output.pages.len(), 1);
    assert_eq!(output.pages[0].systems.len(), 1);
    assert_eq!(output.pages[0].systems[0].measures.len(), 1);

    let elements: Vec<&EngravedElement> = output.pages[0].systems[0]
        .staff_groups
        .iter()
        .flat_map(|g| &g.staves)
        .flat_map(|st| &st.elements)
        .collect();

    let clefs = elements.iter().filter(|e| matches!(e, EngravedElement::Clef(_))).count();
    assert_eq!(clefs, 1);

    let time_signatures = elements
        .iter()
        .filter(|e| matches!(e, EngravedElement::TimeSignature(_)))
        .count();
    assert_eq!(time_signatures, 1);

    let noteheads = elements
        .iter()
        .filter(|e| matches!(e, EngravedElement::Notehead(_)))
        .count();
    assert_eq!(noteheads, 4);

    // Quarter notes are unbeamed but still stemmed; only durations shorter
    // than a quarter carry a flag.
    let stems = elements.iter().filter(|e| matches!(e, EngravedElement::Stem(_))).count();
    assert_eq!(stems, 4);

    let flags = elements.iter().filter(|e| matches!(e, EngravedElement::Flag(_))).count();
    assert_eq!(flags, 0);
}

fn note_at(step: Step, octave: i8, is_chord_tone: bool) -> Note {
    let mut note = Note::new(
        NoteId::new(),
        PitchKind::Pitched {
            step,
            alter: 1,
            octave,
        },
        4,
        DurationKind::Quarter,
        1,
        1,
    );
    note.is_chord_tone = is_chord_tone;
    note
}

/// Three notes a step apart, all sharped and all sounding for the first
/// time in the measure, so every one of them needs its own accidental —
/// close enough in staff position that they can't share a column.
fn close_sharped_chord_measure() -> Measure {
    let mut measure = Measure::new(MeasureId::new(), 1);
    measure.elements.push(MeasureElement::Attributes(Attributes {
        divisions: Some(4),
        key: Some(KeySignature::new(0).unwrap()),
        time: Some(TimeSignature::common_time()),
        clefs: vec![ClefChange {
            staff: 1,
            clef: Clef::Treble,
        }],
        staves: Some(1),
    }));
    measure.elements.push(MeasureElement::Note(note_at(Step::C, 5, false)));
    measure.elements.push(MeasureElement::Note(note_at(Step::D, 5, true)));
    measure.elements.push(MeasureElement::Note(note_at(Step::E, 5, true)));
    measure
}

#[test]
fn chord_accidentals_within_a_column_width_stack_instead_of_colliding() {
    let mut part = Part::new(PartId::new(), "Clarinet", 1);
    part.measures.push(close_sharped_chord_measure());
    let score = Score::new(vec![part]);
    let config = LayoutConfiguration::letter_size();

    let output = layout_score(&score, &config);
    let accidentals: Vec<f64> = output.pages[0].systems[0]
        .staff_groups
        .iter()
        .flat_map(|g| &g.staves)
        .flat_map(|st| &st.elements)
        .filter_map(|e| match e {
            EngravedElement::Accidental(glyph) => Some(glyph.position.x),
            _ => None,
        })
        .collect();

    // All three notes are first sightings of their (step, octave) pair
    // sharped against a C-major key, so all three need an accidental.
    assert_eq!(accidentals.len(), 3);

    // Had they not been stacked, every accidental would sit at the same x
    // (the chord's shared notehead column minus one fixed gap). Stacking
    // must have pushed at least one of them further left.
    let distinct: std::collections::BTreeSet<i64> =
        accidentals.iter().map(|x| (x * 1000.0).round() as i64).collect();
    assert!(distinct.len() > 1);
}
