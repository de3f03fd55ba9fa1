//! Shared score-building helpers for the integration tests.

use musicore_layout::domain::{
    Attributes, Clef, ClefChange, DurationKind, KeySignature, Measure, MeasureElement, MeasureId,
    Note, NoteId, Part, PartId, PitchKind, Step, TimeSignature,
};

/// A measure of `count` quarter notes at middle-of-staff pitch, with an
/// `Attributes` element on the first measure establishing divisions/key/
/// time/clef.
pub fn quarter_measure(number: u32, count: u32, divisions: u32, with_attributes: bool) -> Measure {
    let mut measure = Measure::new(MeasureId::new(), number);
    if with_attributes {
        measure.elements.push(MeasureElement::Attributes(Attributes {
            divisions: Some(divisions),
            key: Some(KeySignature::new(0).unwrap()),
            time: Some(TimeSignature::common_time()),
            clefs: vec![ClefChange {
                staff: 1,
                clef: Clef::Treble,
            }],
            staves: Some(1),
        }));
    }
    for i in 0..count {
        let step = [Step::C, Step::D, Step::E, Step::F][i as usize % 4];
        measure.elements.push(MeasureElement::Note(Note::new(
            NoteId::new(),
            PitchKind::Pitched {
                step,
                alter: 0,
                octave: 4,
            },
            divisions,
            DurationKind::Quarter,
            1,
            1,
        )));
    }
    measure
}

pub fn part_with_measures(name: &str, measure_count: u32, notes_per_measure: u32) -> Part {
    let mut part = Part::new(PartId::new(), name, 1);
    for m in 1..=measure_count {
        part.measures
            .push(quarter_measure(m, notes_per_measure, 960, m == 1));
    }
    part
}
