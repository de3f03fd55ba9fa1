//! Beam anchoring end to end: once a beam group is rendered, every member
//! note's stem must end exactly on the beam line at that stem's x, and
//! the beam's slope must stay within the configured maximum.

mod common;

use musicore_layout::domain::{
    Attributes, Clef, ClefChange, DurationKind, KeySignature, Measure, MeasureElement, MeasureId,
    Note, NoteId, Part, PartId, PitchKind, Score, Step, TimeSignature,
};
use musicore_layout::layout::geometry::EngravedElement;
use musicore_layout::{layout_score, LayoutConfiguration};

fn rising_eighths_measure() -> Measure {
    let mut measure = Measure::new(MeasureId::new(), 1);
    measure.elements.push(MeasureElement::Attributes(Attributes {
        divisions: Some(960),
        key: Some(KeySignature::new(0).unwrap()),
        time: Some(TimeSignature::common_time()),
        clefs: vec![ClefChange {
            staff: 1,
            clef: Clef::Treble,
        }],
        staves: Some(1),
    }));
    // A rising run within one beat so the natural slope is nonzero and
    // the clamp (if it engages) is exercised rather than trivially unused.
    for (step, octave) in [(Step::C, 4), (Step::D, 4), (Step::F, 4), (Step::B, 4)] {
        measure.elements.push(MeasureElement::Note(Note::new(
            NoteId::new(),
            PitchKind::Pitched {
                step,
                alter: 0,
                octave,
            },
            480,
            DurationKind::Eighth,
            1,
            1,
        )));
    }
    measure
}

#[test]
fn every_beamed_stem_ends_exactly_on_its_beam_line() {
    let mut part = Part::new(PartId::new(), "Oboe", 1);
    part.measures.push(rising_eighths_measure());
    let score = Score::new(vec![part]);
    let config = LayoutConfiguration::letter_size();

    let output = layout_score(&score, &config);
    let elements: Vec<&EngravedElement> = output.pages[0]
        .systems
        .iter()
        .flat_map(|s| &s.staff_groups)
        .flat_map(|g| &g.staves)
        .flat_map(|st| &st.elements)
        .collect();

    let beam_groups: Vec<_> = elements
        .iter()
        .filter_map(|e| match e {
            EngravedElement::BeamGroup(g) => Some(g),
            _ => None,
        })
        .collect();
    assert_eq!(beam_groups.len(), 1);
    let beam = beam_groups[0];

    let dx = beam.primary_beam.end.x - beam.primary_beam.start.x;
    assert!(dx.abs() > f64::EPSILON, "beam must span more than one x position");
    let slope = (beam.primary_beam.end.y - beam.primary_beam.start.y) / dx;
    assert!(slope.abs() <= config.beam.max_slope + 1e-9);

    for note_id in &beam.note_ids {
        let stem = elements
            .iter()
            .find_map(|e| match e {
                EngravedElement::Stem(s) if s.source_note == Some(*note_id) => Some(s),
                _ => None,
            })
            .expect("every beamed note has a rendered stem");

        let expected_y = beam.primary_beam.start.y + slope * (stem.x - beam.primary_beam.start.x);
        assert!(
            (stem.y_end - expected_y).abs() < 1e-6,
            "stem for {note_id:?} ends at {} but the beam line is at {expected_y} there",
            stem.y_end
        );
    }
}
