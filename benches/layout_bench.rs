//! Criterion benchmarks for layout computation time at various score
//! sizes, grounded on the teacher's `layout_bench`, rebuilt against the
//! current [`musicore_layout::domain::Score`] shape instead of loading
//! fixture JSON the teacher's flat format used.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use musicore_layout::domain::{
    Attributes, Clef, ClefChange, DurationKind, KeySignature, Measure, MeasureElement, MeasureId,
    Note, NoteId, Part, PartId, PitchKind, Score, Step, TimeSignature,
};
use musicore_layout::{layout_score, LayoutConfiguration};

fn measure(number: u32, with_attributes: bool) -> Measure {
    let mut measure = Measure::new(MeasureId::new(), number);
    if with_attributes {
        measure.elements.push(MeasureElement::Attributes(Attributes {
            divisions: Some(960),
            key: Some(KeySignature::new(2).unwrap()),
            time: Some(TimeSignature::common_time()),
            clefs: vec![ClefChange {
                staff: 1,
                clef: Clef::Treble,
            }],
            staves: Some(1),
        }));
    }
    for step in [Step::C, Step::D, Step::E, Step::F] {
        measure.elements.push(MeasureElement::Note(Note::new(
            NoteId::new(),
            PitchKind::Pitched {
                step,
                alter: 0,
                octave: 4,
            },
            960,
            DurationKind::Quarter,
            1,
            1,
        )));
    }
    measure
}

fn piano_score(measure_count: u32) -> Score {
    let mut part = Part::new(PartId::new(), "Piano", 1);
    for m in 1..=measure_count {
        part.measures.push(measure(m, m == 1));
    }
    Score::new(vec![part])
}

fn bench_layout_50_measures(c: &mut Criterion) {
    let score = piano_score(50);
    let config = LayoutConfiguration::default();
    c.bench_function("layout_50_measures", |b| {
        b.iter(|| layout_score(black_box(&score), black_box(&config)));
    });
}

fn bench_layout_100_measures(c: &mut Criterion) {
    let score = piano_score(100);
    let config = LayoutConfiguration::default();
    c.bench_function("layout_100_measures", |b| {
        b.iter(|| layout_score(black_box(&score), black_box(&config)));
    });
}

fn bench_layout_200_measures(c: &mut Criterion) {
    let score = piano_score(200);
    let config = LayoutConfiguration::default();
    c.bench_function("layout_200_measures", |b| {
        b.iter(|| layout_score(black_box(&score), black_box(&config)));
    });
}

criterion_group!(
    benches,
    bench_layout_50_measures,
    bench_layout_100_measures,
    bench_layout_200_measures
);
criterion_main!(benches);
