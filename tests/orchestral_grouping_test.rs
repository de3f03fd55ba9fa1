//! Orchestral grouping surfaces through the engraved tree end to end:
//! consecutive same-family parts bracket together, and a mixed ensemble
//! gets an outer bracket.

mod common;

use musicore_layout::domain::{InstrumentFamily, Score};
use musicore_layout::layout::geometry::BracketType;
use musicore_layout::{layout_score, LayoutConfiguration};

#[test]
fn two_woodwinds_and_a_brass_part_form_two_groups_with_outer_bracket() {
    let mut flute = common::part_with_measures("Flute", 2, 4);
    flute.family = InstrumentFamily::Woodwinds;
    let mut clarinet = common::part_with_measures("Clarinet", 2, 4);
    clarinet.family = InstrumentFamily::Woodwinds;
    let mut trumpet = common::part_with_measures("Trumpet", 2, 4);
    trumpet.family = InstrumentFamily::Brass;

    let score = Score::new(vec![flute, clarinet, trumpet]);
    let config = LayoutConfiguration::letter_size();
    let output = layout_score(&score, &config);

    let system = &output.pages[0].systems[0];
    assert!(system.outer_bracket);
    assert_eq!(system.staff_groups.len(), 2);
    assert_eq!(system.staff_groups[0].bracket, BracketType::Bracket);
    assert_eq!(system.staff_groups[1].bracket, BracketType::None);
}

#[test]
fn single_family_ensemble_has_no_outer_bracket() {
    let mut violin_one = common::part_with_measures("Violin I", 2, 4);
    violin_one.family = InstrumentFamily::Strings;
    let mut violin_two = common::part_with_measures("Violin II", 2, 4);
    violin_two.family = InstrumentFamily::Strings;

    let score = Score::new(vec![violin_one, violin_two]);
    let config = LayoutConfiguration::letter_size();
    let output = layout_score(&score, &config);

    assert!(!output.pages[0].systems[0].outer_bracket);
}
