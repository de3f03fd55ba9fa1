//! End-to-end layout tests: a full score through `layout_score`, asserting
//! on the shape of the engraved output rather than reimplementing any one
//! module's logic.

mod common;

use musicore_layout::domain::Score;
use musicore_layout::layout::geometry::EngravedElement;
use musicore_layout::{layout_score, LayoutConfiguration};

#[test]
fn single_part_score_produces_notehead_and_stem_elements() {
    let part = common::part_with_measures("Violin", 6, 4);
    let score = Score::new(vec![part]);
    let config = LayoutConfiguration::letter_size();

    let output = layout_score(&score, &config);
    assert_eq!(output.pages.len(), 1);

    let total_measures: usize = output.pages[0]
        .systems
        .iter()
        .map(|s| s.measures.len())
        .sum();
    assert_eq!(total_measures, 6);

    let noteheads = output.pages[0]
        .systems
        .iter()
        .flat_map(|s| &s.staff_groups)
        .flat_map(|g| &g.staves)
        .flat_map(|st| &st.elements)
        .filter(|e| matches!(e, EngravedElement::Notehead(_)))
        .count();
    assert_eq!(noteheads, 24);
}

#[test]
fn many_measures_break_into_more_than_one_system() {
    let part = common::part_with_measures("Piano", 60, 4);
    let score = Score::new(vec![part]);
    let config = LayoutConfiguration::letter_size();

    let output = layout_score(&score, &config);
    assert!(output.pages[0].systems.len() > 1);
}

#[test]
fn credits_appear_only_on_page_one() {
    let part = common::part_with_measures("Solo", 2, 4);
    let mut score = Score::new(vec![part]);
    score.credits.title = Some("Nocturne".to_string());
    score.credits.composer = Some("Chopin".to_string());
    let config = LayoutConfiguration::letter_size();

    let output = layout_score(&score, &config);
    assert_eq!(output.pages[0].credits.len(), 2);
    assert!(output.pages[0].credits.iter().any(|c| c.text == "Nocturne"));

    let without_credits_score = {
        let mut s = score.clone();
        s.credits.title = None;
        s.credits.composer = None;
        s
    };
    let without_credits = layout_score(&without_credits_score, &config);
    assert!(without_credits.pages[0].credits.is_empty());
}

#[test]
fn empty_score_produces_no_systems_and_no_warnings_about_missing_breaks() {
    let score = Score::new(vec![]);
    let config = LayoutConfiguration::letter_size();
    let output = layout_score(&score, &config);
    assert!(output.pages[0].systems.is_empty());
    assert!(output.warnings.is_empty());
}
