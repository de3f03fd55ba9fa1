//! The director (§4.8): the top-level pipeline wiring every other layout
//! module together — attribute carry-forward, horizontal spacing, system
//! breaking, orchestral grouping, vertical stacking, per-staff engraving,
//! and beam geometry — into one `Score -> EngravedScore` pass.
//!
//! Grounded on the teacher's `layout::compute_layout`, which strings the
//! same modules together (`spacer` -> `breaker` -> per-instrument glyph
//! positioning -> `batcher`) but over a flattened, clef-and-attribute-blind
//! JSON extraction. This version carries real per-part attribute state
//! forward across measures (`Measure::trailing_attributes`) and shares one
//! measure width across every staff in a system, since a measure column's
//! barline position can't differ by part.

use std::collections::{HashMap, HashSet};

use crate::domain::{
    BreakHint, Clef, KeySignature, Measure, MeasureElement, MeasureId, NoteId, Part, Score,
    TimeSignature,
};
use crate::error::{LayoutWarning, WarningCategory, WarningSeverity};
use crate::layout::beams;
use crate::layout::breaker::{self, MeasureInfo};
use crate::layout::config::LayoutConfiguration;
use crate::layout::engraver::{self, MeasureEngravingInput};
use crate::layout::geometry::{
    EngravedElement, EngravedMeasureColumn, EngravedPage, EngravedScore, EngravedStaff,
    EngravedStaffGroup, EngravedSystem, Point, Rect, StemDirection, TextElement,
};
use crate::layout::hspacing;
use crate::layout::orchestral;
use crate::layout::stems;
use crate::layout::vspacing;

/// Resolved attributes in effect at one measure, carried forward from the
/// most recent measure in the same part that set them (§4.8).
#[derive(Debug, Clone)]
struct ResolvedMeasureAttrs {
    divisions: u32,
    key: KeySignature,
    time: TimeSignature,
    clefs: HashMap<u8, Clef>,
}

/// Walks a part's measures once, accumulating its attribute state and
/// snapshotting it at every measure so later passes never need to re-walk
/// from the start to know what was in effect at an arbitrary index.
fn resolve_part_attributes(part: &Part) -> Vec<ResolvedMeasureAttrs> {
    let mut divisions = 960u32;
    let mut key = KeySignature::new(0).expect("0 fifths is always valid");
    let mut time = TimeSignature::common_time();
    let mut clefs: HashMap<u8, Clef> = HashMap::from([(1, Clef::Treble)]);

    part.measures
        .iter()
        .map(|measure| {
            let attrs = measure.trailing_attributes();
            if let Some(d) = attrs.divisions {
                divisions = d;
            }
            if let Some(k) = attrs.key {
                key = k;
            }
            if let Some(t) = attrs.time {
                time = t;
            }
            for clef_change in &attrs.clefs {
                clefs.insert(clef_change.staff, clef_change.clef);
            }
            ResolvedMeasureAttrs {
                divisions,
                key,
                time,
                clefs: clefs.clone(),
            }
        })
        .collect()
}

/// A measure's own break hint, or `Required` if any of its elements carry
/// an explicit system/page break direction (§3 `Print`).
fn measure_break_hint(measure: &Measure) -> Option<BreakHint> {
    if measure.break_hint.is_some() {
        return measure.break_hint;
    }
    let forces_break = measure
        .elements
        .iter()
        .any(|e| matches!(e, MeasureElement::Print(p) if p.new_system || p.new_page));
    forces_break.then_some(BreakHint::Required)
}

/// One staff instance a system stacks vertically: a part index plus which
/// of that part's staves (1-based) this slot renders.
#[derive(Debug, Clone, Copy)]
struct StaffSlot {
    part_index: usize,
    staff_number: u8,
}

/// Per-staff notes beamable within one measure, gathered by walking the
/// measure's element stream and tracking tick the same way the engraver
/// does, filtered to the one staff a beam group can never cross.
fn beamable_entries(measure: &Measure, staff_number: u8) -> (Vec<(NoteId, u32)>, Vec<bool>) {
    let mut entries = Vec::new();
    let mut beamable = Vec::new();
    let mut tick = 0u32;
    for element in &measure.elements {
        match element {
            MeasureElement::Note(note) if note.staff == staff_number => {
                if !note.is_chord_tone && !note.is_rest() {
                    entries.push((note.id, tick));
                    beamable.push(note.visual_duration.is_beamable());
                }
                if !note.is_chord_tone {
                    tick += note.duration_ticks;
                }
            }
            MeasureElement::Forward(delta) => tick += delta,
            MeasureElement::Backup(delta) => tick = tick.saturating_sub(*delta),
            _ => {}
        }
    }
    (entries, beamable)
}

/// Beam groups for one staff's measure, from explicit beam data when the
/// measure carries it, auto-grouped by time signature otherwise (§4.7).
fn beam_groups_for(measure: &Measure, staff_number: u8, time: TimeSignature, divisions: u32) -> Vec<Vec<NoteId>> {
    if beams::has_explicit_beam_data(&measure.elements) {
        beams::explicit_groups_from_measure(&measure.elements)
    } else {
        let (entries, beamable) = beamable_entries(measure, staff_number);
        beams::auto_group_by_time_signature(&entries, &beamable, time, divisions)
    }
}

/// Runs the full layout pipeline over a score: attribute resolution,
/// horizontal measure sizing, system breaking, orchestral grouping,
/// vertical stacking, page breaking, and per-staff engraving with beam
/// geometry, producing every page a score needs (§4.8).
pub fn layout_score(score: &Score, config: &LayoutConfiguration) -> EngravedScore {
    let mut warnings = Vec::new();
    let points_per_staff_space = config.staff.staff_height_points / 4.0;
    let measure_count = score.measure_count();

    let part_attrs: Vec<Vec<ResolvedMeasureAttrs>> =
        score.parts.iter().map(resolve_part_attributes).collect();

    // ---- horizontal: one width per measure column, shared by every part ----
    let mut measure_infos = Vec::with_capacity(measure_count);
    let mut measure_durations = Vec::with_capacity(measure_count);
    let mut start_tick = 0u32;
    for m in 0..measure_count {
        let mut width_staff_spaces = 0.0f64;
        let mut duration_ticks = 0u32;
        let mut break_hint = None;
        for (p, part) in score.parts.iter().enumerate() {
            let Some(measure) = part.measures.get(m) else {
                continue;
            };
            let attrs = &part_attrs[p][m];
            let duration =
                hspacing::measure_duration_ticks(attrs.divisions, attrs.time.numerator, attrs.time.denominator);
            let mut width = hspacing::natural_measure_width(measure, attrs.divisions, duration, &config.spacing);
            if let Some(hint_tenths) = measure.width_hint {
                width = width.max(hint_tenths / config.tenths_per_staff_space);
            }
            width_staff_spaces = width_staff_spaces.max(width);
            duration_ticks = duration_ticks.max(duration);
            if break_hint.is_none() {
                break_hint = measure_break_hint(measure);
            }
        }
        measure_durations.push(duration_ticks);
        measure_infos.push(MeasureInfo {
            width: width_staff_spaces * points_per_staff_space,
            start_tick,
            end_tick: start_tick + duration_ticks,
            break_hint,
        });
        start_tick += duration_ticks;
    }

    let capacity = config.page.content_width();

    // The first system carries a clef+key+time header that later systems
    // don't (time is only repeated on system one, §4.8), so its usable
    // width is narrower. Measuring it up front lets the breaker shrink the
    // first run by a measure and push the remainder forward on overflow,
    // rather than discovering the overflow only once staves are engraved.
    let mut first_system_header_width = 0.0f64;
    for (p, part) in score.parts.iter().enumerate() {
        let Some(attrs) = part_attrs[p].first() else {
            continue;
        };
        for staff_number in 1..=part.staff_count.max(1) {
            let clef = attrs.clefs.get(&staff_number).copied().unwrap_or(Clef::Treble);
            let mut scratch = Vec::new();
            let end_x = engraver::engrave_staff_head(
                0.0,
                0.0,
                clef,
                Some(attrs.key),
                Some(attrs.time),
                points_per_staff_space,
                &mut scratch,
            );
            first_system_header_width = first_system_header_width.max(end_x);
        }
    }
    first_system_header_width += 0.5 * points_per_staff_space;
    let first_system_capacity = (capacity - first_system_header_width).max(1.0);

    let system_breaks = breaker::break_into_systems(&measure_infos, capacity, first_system_capacity);

    // ---- orchestral grouping ----
    let groups = orchestral::infer_groups(&score.parts);
    let outer_bracket = orchestral::needs_outer_bracket(&groups, &score.parts);

    let mut slots: Vec<StaffSlot> = Vec::new();
    let mut group_slot_ranges: Vec<(usize, usize)> = Vec::with_capacity(groups.len());
    for group in &groups {
        let range_start = slots.len();
        for &part_index in &group.part_indices {
            let staff_count = score.parts[part_index].staff_count.max(1);
            for staff_number in 1..=staff_count {
                slots.push(StaffSlot {
                    part_index,
                    staff_number,
                });
            }
        }
        group_slot_ranges.push((range_start, slots.len()));
    }

    // ---- vertical: nominal stacking, cascading clearance resolution ----
    let staff_offsets_nominal = vspacing::stack_staff_offsets(slots.len(), &config.staff);
    let mut staff_offsets = staff_offsets_nominal;
    let extents = vec![config.staff.staff_height_points * 0.6; slots.len()];
    vspacing::resolve_vertical_clearances(
        &mut staff_offsets,
        &extents,
        &extents,
        config.staff.minimum_staff_clearance,
    );
    let system_height = vspacing::nominal_system_height(slots.len(), &config.staff)
        .max(staff_offsets.last().copied().unwrap_or(0.0) + config.staff.staff_height_points);

    // ---- page breaking: distribute systems across pages (§4.3, §4.8) ----
    let system_heights = vec![system_height; system_breaks.len()];
    let page_breaks = breaker::break_into_pages(
        &system_heights,
        config.page.content_height(),
        config.page.first_page_content_height(),
        config.staff.inter_system_spacing,
        config.page_break.min_page_fill,
        config.page_break.underfill_penalty,
        config.page_break.few_systems_penalty,
    );

    // ---- page-one credits, drawn in the reserved top-margin band ----
    let mut credits = Vec::new();
    if let Some(title) = &score.credits.title {
        credits.push(TextElement {
            position: Point::new(config.page.content_width() / 2.0, 24.0),
            text: title.clone(),
            font_size_points: 18.0,
        });
    }
    if let Some(composer) = &score.credits.composer {
        credits.push(TextElement {
            position: Point::new(config.page.content_width() - 72.0, 54.0),
            text: composer.clone(),
            font_size_points: 12.0,
        });
    }

    let notehead_width_points = config.stem.notehead_width * points_per_staff_space;

    let mut system_y_offsets = vec![0.0; system_breaks.len()];
    for (page_index, page_break) in page_breaks.iter().enumerate() {
        let page_system_heights = vec![system_height; page_break.system_count()];
        let content_height = if page_index == 0 {
            config.page.first_page_content_height()
        } else {
            config.page.content_height()
        };
        let top_offset = config.page.margin_top
            + if page_index == 0 { config.page.first_page_top_offset } else { 0.0 };
        let local_offsets = vspacing::distribute_systems_on_page(
            &page_system_heights,
            content_height,
            config.staff.inter_system_spacing,
        );
        for (local_index, &offset) in local_offsets.iter().enumerate() {
            system_y_offsets[page_break.start_index + local_index] = top_offset + offset;
        }
    }

    let mut systems = Vec::with_capacity(system_breaks.len());
    for (sys_index, sys_break) in system_breaks.iter().enumerate() {
        let is_last_system = sys_index + 1 == system_breaks.len();
        let natural = sys_break.natural_width;
        let target_total = if is_last_system && natural < capacity {
            natural
        } else {
            capacity
        };
        let scale = if natural > 0.0 { target_total / natural } else { 1.0 };

        let mut measure_x_starts: Vec<(usize, f64, f64)> = Vec::new();
        let mut x_cursor = 0.0f64;
        for m in sys_break.start_index..sys_break.end_index {
            let target_width_points = measure_infos[m].width * scale;
            measure_x_starts.push((m, x_cursor, target_width_points));
            x_cursor += target_width_points;
        }

        // Staff-head glyphs (clef/key, and time on the first system only)
        // are engraved first so every staff's content can start at the
        // same x regardless of how wide any one staff's header happens to be.
        let mut staff_headers: Vec<(Vec<EngravedElement>, f64)> = Vec::with_capacity(slots.len());
        for (i, slot) in slots.iter().enumerate() {
            let staff_center_y =
                system_y_offsets[sys_index] + staff_offsets[i] + config.staff.staff_height_points / 2.0;
            let attrs = &part_attrs[slot.part_index][sys_break.start_index];
            let clef = attrs.clefs.get(&slot.staff_number).copied().unwrap_or(Clef::Treble);
            let time = (sys_index == 0).then_some(attrs.time);
            let mut elements = Vec::new();
            let end_x = engraver::engrave_staff_head(
                0.0,
                staff_center_y,
                clef,
                Some(attrs.key),
                time,
                points_per_staff_space,
                &mut elements,
            );
            staff_headers.push((elements, end_x));
        }
        let content_start_x = staff_headers
            .iter()
            .map(|(_, end_x)| *end_x)
            .fold(0.0, f64::max)
            + 0.5 * points_per_staff_space;

        let mut barlines_for_system: HashMap<usize, Option<crate::layout::geometry::BarLine>> = HashMap::new();
        let mut staff_rects: Vec<Rect> = Vec::with_capacity(slots.len());
        let mut engraved_staves: Vec<EngravedStaff> = Vec::with_capacity(slots.len());

        for (i, slot) in slots.iter().enumerate() {
            let part = &score.parts[slot.part_index];
            let staff_center_y =
                system_y_offsets[sys_index] + staff_offsets[i] + config.staff.staff_height_points / 2.0;
            let (mut elements, _) = staff_headers[i].clone();

            for &(m, x_start_in_system, target_width_points) in &measure_x_starts {
                let Some(measure) = part.measures.get(m) else {
                    continue;
                };
                let attrs = &part_attrs[slot.part_index][m];
                let clef = attrs.clefs.get(&slot.staff_number).copied().unwrap_or(Clef::Treble);
                let duration = measure_durations[m];
                let target_width_staff_spaces = target_width_points / points_per_staff_space;
                let columns = hspacing::justify_columns(
                    measure,
                    attrs.divisions,
                    duration,
                    target_width_staff_spaces,
                    &config.spacing,
                );
                let abs_x_start = content_start_x + x_start_in_system;
                let column_x: HashMap<u32, f64> = columns
                    .into_iter()
                    .map(|(tick, x)| (tick, abs_x_start + x))
                    .collect();

                let groups = beam_groups_for(measure, slot.staff_number, attrs.time, attrs.divisions);
                let beamed_notes: HashSet<NoteId> = groups.iter().flatten().copied().collect();

                let input = MeasureEngravingInput {
                    measure,
                    staff_number: slot.staff_number,
                    clef,
                    key: attrs.key,
                    column_x: &column_x,
                    staff_center_y,
                    points_per_staff_space,
                    stem_config: &config.stem,
                    beamed_notes: &beamed_notes,
                };
                let output = engraver::engrave_measure_notes(&input, &crate::layout::metrics::BravuraMetrics);

                for w in output.warnings {
                    warnings.push(
                        w.with_part(part.id.to_string())
                            .with_staff(slot.staff_number),
                    );
                }
                barlines_for_system
                    .entry(m)
                    .or_insert(output.right_barline);

                elements.extend(output.elements.iter().cloned());

                for group in &groups {
                    let points: Vec<beams::BeamPoint> = output
                        .note_points
                        .iter()
                        .filter(|p| group.contains(&p.note_id))
                        .map(|p| beams::BeamPoint {
                            note_id: p.note_id,
                            tick: p.tick,
                            x: p.x,
                            notehead_y: p.notehead_y,
                            direction: p.direction,
                        })
                        .collect();
                    if points.len() < 2 {
                        continue;
                    }
                    let group_direction = beams::group_stem_direction(&points);
                    let Some(result) = beams::create_beam(
                        &points,
                        group_direction,
                        &config.stem,
                        &config.beam,
                        points_per_staff_space,
                    ) else {
                        continue;
                    };
                    for (note_id, new_y_end) in &result.stem_ends {
                        if let Some(EngravedElement::Stem(stem)) = elements.iter_mut().find(|e| {
                            matches!(e, EngravedElement::Stem(s) if s.source_note == Some(*note_id))
                        }) {
                            if stem.direction != group_direction {
                                let notehead_x = match stem.direction {
                                    StemDirection::Up => stem.x - notehead_width_points,
                                    StemDirection::Down => stem.x + notehead_width_points,
                                };
                                *stem = stems::create_stem(
                                    notehead_x,
                                    stem.y_start,
                                    group_direction,
                                    &config.stem,
                                    points_per_staff_space,
                                    Some(*note_id),
                                );
                            }
                            stem.y_end = *new_y_end;
                        }
                    }
                    let mut beam_group = result.group;
                    beam_group.reserved_secondary_levels = beams::reserved_secondary_levels(&measure.elements, group);
                    elements.push(EngravedElement::BeamGroup(beam_group));
                }
            }

            let staff_top = system_y_offsets[sys_index] + staff_offsets[i] - extents[i];
            let staff_rect = Rect::new(
                0.0,
                staff_top,
                content_start_x + x_cursor,
                config.staff.staff_height_points + 2.0 * extents[i],
            );
            staff_rects.push(staff_rect);

            engraved_staves.push(EngravedStaff {
                part_id: part.id,
                staff_number: slot.staff_number,
                y_offset: system_y_offsets[sys_index] + staff_offsets[i],
                elements,
                bounding_box: staff_rect,
            });
        }

        let mut staff_groups_out = Vec::with_capacity(groups.len());
        for (gi, group) in groups.iter().enumerate() {
            let (range_start, range_end) = group_slot_ranges[gi];
            let part_ids = group
                .part_indices
                .iter()
                .map(|&pi| score.parts[pi].id)
                .collect();
            staff_groups_out.push(EngravedStaffGroup {
                part_ids,
                bracket: group.bracket,
                full_barlines: group.full_barlines,
                staves: engraved_staves[range_start..range_end].to_vec(),
            });
        }

        let mut measure_columns = Vec::with_capacity(measure_x_starts.len());
        for &(m, x_start_in_system, target_width_points) in &measure_x_starts {
            let measure_ref = score.parts.iter().find_map(|p| p.measures.get(m));
            let (measure_id, number) = measure_ref
                .map(|mm| (mm.id, mm.number))
                .unwrap_or_else(|| (MeasureId::new(), m as u32 + 1));
            let abs_x_start = content_start_x + x_start_in_system;
            measure_columns.push(EngravedMeasureColumn {
                measure_id,
                number,
                x_start: abs_x_start,
                x_end: abs_x_start + target_width_points,
                left_barline: None,
                right_barline: barlines_for_system.get(&m).copied().flatten(),
            });
        }

        systems.push(EngravedSystem {
            index: sys_index as u32,
            y: system_y_offsets[sys_index],
            height: system_height,
            outer_bracket,
            staff_groups: staff_groups_out,
            measures: measure_columns,
        });
    }

    if system_breaks.is_empty() && measure_count > 0 {
        warnings.push(LayoutWarning::new(
            WarningSeverity::Warning,
            WarningCategory::MissingElements,
            "score had measures but the breaker produced no systems",
        ));
    }

    let mut pages = Vec::with_capacity(page_breaks.len().max(1));
    for (page_index, page_break) in page_breaks.iter().enumerate() {
        pages.push(EngravedPage {
            index: page_index as u32,
            width: config.page.width_points,
            height: config.page.height_points,
            systems: systems[page_break.start_index..page_break.end_index].to_vec(),
            credits: if page_index == 0 { credits.clone() } else { Vec::new() },
        });
    }
    if pages.is_empty() {
        pages.push(EngravedPage {
            index: 0,
            width: config.page.width_points,
            height: config.page.height_points,
            systems: Vec::new(),
            credits,
        });
    }

    EngravedScore { pages, warnings }
}
