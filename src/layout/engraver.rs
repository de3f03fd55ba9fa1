//! Per-measure element engraving (§4.7): staff-head glyphs, noteheads,
//! stems, flags, accidentals (with measure-scoped suppression), ledger
//! lines, rests, and barlines.
//!
//! Grounded on the teacher's `layout::positioner`: the duration-to-
//! codepoint table (`position_noteheads`), the per-clef clef codepoint and
//! Y (`position_clef`), the stacked time-signature digit glyphs
//! (`position_time_signature`), and the key-signature-aware accidental
//! suppression with its per-measure `HashMap<pitch_class, alteration>`
//! reset at measure boundaries (`position_note_accidentals`). Generalized
//! from the teacher's hardcoded treble-only sharp/flat position arrays and
//! MIDI-pitch input to work from [`crate::domain::pitch::Clef`]'s diatonic
//! staff-position formula for any clef.

use std::collections::HashMap;

use crate::domain::{
    Accidental, Articulation, BarStyle, Barline, BarlineLocation, Clef, DirectionKind,
    DurationKind, KeySignature, Measure, MeasureElement, Note, NoteId, NoteheadStyle, PitchKind,
    Placement, Step, TimeSignature, TimeSignatureSymbol,
};
use crate::error::{LayoutWarning, WarningCategory, WarningSeverity};
use crate::layout::collide;
use crate::layout::config::StemConfiguration;
use crate::layout::geometry::{
    BarLine, BarLineType, EngravedElement, EngravedTimeSignature, LineSegment, Point,
    PositionedGlyph, StemDirection,
};
use crate::layout::stems;
use crate::ports::GlyphAdvance;

/// Staff-space gap from the staff's top/bottom line to the first ledger
/// line, and between consecutive ledger lines.
const LEDGER_LINE_SPACING: i32 = 2;
/// How far left of the notehead an accidental's rightmost edge sits,
/// before per-column stacking pushes it further left.
const ACCIDENTAL_GAP_STAFF_SPACES: f64 = 0.3;

fn notehead_codepoint(duration: DurationKind, style: NoteheadStyle) -> &'static str {
    if matches!(style, NoteheadStyle::Cross | NoteheadStyle::XNote) {
        return "noteheadXBlack";
    }
    match duration {
        DurationKind::Whole => "noteheadWhole",
        DurationKind::Half => "noteheadHalf",
        _ => "noteheadBlack",
    }
}

fn articulation_codepoint(articulation: Articulation, placement: Placement) -> &'static str {
    use Articulation::*;
    match (articulation, placement) {
        (Staccato, Placement::Above) => "articStaccatoAbove",
        (Staccato, Placement::Below) => "articStaccatoBelow",
        (Accent, Placement::Above) => "articAccentAbove",
        (Accent, Placement::Below) => "articAccentBelow",
        (Tenuto, Placement::Above) => "articTenutoAbove",
        (Tenuto, Placement::Below) => "articTenutoBelow",
        (Marcato, Placement::Above) => "articMarcatoAbove",
        (Marcato, Placement::Below) => "articMarcatoBelow",
        (Staccatissimo, Placement::Above) => "articStaccatissimoAbove",
        (Staccatissimo, Placement::Below) => "articStaccatissimoBelow",
    }
}

/// Maps a direction's free-form dynamic text to its Bravura glyph name,
/// falling back to a composed name for marks outside the common set
/// (sfz, fp, and the like) rather than dropping them silently.
fn dynamic_codepoint(text: &str) -> String {
    match text {
        "p" => "dynamicPiano".to_string(),
        "pp" => "dynamicPP".to_string(),
        "ppp" => "dynamicPPP".to_string(),
        "pppp" => "dynamicPPPP".to_string(),
        "f" => "dynamicForte".to_string(),
        "ff" => "dynamicFF".to_string(),
        "fff" => "dynamicFFF".to_string(),
        "ffff" => "dynamicFFFF".to_string(),
        "mf" => "dynamicMF".to_string(),
        "mp" => "dynamicMP".to_string(),
        "sfz" => "dynamicSforzando1".to_string(),
        "fp" => "dynamicFortePiano".to_string(),
        other => format!("dynamic{other}"),
    }
}

fn rest_codepoint(duration: DurationKind) -> &'static str {
    match duration {
        DurationKind::Whole => "restWhole",
        DurationKind::Half => "restHalf",
        DurationKind::Quarter => "restQuarter",
        DurationKind::Eighth => "rest8th",
        DurationKind::Sixteenth => "rest16th",
        DurationKind::ThirtySecond => "rest16th",
        DurationKind::SixtyFourth => "rest16th",
    }
}

fn flag_codepoint(duration: DurationKind, direction: StemDirection) -> Option<&'static str> {
    let up = direction == StemDirection::Up;
    match duration {
        DurationKind::Eighth => Some(if up { "flag8thUp" } else { "flag8thDown" }),
        DurationKind::Sixteenth => Some(if up { "flag16thUp" } else { "flag16thDown" }),
        DurationKind::ThirtySecond => Some(if up { "flag32ndUp" } else { "flag32ndDown" }),
        DurationKind::SixtyFourth => Some(if up { "flag64thUp" } else { "flag64thDown" }),
        _ => None,
    }
}

fn clef_codepoint(clef: Clef) -> &'static str {
    match clef {
        Clef::Treble => "gClef",
        Clef::Bass => "fClef",
        Clef::Alto | Clef::Tenor => "cClef",
        Clef::Percussion => "unpitchedPercussionClef1",
    }
}

fn accidental_codepoint(accidental: Accidental) -> &'static str {
    match accidental {
        Accidental::DoubleFlat => "accidentalDoubleFlat",
        Accidental::Flat => "accidentalFlat",
        Accidental::Natural => "accidentalNatural",
        Accidental::Sharp => "accidentalSharp",
        Accidental::DoubleSharp => "accidentalDoubleSharp",
    }
}

fn digit_codepoint(digit: u8) -> String {
    format!("timeSig{digit}")
}

/// Order sharps/flats are added to a key signature in, by diatonic step —
/// the standard circle-of-fifths engraving order.
const SHARP_ORDER: [Step; 7] = [
    Step::F,
    Step::C,
    Step::G,
    Step::D,
    Step::A,
    Step::E,
    Step::B,
];
const FLAT_ORDER: [Step; 7] = [
    Step::B,
    Step::E,
    Step::A,
    Step::D,
    Step::G,
    Step::C,
    Step::F,
];

/// Octave each key-signature accidental is conventionally drawn in for a
/// clef, chosen to keep the whole signature within (or just above) the
/// staff.
fn key_signature_octave(clef: Clef, sharp: bool) -> i32 {
    match (clef, sharp) {
        (Clef::Treble, true) => 5,
        (Clef::Treble, false) => 5,
        (Clef::Bass, true) => 3,
        (Clef::Bass, false) => 3,
        (Clef::Alto, _) => 4,
        (Clef::Tenor, _) => 4,
        (Clef::Percussion, _) => 4,
    }
}

/// Semitone alteration a key signature applies to a given diatonic step,
/// 0 if the step is unaffected.
fn key_signature_alteration(key: KeySignature, step: Step) -> i8 {
    let fifths = key.fifths();
    if fifths > 0 {
        if SHARP_ORDER[..fifths as usize].contains(&step) {
            1
        } else {
            0
        }
    } else if fifths < 0 {
        if FLAT_ORDER[..(-fifths) as usize].contains(&step) {
            -1
        } else {
            0
        }
    } else {
        0
    }
}

/// Half a staff-space, in points — the vertical distance between adjacent
/// staff positions.
fn half_space_points(points_per_staff_space: f64) -> f64 {
    points_per_staff_space / 2.0
}

fn y_for_staff_position(staff_center_y: f64, staff_position: i32, points_per_staff_space: f64) -> f64 {
    staff_center_y - staff_position as f64 * half_space_points(points_per_staff_space)
}

/// Emits the clef, key signature, and time signature glyphs that open a
/// staff, in system-local coordinates starting at `x`. Returns the x
/// position immediately after the emitted glyphs.
pub fn engrave_staff_head(
    x: f64,
    staff_center_y: f64,
    clef: Clef,
    key: Option<KeySignature>,
    time: Option<TimeSignature>,
    points_per_staff_space: f64,
    elements: &mut Vec<EngravedElement>,
) -> f64 {
    let mut cursor = x;
    let half_space = half_space_points(points_per_staff_space);

    let clef_y = staff_center_y - (clef.line() as f64 - 3.0) * 2.0 * half_space;
    elements.push(EngravedElement::Clef(PositionedGlyph {
        position: Point::new(cursor, clef_y),
        codepoint: clef_codepoint(clef).to_string(),
        source_note: None,
    }));
    cursor += 2.6 * points_per_staff_space;

    if let Some(key) = key {
        let sharp = key.is_sharp_key();
        let count = key.fifths().unsigned_abs() as usize;
        let order = if sharp { &SHARP_ORDER[..] } else { &FLAT_ORDER[..] };
        let mut glyphs = Vec::new();
        for &step in order.iter().take(count) {
            let octave = key_signature_octave(clef, sharp);
            let staff_position = clef.staff_position(step, octave);
            let y = y_for_staff_position(staff_center_y, staff_position, points_per_staff_space);
            glyphs.push(PositionedGlyph {
                position: Point::new(cursor, y),
                codepoint: if sharp {
                    "accidentalSharp".to_string()
                } else {
                    "accidentalFlat".to_string()
                },
                source_note: None,
            });
            cursor += 0.8 * points_per_staff_space;
        }
        if !glyphs.is_empty() {
            elements.push(EngravedElement::KeySignature(glyphs));
        }
    }

    if let Some(time) = time {
        let (symbol_glyph, numerator_glyphs, denominator_glyphs) = match time.symbol {
            TimeSignatureSymbol::Common => (
                Some(PositionedGlyph {
                    position: Point::new(cursor, staff_center_y),
                    codepoint: "timeSigCommon".to_string(),
                    source_note: None,
                }),
                Vec::new(),
                Vec::new(),
            ),
            TimeSignatureSymbol::Cut => (
                Some(PositionedGlyph {
                    position: Point::new(cursor, staff_center_y),
                    codepoint: "timeSigCutCommon".to_string(),
                    source_note: None,
                }),
                Vec::new(),
                Vec::new(),
            ),
            TimeSignatureSymbol::Normal => {
                let numerator_digits = digits_of(time.numerator);
                let denominator_digits = digits_of(time.denominator);
                let numerator_glyphs = numerator_digits
                    .iter()
                    .enumerate()
                    .map(|(i, &d)| PositionedGlyph {
                        position: Point::new(
                            cursor + i as f64 * 0.9 * points_per_staff_space,
                            staff_center_y - 1.0 * points_per_staff_space,
                        ),
                        codepoint: digit_codepoint(d),
                        source_note: None,
                    })
                    .collect::<Vec<_>>();
                let denominator_glyphs = denominator_digits
                    .iter()
                    .enumerate()
                    .map(|(i, &d)| PositionedGlyph {
                        position: Point::new(
                            cursor + i as f64 * 0.9 * points_per_staff_space,
                            staff_center_y + 1.0 * points_per_staff_space,
                        ),
                        codepoint: digit_codepoint(d),
                        source_note: None,
                    })
                    .collect::<Vec<_>>();
                cursor += numerator_digits.len().max(denominator_digits.len()) as f64
                    * 0.9
                    * points_per_staff_space;
                (None, numerator_glyphs, denominator_glyphs)
            }
        };
        if symbol_glyph.is_some() {
            cursor += 1.4 * points_per_staff_space;
        }
        elements.push(EngravedElement::TimeSignature(EngravedTimeSignature {
            numerator_glyphs,
            denominator_glyphs,
            symbol_glyph,
        }));
    }

    cursor + 0.6 * points_per_staff_space
}

fn digits_of(value: u8) -> Vec<u8> {
    if value == 0 {
        return vec![0];
    }
    let mut digits = Vec::new();
    let mut v = value;
    while v > 0 {
        digits.push(v % 10);
        v /= 10;
    }
    digits.reverse();
    digits
}

/// Ledger lines needed between the staff and a notehead sitting at
/// `staff_position` (beyond the printed staff, `|position| > 4`).
pub fn ledger_lines_for(
    staff_position: i32,
    x: f64,
    staff_center_y: f64,
    points_per_staff_space: f64,
    half_width: f64,
) -> Vec<LineSegment> {
    let mut lines = Vec::new();
    let half_space = half_space_points(points_per_staff_space);
    if staff_position > 4 {
        let mut pos = 6;
        while pos <= staff_position {
            let y = y_for_staff_position(staff_center_y, pos, points_per_staff_space);
            lines.push(LineSegment {
                start: Point::new(x - half_width, y),
                end: Point::new(x + half_width, y),
                thickness: 0.1 * points_per_staff_space,
            });
            pos += LEDGER_LINE_SPACING;
        }
    } else if staff_position < -4 {
        let mut pos = -6;
        while pos >= staff_position {
            let y = y_for_staff_position(staff_center_y, pos, points_per_staff_space);
            lines.push(LineSegment {
                start: Point::new(x - half_width, y),
                end: Point::new(x + half_width, y),
                thickness: 0.1 * points_per_staff_space,
            });
            pos -= LEDGER_LINE_SPACING;
        }
    }
    lines
}

/// Per-measure accidental tracking state: which alteration is already
/// sounding for each diatonic step+octave, seeded from the key signature
/// and reset at every measure boundary (§4.7, §9).
#[derive(Debug, Clone, Default)]
pub struct AccidentalTracker {
    active: HashMap<(Step, i8), i8>,
}

impl AccidentalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `note` needs an explicit accidental glyph given what's
    /// already sounding in this measure, and records the note's alteration
    /// as now active for the rest of the measure.
    pub fn needs_accidental(&mut self, step: Step, octave: i8, alter: i8, key: KeySignature) -> bool {
        let key_alter = key_signature_alteration(key, step);
        let active = *self.active.get(&(step, octave)).unwrap_or(&key_alter);
        self.active.insert((step, octave), alter);
        alter != active
    }
}

fn accidental_for_alteration(alter: i8) -> Accidental {
    match alter {
        i8::MIN..=-2 => Accidental::DoubleFlat,
        -1 => Accidental::Flat,
        0 => Accidental::Natural,
        1 => Accidental::Sharp,
        _ => Accidental::DoubleSharp,
    }
}

/// Engraves one measure's notes and rests for a single staff, given each
/// note's justified x position (§4.2) and the staff's vertical anchor.
/// `column_x` maps a tick to its justified x within the measure; the
/// caller (the director) has already added the measure's own x offset.
pub struct MeasureEngravingInput<'a> {
    pub measure: &'a Measure,
    pub staff_number: u8,
    pub clef: Clef,
    pub key: KeySignature,
    pub column_x: &'a HashMap<u32, f64>,
    pub staff_center_y: f64,
    pub points_per_staff_space: f64,
    pub stem_config: &'a StemConfiguration,
    /// Notes the director has already decided will sit under a beam
    /// (explicit or auto-grouped) — these take a longer stem and no flag;
    /// the beam segment itself is added in a later pass once every note's
    /// stem position is known.
    pub beamed_notes: &'a std::collections::HashSet<NoteId>,
}

/// One stemmed note's position, gathered for a later beam-geometry pass.
#[derive(Debug, Clone, Copy)]
pub struct BeamNotePoint {
    pub note_id: NoteId,
    pub tick: u32,
    pub x: f64,
    pub notehead_y: f64,
    pub direction: StemDirection,
}

pub struct MeasureEngravingOutput {
    pub elements: Vec<EngravedElement>,
    pub warnings: Vec<LayoutWarning>,
    /// The measure's right barline, if its element stream carries one —
    /// attached to the column's [`crate::layout::geometry::EngravedMeasureColumn`]
    /// rather than emitted as a staff element, since a barline belongs to
    /// the measure column shared by every staff, not to one staff alone.
    pub right_barline: Option<BarLine>,
    pub note_points: Vec<BeamNotePoint>,
}

/// Repositions a finished chord's accidentals per §4.6's column-stacking
/// rule: any column beyond the first steps further left by `column_width`,
/// so a chord's accidentals fan out instead of overlapping.
fn flush_accidental_columns(
    elements: &mut [EngravedElement],
    pending: &mut Vec<(usize, i32)>,
    column_width: f64,
) {
    if pending.len() > 1 {
        let positions: Vec<i32> = pending.iter().map(|&(_, p)| p).collect();
        let columns = collide::stack_accidental_columns(&positions);
        for (&(idx, _), column) in pending.iter().zip(columns) {
            if column > 0 {
                if let EngravedElement::Accidental(glyph) = &mut elements[idx] {
                    glyph.position.x -= column as f64 * column_width;
                }
            }
        }
    }
    pending.clear();
}

pub fn engrave_measure_notes(
    input: &MeasureEngravingInput,
    _glyph_advance: &dyn GlyphAdvance,
) -> MeasureEngravingOutput {
    let mut elements = Vec::new();
    let mut warnings = Vec::new();
    let mut right_barline = None;
    let mut note_points = Vec::new();
    let mut tracker = AccidentalTracker::new();
    let mut tick = 0u32;
    let half_width = input.stem_config.notehead_width * input.points_per_staff_space / 2.0;
    let accidental_column_width = 2.0 * half_width + ACCIDENTAL_GAP_STAFF_SPACES * input.points_per_staff_space;

    // Accidentals belonging to the chord currently being engraved, as
    // (element index, staff position) — flushed into stacked columns once
    // the next root note (or the measure) ends the chord.
    let mut pending_accidentals: Vec<(usize, i32)> = Vec::new();

    for element in &input.measure.elements {
        match element {
            MeasureElement::Note(note) if note.staff == input.staff_number => {
                let Some(&x) = input.column_x.get(&tick) else {
                    warnings.push(
                        LayoutWarning::new(
                            WarningSeverity::Warning,
                            WarningCategory::MissingElements,
                            format!("no justified column for tick {tick}"),
                        )
                        .with_measure(input.measure.number),
                    );
                    if !note.is_chord_tone {
                        flush_accidental_columns(&mut elements, &mut pending_accidentals, accidental_column_width);
                        tick += note.duration_ticks;
                    }
                    continue;
                };
                if !note.is_chord_tone {
                    flush_accidental_columns(&mut elements, &mut pending_accidentals, accidental_column_width);
                }
                let elements_before = elements.len();
                if let Some(point) =
                    engrave_note(note, tick, x, input, &mut tracker, half_width, &mut elements)
                {
                    note_points.push(point);
                }
                if let Some(idx) = (elements_before..elements.len())
                    .find(|&i| matches!(elements[i], EngravedElement::Accidental(_)))
                {
                    let staff_position = note.pitch.staff_position(input.clef);
                    pending_accidentals.push((idx, staff_position));
                }
                if !note.is_chord_tone {
                    tick += note.duration_ticks;
                }
            }
            MeasureElement::Direction(direction) if direction.staff == input.staff_number => {
                if let DirectionKind::Dynamic(text) = &direction.kind {
                    if let Some(&x) = input.column_x.get(&tick) {
                        let frontier = match direction.placement {
                            Placement::Above => {
                                y_for_staff_position(input.staff_center_y, 4, input.points_per_staff_space)
                            }
                            Placement::Below => {
                                y_for_staff_position(input.staff_center_y, -4, input.points_per_staff_space)
                            }
                        };
                        let gap = input.points_per_staff_space;
                        let item_height = input.points_per_staff_space;
                        let (position, _) =
                            collide::place_next_stacked(frontier, item_height, gap, direction.placement);
                        elements.push(EngravedElement::Dynamic(PositionedGlyph {
                            position: Point::new(x, position),
                            codepoint: dynamic_codepoint(text),
                            source_note: None,
                        }));
                    }
                }
            }
            MeasureElement::Forward(delta) => {
                flush_accidental_columns(&mut elements, &mut pending_accidentals, accidental_column_width);
                tick += delta;
            }
            MeasureElement::Backup(delta) => {
                flush_accidental_columns(&mut elements, &mut pending_accidentals, accidental_column_width);
                tick = tick.saturating_sub(*delta);
            }
            MeasureElement::Barline(barline) if barline.location == BarlineLocation::Right => {
                if let Some(&x) = input.column_x.values().last() {
                    right_barline = Some(barline_geometry(barline, x));
                }
            }
            _ => {}
        }
    }
    flush_accidental_columns(&mut elements, &mut pending_accidentals, accidental_column_width);

    MeasureEngravingOutput {
        elements,
        warnings,
        right_barline,
        note_points,
    }
}

fn barline_geometry(barline: &Barline, x: f64) -> BarLine {
    let bar_type = match barline.style {
        BarStyle::Regular => BarLineType::Single,
        BarStyle::Dotted => BarLineType::Dotted,
        BarStyle::Dashed => BarLineType::Dashed,
        BarStyle::Heavy => BarLineType::Heavy,
        BarStyle::LightLight => BarLineType::Double,
        BarStyle::LightHeavy => BarLineType::Final,
        BarStyle::HeavyLight => BarLineType::EndStartRepeat,
        BarStyle::HeavyHeavy => BarLineType::Final,
        BarStyle::Tick | BarStyle::Short => BarLineType::Single,
        BarStyle::None => BarLineType::None,
    };
    BarLine { x, bar_type }
}

fn engrave_note(
    note: &Note,
    tick: u32,
    x: f64,
    input: &MeasureEngravingInput,
    tracker: &mut AccidentalTracker,
    half_width: f64,
    elements: &mut Vec<EngravedElement>,
) -> Option<BeamNotePoint> {
    if note.is_rest() {
        elements.push(EngravedElement::Rest(PositionedGlyph {
            position: Point::new(x, input.staff_center_y),
            codepoint: rest_codepoint(note.visual_duration).to_string(),
            source_note: Some(note.id),
        }));
        return None;
    }

    let staff_position = note.pitch.staff_position(input.clef);
    let y = y_for_staff_position(input.staff_center_y, staff_position, input.points_per_staff_space);

    if let PitchKind::Pitched { step, alter, octave } = note.pitch {
        let explicit = note.accidental.is_some();
        let needs = tracker.needs_accidental(step, octave, alter, input.key) || explicit;
        if needs {
            let accidental = note.accidental.unwrap_or_else(|| accidental_for_alteration(alter));
            elements.push(EngravedElement::Accidental(PositionedGlyph {
                position: Point::new(
                    x - ACCIDENTAL_GAP_STAFF_SPACES * input.points_per_staff_space
                        - half_width,
                    y,
                ),
                codepoint: accidental_codepoint(accidental).to_string(),
                source_note: Some(note.id),
            }));
        }
    }

    for ledger in ledger_lines_for(
        staff_position,
        x,
        input.staff_center_y,
        input.points_per_staff_space,
        half_width * 1.4,
    ) {
        elements.push(EngravedElement::LedgerLine(ledger));
    }

    elements.push(EngravedElement::Notehead(PositionedGlyph {
        position: Point::new(x, y),
        codepoint: notehead_codepoint(note.visual_duration, note.notehead_style).to_string(),
        source_note: Some(note.id),
    }));

    let mut result = None;

    // Only the stem-owning note of a chord gets a stem/flag; chord tones
    // share the stem-owning note's stem (§4.7).
    if note.visual_duration != DurationKind::Whole && !note.is_chord_tone {
        let direction = note
            .stem_direction
            .map(StemDirection::from)
            .unwrap_or_else(|| stems::compute_stem_direction(staff_position));
        let beamed = !note.beams.is_empty() || input.beamed_notes.contains(&note.id);
        let mut stem = stems::create_stem(
            x,
            y,
            direction,
            input.stem_config,
            input.points_per_staff_space,
            Some(note.id),
        );
        if beamed {
            stems::enforce_minimum_length(
                &mut stem,
                input.stem_config.minimum_beamed_length * input.points_per_staff_space,
            );
        }
        elements.push(EngravedElement::Stem(stem));

        if !beamed {
            if let Some(flag) = flag_codepoint(note.visual_duration, direction) {
                elements.push(EngravedElement::Flag(PositionedGlyph {
                    position: Point::new(stem.x, stem.y_end),
                    codepoint: flag.to_string(),
                    source_note: Some(note.id),
                }));
            }
        }

        if beamed {
            result = Some(BeamNotePoint {
                note_id: note.id,
                tick,
                x: stem.x,
                notehead_y: stem.y_start,
                direction,
            });
        }
    }

    if !note.notations.articulations.is_empty() {
        let placement = if y <= input.staff_center_y {
            Placement::Above
        } else {
            Placement::Below
        };
        let gap = 0.4 * input.points_per_staff_space;
        let item_height = input.points_per_staff_space;
        let mut frontier = match placement {
            Placement::Above => y_for_staff_position(input.staff_center_y, 4, input.points_per_staff_space),
            Placement::Below => y_for_staff_position(input.staff_center_y, -4, input.points_per_staff_space),
        };
        for articulation in &note.notations.articulations {
            let (position, new_frontier) = collide::place_next_stacked(frontier, item_height, gap, placement);
            frontier = new_frontier;
            elements.push(EngravedElement::Articulation(PositionedGlyph {
                position: Point::new(x, position),
                codepoint: articulation_codepoint(*articulation, placement).to_string(),
                source_note: Some(note.id),
            }));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{KeySignature as DomainKeySignature, MeasureId};

    #[test]
    fn accidental_tracker_suppresses_repeats_within_measure() {
        let mut tracker = AccidentalTracker::new();
        let key = DomainKeySignature::new(0).unwrap();
        assert!(tracker.needs_accidental(Step::F, 4, 1, key));
        assert!(!tracker.needs_accidental(Step::F, 4, 1, key));
    }

    #[test]
    fn accidental_tracker_resets_via_new_instance() {
        let key = DomainKeySignature::new(0).unwrap();
        let mut tracker = AccidentalTracker::new();
        assert!(tracker.needs_accidental(Step::F, 4, 1, key));
        let mut next_measure_tracker = AccidentalTracker::new();
        assert!(next_measure_tracker.needs_accidental(Step::F, 4, 1, key));
    }

    #[test]
    fn key_signature_alteration_matches_sharp_count() {
        let key = DomainKeySignature::new(2).unwrap(); // D major: F#, C#
        assert_eq!(key_signature_alteration(key, Step::F), 1);
        assert_eq!(key_signature_alteration(key, Step::C), 1);
        assert_eq!(key_signature_alteration(key, Step::G), 0);
    }

    #[test]
    fn ledger_lines_appear_only_beyond_staff() {
        let lines = ledger_lines_for(0, 0.0, 0.0, 10.0, 8.0);
        assert!(lines.is_empty());
        let lines = ledger_lines_for(8, 0.0, 0.0, 10.0, 8.0);
        assert!(!lines.is_empty());
    }

    fn basic_input<'a>(
        measure: &'a Measure,
        column_x: &'a HashMap<u32, f64>,
        key: DomainKeySignature,
        stem_config: &'a StemConfiguration,
        beamed_notes: &'a std::collections::HashSet<NoteId>,
    ) -> MeasureEngravingInput<'a> {
        MeasureEngravingInput {
            measure,
            staff_number: 1,
            clef: Clef::Treble,
            key,
            column_x,
            staff_center_y: 0.0,
            points_per_staff_space: 10.0,
            stem_config,
            beamed_notes,
        }
    }

    #[test]
    fn notehead_codepoint_picks_x_glyph_for_cross_style() {
        assert_eq!(
            notehead_codepoint(DurationKind::Quarter, NoteheadStyle::XNote),
            "noteheadXBlack"
        );
        assert_eq!(
            notehead_codepoint(DurationKind::Quarter, NoteheadStyle::Cross),
            "noteheadXBlack"
        );
        assert_eq!(
            notehead_codepoint(DurationKind::Quarter, NoteheadStyle::Normal),
            "noteheadBlack"
        );
    }

    #[test]
    fn chord_tones_share_one_stem_and_flag() {
        let root = Note::new(
            NoteId::new(),
            PitchKind::Pitched { step: Step::C, alter: 0, octave: 4 },
            960,
            DurationKind::Eighth,
            1,
            1,
        );
        let mut third = Note::new(
            NoteId::new(),
            PitchKind::Pitched { step: Step::E, alter: 0, octave: 4 },
            960,
            DurationKind::Eighth,
            1,
            1,
        );
        third.is_chord_tone = true;

        let mut measure = Measure::new(MeasureId::new(), 1);
        measure.elements.push(MeasureElement::Note(root));
        measure.elements.push(MeasureElement::Note(third));

        let column_x = HashMap::from([(0, 0.0)]);
        let key = DomainKeySignature::new(0).unwrap();
        let stem_config = StemConfiguration::default();
        let beamed_notes = std::collections::HashSet::new();
        let input = basic_input(&measure, &column_x, key, &stem_config, &beamed_notes);
        let metrics = crate::layout::metrics::BravuraMetrics;
        let output = engrave_measure_notes(&input, &metrics);

        let stems = output
            .elements
            .iter()
            .filter(|e| matches!(e, EngravedElement::Stem(_)))
            .count();
        let flags = output
            .elements
            .iter()
            .filter(|e| matches!(e, EngravedElement::Flag(_)))
            .count();
        let noteheads = output
            .elements
            .iter()
            .filter(|e| matches!(e, EngravedElement::Notehead(_)))
            .count();
        assert_eq!(stems, 1);
        assert_eq!(flags, 1);
        assert_eq!(noteheads, 2);
    }

    #[test]
    fn explicit_stem_direction_overrides_staff_position_rule() {
        // B4 sits on the treble clef's centre line (staff position 0), so
        // the positional rule alone would pick `Down`.
        let mut note = Note::new(
            NoteId::new(),
            PitchKind::Pitched { step: Step::B, alter: 0, octave: 4 },
            960,
            DurationKind::Quarter,
            1,
            1,
        );
        note.stem_direction = Some(crate::domain::NoteStemDirection::Up);

        let mut measure = Measure::new(MeasureId::new(), 1);
        measure.elements.push(MeasureElement::Note(note));

        let column_x = HashMap::from([(0, 0.0)]);
        let key = DomainKeySignature::new(0).unwrap();
        let stem_config = StemConfiguration::default();
        let beamed_notes = std::collections::HashSet::new();
        let input = basic_input(&measure, &column_x, key, &stem_config, &beamed_notes);
        let metrics = crate::layout::metrics::BravuraMetrics;
        let output = engrave_measure_notes(&input, &metrics);

        let stem = output
            .elements
            .iter()
            .find_map(|e| match e {
                EngravedElement::Stem(s) => Some(s),
                _ => None,
            })
            .unwrap();
        assert_eq!(stem.direction, StemDirection::Up);
    }

    #[test]
    fn chord_accidentals_stack_into_separate_columns() {
        let root = Note::new(
            NoteId::new(),
            PitchKind::Pitched { step: Step::B, alter: 1, octave: 4 },
            960,
            DurationKind::Quarter,
            1,
            1,
        );
        let mut second = Note::new(
            NoteId::new(),
            PitchKind::Pitched { step: Step::C, alter: 1, octave: 5 },
            960,
            DurationKind::Quarter,
            1,
            1,
        );
        second.is_chord_tone = true;

        let mut measure = Measure::new(MeasureId::new(), 1);
        measure.elements.push(MeasureElement::Note(root));
        measure.elements.push(MeasureElement::Note(second));

        let column_x = HashMap::from([(0, 100.0)]);
        let key = DomainKeySignature::new(0).unwrap();
        let stem_config = StemConfiguration::default();
        let beamed_notes = std::collections::HashSet::new();
        let input = basic_input(&measure, &column_x, key, &stem_config, &beamed_notes);
        let metrics = crate::layout::metrics::BravuraMetrics;
        let output = engrave_measure_notes(&input, &metrics);

        let accidental_xs: Vec<f64> = output
            .elements
            .iter()
            .filter_map(|e| match e {
                EngravedElement::Accidental(glyph) => Some(glyph.position.x),
                _ => None,
            })
            .collect();
        assert_eq!(accidental_xs.len(), 2);
        assert_ne!(accidental_xs[0], accidental_xs[1]);
    }

    #[test]
    fn empty_measure_produces_no_elements() {
        let measure = Measure::new(MeasureId::new(), 1);
        let column_x = HashMap::new();
        let key = DomainKeySignature::new(0).unwrap();
        let stem_config = StemConfiguration::default();
        let beamed_notes = std::collections::HashSet::new();
        let input = MeasureEngravingInput {
            measure: &measure,
            staff_number: 1,
            clef: Clef::Treble,
            key,
            column_x: &column_x,
            staff_center_y: 0.0,
            points_per_staff_space: 10.0,
            stem_config: &stem_config,
            beamed_notes: &beamed_notes,
        };
        let metrics = crate::layout::metrics::BravuraMetrics;
        let output = engrave_measure_notes(&input, &metrics);
        assert!(output.elements.is_empty());
        assert!(output.right_barline.is_none());
        assert!(output.note_points.is_empty());
    }
}
