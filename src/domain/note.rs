//! The note measure element and its notation attachments (§3).

use serde::{Deserialize, Serialize};

use super::ids::NoteId;
use super::pitch::PitchKind;

/// Printed note value, independent of the tick duration (a dotted quarter
/// and a tied quarter+eighth can share a tick duration but never a visual
/// duration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationKind {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
}

impl DurationKind {
    /// Number of flags/beam hooks this value needs when unbeamed (0 for
    /// quarter notes and longer).
    pub fn flag_count(self) -> u8 {
        match self {
            DurationKind::Whole | DurationKind::Half | DurationKind::Quarter => 0,
            DurationKind::Eighth => 1,
            DurationKind::Sixteenth => 2,
            DurationKind::ThirtySecond => 3,
            DurationKind::SixtyFourth => 4,
        }
    }

    /// Whether this value is short enough to participate in beaming
    /// (eighth note or shorter).
    pub fn is_beamable(self) -> bool {
        self.flag_count() > 0
    }
}

/// Explicit accidental attached to a note (as opposed to one inferred from
/// key-signature/measure-scoped accidental tracking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
}

/// Notehead rendering style; most notes use `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteheadStyle {
    Normal,
    Cross,
    Diamond,
    Slash,
    XNote,
}

impl Default for NoteheadStyle {
    fn default() -> Self {
        NoteheadStyle::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieKind {
    Start,
    Stop,
}

/// An explicit stem direction carried on the note itself, overriding the
/// engraver's positional default (§3, §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StemDirection {
    Up,
    Down,
}

/// One beam level's state for this note (§4.7). `level` 1 is the primary
/// beam; `level` ≥ 2 is a secondary beam. Per the engraver's scope, only
/// the primary beam is geometrically rendered — secondary levels are
/// carried through as data for a future renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamEntry {
    pub level: u8,
    pub kind: BeamEntryKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamEntryKind {
    Begin,
    Continue,
    End,
    ForwardHook,
    BackwardHook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Articulation {
    Staccato,
    Accent,
    Tenuto,
    Marcato,
    Staccatissimo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlurRole {
    Start,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlurRef {
    pub number: u8,
    pub role: SlurRole,
}

/// Notations attached to a note beyond pitch/duration/beam state: the
/// collision resolver (§4.6) stacks and clears these around the notehead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notations {
    pub articulations: Vec<Articulation>,
    pub slurs: Vec<SlurRef>,
}

/// Which of a chord's notes carries the stem, accidental-column, and
/// articulation placement for that vertical sonority (§4.6, §4.7): the
/// engraver treats one note per chord as the "written" note for shared
/// elements and the rest as `is_chord_tone` additions to its notehead
/// column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub pitch: PitchKind,
    /// Duration in divisions (ticks), per the measure's current `divisions`
    /// attribute.
    pub duration_ticks: u32,
    pub visual_duration: DurationKind,
    pub dot_count: u8,
    pub voice: u8,
    pub staff: u8,
    pub is_chord_tone: bool,
    pub notehead_style: NoteheadStyle,
    pub beams: Vec<BeamEntry>,
    pub ties: Vec<TieKind>,
    pub accidental: Option<Accidental>,
    pub notations: Notations,
    /// Explicit stem direction, if the source notated one; `None` falls
    /// back to the engraver's staff-position rule (§4.7).
    pub stem_direction: Option<StemDirection>,
}

impl Note {
    pub fn new(
        id: NoteId,
        pitch: PitchKind,
        duration_ticks: u32,
        visual_duration: DurationKind,
        voice: u8,
        staff: u8,
    ) -> Self {
        Self {
            id,
            pitch,
            duration_ticks,
            visual_duration,
            dot_count: 0,
            voice,
            staff,
            is_chord_tone: false,
            notehead_style: NoteheadStyle::Normal,
            beams: Vec::new(),
            ties: Vec::new(),
            accidental: None,
            notations: Notations::default(),
            stem_direction: None,
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.pitch, PitchKind::Rest)
    }
}
