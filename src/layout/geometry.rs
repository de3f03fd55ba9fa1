//! The engraved output tree (§3): pages of systems of staff groups of
//! positioned elements, plus geometry primitives shared across the layout
//! modules.
//!
//! Grounded on the teacher's `layout::types` (`GlobalLayout`/`System`/
//! `StaffGroup`/`Staff`/`BoundingBox`/`Point`/`Color`/`round_f32`), widened
//! from a single flat glyph-run shape into the element variants §4.7's
//! engraver and §4.6's collision resolver need. The teacher's `mod.rs` and
//! `positioner.rs` reference a `BarLine`/`BarLineType` pair that was never
//! defined in that snapshot; they are defined here properly.

use serde::{Deserialize, Serialize, Serializer};

use crate::domain::{MeasureId, NoteId, PartId};
use crate::error::LayoutWarning;

/// Serializes an `f64` rounded to three decimal places, so that two layout
/// runs over identical input produce byte-identical JSON (§8 determinism).
pub fn round_f64<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 1000.0).round() / 1000.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(serialize_with = "round_f64")]
    pub x: f64,
    #[serde(serialize_with = "round_f64")]
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(serialize_with = "round_f64")]
    pub x: f64,
    #[serde(serialize_with = "round_f64")]
    pub y: f64,
    #[serde(serialize_with = "round_f64")]
    pub width: f64,
    #[serde(serialize_with = "round_f64")]
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
    pub fn top(&self) -> f64 {
        self.y
    }
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Minimum-axis displacement that would separate `self` from `other`,
    /// choosing whichever axis needs the smaller push (§4.6).
    pub fn minimum_axis_displacement(&self, other: &Rect) -> Point {
        if !self.intersects(other) {
            return Point::new(0.0, 0.0);
        }
        let push_right = other.right() - self.left();
        let push_left = self.right() - other.left();
        let push_down = other.bottom() - self.top();
        let push_up = self.bottom() - other.top();

        let x_push = if push_right < push_left {
            push_right
        } else {
            -push_left
        };
        let y_push = if push_down < push_up {
            push_down
        } else {
            -push_up
        };

        if x_push.abs() < y_push.abs() {
            Point::new(x_push, 0.0)
        } else {
            Point::new(0.0, y_push)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
}

/// Orchestral grouping connector a [`EngravedStaffGroup`] draws at its
/// left edge (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketType {
    Brace,
    Bracket,
    None,
}

/// Barline rendering style. Referenced but never defined by the module
/// this engine is grounded on; defined here to cover every MusicXML
/// bar-style value the `Attributes`/`Barline` measure elements can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarLineType {
    Single,
    Double,
    Final,
    StartRepeat,
    EndRepeat,
    EndStartRepeat,
    Dashed,
    Dotted,
    Heavy,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarLine {
    #[serde(serialize_with = "round_f64")]
    pub x: f64,
    pub bar_type: BarLineType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
    #[serde(serialize_with = "round_f64")]
    pub thickness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSegment {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

/// A single SMuFL glyph placed at a point, carrying the source note/rest
/// it renders so callers can trace output back to input (§9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedGlyph {
    pub position: Point,
    pub codepoint: String,
    pub source_note: Option<NoteId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StemDirection {
    Up,
    Down,
}

impl From<crate::domain::NoteStemDirection> for StemDirection {
    fn from(direction: crate::domain::NoteStemDirection) -> Self {
        match direction {
            crate::domain::NoteStemDirection::Up => StemDirection::Up,
            crate::domain::NoteStemDirection::Down => StemDirection::Down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngravedStem {
    #[serde(serialize_with = "round_f64")]
    pub x: f64,
    #[serde(serialize_with = "round_f64")]
    pub y_start: f64,
    #[serde(serialize_with = "round_f64")]
    pub y_end: f64,
    pub direction: StemDirection,
    #[serde(serialize_with = "round_f64")]
    pub thickness: f64,
    /// The note this stem belongs to, so a later beam-geometry pass can
    /// find and re-shift it once its group's beam line is known.
    pub source_note: Option<NoteId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamSegment {
    pub start: Point,
    pub end: Point,
    #[serde(serialize_with = "round_f64")]
    pub thickness: f64,
}

/// A rendered beam group (§4.7). Only the primary beam (level 1) is
/// geometrically rendered; `reserved_secondary_levels` carries the beam
/// levels the source data specified beyond the primary, so a future
/// renderer can add hooks/sub-beams without the notes needing re-grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngravedBeamGroup {
    pub note_ids: Vec<NoteId>,
    pub primary_beam: BeamSegment,
    pub reserved_secondary_levels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngravedTimeSignature {
    pub numerator_glyphs: Vec<PositionedGlyph>,
    pub denominator_glyphs: Vec<PositionedGlyph>,
    pub symbol_glyph: Option<PositionedGlyph>,
}

/// One positioned piece of engraved output. Variants correspond to the
/// glyph and line families the engraver (§4.7) emits and the collision
/// resolver (§4.6) operates on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngravedElement {
    Notehead(PositionedGlyph),
    Rest(PositionedGlyph),
    Stem(EngravedStem),
    Flag(PositionedGlyph),
    BeamGroup(EngravedBeamGroup),
    Clef(PositionedGlyph),
    KeySignature(Vec<PositionedGlyph>),
    TimeSignature(EngravedTimeSignature),
    Accidental(PositionedGlyph),
    Articulation(PositionedGlyph),
    Dynamic(PositionedGlyph),
    Tie(CurveSegment),
    Slur(CurveSegment),
    LedgerLine(LineSegment),
    StaffLine(LineSegment),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngravedStaff {
    pub part_id: PartId,
    pub staff_number: u8,
    #[serde(serialize_with = "round_f64")]
    pub y_offset: f64,
    pub elements: Vec<EngravedElement>,
    pub bounding_box: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngravedStaffGroup {
    pub part_ids: Vec<PartId>,
    pub bracket: BracketType,
    /// Full barline connections vs. mensurstrich (gapped, per-staff only)
    /// barlines between this group's staves (§4.5).
    pub full_barlines: bool,
    pub staves: Vec<EngravedStaff>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngravedMeasureColumn {
    pub measure_id: MeasureId,
    pub number: u32,
    #[serde(serialize_with = "round_f64")]
    pub x_start: f64,
    #[serde(serialize_with = "round_f64")]
    pub x_end: f64,
    pub left_barline: Option<BarLine>,
    pub right_barline: Option<BarLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngravedSystem {
    pub index: u32,
    #[serde(serialize_with = "round_f64")]
    pub y: f64,
    #[serde(serialize_with = "round_f64")]
    pub height: f64,
    /// Whether an outer bracket spans every staff group, drawn when the
    /// ensemble mixes more than one orchestral family (§4.5).
    pub outer_bracket: bool,
    pub staff_groups: Vec<EngravedStaffGroup>,
    pub measures: Vec<EngravedMeasureColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub position: Point,
    pub text: String,
    #[serde(serialize_with = "round_f64")]
    pub font_size_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngravedPage {
    pub index: u32,
    #[serde(serialize_with = "round_f64")]
    pub width: f64,
    #[serde(serialize_with = "round_f64")]
    pub height: f64,
    pub systems: Vec<EngravedSystem>,
    pub credits: Vec<TextElement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngravedScore {
    pub pages: Vec<EngravedPage>,
    pub warnings: Vec<LayoutWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert_eq!(a.minimum_axis_displacement(&b), Point::new(0.0, 0.0));
    }

    #[test]
    fn overlapping_rects_push_along_smaller_axis() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(8.0, 0.0, 10.0, 100.0);
        let push = a.minimum_axis_displacement(&b);
        assert!(push.y == 0.0 || push.x != 0.0);
    }
}
