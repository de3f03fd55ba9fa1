//! The measure and its ordered element stream (§3).

use serde::{Deserialize, Serialize};

use super::attributes::Attributes;
use super::ids::MeasureId;
use super::note::Note;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarStyle {
    Regular,
    Dotted,
    Dashed,
    Heavy,
    LightLight,
    LightHeavy,
    HeavyLight,
    HeavyHeavy,
    Tick,
    Short,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarlineLocation {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barline {
    pub location: BarlineLocation,
    pub style: BarStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Above,
    Below,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DirectionKind {
    Dynamic(String),
    Words(String),
    Wedge,
    Pedal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Direction {
    pub kind: DirectionKind,
    pub placement: Placement,
    pub staff: u8,
}

/// A break hint a measure's `Print` element can carry, consumed by the
/// breaker (§4.3) alongside its capacity-driven search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakHint {
    Preferred,
    Required,
    Forbidden,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Print {
    pub new_system: bool,
    pub new_page: bool,
}

/// One element of a measure's ordered stream. `Forward`/`Backup` carry a
/// tick delta and let multiple voices interleave within one measure without
/// the engraver needing a separate per-voice timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MeasureElement {
    Attributes(Attributes),
    Note(Note),
    Direction(Direction),
    Barline(Barline),
    Print(Print),
    Forward(u32),
    Backup(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measure {
    pub id: MeasureId,
    pub number: u32,
    /// Author-supplied width hint, in tenths. When present the spacer
    /// (§4.2) treats it as a floor rather than computing from content.
    pub width_hint: Option<f64>,
    pub break_hint: Option<BreakHint>,
    pub elements: Vec<MeasureElement>,
}

impl Measure {
    pub fn new(id: MeasureId, number: u32) -> Self {
        Self {
            id,
            number,
            width_hint: None,
            break_hint: None,
            elements: Vec::new(),
        }
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.elements.iter().filter_map(|e| match e {
            MeasureElement::Note(n) => Some(n),
            _ => None,
        })
    }

    pub fn notes_mut(&mut self) -> impl Iterator<Item = &mut Note> {
        self.elements.iter_mut().filter_map(|e| match e {
            MeasureElement::Note(n) => Some(n),
            _ => None,
        })
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attributes> {
        self.elements.iter().filter_map(|e| match e {
            MeasureElement::Attributes(a) => Some(a),
            _ => None,
        })
    }

    /// Attributes in effect at the end of this measure, merging every
    /// `Attributes` element the measure contains in order. Used by the
    /// director (§4.8) to carry divisions/clef/key/time forward across
    /// measure boundaries.
    pub fn trailing_attributes(&self) -> Attributes {
        let mut merged = Attributes::default();
        for attrs in self.attributes() {
            if attrs.divisions.is_some() {
                merged.divisions = attrs.divisions;
            }
            if attrs.key.is_some() {
                merged.key = attrs.key;
            }
            if attrs.time.is_some() {
                merged.time = attrs.time;
            }
            if attrs.staves.is_some() {
                merged.staves = attrs.staves;
            }
            for clef in &attrs.clefs {
                merged.clefs.retain(|c| c.staff != clef.staff);
                merged.clefs.push(*clef);
            }
        }
        merged
    }
}
