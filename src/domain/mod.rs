//! The input data model (§3): the score the layout engine consumes,
//! independent of any particular serialization or import pipeline.

pub mod attributes;
pub mod errors;
pub mod ids;
pub mod measure;
pub mod note;
pub mod part;
pub mod pitch;
pub mod score;

pub use attributes::{Attributes, ClefChange, KeySignature, TimeSignature, TimeSignatureSymbol};
pub use errors::DomainError;
pub use ids::{MeasureId, NoteId, PartId};
pub use measure::{
    BarStyle, Barline, BarlineLocation, BreakHint, Direction, DirectionKind, Measure,
    MeasureElement, Placement, Print,
};
pub use note::{
    Accidental, Articulation, BeamEntry, BeamEntryKind, DurationKind, Note, NoteheadStyle,
    Notations, SlurRef, SlurRole, StemDirection as NoteStemDirection, TieKind,
};
pub use part::{InstrumentFamily, Part};
pub use pitch::{Clef, PitchKind, Step};
pub use score::{Score, ScoreCredits, ScoreDefaults};
