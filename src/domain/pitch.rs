//! Pitch variants and the diatonic step arithmetic the engraver uses to
//! turn a pitch into a staff position (§4.7).

use serde::{Deserialize, Serialize};

/// A diatonic letter name, independent of octave or accidental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    /// 0-based rank within the diatonic scale: C=0 .. B=6.
    pub fn rank(self) -> i32 {
        match self {
            Step::C => 0,
            Step::D => 1,
            Step::E => 2,
            Step::F => 3,
            Step::G => 4,
            Step::A => 5,
            Step::B => 6,
        }
    }
}

/// Clef types the engraver positions noteheads against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clef {
    Treble,
    Bass,
    Alto,
    Tenor,
    /// Unpitched staff (percussion); noteheads map through `Unpitched`'s
    /// display-step/display-octave using the treble-like mapping §4.7 calls
    /// for, so this variant reuses `Treble`'s reference point.
    Percussion,
}

impl Clef {
    /// Staff line (1 = bottom) the clef's defining curl/loop sits on, used
    /// to compute the clef glyph's own Y offset:
    /// `(clef.line − 3) · 2 · half_space` below the centre line.
    pub fn line(self) -> i8 {
        match self {
            Clef::Treble | Clef::Percussion => 2,
            Clef::Bass => 4,
            Clef::Alto => 3,
            Clef::Tenor => 4,
        }
    }

    /// `(reference_octave, reference_step_rank)` for the diatonic note that
    /// sits on the staff's centre line (staff position 0).
    fn reference(self) -> (i32, i32) {
        match self {
            Clef::Treble | Clef::Percussion => (4, Step::B.rank()),
            Clef::Bass => (3, Step::D.rank()),
            Clef::Alto => (4, Step::C.rank()),
            Clef::Tenor => (3, Step::A.rank()),
        }
    }

    /// §4.7 staff-position formula:
    /// `diatonic = (octave − ref_octave)·7 + step_rank − ref_step_rank`,
    /// `staff_pos = diatonic + ref_staff_pos` (ref_staff_pos is always 0:
    /// staff position 0 is, by construction, the centre line).
    pub fn staff_position(self, step: Step, octave: i32) -> i32 {
        let (ref_octave, ref_step_rank) = self.reference();
        (octave - ref_octave) * 7 + step.rank() - ref_step_rank
    }
}

/// A note's pitch, in one of three variants (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchKind {
    Pitched {
        step: Step,
        /// Semitone alteration: +1 sharp, -1 flat, 0 natural, ±2 double.
        alter: i8,
        octave: i8,
    },
    Unpitched {
        display_step: Step,
        display_octave: i8,
    },
    Rest,
}

impl PitchKind {
    /// Staff position (0 = centre line) for this pitch under the given
    /// clef. Rests have no staff position of their own; callers place the
    /// rest glyph at the centre line directly and never call this.
    pub fn staff_position(&self, clef: Clef) -> i32 {
        match *self {
            PitchKind::Pitched { step, octave, .. } => {
                clef.staff_position(step, octave as i32)
            }
            PitchKind::Unpitched {
                display_step,
                display_octave,
            } => Clef::Treble.staff_position(display_step, display_octave as i32),
            PitchKind::Rest => 0,
        }
    }
}
