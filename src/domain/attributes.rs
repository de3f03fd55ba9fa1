//! Measure attributes: divisions, key/time signatures, clefs per staff.
//!
//! Grounded on the teacher's `value_objects.rs` newtype-with-smart-
//! constructor idiom (`KeySignature`, `BPM`), generalized to the fields
//! §3's `Attributes` measure element carries.

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use crate::domain::pitch::Clef;

/// Key signature expressed as a sharps/flats count: positive for sharps,
/// negative for flats, in the MusicXML `-7..=7` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySignature(i8);

impl KeySignature {
    pub fn new(fifths: i8) -> Result<Self, DomainError> {
        if !(-7..=7).contains(&fifths) {
            return Err(DomainError::ValidationError(format!(
                "key signature fifths out of range: {fifths}"
            )));
        }
        Ok(Self(fifths))
    }

    pub fn fifths(self) -> i8 {
        self.0
    }

    pub fn is_sharp_key(self) -> bool {
        self.0 > 0
    }

    pub fn is_flat_key(self) -> bool {
        self.0 < 0
    }
}

/// Time signature symbol display, independent of the numeric fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSignatureSymbol {
    Normal,
    Common,
    Cut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
    pub symbol: TimeSignatureSymbol,
}

impl TimeSignature {
    pub fn new(numerator: u8, denominator: u8) -> Result<Self, DomainError> {
        if numerator == 0 || denominator == 0 {
            return Err(DomainError::ValidationError(
                "time signature numerator and denominator must be nonzero".into(),
            ));
        }
        Ok(Self {
            numerator,
            denominator,
            symbol: TimeSignatureSymbol::Normal,
        })
    }

    pub fn common_time() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
            symbol: TimeSignatureSymbol::Common,
        }
    }

    pub fn cut_time() -> Self {
        Self {
            numerator: 2,
            denominator: 2,
            symbol: TimeSignatureSymbol::Cut,
        }
    }

    /// Whether this meter groups in threes (6/8, 9/8, 12/8 style compound
    /// meters), used by the auto-beam grouper (§4.7).
    pub fn is_compound(self) -> bool {
        self.denominator == 8 && self.numerator % 3 == 0 && self.numerator >= 6
    }
}

/// A clef assignment for one staff within a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClefChange {
    pub staff: u8,
    pub clef: Clef,
}

/// The attributes measure element: divisions, key/time signatures, clefs
/// per staff, staff count. Any field left `None` is inherited from the
/// most recent prior measure that set it (§3, §4.8).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attributes {
    /// Ticks per quarter note for this measure and subsequent ones, until
    /// overridden.
    pub divisions: Option<u32>,
    pub key: Option<KeySignature>,
    pub time: Option<TimeSignature>,
    pub clefs: Vec<ClefChange>,
    pub staves: Option<u8>,
}

impl Attributes {
    pub fn clef_for_staff(&self, staff: u8) -> Option<Clef> {
        self.clefs
            .iter()
            .find(|c| c.staff == staff)
            .map(|c| c.clef)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_signature_rejects_out_of_range_fifths() {
        assert!(KeySignature::new(8).is_err());
        assert!(KeySignature::new(-8).is_err());
        assert!(KeySignature::new(7).is_ok());
    }

    #[test]
    fn compound_meter_detection() {
        assert!(TimeSignature::new(6, 8).unwrap().is_compound());
        assert!(TimeSignature::new(9, 8).unwrap().is_compound());
        assert!(TimeSignature::new(12, 8).unwrap().is_compound());
        assert!(!TimeSignature::new(3, 8).unwrap().is_compound());
        assert!(!TimeSignature::new(4, 4).unwrap().is_compound());
    }
}
