//! A part (instrument line) and its orchestral grouping metadata (§3, §4.5).

use serde::{Deserialize, Serialize};

use super::ids::PartId;
use super::measure::Measure;

/// Instrument family, used by the orchestral grouping inference (§4.5) to
/// decide bracket type and adjacency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentFamily {
    Woodwinds,
    Brass,
    Percussion,
    Keyboards,
    Voices,
    Strings,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    pub abbreviation: Option<String>,
    pub staff_count: u8,
    pub family: InstrumentFamily,
    pub measures: Vec<Measure>,
}

impl Part {
    pub fn new(id: PartId, name: impl Into<String>, staff_count: u8) -> Self {
        Self {
            id,
            name: name.into(),
            abbreviation: None,
            staff_count,
            family: InstrumentFamily::Other,
            measures: Vec::new(),
        }
    }

    /// Multi-staff parts (grand staff keyboards, harp) and any part whose
    /// family is `Keyboards` take a brace rather than a bracket (§4.5).
    pub fn takes_brace(&self) -> bool {
        self.staff_count > 1 || self.family == InstrumentFamily::Keyboards
    }
}
