//! Inbound port: how a caller hands a score to the engine (§6).
//!
//! Kept as an interface only — no MusicXML or other concrete parser ships
//! in this crate; grounded on the teacher's `ports::importers::IMusicXMLImporter`,
//! which is likewise a pure trait with adapters living outside the layout
//! module.

use crate::domain::Score;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ImportError {
    #[error("malformed source: {0}")]
    Malformed(String),
}

pub trait ScoreImporter {
    fn import(&self, source: &[u8]) -> Result<Score, ImportError>;
}
