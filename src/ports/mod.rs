//! Port traits: the seams between this layout engine and the callers that
//! feed it scores, supply glyph metrics, or consume its output (§6). Every
//! type in this module is an interface; no adapter is implemented here.

pub mod glyph_advance;
pub mod importer;
pub mod renderer;

pub use glyph_advance::GlyphAdvance;
pub use importer::{ImportError, ScoreImporter};
pub use renderer::ScoreRenderer;
