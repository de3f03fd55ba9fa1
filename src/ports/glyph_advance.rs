//! Outbound query port for glyph advance widths (§6).
//!
//! Generalized from the teacher's `layout::metrics` table lookup into a
//! narrow trait so the engine never depends on which font metrics source
//! a caller chooses; [`crate::layout::metrics::BravuraMetrics`] is the
//! built-in default implementation.

/// Queries the advance width, in staff-spaces, of a named SMuFL glyph.
pub trait GlyphAdvance {
    /// Advance width in staff-spaces, or `None` if the glyph is unknown to
    /// this provider. Callers fall back to a conservative configured
    /// default rather than treating `None` as an error.
    fn advance(&self, glyph_name: &str) -> Option<f64>;
}
