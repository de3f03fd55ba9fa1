//! Outbound port: how an [`crate::layout::geometry::EngravedScore`] reaches
//! a concrete output format (§6). No renderer ships in this crate; this
//! trait is the seam a caller's SVG/PDF/canvas adapter implements.

use crate::layout::geometry::EngravedScore;

pub trait ScoreRenderer {
    type Output;
    type Error;

    fn render(&self, score: &EngravedScore) -> Result<Self::Output, Self::Error>;
}
