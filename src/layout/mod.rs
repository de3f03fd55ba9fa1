//! The layout engine (§4): horizontal spacing, system breaking, vertical
//! stacking, orchestral grouping, collision resolution primitives, and
//! per-staff engraving, wired together by [`director::layout_score`].
//!
//! Grounded on the teacher's `layout::mod`, which held `compute_layout`
//! directly alongside its submodules; that entry point is now
//! [`director::layout_score`] and the submodule list has grown to match
//! this engine's wider scope (§4.1-§4.8).

pub mod beams;
pub mod breaker;
pub mod collide;
pub mod config;
pub mod director;
pub mod engraver;
pub mod geometry;
pub mod hspacing;
pub mod metrics;
pub mod orchestral;
pub mod stems;
pub mod vspacing;

pub use config::LayoutConfiguration;
pub use director::layout_score;
pub use geometry::EngravedScore;
