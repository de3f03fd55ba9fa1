//! A music notation layout and engraving engine (§1).
//!
//! Takes a [`domain::Score`] — an ordered stream of measures per part,
//! independent of any particular import format — and produces an
//! [`layout::EngravedScore`]: positioned glyphs, stems, beams, and staff
//! geometry, deterministic and ready for a renderer adapter to draw (§6).
//!
//! ```text
//! domain::Score -> layout::layout_score(..) -> layout::EngravedScore
//! ```
//!
//! The engine does not parse any particular input format or draw to any
//! particular output format; [`ports`] defines the trait seams a caller's
//! importer and renderer adapters implement.

pub mod domain;
pub mod error;
pub mod layout;
pub mod ports;
pub mod units;

pub use domain::Score;
pub use error::{ConfigError, LayoutWarning};
pub use layout::{layout_score, EngravedScore, LayoutConfiguration};
