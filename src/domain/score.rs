//! The score: an ordered list of parts plus page defaults and page-one
//! credit metadata (§3, §4.8).

use serde::{Deserialize, Serialize};

use super::part::Part;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreDefaults {
    pub page_width_tenths: Option<f64>,
    pub page_height_tenths: Option<f64>,
    pub tenths_per_staff_space: Option<f64>,
    pub millimeters_per_staff_space: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreCredits {
    /// From the work/movement title.
    pub title: Option<String>,
    /// From the first creator element whose type is "composer".
    pub composer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    pub parts: Vec<Part>,
    pub defaults: ScoreDefaults,
    pub credits: ScoreCredits,
}

impl Score {
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            parts,
            defaults: ScoreDefaults::default(),
            credits: ScoreCredits::default(),
        }
    }

    /// Number of measures in the first part, used as the measure count for
    /// the whole score: every part is assumed to share a measure count
    /// (an unequal part is a [`crate::error::WarningCategory::MissingElements`]
    /// condition the director records rather than a hard failure).
    pub fn measure_count(&self) -> usize {
        self.parts.first().map_or(0, |p| p.measures.len())
    }
}
