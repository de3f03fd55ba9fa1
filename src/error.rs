//! Engine-level error and warning types.
//!
//! Two distinct channels, per §7: a [`ConfigError`] aborts layout before it
//! starts (bad engine configuration — non-positive dimensions, negative
//! margins); a [`LayoutWarning`] is recorded and layout continues (model
//! inconsistencies, capacity overflow, beam anomalies). The warning shape
//! is modeled directly on the teacher's `ImportWarning`.

use serde::{Deserialize, Serialize};

/// Failures in engine configuration itself, detected up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum ConfigError {
    #[error("staff height must be positive, got {0}")]
    NonPositiveStaffHeight(f64),

    #[error("page width must be positive, got {0}")]
    NonPositivePageWidth(f64),

    #[error("page height must be positive, got {0}")]
    NonPositivePageHeight(f64),

    #[error("margin must not be negative: {side} = {value}")]
    NegativeMargin { side: &'static str, value: f64 },

    #[error("spacing factor must be within [0, 2], got {0}")]
    SpacingFactorOutOfRange(f64),

    #[error("minimum measure width must be positive, got {0}")]
    NonPositiveMinimumMeasureWidth(f64),
}

/// Severity of a recorded [`LayoutWarning`], mirroring the teacher's
/// `WarningSeverity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}

/// What a [`LayoutWarning`] is about, mirroring the teacher's
/// `WarningCategory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningCategory {
    /// A collision that could not be fully resolved within the available
    /// clearance budget.
    CollisionResolution,
    /// A measure, system, or page exceeded its capacity and was padded or
    /// split beyond the normal break search.
    CapacityOverflow,
    /// Beam grouping found notes it could not attach to any group (an
    /// orphaned beam continuation, a state-machine mismatch).
    BeamAnomaly,
    /// The source model was missing or contradicted data the engraver
    /// needed and a default was substituted.
    MissingElements,
}

/// A non-fatal issue recorded during layout, with enough positional
/// context to let a caller locate it in the source score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutWarning {
    pub severity: WarningSeverity,
    pub category: WarningCategory,
    pub message: String,
    pub measure_number: Option<u32>,
    pub part_id: Option<String>,
    pub staff_number: Option<u8>,
}

impl LayoutWarning {
    pub fn new(
        severity: WarningSeverity,
        category: WarningCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            measure_number: None,
            part_id: None,
            staff_number: None,
        }
    }

    pub fn with_measure(mut self, measure_number: u32) -> Self {
        self.measure_number = Some(measure_number);
        self
    }

    pub fn with_part(mut self, part_id: impl Into<String>) -> Self {
        self.part_id = Some(part_id.into());
        self
    }

    pub fn with_staff(mut self, staff_number: u8) -> Self {
        self.staff_number = Some(staff_number);
        self
    }
}
