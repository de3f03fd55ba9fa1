use serde::{Deserialize, Serialize};

/// Domain-level errors raised by smart constructors on the score model.
///
/// Distinct from [`crate::error::ConfigError`]: this covers malformed
/// *input* values (an out-of-range key signature, a zero duration), not
/// misconfiguration of the layout engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DomainError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}
