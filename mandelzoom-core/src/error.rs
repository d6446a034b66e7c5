//! View state error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid {field} coordinate {input:?}: {reason}")]
    InvalidCoordinate {
        field: &'static str,
        input: String,
        reason: String,
    },

    #[error("radius must be positive and finite")]
    NonPositiveRadius,

    #[error("zoom factor must be positive and finite, got {0}")]
    InvalidZoomFactor(f64),
}
