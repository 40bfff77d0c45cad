//! Error types for clipping operations.

use thiserror::Error;

/// Largest coordinate magnitude accepted by the integer domain.
///
/// Leaves headroom so that coordinate differences and sums computed
/// during the sweep cannot overflow.
pub const MAX_COORD: i64 = i64::MAX >> 2;

/// Errors raised by the clipping API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClipperError {
    /// Decimal precision must lie within `-8..=8`.
    #[error("precision {0} is out of range (expected -8..=8)")]
    InvalidPrecision(i32),

    /// A scaled coordinate does not fit the integer domain.
    #[error("coordinate out of range after scaling")]
    CoordinateOutOfRange,

    /// The sweep hit an internal inconsistency and produced no solution.
    #[error("clipping failed")]
    ExecutionFailed,
}
