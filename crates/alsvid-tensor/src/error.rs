//! Error types for tensor evaluation.

use thiserror::Error;

/// Errors that can occur while building or contracting tensors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TensorError {
    /// The contraction would exceed the axis budget (tensor too large to
    /// allocate).
    #[error("Tensor with {axes} axes exceeds the {max}-axis budget (2^{axes} amplitudes)")]
    TooManyAxes {
        /// Requested axis count.
        axes: usize,
        /// The configured budget.
        max: usize,
    },

    /// The graph fails its structural invariants.
    #[error("Cannot evaluate an invalid graph: {0}")]
    InvalidGraph(String),

    /// Cooperative stop observed mid-contraction.
    #[error("Tensor evaluation was interrupted")]
    Cancelled,

    /// Axis lists disagree with the tensor shape.
    #[error("Axis mismatch: {0}")]
    AxisMismatch(String),
}

/// Result type for tensor operations.
pub type TensorResult<T> = Result<T, TensorError>;
