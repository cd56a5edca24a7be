//! Error types for gflow and extraction.

use thiserror::Error;

use alsvid_zx::VertexId;

/// Errors that can occur during gflow computation or circuit extraction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The graph is not in the graph-like form extraction requires.
    #[error("Extraction requires a graph-like diagram: {0}")]
    NotGraphLike(String),

    /// The graph has no generalized flow.
    #[error("The diagram has no gflow; extraction cannot proceed ({} vertices unresolved)", failed.len())]
    NoGFlow {
        /// Vertices no layer could absorb.
        failed: Vec<VertexId>,
    },

    /// The extractor could not make progress (internal inconsistency or a
    /// diagram outside the supported fragment).
    #[error("Extraction stalled at iteration {iteration}: {reason}")]
    NoProgress {
        /// Iteration at which the stall was detected.
        iteration: usize,
        /// What the extractor was missing.
        reason: String,
    },

    /// Cooperative stop observed mid-extraction.
    #[error("Extraction was interrupted")]
    Cancelled,

    /// Circuit construction failed.
    #[error("Circuit construction failed: {0}")]
    Circuit(#[from] alsvid_qcir::QcirError),
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
