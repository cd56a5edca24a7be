//! Error types for the ZX graph crate.

use crate::vertex::VertexId;
use thiserror::Error;

/// Errors that can occur in ZX graph operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ZxError {
    /// Vertex not found in graph.
    #[error("Vertex {0} not found in graph")]
    VertexNotFound(VertexId),

    /// Qubit already has an input boundary.
    #[error("Qubit {0} already has an input boundary")]
    InputExists(i32),

    /// Qubit already has an output boundary.
    #[error("Qubit {0} already has an output boundary")]
    OutputExists(i32),

    /// Edge would violate a boundary's degree-1 invariant.
    #[error("Cannot add edge {u}--{v}: boundary vertex {boundary} already has a neighbor")]
    BoundaryDegree {
        /// First endpoint.
        u: VertexId,
        /// Second endpoint.
        v: VertexId,
        /// The boundary vertex that is already connected.
        boundary: VertexId,
    },

    /// Self-loop on a vertex type that cannot absorb it.
    #[error("Cannot add a self-loop on {vertex} ({vtype})")]
    InvalidSelfLoop {
        /// The vertex.
        vertex: VertexId,
        /// Its type, rendered for the message.
        vtype: String,
    },

    /// No boundary exists on the requested qubit.
    #[error("Qubit {qubit} has no {} boundary", side_name(.input))]
    NoBoundary {
        /// The qubit index.
        qubit: i32,
        /// True when the input side was requested.
        input: bool,
    },

    /// Composition with mismatched boundary qubits.
    #[error("Cannot compose: output qubits {outputs:?} do not match input qubits {inputs:?}")]
    QubitMismatch {
        /// Output qubits of the left graph.
        outputs: Vec<i32>,
        /// Input qubits of the right graph.
        inputs: Vec<i32>,
    },

    /// Malformed `.zx` input.
    #[error("Failed to parse .zx input at line {line}: {reason}")]
    Parse {
        /// 1-indexed line number.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// Graph id not found in the manager.
    #[error("No graph with id {0}")]
    GraphNotFound(usize),

    /// No graph is currently in focus.
    #[error("No graph is in focus")]
    NoFocus,
}

/// Helper function naming a boundary side for messages.
fn side_name(input: &bool) -> &'static str {
    if *input { "input" } else { "output" }
}

/// Result type for ZX graph operations.
pub type ZxResult<T> = Result<T, ZxError>;
