//! Error types for the circuit crate.

use thiserror::Error;

use crate::gate::QubitId;

/// Errors that can occur in circuit operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QcirError {
    /// Qubit not present in the circuit.
    #[error("Qubit {0} not found in circuit")]
    QubitNotFound(QubitId),

    /// The same qubit was passed twice to one gate.
    #[error("Duplicate qubit {qubit} in {gate} gate")]
    DuplicateQubit {
        /// The repeated qubit.
        qubit: QubitId,
        /// Name of the gate.
        gate: String,
    },

    /// Wrong number of operands for a gate.
    #[error("Gate '{gate}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate: String,
        /// Expected operand count.
        expected: usize,
        /// Provided operand count.
        got: usize,
    },

    /// ZX translation failed.
    #[error("ZX translation failed: {0}")]
    Zx(#[from] alsvid_zx::ZxError),
}

/// Result type for circuit operations.
pub type QcirResult<T> = Result<T, QcirError>;
