//! Alsvid tensor evaluation
//!
//! Dense tensor semantics for ZX graphs: the [`QTensor`] type (an ndarray
//! of complex amplitudes with axis bookkeeping) and the frontier-walk
//! evaluator [`to_tensor`] / [`to_matrix`] used for equivalence checking.
//! Two graphs represent the same linear map when their matrices agree up to
//! the global scalar — see [`equivalent_up_to_scalar`].
//!
//! # Example: checking a circuit against its graph
//!
//! ```rust
//! use alsvid_qcir::{QCir, QubitId};
//! use alsvid_tensor::{equivalent_up_to_scalar, to_matrix};
//!
//! let mut c = QCir::with_qubits(2);
//! c.cx(QubitId(0), QubitId(1)).unwrap();
//! let g = c.to_zx_graph().unwrap();
//!
//! let m = to_matrix(&g).unwrap();
//! assert_eq!(m.dim(), (4, 4));
//! assert!(equivalent_up_to_scalar(&m, &m, 1e-9));
//! ```

pub mod error;
pub mod qtensor;
pub mod zx2ts;

pub use error::{TensorError, TensorResult};
pub use qtensor::{
    MAX_AXES, QTensor, check_axis_budget, cosine_similarity, equivalent_up_to_scalar,
    max_abs_diff, tensor_product, tensor_product_pow, tensordot,
};
pub use zx2ts::{to_matrix, to_tensor};
