//! Alsvid circuit representation
//!
//! A minimal gate-list circuit ([`QCir`]) over the Clifford+T+rotation gate
//! set, with a petgraph DAG backbone for topological order and depth, and
//! the gate-by-gate bridge into the ZX graph engine
//! ([`QCir::to_zx_graph`]). The extractor in `alsvid-extract` produces
//! circuits of this type; the simplifier consumes their ZX translations.
//!
//! # Example
//!
//! ```rust
//! use alsvid_qcir::{QCir, QubitId};
//!
//! let mut bell = QCir::with_qubits(2);
//! bell.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let zx = bell.to_zx_graph().unwrap();
//! assert!(zx.is_valid());
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod to_zx;

pub use circuit::QCir;
pub use error::{QcirError, QcirResult};
pub use gate::{GateType, QCirGate, QubitId};
