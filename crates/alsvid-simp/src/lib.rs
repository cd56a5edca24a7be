//! Alsvid simplification engine
//!
//! The rewrite-rule catalog and the fixed-point [`Simplifier`] that drives
//! it. Rules are pure matchers with batch appliers (see
//! [`rules::RewriteRule`]); strategies (`full_reduce`, `clifford_simp`,
//! `dynamic_reduce`, `symbolic_reduce`) are compositions of rule loops with
//! cooperative cancellation between iterations.
//!
//! # Example
//!
//! ```rust
//! use alsvid_qcir::{QCir, QubitId};
//! use alsvid_simp::Simplifier;
//!
//! let mut c = QCir::with_qubits(1);
//! c.h(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
//! let mut g = c.to_zx_graph().unwrap();
//!
//! Simplifier::new(&mut g).full_reduce();
//! assert!(g.is_identity());
//! ```

pub mod rules;
pub mod simplifier;

pub use rules::{RULE_NAMES, RewriteRule, RuleMatch, rule_by_name};
pub use simplifier::{Recipe, Simplifier};
