//! Alsvid ZX graph engine
//!
//! This crate provides the core data structures of the Alsvid compiler:
//! exact rational [`Phase`]s, the [`ZxGraph`] labeled multigraph of spiders
//! and boundaries, the [`ZxGraphMgr`] store the shell drives, and the `.zx`
//! file format. Rewrite rules, simplification strategies, tensor evaluation
//! and circuit extraction live in the sibling crates and operate on the
//! types defined here.
//!
//! # Core components
//!
//! - **Phases**: [`Phase`] — rational multiples of π in `(-1, 1]`
//! - **Vertices and edges**: [`VertexId`], [`VertexType`], [`EdgeType`],
//!   [`ZxVertex`]
//! - **Graph**: [`ZxGraph`] with canonicalizing mutation primitives
//! - **Scalar**: [`Scalar`] — the global normalization factor rewrites track
//! - **Manager**: [`ZxGraphMgr`] — integer-keyed graph store
//! - **Interrupt**: [`stop_requested`] — cooperative cancellation flag
//!
//! # Example: building and inspecting a CNOT
//!
//! ```rust
//! use alsvid_zx::{EdgeType, Phase, VertexType, ZxGraph};
//!
//! let mut g = ZxGraph::new();
//! let i0 = g.add_input(0).unwrap();
//! let i1 = g.add_input(1).unwrap();
//! let z = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
//! let x = g.add_vertex(1, VertexType::XSpider, Phase::zero());
//! let o0 = g.add_output(0).unwrap();
//! let o1 = g.add_output(1).unwrap();
//! g.add_edge(i0, z, EdgeType::Simple).unwrap();
//! g.add_edge(z, o0, EdgeType::Simple).unwrap();
//! g.add_edge(i1, x, EdgeType::Simple).unwrap();
//! g.add_edge(x, o1, EdgeType::Simple).unwrap();
//! g.add_edge(z, x, EdgeType::Simple).unwrap();
//!
//! assert!(g.is_valid());
//! assert_eq!(g.num_edges(), 5);
//! ```

pub mod error;
pub mod graph;
pub mod interrupt;
pub mod io;
pub mod manager;
pub mod phase;
pub mod scalar;
pub mod vertex;

pub use error::{ZxError, ZxResult};
pub use graph::{Edge, ZxGraph};
pub use interrupt::{clear_stop, request_stop, stop_requested};
pub use manager::ZxGraphMgr;
pub use phase::Phase;
pub use scalar::Scalar;
pub use vertex::{EdgeType, VertexId, VertexType, ZxVertex};
