//! Alsvid extraction
//!
//! Turns a simplified, graph-like ZX diagram back into a gate circuit.
//! [`GFlowCalculator`] computes the generalized flow that witnesses
//! extractability; [`Extractor`] peels the diagram from outputs to inputs,
//! emitting Clifford+T gates, with CNOT synthesis driven by GF(2) Gaussian
//! elimination over [`BooleanMatrix`].
//!
//! # Example
//!
//! ```rust
//! use alsvid_extract::{Extractor, ExtractorOptions};
//! use alsvid_zx::{EdgeType, Phase, VertexType, ZxGraph};
//!
//! // A single wire carrying a T rotation.
//! let mut g = ZxGraph::new();
//! let i = g.add_input(0).unwrap();
//! let z = g.add_vertex(0, VertexType::ZSpider, Phase::new(1, 4));
//! let o = g.add_output(0).unwrap();
//! g.add_edge(i, z, EdgeType::Simple).unwrap();
//! g.add_edge(z, o, EdgeType::Simple).unwrap();
//!
//! let result = Extractor::new(&mut g, ExtractorOptions::default())
//!     .unwrap()
//!     .extract()
//!     .unwrap();
//! assert_eq!(result.circuit.num_gates(), 1);
//! ```

pub mod error;
pub mod extractor;
pub mod gf2;
pub mod gflow;

pub use error::{ExtractError, ExtractResult};
pub use extractor::{Extraction, Extractor, ExtractorOptions};
pub use gf2::BooleanMatrix;
pub use gflow::{GFlow, GFlowCalculator, MeasurementPlane};
