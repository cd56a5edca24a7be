//! The rewrite rule catalog.
//!
//! Every rule is a pure matcher plus a batch applier:
//!
//! ```text
//! find_matches(graph) -> Vec<RuleMatch>   // no mutation
//! apply(graph, matches)                   // preserves all graph invariants
//! ```
//!
//! Matchers return mutually compatible matches: their vertex supports are
//! pairwise disjoint, so `apply` can fire the whole batch without
//! re-matching. Appliers still re-check that their support is alive and
//! silently drop a match whose support was consumed, which keeps batch
//! application total even when callers compose rules.
//!
//! Appliers stage their changes in a [`RewriteBatch`] and commit through
//! the graph's primitive operations; the graph's edge canonicalization
//! turns staged edge toggles into the right Hopf/parallel reductions.

mod bialgebra;
mod hbox_fusion;
mod hrule;
mod id_removal;
mod local_comp;
mod phase_gadget;
mod pivot;
mod spider_fusion;
mod state_copy;

pub use bialgebra::Bialgebra;
pub use hbox_fusion::HBoxFusion;
pub use hrule::HRule;
pub use id_removal::IdRemoval;
pub use local_comp::LocalComplement;
pub use phase_gadget::PhaseGadgetFusion;
pub use pivot::{Pivot, PivotBoundary, PivotGadget, apply_pivot};
pub use spider_fusion::SpiderFusion;
pub use state_copy::StateCopy;

use alsvid_zx::{EdgeType, Phase, VertexId, ZxGraph};
use tracing::warn;

/// Match payloads, one shape per rule family.
#[derive(Debug, Clone)]
pub enum RuleMatch {
    /// A single vertex (H-rule, H-box fusion pivot point).
    Vertex(VertexId),
    /// A pair of vertices joined by the edge the rule fires on.
    Pair(VertexId, VertexId),
    /// An arity-2 vertex to cut out, with the reconnection edge type.
    Bypass {
        /// The vertex to remove.
        vertex: VertexId,
        /// One neighbor.
        left: VertexId,
        /// The other neighbor.
        right: VertexId,
        /// Edge type joining `left` and `right` afterwards.
        etype: EdgeType,
    },
    /// A Pauli state spider and the spider it copies through.
    Copy {
        /// The degree-1 spider carrying the state.
        state: VertexId,
        /// The spider the state is pushed through.
        host: VertexId,
    },
    /// Phase gadgets on the same support: the survivor and the gadgets
    /// folded into it, each as `(axis, leaf)`.
    GadgetFusion {
        /// Surviving gadget.
        keep: (VertexId, VertexId),
        /// Gadgets merged away.
        merge: Vec<(VertexId, VertexId)>,
    },
}

/// A rewrite rule: pure matching and invariant-preserving application.
pub trait RewriteRule {
    /// Stable rule name (used by telemetry and the `zx rule` command).
    fn name(&self) -> &'static str;

    /// Find a batch of mutually compatible matches. Pure.
    fn find_matches(&self, graph: &ZxGraph) -> Vec<RuleMatch>;

    /// Fire the batch. Matches whose support was consumed are dropped.
    fn apply(&self, graph: &mut ZxGraph, matches: &[RuleMatch]);
}

/// Staged edits committed through the graph primitives in one pass.
///
/// Commit order: phases, edge removals, vertex removals, edge additions,
/// then isolated-vertex cleanup. Removing vertices before adding edges
/// lets a rule rewire a boundary without tripping its degree-1 invariant.
#[derive(Debug, Default)]
pub struct RewriteBatch {
    phase_additions: Vec<(VertexId, Phase)>,
    edges_to_remove: Vec<(VertexId, VertexId, EdgeType)>,
    vertices_to_remove: Vec<VertexId>,
    edges_to_add: Vec<(VertexId, VertexId, EdgeType)>,
}

impl RewriteBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        RewriteBatch::default()
    }

    /// Stage a phase addition.
    pub fn add_phase(&mut self, v: VertexId, delta: Phase) {
        if !delta.is_zero() {
            self.phase_additions.push((v, delta));
        }
    }

    /// Stage an edge addition (canonicalized on commit).
    pub fn add_edge(&mut self, u: VertexId, v: VertexId, etype: EdgeType) {
        self.edges_to_add.push((u, v, etype));
    }

    /// Stage the removal of one edge.
    pub fn remove_edge(&mut self, u: VertexId, v: VertexId, etype: EdgeType) {
        self.edges_to_remove.push((u, v, etype));
    }

    /// Stage a vertex removal.
    pub fn remove_vertex(&mut self, v: VertexId) {
        self.vertices_to_remove.push(v);
    }

    /// Commit everything through the graph primitives.
    pub fn commit(self, graph: &mut ZxGraph) {
        for (v, delta) in self.phase_additions {
            if graph.contains(v) {
                let _ = graph.add_to_phase(v, delta);
            }
        }
        for (u, v, t) in self.edges_to_remove {
            if graph.contains(u) && graph.contains(v) {
                let _ = graph.remove_edge(u, v, Some(t));
            }
        }
        graph.remove_vertices(&self.vertices_to_remove);
        for (u, v, t) in self.edges_to_add {
            if graph.contains(u) && graph.contains(v) {
                if let Err(e) = graph.add_edge(u, v, t) {
                    warn!("staged edge {u}--{v} could not be added: {e}");
                }
            }
        }
        graph.remove_isolated_vertices();
    }
}

/// Look up a rule by its command-line name.
pub fn rule_by_name(name: &str) -> Option<Box<dyn RewriteRule>> {
    Some(match name {
        "spider-fusion" => Box::new(SpiderFusion),
        "hbox-fusion" => Box::new(HBoxFusion),
        "identity-removal" => Box::new(IdRemoval),
        "hadamard" => Box::new(HRule),
        "state-copy" => Box::new(StateCopy),
        "bialgebra" => Box::new(Bialgebra),
        "local-complementation" => Box::new(LocalComplement),
        "pivot" => Box::new(Pivot),
        "pivot-gadget" => Box::new(PivotGadget),
        "pivot-boundary" => Box::new(PivotBoundary),
        "gadget-fusion" => Box::new(PhaseGadgetFusion),
        _ => return None,
    })
}

/// Names accepted by [`rule_by_name`].
pub const RULE_NAMES: &[&str] = &[
    "spider-fusion",
    "hbox-fusion",
    "identity-removal",
    "hadamard",
    "state-copy",
    "bialgebra",
    "local-complementation",
    "pivot",
    "pivot-gadget",
    "pivot-boundary",
    "gadget-fusion",
];
