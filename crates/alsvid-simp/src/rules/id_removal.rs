//! Identity removal: phase-0 arity-2 spiders are wires.

use rustc_hash::FxHashSet;

use alsvid_zx::{VertexId, ZxGraph};

use super::{RewriteBatch, RewriteRule, RuleMatch};

/// Remove a phase-0 arity-2 spider, joining its neighbors with the
/// composition of the two incident edge types (equal types give a simple
/// edge, mixed types a Hadamard one).
pub struct IdRemoval;

impl RewriteRule for IdRemoval {
    fn name(&self) -> &'static str {
        "Identity Removal"
    }

    fn find_matches(&self, graph: &ZxGraph) -> Vec<RuleMatch> {
        let mut taken: FxHashSet<VertexId> = FxHashSet::default();
        let mut matches = vec![];
        for v in graph.vertices() {
            if !v.vtype().is_spider() || !v.phase().is_zero() || v.degree() != 2 {
                continue;
            }
            let (n0, t0) = v.neighbors()[0];
            let (n1, t1) = v.neighbors()[1];
            if taken.contains(&v.id()) || taken.contains(&n0) || taken.contains(&n1) {
                continue;
            }
            taken.insert(v.id());
            taken.insert(n0);
            taken.insert(n1);
            matches.push(RuleMatch::Bypass {
                vertex: v.id(),
                left: n0,
                right: n1,
                etype: t0.compose(t1),
            });
        }
        matches
    }

    fn apply(&self, graph: &mut ZxGraph, matches: &[RuleMatch]) {
        let mut batch = RewriteBatch::new();
        for m in matches {
            let RuleMatch::Bypass { vertex, left, right, etype } = m else { continue };
            if !graph.contains(*vertex) {
                continue;
            }
            batch.remove_vertex(*vertex);
            batch.add_edge(*left, *right, *etype);
        }
        batch.commit(graph);
    }
}
