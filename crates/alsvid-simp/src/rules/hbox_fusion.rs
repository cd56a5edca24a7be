//! Hadamard fusion: adjacent H-box pairs are the identity.

use rustc_hash::FxHashSet;

use alsvid_zx::{EdgeType, VertexId, ZxGraph};

use super::{RewriteBatch, RewriteRule, RuleMatch};

/// Cancel two arity-2 H-boxes joined by a simple edge, rewiring their outer
/// neighbors with the composition of the outer edge types (H·H = I).
pub struct HBoxFusion;

fn outer_neighbor(graph: &ZxGraph, hbox: VertexId, partner: VertexId) -> Option<(VertexId, EdgeType)> {
    graph
        .vertex(hbox)?
        .neighbors()
        .iter()
        .find(|&&(w, _)| w != partner)
        .copied()
}

impl RewriteRule for HBoxFusion {
    fn name(&self) -> &'static str {
        "Hadamard Fusion"
    }

    fn find_matches(&self, graph: &ZxGraph) -> Vec<RuleMatch> {
        let mut taken: FxHashSet<VertexId> = FxHashSet::default();
        let mut matches = vec![];
        for (u, v, et) in graph.edges() {
            if et != EdgeType::Simple || taken.contains(&u) || taken.contains(&v) {
                continue;
            }
            let (vu, vv) = (graph.vertex(u).expect("edge endpoint"), graph.vertex(v).expect("edge endpoint"));
            if !vu.is_hbox() || !vv.is_hbox() || vu.degree() != 2 || vv.degree() != 2 {
                continue;
            }
            // A doubly-connected box pair is a closed loop, not a wire.
            if vu.neighbors().iter().filter(|&&(w, _)| w == v).count() > 1 {
                continue;
            }
            let (Some((wu, _)), Some((wv, _))) =
                (outer_neighbor(graph, u, v), outer_neighbor(graph, v, u))
            else {
                continue;
            };
            if taken.contains(&wu) || taken.contains(&wv) {
                continue;
            }
            for t in [u, v, wu, wv] {
                taken.insert(t);
            }
            matches.push(RuleMatch::Pair(u, v));
        }
        matches
    }

    fn apply(&self, graph: &mut ZxGraph, matches: &[RuleMatch]) {
        let mut batch = RewriteBatch::new();
        for m in matches {
            let RuleMatch::Pair(u, v) = m else { continue };
            if !graph.contains(*u) || !graph.contains(*v) {
                continue;
            }
            let (Some((wu, tu)), Some((wv, tv))) =
                (outer_neighbor(graph, *u, *v), outer_neighbor(graph, *v, *u))
            else {
                continue;
            };
            batch.remove_vertex(*u);
            batch.remove_vertex(*v);
            batch.add_edge(wu, wv, tu.compose(tv));
        }
        batch.commit(graph);
    }
}
