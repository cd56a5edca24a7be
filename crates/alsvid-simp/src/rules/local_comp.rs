//! Local complementation on ±π/2 spiders.

use rustc_hash::FxHashSet;

use alsvid_zx::{EdgeType, Phase, VertexId, ZxGraph};

use super::{RewriteRule, RuleMatch};

/// Remove an interior Z spider with phase ±π/2 whose neighborhood is all
/// interior Z spiders over Hadamard edges, complementing the edges among
/// its neighbors and shifting each neighbor's phase by ∓π/2.
pub struct LocalComplement;

fn is_interior_hadamard_hub(graph: &ZxGraph, v: VertexId) -> bool {
    let vert = graph.vertex(v).expect("live vertex");
    vert.neighbors().iter().all(|&(w, t)| {
        t == EdgeType::Hadamard && graph.vertex(w).is_some_and(|n| n.is_z())
    })
}

impl RewriteRule for LocalComplement {
    fn name(&self) -> &'static str {
        "Local Complementation"
    }

    fn find_matches(&self, graph: &ZxGraph) -> Vec<RuleMatch> {
        let mut taken: FxHashSet<VertexId> = FxHashSet::default();
        let mut matches = vec![];
        for v in graph.vertices() {
            if !v.is_z() || !v.phase().is_proper_clifford() || v.degree() == 0 {
                continue;
            }
            if !is_interior_hadamard_hub(graph, v.id()) {
                continue;
            }
            let mut support: Vec<VertexId> = vec![v.id()];
            support.extend(v.neighbors().iter().map(|&(w, _)| w));
            if support.iter().any(|s| taken.contains(s)) {
                continue;
            }
            taken.extend(support);
            matches.push(RuleMatch::Vertex(v.id()));
        }
        matches
    }

    fn apply(&self, graph: &mut ZxGraph, matches: &[RuleMatch]) {
        for m in matches {
            let RuleMatch::Vertex(v) = m else { continue };
            if !graph.contains(*v) {
                continue;
            }
            let phase = graph.vertex(*v).expect("checked above").phase();
            let neighbors: Vec<VertexId> = graph
                .vertex(*v)
                .expect("checked above")
                .neighbors()
                .iter()
                .map(|&(w, _)| w)
                .collect();
            let n = neighbors.len() as i32;

            graph.remove_vertex(*v);
            // Toggle every neighbor pair; edge canonicalization cancels the
            // pairs that were already present.
            for i in 0..neighbors.len() {
                for j in (i + 1)..neighbors.len() {
                    let _ = graph.add_edge(neighbors[i], neighbors[j], EdgeType::Hadamard);
                }
            }
            for w in &neighbors {
                let _ = graph.add_to_phase(*w, -phase);
            }
            graph.scalar_mut().mul_rt2_pow(((n - 1) * (n - 2)) / 2);
            graph.scalar_mut().mul_phase(phase / 2);
        }
        graph.remove_isolated_vertices();
    }
}
