//! Hadamard rule: arity-2 π H-boxes become Hadamard edges.

use rustc_hash::FxHashSet;

use alsvid_zx::{EdgeType, VertexId, ZxGraph};

use super::{RewriteBatch, RewriteRule, RuleMatch};

/// Remove an arity-2 H-box with phase π, joining its neighbors with the
/// Hadamard-parity composition of the incident edge types.
pub struct HRule;

impl RewriteRule for HRule {
    fn name(&self) -> &'static str {
        "Hadamard Rule"
    }

    fn find_matches(&self, graph: &ZxGraph) -> Vec<RuleMatch> {
        let mut taken: FxHashSet<VertexId> = FxHashSet::default();
        let mut matches = vec![];
        for v in graph.vertices() {
            if !v.is_hbox() || !v.phase().is_pauli() || v.phase().is_zero() || v.degree() != 2 {
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
            // The box itself contributes one Hadamard to the path parity.
            let h_parity =
                1 + usize::from(t0 == EdgeType::Hadamard) + usize::from(t1 == EdgeType::Hadamard);
            let etype = if h_parity % 2 == 1 { EdgeType::Hadamard } else { EdgeType::Simple };
            matches.push(RuleMatch::Bypass { vertex: v.id(), left: n0, right: n1, etype });
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

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_zx::{Phase, VertexType};

    #[test]
    fn test_hbox_becomes_hadamard_edge() {
        let mut g = ZxGraph::new();
        let a = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let h = g.add_vertex(0, VertexType::HBox, Phase::pi());
        let b = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        g.add_edge(a, h, EdgeType::Simple).unwrap();
        g.add_edge(h, b, EdgeType::Simple).unwrap();

        let matches = HRule.find_matches(&g);
        HRule.apply(&mut g, &matches);
        assert_eq!(g.num_vertices(), 2);
        assert!(g.vertex(a).unwrap().is_neighbor_via(b, EdgeType::Hadamard));
    }

    #[test]
    fn test_incident_hadamard_edge_flips_parity() {
        let mut g = ZxGraph::new();
        let a = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let h = g.add_vertex(0, VertexType::HBox, Phase::pi());
        let b = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        g.add_edge(a, h, EdgeType::Hadamard).unwrap();
        g.add_edge(h, b, EdgeType::Simple).unwrap();

        let matches = HRule.find_matches(&g);
        HRule.apply(&mut g, &matches);
        assert!(g.vertex(a).unwrap().is_neighbor_via(b, EdgeType::Simple));
    }

    #[test]
    fn test_adjacent_boxes_cancel_in_two_rounds() {
        let mut g = ZxGraph::new();
        let i = g.add_input(0).unwrap();
        let h1 = g.add_vertex(0, VertexType::HBox, Phase::pi());
        let h2 = g.add_vertex(0, VertexType::HBox, Phase::pi());
        let o = g.add_output(0).unwrap();
        g.add_edge(i, h1, EdgeType::Simple).unwrap();
        g.add_edge(h1, h2, EdgeType::Simple).unwrap();
        g.add_edge(h2, o, EdgeType::Simple).unwrap();

        // First round removes one box (they share support).
        let first = HRule.find_matches(&g);
        assert_eq!(first.len(), 1);
        HRule.apply(&mut g, &first);
        // Second round removes the other.
        let matches = HRule.find_matches(&g);
        HRule.apply(&mut g, &matches);
        assert!(g.is_identity());
    }

    #[test]
    fn test_high_arity_boxes_ignored() {
        let mut g = ZxGraph::new();
        let a = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let b = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let c = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let h = g.add_vertex(0, VertexType::HBox, Phase::pi());
        for v in [a, b, c] {
            g.add_edge(h, v, EdgeType::Simple).unwrap();
        }
        assert!(HRule.find_matches(&g).is_empty());
    }
}
