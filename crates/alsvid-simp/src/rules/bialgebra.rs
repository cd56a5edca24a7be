//! Bialgebra: a phase-0 Z–X crossing contracts to a complete bipartite
//! wiring of its neighborhoods.

use rustc_hash::FxHashSet;

use alsvid_zx::{EdgeType, VertexId, VertexType, ZxGraph};

use super::{RewriteBatch, RewriteRule, RuleMatch};

/// Contract a simple edge between a phase-0 Z spider and a phase-0 X
/// spider whose outer neighborhoods are opposite-coloured spiders over
/// simple edges: both endpoints disappear and every outer Z–X pair is
/// wired directly. Under the spider normalization the rewrite is
/// scalar-free.
pub struct Bialgebra;

fn outer_simple_neighbors(
    graph: &ZxGraph,
    v: VertexId,
    other: VertexId,
    expected: VertexType,
) -> Option<Vec<VertexId>> {
    let mut outer = vec![];
    for &(w, t) in graph.vertex(v)?.neighbors() {
        if w == other {
            continue;
        }
        if t != EdgeType::Simple || graph.vertex(w)?.vtype() != expected {
            return None;
        }
        outer.push(w);
    }
    Some(outer)
}

impl RewriteRule for Bialgebra {
    fn name(&self) -> &'static str {
        "Bialgebra"
    }

    fn find_matches(&self, graph: &ZxGraph) -> Vec<RuleMatch> {
        let mut taken: FxHashSet<VertexId> = FxHashSet::default();
        let mut matches = vec![];
        for (mut u, mut v, et) in graph.edges() {
            if et != EdgeType::Simple {
                continue;
            }
            // Orient Z first.
            if graph.vertex(u).expect("edge endpoint").is_x() {
                std::mem::swap(&mut u, &mut v);
            }
            let (vu, vv) = (graph.vertex(u).expect("edge endpoint"), graph.vertex(v).expect("edge endpoint"));
            if !vu.is_z() || !vv.is_x() || !vu.phase().is_zero() || !vv.phase().is_zero() {
                continue;
            }
            // Exactly one connecting edge.
            if vu.neighbors().iter().filter(|&&(w, _)| w == v).count() != 1 {
                continue;
            }
            let (Some(zs), Some(xs)) = (
                outer_simple_neighbors(graph, u, v, VertexType::XSpider),
                outer_simple_neighbors(graph, v, u, VertexType::ZSpider),
            ) else {
                continue;
            };
            if zs.is_empty() || xs.is_empty() {
                continue;
            }
            let support: Vec<VertexId> =
                [u, v].into_iter().chain(zs.iter().copied()).chain(xs.iter().copied()).collect();
            if support.iter().any(|s| taken.contains(s)) {
                continue;
            }
            taken.extend(support);
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
            let (Some(zs), Some(xs)) = (
                outer_simple_neighbors(graph, *u, *v, VertexType::XSpider),
                outer_simple_neighbors(graph, *v, *u, VertexType::ZSpider),
            ) else {
                continue;
            };
            batch.remove_vertex(*u);
            batch.remove_vertex(*v);
            for &a in &zs {
                for &b in &xs {
                    batch.add_edge(a, b, EdgeType::Simple);
                }
            }
        }
        batch.commit(graph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_zx::Phase;

    #[test]
    fn test_crossing_contracts() {
        // X-spiders a1, a2 feed the Z hub; Z-spiders b1, b2 hang off the X
        // hub. The rewrite wires every a to every b.
        let mut g = ZxGraph::new();
        let hub_z = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let hub_x = g.add_vertex(1, VertexType::XSpider, Phase::zero());
        g.add_edge(hub_z, hub_x, EdgeType::Simple).unwrap();

        let mut outer = vec![];
        for q in 0..2 {
            let a = g.add_vertex(q, VertexType::XSpider, Phase::zero());
            let o = g.add_output(q).unwrap();
            g.add_edge(a, o, EdgeType::Simple).unwrap();
            g.add_edge(a, hub_z, EdgeType::Simple).unwrap();
            outer.push(a);
        }
        for q in 2..4 {
            let b = g.add_vertex(q, VertexType::ZSpider, Phase::zero());
            let o = g.add_output(q).unwrap();
            g.add_edge(b, o, EdgeType::Simple).unwrap();
            g.add_edge(b, hub_x, EdgeType::Simple).unwrap();
            outer.push(b);
        }

        let matches = Bialgebra.find_matches(&g);
        assert_eq!(matches.len(), 1);
        Bialgebra.apply(&mut g, &matches);

        assert!(!g.contains(hub_z) && !g.contains(hub_x));
        for &a in &outer[..2] {
            for &b in &outer[2..] {
                assert!(g.vertex(a).unwrap().is_neighbor_via(b, EdgeType::Simple));
            }
        }
        assert!(g.is_valid());
    }

    #[test]
    fn test_nonzero_phase_not_matched() {
        let mut g = ZxGraph::new();
        let z = g.add_vertex(0, VertexType::ZSpider, Phase::pi());
        let x = g.add_vertex(1, VertexType::XSpider, Phase::zero());
        g.add_edge(z, x, EdgeType::Simple).unwrap();
        assert!(Bialgebra.find_matches(&g).is_empty());
    }

    #[test]
    fn test_wrong_outer_colour_not_matched() {
        let mut g = ZxGraph::new();
        let z = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let x = g.add_vertex(1, VertexType::XSpider, Phase::zero());
        let wrong = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let other = g.add_vertex(1, VertexType::ZSpider, Phase::zero());
        g.add_edge(z, x, EdgeType::Simple).unwrap();
        g.add_edge(z, wrong, EdgeType::Simple).unwrap();
        g.add_edge(x, other, EdgeType::Simple).unwrap();
        assert!(Bialgebra.find_matches(&g).is_empty());
    }
}
