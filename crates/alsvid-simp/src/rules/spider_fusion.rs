//! Spider fusion: adjacent same-colour spiders merge.

use rustc_hash::FxHashSet;

use alsvid_zx::{EdgeType, VertexId, ZxGraph};

use super::{RewriteRule, RuleMatch};

/// Merge two same-colour spiders joined by a simple edge, summing phases.
pub struct SpiderFusion;

impl RewriteRule for SpiderFusion {
    fn name(&self) -> &'static str {
        "Spider Fusion"
    }

    fn find_matches(&self, graph: &ZxGraph) -> Vec<RuleMatch> {
        let mut taken: FxHashSet<VertexId> = FxHashSet::default();
        let mut matches = vec![];
        for (u, v, et) in graph.edges() {
            if et != EdgeType::Simple || taken.contains(&u) || taken.contains(&v) {
                continue;
            }
            let (vu, vv) = (graph.vertex(u).expect("edge endpoint"), graph.vertex(v).expect("edge endpoint"));
            if !vu.vtype().is_spider() || vu.vtype() != vv.vtype() {
                continue;
            }
            taken.insert(u);
            taken.insert(v);
            matches.push(RuleMatch::Pair(u, v));
        }
        matches
    }

    fn apply(&self, graph: &mut ZxGraph, matches: &[RuleMatch]) {
        for m in matches {
            let RuleMatch::Pair(u, v) = m else { continue };
            let (u, v) = (*u, *v);
            if !graph.contains(u) || !graph.contains(v) {
                continue;
            }
            let keep_is_u = u <= v;
            let (keep, gone) = if keep_is_u { (u, v) } else { (v, u) };

            let gone_vertex = graph.vertex(gone).expect("checked above");
            if !gone_vertex.is_neighbor_via(keep, EdgeType::Simple) {
                continue;
            }
            let phase = gone_vertex.phase();
            let entries: Vec<(VertexId, EdgeType)> = gone_vertex.neighbors().to_vec();

            let _ = graph.add_to_phase(keep, phase);
            // Migrate every edge except the fusing one; a parallel Hadamard
            // edge to the kept spider becomes a Hadamard self-loop and is
            // absorbed as a π phase by the graph.
            for (w, et) in entries {
                if w == keep && et == EdgeType::Simple {
                    continue;
                }
                let target = if w == gone { keep } else { w };
                let _ = graph.remove_edge(gone, w, Some(et));
                let _ = graph.add_edge(keep, target, et);
            }
            graph.remove_vertex(gone);
        }
        graph.remove_isolated_vertices();
    }
}
