//! State copy: a Pauli state pushes through a spider onto its neighbors.

use rustc_hash::FxHashSet;

use alsvid_zx::{EdgeType, Phase, VertexId, VertexType, ZxGraph};

use super::{RewriteRule, RuleMatch};

/// Copy a degree-1 Z spider with phase 0 or π through the Z spider it is
/// Hadamard-connected to: both spiders disappear and every remaining
/// neighbor gains the copied phase. Boundary neighbors receive a buffer
/// state spider instead, since boundaries carry no phase.
///
/// Requires the local graph-like shape: the host's other legs must be
/// Hadamard edges to interior Z spiders or simple edges to boundaries.
pub struct StateCopy;

impl RewriteRule for StateCopy {
    fn name(&self) -> &'static str {
        "State Copy"
    }

    fn find_matches(&self, graph: &ZxGraph) -> Vec<RuleMatch> {
        let mut taken: FxHashSet<VertexId> = FxHashSet::default();
        let mut matches = vec![];
        for v in graph.vertices() {
            if !v.is_z() || !v.phase().is_pauli() || v.degree() != 1 {
                continue;
            }
            let (host, etype) = v.neighbors()[0];
            if etype != EdgeType::Hadamard {
                continue;
            }
            let host_vertex = graph.vertex(host).expect("neighbor of a live vertex");
            if !host_vertex.is_z() || graph.inputs().contains(&host) || graph.outputs().contains(&host) {
                continue;
            }
            let legs_ok = host_vertex.neighbors().iter().all(|&(w, t)| {
                if w == v.id() {
                    return true;
                }
                let wv = graph.vertex(w).expect("neighbor of a live vertex");
                if wv.is_boundary() {
                    t == EdgeType::Simple
                } else {
                    wv.is_z() && t == EdgeType::Hadamard
                }
            });
            if !legs_ok {
                continue;
            }
            let mut support: Vec<VertexId> = vec![v.id(), host];
            support.extend(host_vertex.neighbors().iter().map(|&(w, _)| w));
            if support.iter().any(|s| taken.contains(s)) {
                continue;
            }
            taken.extend(support);
            matches.push(RuleMatch::Copy { state: v.id(), host });
        }
        matches
    }

    fn apply(&self, graph: &mut ZxGraph, matches: &[RuleMatch]) {
        for m in matches {
            let RuleMatch::Copy { state, host } = m else { continue };
            if !graph.contains(*state) || !graph.contains(*host) {
                continue;
            }
            let a = graph.vertex(*state).expect("checked above").phase();
            let beta = graph.vertex(*host).expect("checked above").phase();
            let legs: Vec<(VertexId, EdgeType)> = graph
                .vertex(*host)
                .expect("checked above")
                .neighbors()
                .iter()
                .filter(|&&(w, _)| w != *state)
                .copied()
                .collect();

            // Global factor √2 · e^(iβ·a/π), then 1/√2 per fused leg.
            graph.scalar_mut().mul_rt2_pow(1);
            if a == Phase::pi() {
                graph.scalar_mut().mul_phase(beta);
            }

            for (w, t) in &legs {
                if graph.vertex(*w).expect("host neighbors are live").is_boundary() {
                    // The state flows out on the open wire; park it there as
                    // an X spider (an exact |0⟩/|1⟩ up to 2^(1/4)).
                    let qubit = graph.vertex(*w).expect("live boundary").qubit();
                    let b = graph.add_vertex(qubit, VertexType::XSpider, a);
                    let _ = graph.remove_edge(*host, *w, Some(*t));
                    let _ = graph.add_edge(b, *w, *t);
                    graph.scalar_mut().mul_complex(num_complex::Complex64::new(
                        2f64.powf(-0.25),
                        0.0,
                    ));
                } else {
                    let _ = graph.add_to_phase(*w, a);
                    graph.scalar_mut().mul_rt2_pow(-1);
                }
            }
            graph.remove_vertex(*state);
            graph.remove_vertex(*host);
        }
        graph.remove_isolated_vertices();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pi_state_copies_onto_neighbors() {
        // state(π) -H- host -H- u1, u2: after the copy the hosts are gone
        // and u1, u2 each gained π.
        let mut g = ZxGraph::new();
        let state = g.add_vertex(-1, VertexType::ZSpider, Phase::pi());
        let host = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let u1 = g.add_vertex(1, VertexType::ZSpider, Phase::zero());
        let u2 = g.add_vertex(2, VertexType::ZSpider, Phase::new(1, 4));
        // Keep u1/u2 anchored so they survive isolated-vertex cleanup.
        let o1 = g.add_output(1).unwrap();
        let o2 = g.add_output(2).unwrap();
        g.add_edge(state, host, EdgeType::Hadamard).unwrap();
        g.add_edge(host, u1, EdgeType::Hadamard).unwrap();
        g.add_edge(host, u2, EdgeType::Hadamard).unwrap();
        g.add_edge(u1, o1, EdgeType::Simple).unwrap();
        g.add_edge(u2, o2, EdgeType::Simple).unwrap();

        let matches = StateCopy.find_matches(&g);
        assert_eq!(matches.len(), 1);
        StateCopy.apply(&mut g, &matches);

        assert!(!g.contains(state));
        assert!(!g.contains(host));
        assert_eq!(g.vertex(u1).unwrap().phase(), Phase::pi());
        assert_eq!(g.vertex(u2).unwrap().phase(), Phase::new(-3, 4));
        assert!(g.is_valid());
    }

    #[test]
    fn test_zero_state_copies_nothing_but_simplifies() {
        let mut g = ZxGraph::new();
        let state = g.add_vertex(-1, VertexType::ZSpider, Phase::zero());
        let host = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let u = g.add_vertex(1, VertexType::ZSpider, Phase::zero());
        let o = g.add_output(1).unwrap();
        g.add_edge(state, host, EdgeType::Hadamard).unwrap();
        g.add_edge(host, u, EdgeType::Hadamard).unwrap();
        g.add_edge(u, o, EdgeType::Simple).unwrap();

        let matches = StateCopy.find_matches(&g);
        StateCopy.apply(&mut g, &matches);
        assert_eq!(g.vertex(u).unwrap().phase(), Phase::zero());
        assert!(!g.contains(host));
    }

    #[test]
    fn test_simple_edge_state_not_matched() {
        let mut g = ZxGraph::new();
        let state = g.add_vertex(-1, VertexType::ZSpider, Phase::pi());
        let host = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        g.add_edge(state, host, EdgeType::Simple).unwrap();
        assert!(StateCopy.find_matches(&g).is_empty());
    }

    #[test]
    fn test_boundary_leg_gets_buffer_state() {
        let mut g = ZxGraph::new();
        let state = g.add_vertex(-1, VertexType::ZSpider, Phase::pi());
        let host = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let o = g.add_output(0).unwrap();
        g.add_edge(state, host, EdgeType::Hadamard).unwrap();
        g.add_edge(host, o, EdgeType::Simple).unwrap();

        let matches = StateCopy.find_matches(&g);
        StateCopy.apply(&mut g, &matches);
        let (b, t) = g.vertex(o).unwrap().neighbors()[0];
        assert_eq!(t, EdgeType::Simple);
        let buffer = g.vertex(b).unwrap();
        assert!(buffer.is_x());
        assert_eq!(buffer.phase(), Phase::pi());
    }
}
