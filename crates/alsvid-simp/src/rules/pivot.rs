//! The pivot family: pivot, pivot-gadget, and pivot-boundary.
//!
//! All three share one core rewrite: given a Hadamard edge between two
//! interior Pauli Z spiders, delete both and complement the tripartite
//! split of their neighborhoods, pushing phases outward. The gadget and
//! boundary variants differ only in how they make their match look like
//! the plain case before pivoting (unfusing a non-Clifford phase into a
//! gadget, or buffering a boundary edge with spacer spiders).

use rustc_hash::FxHashSet;

use alsvid_zx::{EdgeType, Phase, VertexId, VertexType, ZxGraph};

use super::{RewriteRule, RuleMatch};

/// True when every incident edge is a Hadamard edge to an interior Z
/// spider.
fn interior_hadamard_only(graph: &ZxGraph, v: VertexId) -> bool {
    graph
        .vertex(v)
        .expect("live vertex")
        .neighbors()
        .iter()
        .all(|&(w, t)| t == EdgeType::Hadamard && graph.vertex(w).is_some_and(|n| n.is_z()))
}

/// The shared pivot core. Preconditions: `u`, `v` are Z spiders joined by
/// a Hadamard edge, with Pauli phases, and every neighbor is an interior Z
/// spider over a Hadamard edge.
pub fn apply_pivot(graph: &mut ZxGraph, u: VertexId, v: VertexId) {
    let pu = graph.vertex(u).expect("pivot endpoint").phase();
    let pv = graph.vertex(v).expect("pivot endpoint").phase();

    let nu: FxHashSet<VertexId> = graph
        .vertex(u)
        .expect("pivot endpoint")
        .neighbors()
        .iter()
        .map(|&(w, _)| w)
        .filter(|&w| w != v)
        .collect();
    let nv: FxHashSet<VertexId> = graph
        .vertex(v)
        .expect("pivot endpoint")
        .neighbors()
        .iter()
        .map(|&(w, _)| w)
        .filter(|&w| w != u)
        .collect();

    let mut a: Vec<VertexId> = nu.difference(&nv).copied().collect();
    let mut b: Vec<VertexId> = nv.difference(&nu).copied().collect();
    let mut c: Vec<VertexId> = nu.intersection(&nv).copied().collect();
    a.sort_unstable();
    b.sort_unstable();
    c.sort_unstable();

    graph.remove_vertex(u);
    graph.remove_vertex(v);

    for (left, right) in [(&a, &b), (&a, &c), (&b, &c)] {
        for &x in left {
            for &y in right {
                let _ = graph.add_edge(x, y, EdgeType::Hadamard);
            }
        }
    }

    for &x in &a {
        let _ = graph.add_to_phase(x, pv);
    }
    for &y in &b {
        let _ = graph.add_to_phase(y, pu);
    }
    for &z in &c {
        let _ = graph.add_to_phase(z, pu + pv + Phase::pi());
    }

    let (la, lb, lc) = (a.len() as i32, b.len() as i32, c.len() as i32);
    graph.scalar_mut().mul_rt2_pow(la * lb + lb * lc + lc * la);
    if pu == Phase::pi() && pv == Phase::pi() {
        graph.scalar_mut().mul_phase(Phase::pi());
    }

    graph.remove_isolated_vertices();
}

fn collect_pair_matches(
    graph: &ZxGraph,
    eligible: impl Fn(&ZxGraph, VertexId, VertexId) -> bool,
) -> Vec<RuleMatch> {
    let mut taken: FxHashSet<VertexId> = FxHashSet::default();
    let mut matches = vec![];
    for (u, v, et) in graph.edges() {
        if et != EdgeType::Hadamard || taken.contains(&u) || taken.contains(&v) {
            continue;
        }
        if !eligible(graph, u, v) {
            continue;
        }
        let mut support = vec![u, v];
        for w in [u, v] {
            support.extend(graph.vertex(w).expect("edge endpoint").neighbors().iter().map(|&(n, _)| n));
        }
        if support.iter().any(|s| taken.contains(s)) {
            continue;
        }
        taken.extend(support);
        matches.push(RuleMatch::Pair(u, v));
    }
    matches
}

// =============================================================================
// Plain pivot
// =============================================================================

/// Pivot on a Hadamard edge between two interior Pauli Z spiders.
pub struct Pivot;

impl RewriteRule for Pivot {
    fn name(&self) -> &'static str {
        "Pivot"
    }

    fn find_matches(&self, graph: &ZxGraph) -> Vec<RuleMatch> {
        collect_pair_matches(graph, |g, u, v| {
            let (vu, vv) = (g.vertex(u).expect("edge endpoint"), g.vertex(v).expect("edge endpoint"));
            vu.is_z()
                && vv.is_z()
                && vu.phase().is_pauli()
                && vv.phase().is_pauli()
                && interior_hadamard_only(g, u)
                && interior_hadamard_only(g, v)
        })
    }

    fn apply(&self, graph: &mut ZxGraph, matches: &[RuleMatch]) {
        for m in matches {
            let RuleMatch::Pair(u, v) = m else { continue };
            if !graph.contains(*u) || !graph.contains(*v) {
                continue;
            }
            let (pu, pv) = (
                graph.vertex(*u).expect("checked above").phase(),
                graph.vertex(*v).expect("checked above").phase(),
            );
            if pu.is_pauli()
                && pv.is_pauli()
                && graph.vertex(*u).expect("checked above").is_neighbor_via(*v, EdgeType::Hadamard)
            {
                apply_pivot(graph, *u, *v);
            }
        }
    }
}

// =============================================================================
// Pivot-gadget
// =============================================================================

/// Pivot where one endpoint carries a non-Pauli phase: the phase is first
/// unfused into a phase gadget hanging off the endpoint, which restores the
/// plain-pivot precondition.
pub struct PivotGadget;

impl RewriteRule for PivotGadget {
    fn name(&self) -> &'static str {
        "Pivot Gadget"
    }

    fn find_matches(&self, graph: &ZxGraph) -> Vec<RuleMatch> {
        // A degree-1 neighbor means a phase gadget is already attached;
        // re-gadgetizing it would loop without progress.
        fn touches_leaf(g: &ZxGraph, v: VertexId) -> bool {
            g.vertex(v)
                .expect("edge endpoint")
                .neighbors()
                .iter()
                .any(|&(w, _)| g.degree(w) == 1)
        }
        collect_pair_matches(graph, |g, u, v| {
            let (vu, vv) = (g.vertex(u).expect("edge endpoint"), g.vertex(v).expect("edge endpoint"));
            if !vu.is_z() || !vv.is_z() {
                return false;
            }
            // One endpoint Pauli, the other non-Clifford (±π/2 endpoints
            // belong to local complementation); orientation is fixed in
            // apply. The non-Clifford endpoint must itself be more than a
            // dangling leaf.
            let (pu, pv) = (vu.phase(), vv.phase());
            let shapes_match = (pu.is_pauli() && !pv.is_clifford() && vv.degree() > 1)
                || (pv.is_pauli() && !pu.is_clifford() && vu.degree() > 1);
            shapes_match
                && interior_hadamard_only(g, u)
                && interior_hadamard_only(g, v)
                && !touches_leaf(g, u)
                && !touches_leaf(g, v)
        })
    }

    fn apply(&self, graph: &mut ZxGraph, matches: &[RuleMatch]) {
        for m in matches {
            let RuleMatch::Pair(u, v) = m else { continue };
            if !graph.contains(*u) || !graph.contains(*v) {
                continue;
            }
            // Orient so `u` is the Pauli endpoint; drop stale matches.
            let (u, v) = if graph.vertex(*u).expect("checked above").phase().is_pauli() {
                (*u, *v)
            } else {
                (*v, *u)
            };
            if !graph.vertex(u).expect("checked above").phase().is_pauli() {
                continue;
            }
            let phase = graph.vertex(v).expect("checked above").phase();
            let _ = graph.set_phase(v, Phase::zero());
            let axis = graph.add_vertex(-1, VertexType::ZSpider, Phase::zero());
            let leaf = graph.add_vertex(-2, VertexType::ZSpider, phase);
            let _ = graph.add_edge(axis, v, EdgeType::Hadamard);
            let _ = graph.add_edge(axis, leaf, EdgeType::Hadamard);
            apply_pivot(graph, u, v);
        }
    }
}

// =============================================================================
// Pivot-boundary
// =============================================================================

/// Pivot where one endpoint touches a boundary: each boundary edge is
/// buffered with one spacer spider (toggling the boundary edge type, which
/// strategies re-normalize at the end) so both endpoints become interior,
/// then the plain pivot fires. One spacer in for two spiders out keeps the
/// rule strictly shrinking, so its fixed-point loop terminates.
pub struct PivotBoundary;

impl RewriteRule for PivotBoundary {
    fn name(&self) -> &'static str {
        "Pivot Boundary"
    }

    fn find_matches(&self, graph: &ZxGraph) -> Vec<RuleMatch> {
        // One endpoint has at least one boundary leg and otherwise interior
        // Hadamard legs; the other must be fully interior. Orientation is
        // symmetric here and fixed in `apply`.
        fn boundary_side_ok(g: &ZxGraph, u: VertexId) -> bool {
            !boundary_legs(g, u).is_empty()
                && g.vertex(u).expect("edge endpoint").neighbors().iter().all(|&(w, t)| {
                    let wv = g.vertex(w).expect("edge endpoint neighbor");
                    wv.is_boundary() || (wv.is_z() && t == EdgeType::Hadamard)
                })
        }
        collect_pair_matches(graph, |g, u, v| {
            let (vu, vv) = (g.vertex(u).expect("edge endpoint"), g.vertex(v).expect("edge endpoint"));
            if !vu.is_z() || !vv.is_z() || !vu.phase().is_pauli() || !vv.phase().is_pauli() {
                return false;
            }
            (boundary_side_ok(g, u) && interior_hadamard_only(g, v))
                || (boundary_side_ok(g, v) && interior_hadamard_only(g, u))
        })
    }

    fn apply(&self, graph: &mut ZxGraph, matches: &[RuleMatch]) {
        for m in matches {
            let RuleMatch::Pair(u, v) = m else { continue };
            if !graph.contains(*u) || !graph.contains(*v) {
                continue;
            }
            // Orient so `u` is the boundary-adjacent endpoint.
            let (u, v) = if boundary_legs(graph, *u).is_empty() { (*v, *u) } else { (*u, *v) };
            for (b, t) in boundary_legs(graph, u) {
                let qubit = graph.vertex(b).expect("live boundary").qubit();
                // b -t- u becomes b -t̄- z -H- u; the toggled boundary edge
                // composed with the Hadamard restores the original type.
                let z = graph.add_vertex(qubit, VertexType::ZSpider, Phase::zero());
                let _ = graph.remove_edge(u, b, Some(t));
                let _ = graph.add_edge(b, z, t.toggled());
                let _ = graph.add_edge(z, u, EdgeType::Hadamard);
            }
            apply_pivot(graph, u, v);
        }
    }
}

fn boundary_legs(graph: &ZxGraph, v: VertexId) -> Vec<(VertexId, EdgeType)> {
    graph
        .vertex(v)
        .expect("live vertex")
        .neighbors()
        .iter()
        .filter(|&&(w, _)| graph.vertex(w).is_some_and(|n| n.is_boundary()))
        .copied()
        .collect()
}
