//! Phase gadget fusion: gadgets on the same support merge.

use std::collections::BTreeMap;

use alsvid_zx::{EdgeType, VertexId, ZxGraph};

use super::{RewriteRule, RuleMatch};

/// Merge phase gadgets with identical supports. A gadget is a phase-0 Z
/// axis spider Hadamard-connected to a degree-1 Z leaf (carrying the
/// phase) and to its support spiders; two gadgets over the same support
/// compose by adding their leaf phases.
pub struct PhaseGadgetFusion;

/// Identify `v` as a gadget leaf: returns `(axis, sorted support)`.
fn gadget_of(graph: &ZxGraph, leaf: VertexId) -> Option<(VertexId, Vec<VertexId>)> {
    let lv = graph.vertex(leaf)?;
    if !lv.is_z() || lv.degree() != 1 {
        return None;
    }
    let (axis, etype) = lv.neighbors()[0];
    if etype != EdgeType::Hadamard {
        return None;
    }
    let av = graph.vertex(axis)?;
    if !av.is_z() || !av.phase().is_zero() || av.degree() < 2 {
        return None;
    }
    let mut support = vec![];
    for &(w, t) in av.neighbors() {
        if w == leaf {
            continue;
        }
        if t != EdgeType::Hadamard || !graph.vertex(w)?.is_z() {
            return None;
        }
        // Another degree-1 neighbor would make the axis ambiguous.
        if graph.vertex(w)?.degree() == 1 {
            return None;
        }
        support.push(w);
    }
    if support.is_empty() {
        return None;
    }
    support.sort_unstable();
    Some((axis, support))
}

impl RewriteRule for PhaseGadgetFusion {
    fn name(&self) -> &'static str {
        "Phase Gadget Fusion"
    }

    fn find_matches(&self, graph: &ZxGraph) -> Vec<RuleMatch> {
        let mut by_support: BTreeMap<Vec<VertexId>, Vec<(VertexId, VertexId)>> = BTreeMap::new();
        for v in graph.vertices() {
            if let Some((axis, support)) = gadget_of(graph, v.id()) {
                by_support.entry(support).or_default().push((axis, v.id()));
            }
        }
        by_support
            .into_values()
            .filter(|gadgets| gadgets.len() > 1)
            .map(|gadgets| RuleMatch::GadgetFusion {
                keep: gadgets[0],
                merge: gadgets[1..].to_vec(),
            })
            .collect()
    }

    fn apply(&self, graph: &mut ZxGraph, matches: &[RuleMatch]) {
        for m in matches {
            let RuleMatch::GadgetFusion { keep, merge } = m else { continue };
            let (_, keep_leaf) = *keep;
            if !graph.contains(keep_leaf) {
                continue;
            }
            for (axis, leaf) in merge {
                let Some(lv) = graph.vertex(*leaf) else { continue };
                let phase = lv.phase();
                let support_size = graph.degree(*axis).saturating_sub(1);
                let _ = graph.add_to_phase(keep_leaf, phase);
                graph.remove_vertex(*leaf);
                graph.remove_vertex(*axis);
                // Two stacked gadgets carry one more copy of the diagonal
                // normalization than the merged one.
                graph
                    .scalar_mut()
                    .mul_complex(num_complex::Complex64::new(
                        2f64.powf(-(support_size as f64) / 4.0),
                        0.0,
                    ));
            }
        }
        graph.remove_isolated_vertices();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_zx::{Phase, VertexType};

    fn gadget(g: &mut ZxGraph, phase: Phase, support: &[VertexId]) -> (VertexId, VertexId) {
        g.add_gadget(phase, support)
    }

    fn anchored(g: &mut ZxGraph, q: i32) -> VertexId {
        let w = g.add_vertex(q, VertexType::ZSpider, Phase::zero());
        let o = g.add_output(q).unwrap();
        g.add_edge(w, o, EdgeType::Simple).unwrap();
        w
    }

    #[test]
    fn test_same_support_gadgets_merge() {
        let mut g = ZxGraph::new();
        let a = anchored(&mut g, 0);
        let b = anchored(&mut g, 1);
        let (_, l1) = gadget(&mut g, Phase::new(1, 4), &[a, b]);
        let (_, _l2) = gadget(&mut g, Phase::new(1, 4), &[a, b]);

        let matches = PhaseGadgetFusion.find_matches(&g);
        assert_eq!(matches.len(), 1);
        PhaseGadgetFusion.apply(&mut g, &matches);

        // One gadget left, carrying the summed phase.
        let leaves: Vec<_> = g.vertices().filter(|v| v.degree() == 1 && v.is_z()).collect();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].id(), l1);
        assert_eq!(leaves[0].phase(), Phase::new(1, 2));
        assert!(g.is_valid());
    }

    #[test]
    fn test_different_supports_do_not_merge() {
        let mut g = ZxGraph::new();
        let a = anchored(&mut g, 0);
        let b = anchored(&mut g, 1);
        let c = anchored(&mut g, 2);
        gadget(&mut g, Phase::new(1, 4), &[a, b]);
        gadget(&mut g, Phase::new(1, 4), &[a, c]);
        assert!(PhaseGadgetFusion.find_matches(&g).is_empty());
    }

    #[test]
    fn test_three_gadgets_merge_into_one() {
        let mut g = ZxGraph::new();
        let a = anchored(&mut g, 0);
        let b = anchored(&mut g, 1);
        gadget(&mut g, Phase::new(1, 4), &[a, b]);
        gadget(&mut g, Phase::new(1, 4), &[a, b]);
        gadget(&mut g, Phase::new(-1, 4), &[a, b]);

        let matches = PhaseGadgetFusion.find_matches(&g);
        PhaseGadgetFusion.apply(&mut g, &matches);
        let leaves: Vec<_> = g.vertices().filter(|v| v.degree() == 1 && v.is_z()).collect();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].phase(), Phase::new(1, 4));
    }
}
