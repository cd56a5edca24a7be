//! Fixed-point scheduling of rewrite rules.
//!
//! A [`Simplifier`] borrows one graph and drives rules against it until
//! they stop matching. Strategies are compositions of these loops; every
//! loop polls the cooperative stop flag between rule invocations (never
//! inside a rule), so an interrupted strategy leaves a valid graph behind.

use tracing::{debug, info};

use alsvid_zx::{VertexType, ZxGraph, stop_requested};

use crate::rules::{
    HRule, IdRemoval, LocalComplement, PhaseGadgetFusion, Pivot, PivotBoundary, PivotGadget,
    RewriteRule, SpiderFusion, StateCopy,
};

/// Per-rule telemetry: matches applied on each iteration of its loop.
pub type Recipe = Vec<(String, Vec<usize>)>;

/// Drives rules to fixed point on one graph.
pub struct Simplifier<'a> {
    graph: &'a mut ZxGraph,
    recipe: Recipe,
}

impl<'a> Simplifier<'a> {
    /// Wrap a graph for simplification.
    pub fn new(graph: &'a mut ZxGraph) -> Self {
        Simplifier { graph, recipe: vec![] }
    }

    /// The simplified graph.
    pub fn graph(&self) -> &ZxGraph {
        self.graph
    }

    /// Telemetry collected so far.
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Run one rule to fixed point: match, apply, repeat until no matches.
    /// Returns the number of iterations.
    pub fn simp(&mut self, rule: &dyn RewriteRule) -> usize {
        let mut counts = vec![];
        while !stop_requested() {
            let matches = rule.find_matches(self.graph);
            if matches.is_empty() {
                break;
            }
            counts.push(matches.len());
            rule.apply(self.graph, &matches);
        }
        let iterations = counts.len();
        if iterations > 0 {
            debug!(rule = rule.name(), iterations, "rule loop finished");
        }
        self.recipe.push((rule.name().to_string(), counts));
        iterations
    }

    /// The specialized loop for the Hadamard rule: H-box conversion can
    /// keep matching without making progress, so the loop also stops when
    /// the vertex count stops decreasing.
    pub fn hadamard_simp(&mut self) -> usize {
        let rule = HRule;
        let mut counts = vec![];
        while !stop_requested() {
            let vertices_before = self.graph.num_vertices();
            let matches = rule.find_matches(self.graph);
            if matches.is_empty() {
                break;
            }
            counts.push(matches.len());
            rule.apply(self.graph, &matches);
            if self.graph.num_vertices() >= vertices_before {
                break;
            }
        }
        let iterations = counts.len();
        self.recipe.push((rule.name().to_string(), counts));
        iterations
    }

    // =========================================================================
    // Colour normalization
    // =========================================================================

    /// Toggle every X spider to Z so downstream rules only face the Z case.
    pub fn to_graph(&mut self) {
        let xs: Vec<_> = self
            .graph
            .vertices()
            .filter(|v| v.vtype() == VertexType::XSpider)
            .map(|v| v.id())
            .collect();
        for v in xs {
            let _ = self.graph.toggle_vertex(v);
        }
    }

    /// Toggle every Z spider to X (the red-graph normal form).
    pub fn to_rgraph(&mut self) {
        let zs: Vec<_> = self
            .graph
            .vertices()
            .filter(|v| v.vtype() == VertexType::ZSpider)
            .map(|v| v.id())
            .collect();
        for v in zs {
            let _ = self.graph.toggle_vertex(v);
        }
    }

    /// Replace every Hadamard boundary edge `b -H- v` by `b -S- z -H- v`
    /// with a fresh phase-0 spider, so boundaries attach over simple edges
    /// as graph-likeness requires. Simple boundary edges (including bare
    /// identity wires) are left alone.
    pub fn normalize_boundaries(&mut self) {
        let boundaries: Vec<_> = self
            .graph
            .inputs()
            .iter()
            .chain(self.graph.outputs())
            .copied()
            .collect();
        for b in boundaries {
            let Some(vert) = self.graph.vertex(b) else { continue };
            let Some(&(v, t)) = vert.neighbors().first() else { continue };
            if t != alsvid_zx::EdgeType::Hadamard {
                continue;
            }
            let qubit = vert.qubit();
            let z = self.graph.add_vertex(qubit, VertexType::ZSpider, alsvid_zx::Phase::zero());
            let _ = self.graph.remove_edge(b, v, Some(t));
            let _ = self.graph.add_edge(b, z, alsvid_zx::EdgeType::Simple);
            let _ = self.graph.add_edge(z, v, alsvid_zx::EdgeType::Hadamard);
        }
    }

    // =========================================================================
    // Named strategies
    // =========================================================================

    /// Interior Clifford simplification: fuse, normalize colours, then loop
    /// identity removal, fusion, pivot, and local complementation to fixed
    /// point. Returns the number of loop rounds that made progress.
    pub fn interior_clifford_simp(&mut self) -> usize {
        self.hadamard_simp();
        self.simp(&SpiderFusion);
        self.to_graph();
        let mut rounds = 0;
        while !stop_requested() {
            let i1 = self.simp(&IdRemoval);
            let i2 = self.simp(&SpiderFusion);
            let i3 = self.simp(&Pivot);
            let i4 = self.simp(&LocalComplement);
            if i1 + i2 + i3 + i4 == 0 {
                break;
            }
            rounds += 1;
        }
        rounds
    }

    /// Interior Clifford simplification plus boundary pivots, iterated
    /// until the boundary pass stops firing.
    pub fn clifford_simp(&mut self) -> usize {
        let mut rounds = 0;
        loop {
            rounds += self.interior_clifford_simp();
            let boundary = self.simp(&PivotBoundary);
            if boundary == 0 || stop_requested() {
                break;
            }
        }
        rounds
    }

    /// The main simplification routine.
    pub fn full_reduce(&mut self) {
        self.interior_clifford_simp();
        self.simp(&PivotGadget);
        while !stop_requested() {
            self.clifford_simp();
            let gadgets = self.simp(&PhaseGadgetFusion);
            self.interior_clifford_simp();
            let pivots = self.simp(&PivotGadget);
            if gadgets + pivots == 0 {
                break;
            }
        }
        self.normalize_boundaries();
        self.finish("FR");
    }

    /// Like [`Simplifier::full_reduce`], but checkpoints the graph each
    /// round and rolls back to the checkpoint if a round pushes the T-count
    /// up after the target has been reached.
    pub fn dynamic_reduce(&mut self, t_target: usize) {
        self.interior_clifford_simp();
        self.simp(&PivotGadget);
        while !stop_requested() {
            let t_before = self.graph.t_count();
            let checkpoint = self.graph.clone();

            self.clifford_simp();
            let gadgets = self.simp(&PhaseGadgetFusion);
            self.interior_clifford_simp();
            let pivots = self.simp(&PivotGadget);

            let t_after = self.graph.t_count();
            if t_after > t_before && t_before <= t_target {
                *self.graph = checkpoint;
                debug!(t_before, t_after, "rolled back a round that regressed the T-count");
                break;
            }
            if gadgets + pivots == 0 {
                break;
            }
        }
        self.normalize_boundaries();
        self.finish("DR");
    }

    /// The reduce strategy interleaving state copies with the full-reduce
    /// loop, ending in the red-graph normal form.
    pub fn symbolic_reduce(&mut self) {
        self.interior_clifford_simp();
        self.simp(&PivotGadget);
        self.simp(&StateCopy);
        while !stop_requested() {
            self.clifford_simp();
            let gadgets = self.simp(&PhaseGadgetFusion);
            self.interior_clifford_simp();
            let pivots = self.simp(&PivotGadget);
            self.simp(&StateCopy);
            if gadgets + pivots == 0 {
                break;
            }
        }
        self.to_rgraph();
        self.finish("SR");
    }

    fn finish(&mut self, tag: &str) {
        let interrupted = stop_requested();
        let entry = if interrupted { format!("{tag}[INT]") } else { tag.to_string() };
        self.graph.add_procedure(entry);
        info!(
            strategy = tag,
            interrupted,
            vertices = self.graph.num_vertices(),
            edges = self.graph.num_edges(),
            t_count = self.graph.t_count(),
            "strategy finished"
        );
    }
}
