//! Generalized flow.
//!
//! A gflow assigns every non-output vertex a correction set inside the
//! vertices measured after it, such that correcting those vertices undoes
//! its measurement. The layers built here — outputs first, walking
//! backward — are the causal structure the extractor peels along.
//!
//! Layer construction follows the backward algorithm: for each candidate
//! `v`, solve `M·x = χ(v)` over GF(2), where `M` is the biadjacency
//! between the unresolved vertices and the current correcter set. Solvable
//! candidates form the next layer.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use alsvid_zx::{VertexId, ZxGraph, stop_requested};

use crate::gf2::BooleanMatrix;

/// Measurement plane of a vertex (extended gflow).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementPlane {
    /// The default plane for graph-like spiders.
    XY,
    /// Phase-gadget leaves are effectively YZ-measured.
    YZ,
    /// Supported by the solver, unused by the default assignment.
    XZ,
}

/// The result of a gflow computation.
#[derive(Debug, Clone)]
pub struct GFlow {
    /// Layers from the outputs backward; layer 0 is the output set.
    pub levels: Vec<Vec<VertexId>>,
    /// Correction set per vertex.
    pub correction_sets: FxHashMap<VertexId, Vec<VertexId>>,
    /// Layer index per vertex.
    pub layer_of: FxHashMap<VertexId, usize>,
    /// Measurement plane per vertex.
    pub planes: FxHashMap<VertexId, MeasurementPlane>,
    /// True when every vertex was absorbed into a layer.
    pub valid: bool,
    /// The unresolved vertices when `valid` is false.
    pub failed: Vec<VertexId>,
}

/// Gflow computation options.
#[derive(Debug, Clone, Copy)]
pub struct GFlowCalculator {
    /// Admit YZ/XZ measurement planes (required for phase gadgets).
    pub extended: bool,
    /// Force each layer to be an independent set.
    pub independent_layers: bool,
}

impl Default for GFlowCalculator {
    fn default() -> Self {
        GFlowCalculator { extended: true, independent_layers: false }
    }
}

impl GFlowCalculator {
    /// Compute the gflow of a graph-like diagram.
    ///
    /// In extended mode a phase gadget counts as one YZ-measured vertex:
    /// the axis carries the plane and the degree-1 leaf is folded into the
    /// axis's layer instead of being resolved on its own.
    pub fn calculate(&self, graph: &ZxGraph) -> GFlow {
        let mut leaf_of_axis: FxHashMap<VertexId, VertexId> = FxHashMap::default();
        let mut leaves: FxHashSet<VertexId> = FxHashSet::default();
        if self.extended {
            for v in graph.vertices() {
                if is_gadget_leaf(graph, v.id()) {
                    let (axis, _) = v.neighbors()[0];
                    leaf_of_axis.entry(axis).or_insert(v.id());
                    leaves.insert(v.id());
                }
            }
        }

        let mut planes: FxHashMap<VertexId, MeasurementPlane> = FxHashMap::default();
        for v in graph.vertices() {
            let plane = if leaf_of_axis.contains_key(&v.id()) {
                MeasurementPlane::YZ
            } else {
                MeasurementPlane::XY
            };
            planes.insert(v.id(), plane);
        }

        let outputs: Vec<VertexId> = graph.outputs().to_vec();
        let inputs: FxHashSet<VertexId> = graph.inputs().iter().copied().collect();

        // Leaves are half of their gadget; they enter the resolved set up
        // front and join the axis's layer when it lands.
        let mut resolved: FxHashSet<VertexId> = outputs.iter().copied().collect();
        resolved.extend(leaves.iter().copied());
        let mut levels: Vec<Vec<VertexId>> = vec![outputs.clone()];
        let mut correction_sets: FxHashMap<VertexId, Vec<VertexId>> = FxHashMap::default();
        let mut layer_of: FxHashMap<VertexId, usize> = FxHashMap::default();
        for &o in &outputs {
            layer_of.insert(o, 0);
        }

        loop {
            let unresolved: Vec<VertexId> = graph
                .vertex_ids()
                .into_iter()
                .filter(|v| !resolved.contains(v))
                .collect();
            if unresolved.is_empty() {
                break;
            }
            if stop_requested() {
                return self.bail(levels, correction_sets, layer_of, planes, unresolved);
            }

            // Correcters: resolved vertices that are neither inputs (never
            // corrected) nor gadget leaves (their only neighbor is the
            // axis, which corrects itself).
            let mut correcters: Vec<VertexId> = resolved
                .iter()
                .copied()
                .filter(|v| !inputs.contains(v) && !leaves.contains(v))
                .collect();
            correcters.sort_unstable();

            let row_of: FxHashMap<VertexId, usize> =
                unresolved.iter().enumerate().map(|(i, &v)| (v, i)).collect();
            let mut m = BooleanMatrix::new(unresolved.len(), correcters.len());
            for (c, &w) in correcters.iter().enumerate() {
                for &(n, _) in graph.vertex(w).expect("live vertex").neighbors() {
                    if let Some(&r) = row_of.get(&n) {
                        m.set(r, c, true);
                    }
                }
            }

            let mut layer: Vec<VertexId> = vec![];
            for &v in &unresolved {
                let plane = planes[&v];
                if plane != MeasurementPlane::XY && !self.extended {
                    continue;
                }
                let mut b = vec![false; unresolved.len()];
                match plane {
                    MeasurementPlane::XY => {
                        b[row_of[&v]] = true;
                    }
                    MeasurementPlane::XZ => {
                        // v is in its own correction set: χ(v) = e_v + N(v).
                        b[row_of[&v]] = true;
                        for &(n, _) in graph.vertex(v).expect("live vertex").neighbors() {
                            if let Some(&r) = row_of.get(&n) {
                                b[r] ^= true;
                            }
                        }
                    }
                    MeasurementPlane::YZ => {
                        // v is in its own correction set and its odd
                        // neighborhood must avoid the unresolved set.
                        for &(n, _) in graph.vertex(v).expect("live vertex").neighbors() {
                            if let Some(&r) = row_of.get(&n) {
                                b[r] ^= true;
                            }
                        }
                    }
                }
                let Some(x) = m.solve(&b) else { continue };
                let mut set: Vec<VertexId> = correcters
                    .iter()
                    .zip(&x)
                    .filter(|&(_, &used)| used)
                    .map(|(&w, _)| w)
                    .collect();
                if plane != MeasurementPlane::XY {
                    set.push(v);
                }
                correction_sets.insert(v, set);
                layer.push(v);
            }

            if layer.is_empty() {
                debug!(unresolved = unresolved.len(), "no gflow: layer construction stalled");
                return self.bail(levels, correction_sets, layer_of, planes, unresolved);
            }

            if self.independent_layers {
                let mut kept: Vec<VertexId> = vec![];
                for &v in &layer {
                    let adjacent = kept.iter().any(|&k| {
                        graph.vertex(v).expect("live vertex").is_neighbor(k)
                    });
                    if !adjacent {
                        kept.push(v);
                    } else {
                        correction_sets.remove(&v);
                    }
                }
                layer = kept;
            }

            let index = levels.len();
            for &v in &layer {
                resolved.insert(v);
                layer_of.insert(v, index);
            }
            // Gadget leaves land alongside their axis.
            for &v in layer.clone().iter() {
                if let Some(&leaf) = leaf_of_axis.get(&v) {
                    layer_of.insert(leaf, index);
                    layer.push(leaf);
                }
            }
            levels.push(layer);
        }

        debug!(layers = levels.len(), "gflow found");
        GFlow {
            levels,
            correction_sets,
            layer_of,
            planes,
            valid: true,
            failed: vec![],
        }
    }

    fn bail(
        &self,
        levels: Vec<Vec<VertexId>>,
        correction_sets: FxHashMap<VertexId, Vec<VertexId>>,
        layer_of: FxHashMap<VertexId, usize>,
        planes: FxHashMap<VertexId, MeasurementPlane>,
        failed: Vec<VertexId>,
    ) -> GFlow {
        GFlow { levels, correction_sets, layer_of, planes, valid: false, failed }
    }
}

/// A phase-gadget leaf: a degree-1 Z spider hanging off an interior spider
/// over a Hadamard edge.
fn is_gadget_leaf(graph: &ZxGraph, v: VertexId) -> bool {
    let Some(vert) = graph.vertex(v) else { return false };
    if !vert.is_z() || vert.degree() != 1 {
        return false;
    }
    let (axis, et) = vert.neighbors()[0];
    et == alsvid_zx::EdgeType::Hadamard
        && graph.vertex(axis).is_some_and(|a| a.is_z() && !a.is_boundary())
}
