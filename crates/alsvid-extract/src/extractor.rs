//! Circuit extraction from graph-like diagrams.
//!
//! The extractor peels the diagram from its outputs toward its inputs,
//! emitting gates as it goes: frontier phases become Z rotations, frontier
//! Hadamard edges become CZs, Gaussian elimination over the
//! frontier/back-neighbor biadjacency becomes CNOTs, and single-neighbor
//! frontier spiders become Hadamards that advance the frontier. Phase
//! gadgets blocking the frontier are pivoted out. Gates are collected in
//! output-to-input discovery order and reversed at the end.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use alsvid_qcir::{GateType, QCir, QubitId};
use alsvid_simp::rules::apply_pivot;
use alsvid_zx::{EdgeType, Phase, VertexId, VertexType, ZxGraph, stop_requested};

use crate::error::{ExtractError, ExtractResult};
use crate::gflow::GFlowCalculator;

/// Knobs for the CNOT-synthesis stage and output handling.
#[derive(Debug, Clone, Copy)]
pub struct ExtractorOptions {
    /// 0: block elimination with `block_size`; 1: plain elimination;
    /// 2: best of plain and blocked; 3: best over several block sizes.
    pub optimize_level: u8,
    /// Block size for level-0 (and candidate for level-2/3) elimination.
    pub block_size: usize,
    /// Cancel adjacent duplicate CNOTs before emitting.
    pub filter_cx: bool,
    /// Sort frontier rows by qubit for deterministic output.
    pub sort_frontier: bool,
    /// Sort back-neighbor columns by vertex id.
    pub sort_neighbors: bool,
    /// Realize the residual qubit permutation with SWAP gates; when false
    /// it is only recorded on the result.
    pub permute_qubits: bool,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        ExtractorOptions {
            optimize_level: 1,
            block_size: 4,
            filter_cx: true,
            sort_frontier: true,
            sort_neighbors: true,
            permute_qubits: true,
        }
    }
}

/// The product of an extraction run.
#[derive(Debug)]
pub struct Extraction {
    /// The synthesized circuit.
    pub circuit: QCir,
    /// Residual wire permutation as `(output row, input row)` pairs; empty
    /// when the permutation was realized with swaps or is the identity.
    pub permutation: Vec<(usize, usize)>,
}

/// Extracts a circuit from one graph-like diagram.
pub struct Extractor<'g> {
    graph: &'g mut ZxGraph,
    options: ExtractorOptions,
    /// Gates in output-to-input discovery order (reversed on finish).
    rev_gates: Vec<(GateType, Vec<QubitId>)>,
    /// Output qubit value → circuit row.
    row_of_qubit: FxHashMap<i32, usize>,
    /// Input qubit value → circuit row.
    row_of_input: FxHashMap<i32, usize>,
    iteration: usize,
}

impl<'g> Extractor<'g> {
    /// Wrap a diagram for extraction, checking the graph-like and gflow
    /// preconditions up front.
    pub fn new(graph: &'g mut ZxGraph, options: ExtractorOptions) -> ExtractResult<Self> {
        check_extractable(graph)?;
        let flow = GFlowCalculator::default().calculate(graph);
        if !flow.valid {
            return Err(ExtractError::NoGFlow { failed: flow.failed });
        }

        let row_of_qubit = sorted_rows(graph, graph.outputs());
        let row_of_input = sorted_rows(graph, graph.inputs());
        Ok(Extractor {
            graph,
            options,
            rev_gates: vec![],
            row_of_qubit,
            row_of_input,
            iteration: 0,
        })
    }

    /// Run the extraction to completion.
    pub fn extract(mut self) -> ExtractResult<Extraction> {
        while self.extraction_step()? {}
        let permutation = self.permute_qubits()?;
        self.finish(permutation)
    }

    /// Run at most `n` extraction steps; true while work remains.
    pub fn extraction_loop(&mut self, n: usize) -> ExtractResult<bool> {
        for _ in 0..n {
            if !self.extraction_step()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// One round of the main loop. Returns false once every output is
    /// wired to an input.
    pub fn extraction_step(&mut self) -> ExtractResult<bool> {
        if stop_requested() {
            return Err(ExtractError::Cancelled);
        }
        self.iteration += 1;
        if self.frontier()?.is_empty() {
            return Ok(false);
        }
        self.clean_frontier()?;
        if self.remove_gadget()? {
            return Ok(true);
        }
        self.extract_cxs()?;
        if !self.extract_hadamards_from_matrix()? {
            return Err(ExtractError::NoProgress {
                iteration: self.iteration,
                reason: "no frontier vertex could advance after CNOT synthesis".to_string(),
            });
        }
        Ok(true)
    }

    /// The active frontier as `(circuit row, vertex)` pairs: the interior
    /// neighbor of each output whose wire is not yet finished.
    pub fn frontier(&self) -> ExtractResult<Vec<(usize, VertexId)>> {
        let mut frontier = vec![];
        let mut seen: FxHashSet<VertexId> = FxHashSet::default();
        for &o in self.graph.outputs() {
            let out = self.graph.vertex(o).expect("live boundary");
            let &(v, _) = out.neighbors().first().ok_or_else(|| {
                ExtractError::NotGraphLike(format!("output {o} is disconnected"))
            })?;
            if self.graph.inputs().contains(&v) {
                continue;
            }
            if !seen.insert(v) {
                return Err(ExtractError::NoProgress {
                    iteration: self.iteration,
                    reason: format!("frontier vertex {v} serves two outputs"),
                });
            }
            frontier.push((self.row_of_qubit[&out.qubit()], v));
        }
        if self.options.sort_frontier {
            frontier.sort_unstable();
        }
        Ok(frontier)
    }

    /// Emit Z rotations for frontier phases and CZs for Hadamard edges
    /// between frontier vertices, clearing both from the graph.
    pub fn clean_frontier(&mut self) -> ExtractResult<()> {
        let frontier = self.frontier()?;
        for &(row, v) in &frontier {
            let phase = self.graph.vertex(v).expect("frontier vertex").phase();
            if let Some(gate) = GateType::z_rotation(phase) {
                self.rev_gates.push((gate, vec![QubitId(row as u32)]));
                let _ = self.graph.set_phase(v, Phase::zero());
            }
        }
        self.extract_czs(&frontier);
        Ok(())
    }

    /// Emit a CZ for every Hadamard edge between two frontier vertices.
    fn extract_czs(&mut self, frontier: &[(usize, VertexId)]) {
        for i in 0..frontier.len() {
            let (ri, vi) = frontier[i];
            for &(rj, vj) in &frontier[i + 1..] {
                if self
                    .graph
                    .vertex(vi)
                    .expect("frontier vertex")
                    .is_neighbor_via(vj, EdgeType::Hadamard)
                {
                    let _ = self.graph.remove_edge(vi, vj, Some(EdgeType::Hadamard));
                    self.rev_gates
                        .push((GateType::CZ, vec![QubitId(ri as u32), QubitId(rj as u32)]));
                }
            }
        }
    }

    /// Pivot out one phase gadget whose axis touches the frontier. Returns
    /// true when a gadget was removed (the frontier changed).
    pub fn remove_gadget(&mut self) -> ExtractResult<bool> {
        let frontier = self.frontier()?;
        for &(_, v) in &frontier {
            let axes: Vec<VertexId> = self
                .graph
                .vertex(v)
                .expect("frontier vertex")
                .neighbors()
                .iter()
                .filter(|&&(w, t)| t == EdgeType::Hadamard && is_gadget_axis(self.graph, w))
                .map(|&(w, _)| w)
                .collect();
            let Some(&axis) = axes.first() else { continue };

            // Buffer every boundary leg of v so the pivot sees an interior
            // neighborhood, then pivot the axis out through v.
            let boundary_legs: Vec<(VertexId, EdgeType)> = self
                .graph
                .vertex(v)
                .expect("frontier vertex")
                .neighbors()
                .iter()
                .filter(|&&(w, _)| self.graph.vertex(w).is_some_and(|n| n.is_boundary()))
                .copied()
                .collect();
            for (b, t) in boundary_legs {
                let qubit = self.graph.vertex(b).expect("live boundary").qubit();
                let z1 = self.graph.add_vertex(qubit, VertexType::ZSpider, Phase::zero());
                let z2 = self.graph.add_vertex(qubit, VertexType::ZSpider, Phase::zero());
                let _ = self.graph.remove_edge(v, b, Some(t));
                let _ = self.graph.add_edge(b, z1, t);
                let _ = self.graph.add_edge(z1, z2, EdgeType::Hadamard);
                let _ = self.graph.add_edge(z2, v, EdgeType::Hadamard);
            }
            apply_pivot(self.graph, v, axis);
            debug!(axis = %axis, through = %v, "removed a phase gadget");
            return Ok(true);
        }
        Ok(false)
    }

    /// CNOT synthesis: when no frontier row can advance on its own, run
    /// Gaussian elimination over the frontier/back-neighbor biadjacency and
    /// realize the recorded row operations as CNOTs and edge updates.
    pub fn extract_cxs(&mut self) -> ExtractResult<()> {
        let frontier = self.frontier()?;
        let (rows, columns, mut matrix) = self.biadjacency(&frontier);
        if matrix.num_cols() == 0 || rows.is_empty() {
            return Ok(());
        }
        if (0..matrix.num_rows()).any(|r| matrix.row_weight(r) == 1) {
            return Ok(());
        }

        match self.options.optimize_level {
            0 => {
                matrix.gaussian_elimination_block(self.options.block_size);
            }
            1 => {
                matrix.gaussian_elimination();
            }
            2 => {
                let mut plain = matrix.clone();
                plain.gaussian_elimination();
                let mut blocked = matrix.clone();
                blocked.gaussian_elimination_block(self.options.block_size);
                matrix = if plain.row_ops().len() <= blocked.row_ops().len() {
                    plain
                } else {
                    blocked
                };
            }
            _ => {
                let mut best = matrix.clone();
                best.gaussian_elimination();
                for size in 2..=6 {
                    let mut candidate = matrix.clone();
                    candidate.gaussian_elimination_block(size);
                    if candidate.row_ops().len() < best.row_ops().len() {
                        best = candidate;
                    }
                }
                matrix = best;
            }
        }

        let mut ops: Vec<(usize, usize)> = matrix.row_ops().to_vec();
        if self.options.filter_cx {
            ops = filter_duplicate_cxs(&ops);
        }
        for &(src, dst) in &ops {
            self.rev_gates.push((
                GateType::CX,
                vec![QubitId(rows[dst].0 as u32), QubitId(rows[src].0 as u32)],
            ));
        }

        // Re-wire the frontier to match the reduced matrix.
        for (r, &(_, v)) in rows.iter().enumerate() {
            for (c, &w) in columns.iter().enumerate() {
                let has = self
                    .graph
                    .vertex(v)
                    .expect("frontier vertex")
                    .is_neighbor_via(w, EdgeType::Hadamard);
                let want = matrix.get(r, c);
                if has && !want {
                    let _ = self.graph.remove_edge(v, w, Some(EdgeType::Hadamard));
                } else if !has && want {
                    let _ = self.graph.add_edge(v, w, EdgeType::Hadamard);
                }
            }
        }
        debug!(cnots = ops.len(), "CNOT synthesis round finished");
        Ok(())
    }

    /// Advance every frontier vertex left with a single back-neighbor:
    /// interior neighbors advance with an H gate, input neighbors finish
    /// the wire. Returns true when anything advanced.
    pub fn extract_hadamards_from_matrix(&mut self) -> ExtractResult<bool> {
        let frontier = self.frontier()?;
        let mut progress = false;
        for (row, v) in frontier {
            let vert = self.graph.vertex(v).expect("frontier vertex");
            let output = vert
                .neighbors()
                .iter()
                .find(|&&(w, _)| self.graph.outputs().contains(&w))
                .map(|&(w, _)| w)
                .expect("frontier vertices hang off an output");
            let back: Vec<(VertexId, EdgeType)> = vert
                .neighbors()
                .iter()
                .filter(|&&(w, _)| w != output)
                .copied()
                .collect();

            match back.as_slice() {
                [(w, EdgeType::Simple)] if self.graph.inputs().contains(w) => {
                    // A finished wire: splice the input straight to the
                    // output.
                    let (w, output) = (*w, output);
                    self.graph.remove_vertex(v);
                    let _ = self.graph.add_edge(w, output, EdgeType::Simple);
                    progress = true;
                }
                [(w, EdgeType::Hadamard)] => {
                    let (w, output) = (*w, output);
                    self.rev_gates.push((GateType::H, vec![QubitId(row as u32)]));
                    self.graph.remove_vertex(v);
                    let _ = self.graph.add_edge(output, w, EdgeType::Simple);
                    progress = true;
                }
                _ => {}
            }
        }
        Ok(progress)
    }

    /// Resolve the residual wire permutation. With `permute_qubits` set,
    /// SWAP gates are emitted at the circuit start; otherwise the mapping
    /// is returned for the caller to track.
    pub fn permute_qubits(&mut self) -> ExtractResult<Vec<(usize, usize)>> {
        let mut mapping: FxHashMap<usize, usize> = FxHashMap::default();
        for &o in self.graph.outputs() {
            let out = self.graph.vertex(o).expect("live boundary");
            let Some(&(i, _)) = out.neighbors().first() else { continue };
            if let Some(input) = self.graph.vertex(i).filter(|n| n.is_boundary()) {
                mapping.insert(self.row_of_qubit[&out.qubit()], self.row_of_input[&input.qubit()]);
            }
        }

        let identity = mapping.iter().all(|(a, b)| a == b);
        if identity {
            return Ok(vec![]);
        }
        if !self.options.permute_qubits {
            let mut pairs: Vec<(usize, usize)> = mapping.into_iter().collect();
            pairs.sort_unstable();
            self.graph.add_procedure("extract[perm]");
            return Ok(pairs);
        }

        // Sort the wire mapping to the identity with swaps; they land at
        // the circuit start after the final reversal.
        let mut m = mapping;
        let rows: Vec<usize> = {
            let mut r: Vec<usize> = m.keys().copied().collect();
            r.sort_unstable();
            r
        };
        for &r in &rows {
            while m.get(&r).is_some_and(|&src| src != r) {
                let src = m[&r];
                let partner = rows
                    .iter()
                    .copied()
                    .find(|&s| m.get(&s) == Some(&r))
                    .unwrap_or(src);
                self.rev_gates.push((
                    GateType::Swap,
                    vec![QubitId(r as u32), QubitId(partner as u32)],
                ));
                let a = m[&r];
                let b = m[&partner];
                m.insert(r, b);
                m.insert(partner, a);
            }
        }
        Ok(vec![])
    }

    /// Build the circuit from the collected gates.
    fn finish(self, permutation: Vec<(usize, usize)>) -> ExtractResult<Extraction> {
        let mut circuit = QCir::with_qubits(self.row_of_qubit.len());
        for (gate, qubits) in self.rev_gates.into_iter().rev() {
            circuit.apply(gate, qubits)?;
        }
        info!(
            gates = circuit.num_gates(),
            iterations = self.iteration,
            "extraction finished"
        );
        Ok(Extraction { circuit, permutation })
    }

    /// The frontier/back-neighbor biadjacency over Hadamard edges. Rows
    /// with an input connection are placed last so that a rank deficit
    /// zeroes exactly the rows that can retire into wires.
    fn biadjacency(
        &self,
        frontier: &[(usize, VertexId)],
    ) -> (Vec<(usize, VertexId)>, Vec<VertexId>, crate::gf2::BooleanMatrix) {
        let mut rows: Vec<(usize, VertexId)> = frontier.to_vec();
        rows.sort_by_key(|&(row, v)| {
            let input_connected = self
                .graph
                .vertex(v)
                .expect("frontier vertex")
                .neighbors()
                .iter()
                .any(|&(w, _)| self.graph.inputs().contains(&w));
            (input_connected, row)
        });

        let mut columns: Vec<VertexId> = vec![];
        let mut seen: FxHashSet<VertexId> = FxHashSet::default();
        for &(_, v) in &rows {
            for &(w, t) in self.graph.vertex(v).expect("frontier vertex").neighbors() {
                if t == EdgeType::Hadamard
                    && seen.insert(w)
                    && self.graph.vertex(w).is_some_and(|n| !n.is_boundary())
                {
                    columns.push(w);
                }
            }
        }
        if self.options.sort_neighbors {
            columns.sort_unstable();
        }

        let mut matrix = crate::gf2::BooleanMatrix::new(rows.len(), columns.len());
        for (r, &(_, v)) in rows.iter().enumerate() {
            for (c, &w) in columns.iter().enumerate() {
                if self
                    .graph
                    .vertex(v)
                    .expect("frontier vertex")
                    .is_neighbor_via(w, EdgeType::Hadamard)
                {
                    matrix.set(r, c, true);
                }
            }
        }
        (rows, columns, matrix)
    }
}

/// Cancel adjacent duplicate row operations (equal CNOTs compose to the
/// identity).
fn filter_duplicate_cxs(ops: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut out: Vec<(usize, usize)> = vec![];
    for &op in ops {
        if out.last() == Some(&op) {
            out.pop();
        } else {
            out.push(op);
        }
    }
    out
}

fn sorted_rows(graph: &ZxGraph, boundaries: &[VertexId]) -> FxHashMap<i32, usize> {
    let mut qubits: Vec<i32> = boundaries
        .iter()
        .map(|v| graph.vertex(*v).expect("live boundary").qubit())
        .collect();
    qubits.sort_unstable();
    qubits.into_iter().enumerate().map(|(row, q)| (q, row)).collect()
}

/// A gadget axis: an interior phase-free Z spider with a degree-1 leaf.
fn is_gadget_axis(graph: &ZxGraph, v: VertexId) -> bool {
    let Some(vert) = graph.vertex(v) else { return false };
    vert.is_z()
        && vert.phase().is_zero()
        && vert.neighbors().iter().any(|&(w, t)| {
            t == EdgeType::Hadamard
                && graph.vertex(w).is_some_and(|n| n.is_z() && n.degree() == 1)
        })
}

/// Graph-like, with the single relaxation that a finished wire may run
/// straight from an input to an output.
fn check_extractable(graph: &ZxGraph) -> ExtractResult<()> {
    if graph.num_inputs() != graph.num_outputs() {
        return Err(ExtractError::NotGraphLike(format!(
            "{} inputs vs {} outputs",
            graph.num_inputs(),
            graph.num_outputs()
        )));
    }
    for v in graph.vertices() {
        match v.vtype() {
            VertexType::Boundary => {
                if v.degree() != 1 {
                    return Err(ExtractError::NotGraphLike(format!(
                        "boundary {} has degree {}",
                        v.id(),
                        v.degree()
                    )));
                }
                let (w, t) = v.neighbors()[0];
                if t != EdgeType::Simple {
                    return Err(ExtractError::NotGraphLike(format!(
                        "boundary {} attaches over a hadamard edge",
                        v.id()
                    )));
                }
                let wv = graph.vertex(w).expect("neighbor of live vertex");
                if wv.is_boundary() {
                    let wire_ok = (graph.inputs().contains(&v.id())
                        && graph.outputs().contains(&w))
                        || (graph.outputs().contains(&v.id()) && graph.inputs().contains(&w));
                    if !wire_ok {
                        return Err(ExtractError::NotGraphLike(format!(
                            "boundary pair {}--{} is not an input-output wire",
                            v.id(),
                            w
                        )));
                    }
                }
            }
            VertexType::ZSpider => {
                for &(w, t) in v.neighbors() {
                    let wv = graph.vertex(w).expect("neighbor of live vertex");
                    if wv.is_boundary() {
                        if t != EdgeType::Simple {
                            return Err(ExtractError::NotGraphLike(format!(
                                "spider {} meets a boundary over a hadamard edge",
                                v.id()
                            )));
                        }
                    } else if !wv.is_z() || t != EdgeType::Hadamard {
                        return Err(ExtractError::NotGraphLike(format!(
                            "interior edge {}--{} is not a hadamard edge between Z spiders",
                            v.id(),
                            w
                        )));
                    }
                }
            }
            VertexType::XSpider | VertexType::HBox => {
                return Err(ExtractError::NotGraphLike(format!(
                    "vertex {} has type {}",
                    v.id(),
                    v.vtype()
                )));
            }
        }
    }
    Ok(())
}
