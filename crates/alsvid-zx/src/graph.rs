//! The ZX multigraph.
//!
//! A [`ZxGraph`] owns its vertices in an arena keyed by stable integer ids;
//! neighbors are stored as `(id, edge type)` multisets, never as pointers,
//! so rules can hold vertex ids across arbitrary mutations. Every public
//! mutation leaves the graph canonical: the neighbor relation is symmetric,
//! self-loops are absorbed as phases, and parallel edges are reduced
//! according to the spider colours at their endpoints.

use std::cell::RefCell;
use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use crate::error::{ZxError, ZxResult};
use crate::phase::Phase;
use crate::scalar::Scalar;
use crate::vertex::{EdgeType, VertexId, VertexType, ZxVertex};

/// An undirected edge, reported once per parallel edge.
pub type Edge = (VertexId, VertexId, EdgeType);

/// A labeled multigraph of spiders and boundaries.
#[derive(Debug, Default)]
pub struct ZxGraph {
    id: usize,
    vertices: BTreeMap<VertexId, ZxVertex>,
    inputs: Vec<VertexId>,
    outputs: Vec<VertexId>,
    next_vertex_id: u64,
    scalar: Scalar,
    procedures: Vec<String>,
    // The engine is single-threaded (see the concurrency model), so a
    // RefCell-cached traversal order is safe; it is cleared on every
    // structural mutation.
    topo_cache: RefCell<Option<Vec<VertexId>>>,
}

impl Clone for ZxGraph {
    fn clone(&self) -> Self {
        ZxGraph {
            id: self.id,
            vertices: self.vertices.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            next_vertex_id: self.next_vertex_id,
            scalar: self.scalar,
            procedures: self.procedures.clone(),
            topo_cache: RefCell::new(None),
        }
    }
}

impl ZxGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        ZxGraph::default()
    }

    /// The graph id assigned by the manager (0 for unmanaged graphs).
    pub fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    // =========================================================================
    // Vertex accessors
    // =========================================================================

    /// Look up a vertex by id.
    pub fn vertex(&self, v: VertexId) -> Option<&ZxVertex> {
        self.vertices.get(&v)
    }

    /// True if the vertex is present.
    pub fn contains(&self, v: VertexId) -> bool {
        self.vertices.contains_key(&v)
    }

    /// Iterate all vertices in id order.
    pub fn vertices(&self) -> impl Iterator<Item = &ZxVertex> {
        self.vertices.values()
    }

    /// All vertex ids in id order.
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.keys().copied().collect()
    }

    /// Input boundary ids in insertion order.
    pub fn inputs(&self) -> &[VertexId] {
        &self.inputs
    }

    /// Output boundary ids in insertion order.
    pub fn outputs(&self) -> &[VertexId] {
        &self.outputs
    }

    /// The input boundary on a qubit, if any.
    pub fn input_on_qubit(&self, qubit: i32) -> Option<VertexId> {
        self.inputs
            .iter()
            .copied()
            .find(|v| self.vertices[v].qubit == qubit)
    }

    /// The output boundary on a qubit, if any.
    pub fn output_on_qubit(&self, qubit: i32) -> Option<VertexId> {
        self.outputs
            .iter()
            .copied()
            .find(|v| self.vertices[v].qubit == qubit)
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of inputs.
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of outputs.
    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Number of edges, counting parallel edges once each.
    pub fn num_edges(&self) -> usize {
        let total: usize = self.vertices.values().map(|v| v.neighbors.len()).sum();
        total / 2
    }

    /// Degree of a vertex (0 for absent vertices).
    pub fn degree(&self, v: VertexId) -> usize {
        self.vertices.get(&v).map_or(0, |v| v.neighbors.len())
    }

    /// All edges, each undirected edge reported once with `u <= v` by id.
    pub fn edges(&self) -> Vec<Edge> {
        let mut out = vec![];
        for v in self.vertices.values() {
            for &(w, et) in &v.neighbors {
                if v.id <= w {
                    out.push((v.id, w, et));
                }
            }
        }
        out
    }

    /// The global scalar.
    pub fn scalar(&self) -> Scalar {
        self.scalar
    }

    /// Mutable access to the global scalar (rules fold factors in here).
    pub fn scalar_mut(&mut self) -> &mut Scalar {
        &mut self.scalar
    }

    /// The audit trail of strategies applied to this graph.
    pub fn procedures(&self) -> &[String] {
        &self.procedures
    }

    /// Append an audit-trail entry.
    pub fn add_procedure(&mut self, name: impl Into<String>) {
        self.procedures.push(name.into());
    }

    // =========================================================================
    // Construction
    // =========================================================================

    fn fresh_id(&mut self) -> VertexId {
        let id = VertexId(self.next_vertex_id);
        self.next_vertex_id += 1;
        id
    }

    fn insert_vertex(&mut self, qubit: i32, vtype: VertexType, phase: Phase) -> VertexId {
        let id = self.fresh_id();
        self.vertices.insert(id, ZxVertex::new(id, qubit, vtype, phase));
        self.invalidate_topo();
        id
    }

    /// Add an input boundary on `qubit`; fails if the qubit already has one.
    pub fn add_input(&mut self, qubit: i32) -> ZxResult<VertexId> {
        if self.input_on_qubit(qubit).is_some() {
            return Err(ZxError::InputExists(qubit));
        }
        let id = self.insert_vertex(qubit, VertexType::Boundary, Phase::zero());
        self.inputs.push(id);
        Ok(id)
    }

    /// Add an output boundary on `qubit`; fails if the qubit already has one.
    pub fn add_output(&mut self, qubit: i32) -> ZxResult<VertexId> {
        if self.output_on_qubit(qubit).is_some() {
            return Err(ZxError::OutputExists(qubit));
        }
        let id = self.insert_vertex(qubit, VertexType::Boundary, Phase::zero());
        self.outputs.push(id);
        Ok(id)
    }

    /// Add an interior vertex with a fresh id.
    pub fn add_vertex(&mut self, qubit: i32, vtype: VertexType, phase: Phase) -> VertexId {
        debug_assert!(
            vtype != VertexType::Boundary,
            "boundaries go through add_input/add_output"
        );
        self.insert_vertex(qubit, vtype, phase)
    }

    /// Insert a vertex under a caller-chosen id (file reader only).
    /// Returns false if the id is taken.
    pub(crate) fn insert_with_id(
        &mut self,
        id: VertexId,
        qubit: i32,
        vtype: VertexType,
        phase: Phase,
    ) -> bool {
        if self.vertices.contains_key(&id) {
            return false;
        }
        self.next_vertex_id = self.next_vertex_id.max(id.0 + 1);
        self.vertices.insert(id, ZxVertex::new(id, qubit, vtype, phase));
        self.invalidate_topo();
        true
    }

    pub(crate) fn register_input(&mut self, v: VertexId) {
        self.inputs.push(v);
    }

    pub(crate) fn register_output(&mut self, v: VertexId) {
        self.outputs.push(v);
    }

    /// Set the layout column hint of a vertex.
    pub fn set_col(&mut self, v: VertexId, col: i32) {
        if let Some(vert) = self.vertices.get_mut(&v) {
            vert.col = col;
        }
    }

    /// Overwrite the phase of a vertex.
    pub fn set_phase(&mut self, v: VertexId, phase: Phase) -> ZxResult<()> {
        let vert = self.vertices.get_mut(&v).ok_or(ZxError::VertexNotFound(v))?;
        vert.phase = phase;
        Ok(())
    }

    /// Add to the phase of a vertex.
    pub fn add_to_phase(&mut self, v: VertexId, delta: Phase) -> ZxResult<()> {
        let vert = self.vertices.get_mut(&v).ok_or(ZxError::VertexNotFound(v))?;
        vert.phase += delta;
        Ok(())
    }

    /// Interpose a typed spider on a boundary's wire: the boundary on
    /// `qubit` (input side when `input` is true) is reconnected through a
    /// fresh vertex carrying `vtype` and `phase`. Returns the new vertex.
    pub fn assign_boundary(
        &mut self,
        qubit: i32,
        input: bool,
        vtype: VertexType,
        phase: Phase,
    ) -> ZxResult<VertexId> {
        let b = if input { self.input_on_qubit(qubit) } else { self.output_on_qubit(qubit) }
            .ok_or(ZxError::NoBoundary { qubit, input })?;
        let v = self.add_vertex(qubit, vtype, phase);
        if let Some(&(n, t)) = self.vertices[&b].neighbors.first() {
            self.remove_edge(b, n, Some(t))?;
            self.add_edge(v, n, t)?;
        }
        self.add_edge(b, v, EdgeType::Simple)?;
        Ok(v)
    }

    /// Build the phase-gadget idiom: a fresh axis spider Hadamard-connected
    /// to each target, with a degree-1 leaf spider carrying the phase.
    /// Returns `(axis, leaf)`.
    pub fn add_gadget(&mut self, phase: Phase, targets: &[VertexId]) -> (VertexId, VertexId) {
        let axis = self.add_vertex(-1, VertexType::ZSpider, Phase::zero());
        let leaf = self.add_vertex(-2, VertexType::ZSpider, phase);
        self.add_edge(axis, leaf, EdgeType::Hadamard)
            .expect("gadget spiders are fresh interior vertices");
        for &t in targets {
            self.add_edge(axis, t, EdgeType::Hadamard)
                .expect("gadget targets must be interior vertices");
        }
        (axis, leaf)
    }

    // =========================================================================
    // Edge mutation
    // =========================================================================

    /// Add one edge of the given type between `u` and `v`, then canonicalize
    /// the pair.
    ///
    /// A self-loop is absorbed immediately: a simple loop is dropped, a
    /// Hadamard loop is dropped adding π to the vertex and 1/√2 to the
    /// scalar. Between two spiders, parallel edges are reduced: same-colour
    /// pairs keep at most one simple edge and cancel Hadamard edges in
    /// pairs; opposite-colour pairs keep at most one Hadamard edge and
    /// cancel simple edges in pairs (the Hopf law). Each cancelled pair
    /// contributes 1/2 to the scalar. Edges touching a boundary or H-box
    /// are added verbatim.
    pub fn add_edge(&mut self, u: VertexId, v: VertexId, etype: EdgeType) -> ZxResult<()> {
        if !self.contains(u) {
            return Err(ZxError::VertexNotFound(u));
        }
        if !self.contains(v) {
            return Err(ZxError::VertexNotFound(v));
        }
        self.invalidate_topo();

        if u == v {
            return self.absorb_self_loop(u, etype);
        }

        let tu = self.vertices[&u].vtype;
        let tv = self.vertices[&v].vtype;

        if tu == VertexType::Boundary || tv == VertexType::Boundary {
            for (b, other) in [(u, v), (v, u)] {
                if self.vertices[&b].vtype == VertexType::Boundary
                    && !self.vertices[&b].neighbors.is_empty()
                {
                    return Err(ZxError::BoundaryDegree { u, v: other, boundary: b });
                }
            }
        }

        self.push_edge(u, v, etype);

        if tu.is_spider() && tv.is_spider() {
            self.canonicalize_pair(u, v);
        }
        Ok(())
    }

    fn absorb_self_loop(&mut self, v: VertexId, etype: EdgeType) -> ZxResult<()> {
        let vtype = self.vertices[&v].vtype;
        if !vtype.is_spider() {
            return Err(ZxError::InvalidSelfLoop { vertex: v, vtype: vtype.to_string() });
        }
        if etype == EdgeType::Hadamard {
            self.vertices.get_mut(&v).expect("checked above").phase += Phase::pi();
            self.scalar.mul_rt2_pow(-1);
        }
        Ok(())
    }

    fn push_edge(&mut self, u: VertexId, v: VertexId, etype: EdgeType) {
        self.vertices.get_mut(&u).expect("checked").neighbors.push((v, etype));
        self.vertices.get_mut(&v).expect("checked").neighbors.push((u, etype));
    }

    /// Reduce the parallel edges between a pair of spiders to canonical form.
    fn canonicalize_pair(&mut self, u: VertexId, v: VertexId) {
        let same_colour = self.vertices[&u].vtype == self.vertices[&v].vtype;

        let mut simple = 0usize;
        let mut hadamard = 0usize;
        {
            let vu = self.vertices.get_mut(&u).expect("checked");
            vu.neighbors.retain(|&(w, t)| {
                if w == v {
                    match t {
                        EdgeType::Simple => simple += 1,
                        EdgeType::Hadamard => hadamard += 1,
                    }
                    false
                } else {
                    true
                }
            });
        }
        self.vertices
            .get_mut(&v)
            .expect("checked")
            .neighbors
            .retain(|&(w, _)| w != u);

        let (keep_simple, keep_hadamard) = if same_colour {
            // Parallel simple edges fuse; Hadamard edges cancel in pairs.
            self.scalar.mul_rt2_pow(-2 * (hadamard as i32 / 2));
            (simple.min(1), hadamard % 2)
        } else {
            // Hopf: simple edges annihilate in pairs; Hadamard edges fuse.
            self.scalar.mul_rt2_pow(-2 * (simple as i32 / 2));
            (simple % 2, hadamard.min(1))
        };

        for _ in 0..keep_simple {
            self.push_edge(u, v, EdgeType::Simple);
        }
        for _ in 0..keep_hadamard {
            self.push_edge(u, v, EdgeType::Hadamard);
        }
    }

    /// Remove one edge of the given type between `u` and `v`, or every edge
    /// between them when `etype` is `None`.
    pub fn remove_edge(&mut self, u: VertexId, v: VertexId, etype: Option<EdgeType>) -> ZxResult<()> {
        if !self.contains(u) {
            return Err(ZxError::VertexNotFound(u));
        }
        if !self.contains(v) {
            return Err(ZxError::VertexNotFound(v));
        }
        self.invalidate_topo();
        match etype {
            Some(t) => {
                remove_first(&mut self.vertices.get_mut(&u).expect("checked").neighbors, v, t);
                remove_first(&mut self.vertices.get_mut(&v).expect("checked").neighbors, u, t);
            }
            None => {
                self.vertices
                    .get_mut(&u)
                    .expect("checked")
                    .neighbors
                    .retain(|&(w, _)| w != v);
                self.vertices
                    .get_mut(&v)
                    .expect("checked")
                    .neighbors
                    .retain(|&(w, _)| w != u);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Vertex removal
    // =========================================================================

    /// Detach all incident edges, then delete `v`. Idempotent on absent ids.
    pub fn remove_vertex(&mut self, v: VertexId) {
        let Some(vert) = self.vertices.remove(&v) else {
            return;
        };
        self.invalidate_topo();
        for (w, et) in vert.neighbors {
            if w == v {
                continue;
            }
            if let Some(wv) = self.vertices.get_mut(&w) {
                remove_first(&mut wv.neighbors, v, et);
            }
        }
        self.inputs.retain(|&i| i != v);
        self.outputs.retain(|&o| o != v);
    }

    /// Remove a batch of vertices.
    pub fn remove_vertices(&mut self, vs: &[VertexId]) {
        for &v in vs {
            self.remove_vertex(v);
        }
    }

    /// Remove every degree-0 non-boundary vertex, folding its scalar value
    /// into the global scalar.
    pub fn remove_isolated_vertices(&mut self) {
        let isolated: Vec<VertexId> = self
            .vertices
            .values()
            .filter(|v| v.neighbors.is_empty() && !v.is_boundary())
            .map(|v| v.id)
            .collect();
        for v in isolated {
            let vert = &self.vertices[&v];
            let phase = vert.phase;
            if vert.vtype.is_spider() {
                // An isolated spider is the scalar (1 + e^(iφ)) / √2 under
                // the spider normalization the tensor evaluator uses.
                let mut s = Scalar::one();
                s.mul_phase(phase);
                let z = num_complex::Complex64::new(1.0, 0.0) + s.to_complex();
                self.scalar.mul_complex(z);
                self.scalar.mul_rt2_pow(-1);
            } else {
                // An isolated H-box is the scalar e^(iφ).
                self.scalar.mul_phase(phase);
            }
            self.remove_vertex(v);
        }
    }

    // =========================================================================
    // Whole-graph operations
    // =========================================================================

    /// Colour-change a spider: Z↔X, flipping every incident edge type.
    pub fn toggle_vertex(&mut self, v: VertexId) -> ZxResult<()> {
        let Some(vert) = self.vertices.get(&v) else {
            return Err(ZxError::VertexNotFound(v));
        };
        if !vert.vtype.is_spider() {
            return Ok(());
        }
        let entries = vert.neighbors.clone();
        self.invalidate_topo();
        for &(w, et) in &entries {
            if let Some(wv) = self.vertices.get_mut(&w) {
                if let Some(slot) = wv.neighbors.iter_mut().find(|(n, t)| *n == v && *t == et) {
                    slot.1 = et.toggled();
                }
            }
        }
        let vert = self.vertices.get_mut(&v).expect("checked");
        vert.vtype = vert.vtype.toggled();
        for entry in &mut vert.neighbors {
            entry.1 = entry.1.toggled();
        }
        Ok(())
    }

    /// Swap inputs and outputs and negate every phase. Commutes with tensor
    /// evaluation up to transposition.
    pub fn adjoint(&mut self) {
        self.invalidate_topo();
        std::mem::swap(&mut self.inputs, &mut self.outputs);
        for v in self.vertices.values_mut() {
            v.phase = -v.phase;
        }
        self.scalar.conjugate();
    }

    /// Concatenate `other` after `self`, identifying `self`'s outputs with
    /// `other`'s inputs qubit-wise.
    pub fn compose(&mut self, other: ZxGraph) -> ZxResult<()> {
        let mut out_qubits: Vec<i32> = self.outputs.iter().map(|v| self.vertices[v].qubit).collect();
        let mut in_qubits: Vec<i32> = other.inputs.iter().map(|v| other.vertices[v].qubit).collect();
        out_qubits.sort_unstable();
        in_qubits.sort_unstable();
        if out_qubits != in_qubits {
            return Err(ZxError::QubitMismatch { outputs: out_qubits, inputs: in_qubits });
        }

        let other_inputs: Vec<(i32, VertexId)> = other
            .inputs
            .iter()
            .map(|v| (other.vertices[v].qubit, *v))
            .collect();
        let other_outputs = other.outputs.clone();

        let old_outputs = std::mem::take(&mut self.outputs);
        let map = self.absorb(other, 0);
        self.outputs = other_outputs.iter().map(|o| map[o]).collect();

        for &o in &old_outputs {
            let qubit = self.vertices[&o].qubit;
            let i = map[&other_inputs
                .iter()
                .find(|(q, _)| *q == qubit)
                .map(|(_, v)| *v)
                .expect("qubit sets were checked equal")];
            // Boundaries have exactly one neighbor by invariant.
            let (n1, t1) = self.vertices[&o].neighbors[0];
            let (n2, t2) = self.vertices[&i].neighbors[0];
            self.remove_vertex(o);
            self.remove_vertex(i);
            self.add_edge(n1, n2, t1.compose(t2))?;
        }
        Ok(())
    }

    /// Disjoint union with `other`, offsetting its qubit indices past ours.
    pub fn tensor_product(&mut self, other: ZxGraph) {
        let offset = self
            .vertices
            .values()
            .map(|v| v.qubit)
            .filter(|q| *q >= 0)
            .max()
            .map_or(0, |q| q + 1);
        let other_inputs = other.inputs.clone();
        let other_outputs = other.outputs.clone();
        let map = self.absorb(other, offset);
        self.inputs.extend(other_inputs.iter().map(|i| map[i]));
        self.outputs.extend(other_outputs.iter().map(|o| map[o]));
    }

    /// Merge `other`'s vertices into `self` with fresh ids and a qubit
    /// offset. Boundary lists are left to the caller. Returns the id map.
    fn absorb(&mut self, other: ZxGraph, qubit_offset: i32) -> BTreeMap<VertexId, VertexId> {
        self.invalidate_topo();
        let mut map = BTreeMap::new();
        for (&old, vert) in &other.vertices {
            let new = self.fresh_id();
            let mut v = vert.clone();
            v.id = new;
            if v.qubit >= 0 {
                v.qubit += qubit_offset;
            }
            map.insert(old, new);
            self.vertices.insert(new, v);
        }
        // Remap neighbor lists after all ids exist.
        for &new in map.values() {
            let vert = self.vertices.get_mut(&new).expect("just inserted");
            for entry in &mut vert.neighbors {
                entry.0 = map[&entry.0];
            }
        }
        self.scalar.mul_complex(other.scalar.to_complex());
        map
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// True when the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Check the universal invariants: symmetric neighbor relation with
    /// matching multiplicities, degree-1 boundaries, unique boundary qubits,
    /// no self-loops, and no reducible parallel edges.
    pub fn is_valid(&self) -> bool {
        for v in self.vertices.values() {
            for &(w, et) in &v.neighbors {
                if w == v.id {
                    return false;
                }
                let Some(wv) = self.vertices.get(&w) else {
                    return false;
                };
                let here = v.neighbors.iter().filter(|&&(n, t)| n == w && t == et).count();
                let there = wv.neighbors.iter().filter(|&&(n, t)| n == v.id && t == et).count();
                if here != there {
                    return false;
                }
                if v.vtype.is_spider() && wv.vtype.is_spider() && here > 1 {
                    return false;
                }
            }
        }
        for &b in self.inputs.iter().chain(&self.outputs) {
            match self.vertices.get(&b) {
                Some(v) if v.is_boundary() && v.neighbors.len() == 1 => {}
                _ => return false,
            }
        }
        for set in [&self.inputs, &self.outputs] {
            let qubits: FxHashSet<i32> = set.iter().map(|v| self.vertices[v].qubit).collect();
            if qubits.len() != set.len() {
                return false;
            }
        }
        true
    }

    /// True when every interior vertex is a Z spider, interior edges are all
    /// Hadamard, boundaries attach to interior spiders by exactly one simple
    /// edge, no vertex is isolated, and no input meets an output directly.
    pub fn is_graph_like(&self) -> bool {
        for v in self.vertices.values() {
            if v.neighbors.is_empty() {
                return false;
            }
            match v.vtype {
                VertexType::Boundary => {
                    if v.neighbors.len() != 1 {
                        return false;
                    }
                    let (w, et) = v.neighbors[0];
                    if et != EdgeType::Simple {
                        return false;
                    }
                    if self.vertices[&w].is_boundary() {
                        return false;
                    }
                }
                VertexType::ZSpider => {
                    for &(w, et) in &v.neighbors {
                        let interior_edge = !self.vertices[&w].is_boundary();
                        if interior_edge && et != EdgeType::Hadamard {
                            return false;
                        }
                        if !interior_edge && et != EdgeType::Simple {
                            return false;
                        }
                    }
                }
                VertexType::XSpider | VertexType::HBox => return false,
            }
        }
        true
    }

    /// True when every input is wired straight to the output on its qubit by
    /// a single simple edge.
    pub fn is_identity(&self) -> bool {
        if self.inputs.len() != self.outputs.len() {
            return false;
        }
        for &i in &self.inputs {
            let vi = &self.vertices[&i];
            if vi.neighbors.len() != 1 {
                return false;
            }
            let (w, et) = vi.neighbors[0];
            if et != EdgeType::Simple {
                return false;
            }
            let wv = &self.vertices[&w];
            if !(self.outputs.contains(&w) && wv.qubit == vi.qubit) {
                return false;
            }
        }
        true
    }

    /// Edge density: `2·|E| / |V|²`.
    pub fn density(&self) -> f64 {
        let n = self.num_vertices();
        if n == 0 {
            return 0.0;
        }
        2.0 * self.num_edges() as f64 / (n * n) as f64
    }

    /// Number of spiders with a T-like phase (denominator 4).
    pub fn t_count(&self) -> usize {
        self.vertices
            .values()
            .filter(|v| v.vtype.is_spider() && v.phase.is_t_like())
            .count()
    }

    /// Number of spiders with a non-Clifford phase (denominator > 2).
    pub fn non_clifford_count(&self) -> usize {
        self.vertices
            .values()
            .filter(|v| v.vtype.is_spider() && !v.phase.is_clifford())
            .count()
    }

    /// Number of spiders that are neither Clifford nor T (denominator > 4
    /// or an odd denominator above 2).
    pub fn non_clifford_t_count(&self) -> usize {
        self.vertices
            .values()
            .filter(|v| v.vtype.is_spider() && !v.phase.is_clifford() && !v.phase.is_t_like())
            .count()
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// DFS discovery order seeded from the inputs, then the outputs, then any
    /// vertex not reachable from a boundary. Every non-seed vertex appears
    /// after at least one of its neighbors. The order is cached and the
    /// cache is invalidated by every structural mutation.
    pub fn topological_order(&self) -> Vec<VertexId> {
        if let Some(order) = self.topo_cache.borrow().as_ref() {
            return order.clone();
        }
        let order = self.compute_topological_order();
        *self.topo_cache.borrow_mut() = Some(order.clone());
        order
    }

    fn compute_topological_order(&self) -> Vec<VertexId> {
        let mut order = Vec::with_capacity(self.vertices.len());
        let mut seen: FxHashSet<VertexId> = FxHashSet::default();
        let seeds: Vec<VertexId> = self
            .inputs
            .iter()
            .chain(&self.outputs)
            .copied()
            .chain(self.vertices.keys().copied())
            .collect();
        let mut stack = vec![];
        for seed in seeds {
            if seen.contains(&seed) {
                continue;
            }
            stack.push(seed);
            while let Some(v) = stack.pop() {
                if !seen.insert(v) {
                    continue;
                }
                order.push(v);
                // Reverse so lower-id neighbors are discovered first.
                for &(w, _) in self.vertices[&v].neighbors.iter().rev() {
                    if !seen.contains(&w) {
                        stack.push(w);
                    }
                }
            }
        }
        order
    }

    fn invalidate_topo(&mut self) {
        self.topo_cache.get_mut().take();
    }
}

fn remove_first(list: &mut Vec<(VertexId, EdgeType)>, v: VertexId, etype: EdgeType) {
    if let Some(pos) = list.iter().position(|&(w, t)| w == v && t == etype) {
        list.remove(pos);
    }
}
