//! ZX graph → tensor evaluation by frontier walk.
//!
//! The graph is walked in DFS order from its boundaries. Each connected
//! subgraph accumulates a tensor; the frontier of a subgraph is the
//! insertion-ordered list of edges with one processed endpoint, each open
//! edge owning one tensor axis. Processing a vertex contracts its incident
//! frontier axes (Hadamard edges are rotated to simple ones first), then
//! opens axes for its unprocessed edges. The subgraph tensors are combined
//! at the end and the axes mapped back to qubit order.

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use alsvid_zx::{EdgeType, Phase, VertexId, VertexType, ZxGraph, stop_requested};

use crate::error::{TensorError, TensorResult};
use crate::qtensor::{QTensor, check_axis_budget, tensor_product, tensor_product_pow, tensordot};

/// An undirected edge key: endpoints ordered by id, plus the edge type.
type EdgeKey = (VertexId, VertexId, EdgeType);

fn edge_key(a: VertexId, b: VertexId, et: EdgeType) -> EdgeKey {
    if b < a { (b, a, et) } else { (a, b, et) }
}

/// Insertion-ordered edge→axis table. Duplicate keys are allowed, which is
/// what parallel edges through an H-box require.
#[derive(Debug, Clone, Default)]
struct Frontier(Vec<(EdgeKey, usize)>);

impl Frontier {
    fn position(&self, key: &EdgeKey, skip: &[usize]) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .position(|(i, (k, _))| k == key && !skip.contains(&i))
    }

    fn push(&mut self, key: EdgeKey, axis: usize) {
        self.0.push((key, axis));
    }

    fn remove_first(&mut self, key: &EdgeKey) {
        if let Some(i) = self.0.iter().position(|(k, _)| k == key) {
            self.0.remove(i);
        }
    }

    fn contains(&self, key: &EdgeKey) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }
}

/// Evaluate the graph as a tensor and project it onto a matrix with rows
/// indexed by output qubits (ascending) and columns by input qubits.
pub fn to_matrix(graph: &ZxGraph) -> TensorResult<ndarray::Array2<Complex64>> {
    let (tensor, in_axes, out_axes) = Mapper::new(graph).map()?;
    tensor.to_matrix(&out_axes, &in_axes)
}

/// Evaluate the graph as a [`QTensor`] whose axes are the input qubits in
/// ascending order followed by the output qubits.
pub fn to_tensor(graph: &ZxGraph) -> TensorResult<QTensor> {
    let (tensor, in_axes, out_axes) = Mapper::new(graph).map()?;
    let perm: Vec<usize> = in_axes.iter().chain(&out_axes).copied().collect();
    tensor.permute(&perm)
}

struct Mapper<'g> {
    graph: &'g ZxGraph,
    list: Vec<(Frontier, QTensor)>,
    /// The dangling boundary edge that seeded each subgraph, if any.
    boundary_edges: Vec<Option<EdgeKey>>,
    /// Processed vertex → index of its subgraph tensor.
    pins: FxHashMap<VertexId, usize>,
    tensor_id: usize,
    simple_pins: Vec<usize>,
    hadamard_pins: Vec<usize>,
    remove_edges: Vec<EdgeKey>,
    add_edges: Vec<EdgeKey>,
}

impl<'g> Mapper<'g> {
    fn new(graph: &'g ZxGraph) -> Self {
        Mapper {
            graph,
            list: vec![],
            boundary_edges: vec![],
            pins: FxHashMap::default(),
            tensor_id: 0,
            simple_pins: vec![],
            hadamard_pins: vec![],
            remove_edges: vec![],
            add_edges: vec![],
        }
    }

    fn map(mut self) -> TensorResult<(QTensor, Vec<usize>, Vec<usize>)> {
        if !self.graph.is_valid() {
            return Err(TensorError::InvalidGraph(
                "graph violates the universal invariants".to_string(),
            ));
        }
        check_axis_budget(self.graph.num_inputs() + self.graph.num_outputs())?;

        for v in self.graph.topological_order() {
            if stop_requested() {
                return Err(TensorError::Cancelled);
            }
            self.map_one_vertex(v)?;
        }

        let mut result = QTensor::scalar(self.graph.scalar().to_complex());
        for (_, t) in &self.list {
            result = tensor_product(&result, t)?;
        }

        for (i, entry) in self.boundary_edges.iter().enumerate() {
            if let Some(key) = entry {
                if !self.list[i].0.contains(key) {
                    self.list[i].0.push(*key, 0);
                }
            }
        }

        let (in_axes, out_axes) = self.axis_orders();
        trace!(?in_axes, ?out_axes, "axis orders resolved");
        Ok((result, in_axes, out_axes))
    }

    fn map_one_vertex(&mut self, v: VertexId) -> TensorResult<()> {
        self.simple_pins.clear();
        self.hadamard_pins.clear();
        self.remove_edges.clear();
        self.add_edges.clear();

        let vert = self.graph.vertex(v).expect("traversal yields live vertices");
        let is_new = self.resolve_subgraph(v);

        debug!(
            "mapping vertex {v} ({}): {}",
            vert.vtype(),
            if is_new { "new subgraph" } else if vert.is_boundary() { "boundary" } else { "tensordot" }
        );

        if is_new {
            if vert.is_boundary() {
                self.init_subgraph(v);
            } else {
                // A component with no boundary: start from the scalar 1 and
                // contract the vertex in as usual.
                self.list.push((Frontier::default(), QTensor::scalar(Complex64::new(1.0, 0.0))));
                self.boundary_edges.push(None);
                self.tensor_id = self.list.len() - 1;
                self.update_pins_and_frontiers(v)?;
                self.tensordot_vertex(v)?;
            }
        } else if vert.is_boundary() {
            self.update_pins_and_frontiers(v)?;
            let ts = self.list[self.tensor_id].1.clone();
            self.list[self.tensor_id].1 = self.dehadamardize(&ts)?;
        } else {
            self.update_pins_and_frontiers(v)?;
            self.tensordot_vertex(v)?;
        }

        self.pins.insert(v, self.tensor_id);
        Ok(())
    }

    /// Set `tensor_id` from the first processed neighbor; true when there is
    /// none (the vertex opens a new subgraph).
    fn resolve_subgraph(&mut self, v: VertexId) -> bool {
        for &(nb, _) in self.graph.vertex(v).expect("live vertex").neighbors() {
            if let Some(&pin) = self.pins.get(&nb) {
                self.tensor_id = pin;
                return false;
            }
        }
        true
    }

    fn init_subgraph(&mut self, v: VertexId) {
        let vert = self.graph.vertex(v).expect("live vertex");
        let &(nb, et) = vert
            .neighbors()
            .first()
            .expect("valid boundaries have exactly one neighbor");
        let key = edge_key(v, nb, et);
        let mut frontier = Frontier::default();
        // Axis 0 of the wire is the boundary's dangling edge, axis 1 faces
        // the rest of the graph.
        frontier.push(key, 1);
        self.list.push((frontier, QTensor::identity(1)));
        self.boundary_edges.push(Some(key));
        self.tensor_id = self.list.len() - 1;
    }

    /// Split the incident edges into frontier pins (simple / hadamard) and
    /// edges to open after the contraction.
    fn update_pins_and_frontiers(&mut self, v: VertexId) -> TensorResult<()> {
        let mut used: Vec<usize> = vec![];
        for &(nb, et) in self.graph.vertex(v).expect("live vertex").neighbors() {
            let key = edge_key(v, nb, et);
            if self.pins.contains_key(&nb) {
                let frontier = &self.list[self.tensor_id].0;
                let idx = frontier.position(&key, &used).ok_or_else(|| {
                    TensorError::InvalidGraph(format!(
                        "edge {}--{} not found in the active frontier",
                        key.0, key.1
                    ))
                })?;
                used.push(idx);
                let axis = frontier.0[idx].1;
                match et {
                    EdgeType::Hadamard => self.hadamard_pins.push(axis),
                    EdgeType::Simple => self.simple_pins.push(axis),
                }
                self.remove_edges.push(key);
            } else {
                self.add_edges.push(key);
            }
        }
        Ok(())
    }

    /// Rotate all Hadamard pins into simple pins by contracting H boxes onto
    /// them, updating the frontier's axis ids along the way.
    fn dehadamardize(&mut self, ts: &QTensor) -> TensorResult<QTensor> {
        let k = self.hadamard_pins.len();
        let hprod = tensor_product_pow(&QTensor::hbox(2, Phase::pi()), k)?;
        let connect: Vec<usize> = (0..k).map(|t| 2 * t).collect();
        let tmp = tensordot(ts, &hprod, &self.hadamard_pins, &connect)?;

        // Entries pinned through a Hadamard move to the H box's other leg;
        // everything else translates through the axis history.
        let hadamard_pins = self.hadamard_pins.clone();
        for (_, axis) in &mut self.list[self.tensor_id].0.0 {
            if let Some(pos) = hadamard_pins.iter().position(|a| a == axis) {
                *axis = tmp.new_axis_id(ts.ndim() + connect[pos] + 1);
            } else {
                *axis = tmp.new_axis_id(*axis);
            }
        }

        for (t, pin) in self.hadamard_pins.iter_mut().enumerate() {
            *pin = tmp.new_axis_id(ts.ndim() + connect[t] + 1);
        }
        for pin in &mut self.simple_pins {
            *pin = tmp.new_axis_id(*pin);
        }
        self.simple_pins = self
            .hadamard_pins
            .iter()
            .chain(self.simple_pins.iter())
            .copied()
            .collect();
        self.hadamard_pins.clear();
        Ok(tmp)
    }

    /// Contract the vertex tensor against its frontier pins and open the
    /// outgoing edges.
    fn tensordot_vertex(&mut self, v: VertexId) -> TensorResult<()> {
        let ts = self.list[self.tensor_id].1.clone();
        let dehad = self.dehadamardize(&ts)?;
        let k = self.simple_pins.len();

        let vert = self.graph.vertex(v).expect("live vertex");
        let vt = match vert.vtype() {
            VertexType::ZSpider => QTensor::zspider(vert.degree(), vert.phase()),
            VertexType::XSpider => QTensor::xspider(vert.degree(), vert.phase()),
            VertexType::HBox => QTensor::hbox(vert.degree(), vert.phase()),
            VertexType::Boundary => {
                return Err(TensorError::InvalidGraph(
                    "boundary vertices are never contracted".to_string(),
                ));
            }
        };

        let connect: Vec<usize> = (0..k).collect();
        let result = tensordot(&dehad, &vt, &self.simple_pins, &connect)?;

        let frontier = &mut self.list[self.tensor_id].0;
        for key in &self.remove_edges {
            frontier.remove_first(key);
        }
        for (_, axis) in &mut frontier.0 {
            *axis = result.new_axis_id(*axis);
        }
        for (t, key) in self.add_edges.iter().enumerate() {
            let axis = result.new_axis_id(dehad.ndim() + k + t);
            frontier.push(*key, axis);
        }
        self.list[self.tensor_id].1 = result;
        Ok(())
    }

    /// Map the remaining frontier axes back to input- and output-qubit
    /// order (ascending qubit index).
    fn axis_orders(&self) -> (Vec<usize>, Vec<usize>) {
        let table = |ids: &[VertexId]| -> FxHashMap<VertexId, usize> {
            let mut qubits: Vec<(i32, VertexId)> = ids
                .iter()
                .map(|v| (self.graph.vertex(*v).expect("live vertex").qubit(), *v))
                .collect();
            qubits.sort_unstable();
            qubits
                .into_iter()
                .enumerate()
                .map(|(pos, (_, v))| (v, pos))
                .collect()
        };
        let input_table = table(self.graph.inputs());
        let output_table = table(self.graph.outputs());

        let mut in_axes = vec![0; input_table.len()];
        let mut out_axes = vec![0; output_table.len()];

        let mut offset = 0;
        for (frontier, tensor) in &self.list {
            for &((v1, v2, _), axis) in &frontier.0 {
                for v in [v1, v2] {
                    if let Some(&pos) = input_table.get(&v) {
                        in_axes[pos] = axis + offset;
                    }
                    if let Some(&pos) = output_table.get(&v) {
                        out_axes[pos] = axis + offset;
                    }
                }
                // A boundary-to-boundary edge owns two axes of the same wire
                // tensor; hand the dangling axis 0 to the first endpoint.
                let v2_boundary = input_table.contains_key(&v2) || output_table.contains_key(&v2);
                if v2_boundary {
                    if let Some(&pos) = input_table.get(&v1) {
                        in_axes[pos] = axis + offset - 1;
                    } else if let Some(&pos) = output_table.get(&v1) {
                        out_axes[pos] = axis + offset - 1;
                    }
                }
            }
            offset += tensor.ndim();
        }
        (in_axes, out_axes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qtensor::max_abs_diff;
    use ndarray::Array2;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn wire_graph(n: i32) -> ZxGraph {
        let mut g = ZxGraph::new();
        for q in 0..n {
            let i = g.add_input(q).unwrap();
            let o = g.add_output(q).unwrap();
            g.add_edge(i, o, EdgeType::Simple).unwrap();
        }
        g
    }

    #[test]
    fn test_two_qubit_identity() {
        let m = to_matrix(&wire_graph(2)).unwrap();
        assert!(max_abs_diff(&m, &Array2::eye(4)) < 1e-12);
    }

    #[test]
    fn test_single_z_phase_wire() {
        let mut g = ZxGraph::new();
        let i = g.add_input(0).unwrap();
        let z = g.add_vertex(0, VertexType::ZSpider, Phase::new(1, 2));
        let o = g.add_output(0).unwrap();
        g.add_edge(i, z, EdgeType::Simple).unwrap();
        g.add_edge(z, o, EdgeType::Simple).unwrap();
        let m = to_matrix(&g).unwrap();
        assert!((m[[0, 0]] - c(1.0, 0.0)).norm() < 1e-12);
        assert!((m[[1, 1]] - c(0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_hadamard_edge_wire() {
        let mut g = ZxGraph::new();
        let i = g.add_input(0).unwrap();
        let z = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let o = g.add_output(0).unwrap();
        g.add_edge(i, z, EdgeType::Simple).unwrap();
        g.add_edge(z, o, EdgeType::Hadamard).unwrap();
        let m = to_matrix(&g).unwrap();
        let s = 1.0 / 2f64.sqrt();
        let h = Array2::from_shape_vec(
            (2, 2),
            vec![c(s, 0.0), c(s, 0.0), c(s, 0.0), c(-s, 0.0)],
        )
        .unwrap();
        assert!(max_abs_diff(&m, &h) < 1e-12);
    }

    #[test]
    fn test_cnot_graph_is_exact() {
        let mut g = ZxGraph::new();
        let i0 = g.add_input(0).unwrap();
        let i1 = g.add_input(1).unwrap();
        let z = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let x = g.add_vertex(1, VertexType::XSpider, Phase::zero());
        let o0 = g.add_output(0).unwrap();
        let o1 = g.add_output(1).unwrap();
        g.add_edge(i0, z, EdgeType::Simple).unwrap();
        g.add_edge(z, o0, EdgeType::Simple).unwrap();
        g.add_edge(i1, x, EdgeType::Simple).unwrap();
        g.add_edge(x, o1, EdgeType::Simple).unwrap();
        g.add_edge(z, x, EdgeType::Simple).unwrap();

        let m = to_matrix(&g).unwrap();
        let mut cnot = Array2::zeros((4, 4));
        cnot[[0, 0]] = c(1.0, 0.0);
        cnot[[1, 1]] = c(1.0, 0.0);
        cnot[[2, 3]] = c(1.0, 0.0);
        cnot[[3, 2]] = c(1.0, 0.0);
        assert!(max_abs_diff(&m, &cnot) < 1e-12);
    }

    #[test]
    fn test_cz_graph_is_exact() {
        let mut g = ZxGraph::new();
        let i0 = g.add_input(0).unwrap();
        let i1 = g.add_input(1).unwrap();
        let a = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
        let b = g.add_vertex(1, VertexType::ZSpider, Phase::zero());
        let o0 = g.add_output(0).unwrap();
        let o1 = g.add_output(1).unwrap();
        g.add_edge(i0, a, EdgeType::Simple).unwrap();
        g.add_edge(a, o0, EdgeType::Simple).unwrap();
        g.add_edge(i1, b, EdgeType::Simple).unwrap();
        g.add_edge(b, o1, EdgeType::Simple).unwrap();
        g.add_edge(a, b, EdgeType::Hadamard).unwrap();

        let m = to_matrix(&g).unwrap();
        let mut cz = Array2::eye(4);
        cz[[3, 3]] = c(-1.0, 0.0);
        assert!(max_abs_diff(&m, &cz) < 1e-12);
    }

    #[test]
    fn test_scalar_graph() {
        let mut g = ZxGraph::new();
        g.scalar_mut().mul_phase(Phase::new(1, 2));
        let m = to_matrix(&g).unwrap();
        assert_eq!(m.dim(), (1, 1));
        assert!((m[[0, 0]] - c(0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_invalid_graph_rejected() {
        let mut g = ZxGraph::new();
        g.add_input(0).unwrap();
        // Input with no neighbor violates the boundary invariant.
        assert!(matches!(to_matrix(&g), Err(TensorError::InvalidGraph(_))));
    }

}
