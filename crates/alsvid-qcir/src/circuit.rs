//! Gate-list circuit with a DAG backbone.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use alsvid_zx::Phase;

use crate::error::{QcirError, QcirResult};
use crate::gate::{GateType, QCirGate, QubitId};

/// A node of the circuit DAG: a wire terminal or a gate.
#[derive(Debug, Clone)]
enum DagNode {
    In(QubitId),
    Out(QubitId),
    Op(QCirGate),
}

/// A quantum circuit as an ordered gate list over `n` qubits.
///
/// Internally a DAG: one input and one output node per qubit wire, gates
/// threaded onto their wires in application order. The DAG gives
/// topological gate order and depth; the builder methods give a fluent
/// construction API.
#[derive(Debug, Clone, Default)]
pub struct QCir {
    graph: DiGraph<DagNode, QubitId>,
    qubits: Vec<QubitId>,
    ins: FxHashMap<QubitId, NodeIndex>,
    outs: FxHashMap<QubitId, NodeIndex>,
    /// Last node on each wire before the output terminal.
    wire_front: FxHashMap<QubitId, NodeIndex>,
    next_gate_id: usize,
}

impl QCir {
    /// Create an empty circuit with no qubits.
    pub fn new() -> Self {
        QCir::default()
    }

    /// Create a circuit over `n` qubits.
    pub fn with_qubits(n: usize) -> Self {
        let mut c = QCir::new();
        for _ in 0..n {
            c.add_qubit();
        }
        c
    }

    /// Add one qubit wire, returning its id.
    pub fn add_qubit(&mut self) -> QubitId {
        let q = QubitId(self.qubits.len() as u32);
        self.qubits.push(q);
        let input = self.graph.add_node(DagNode::In(q));
        let output = self.graph.add_node(DagNode::Out(q));
        self.graph.add_edge(input, output, q);
        self.ins.insert(q, input);
        self.outs.insert(q, output);
        self.wire_front.insert(q, input);
        q
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Number of gates.
    pub fn num_gates(&self) -> usize {
        self.next_gate_id
    }

    /// Apply a gate to the given qubits.
    pub fn apply(
        &mut self,
        gate: GateType,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> QcirResult<&mut Self> {
        let qubits: Vec<QubitId> = qubits.into_iter().collect();
        if qubits.len() != gate.num_qubits() {
            return Err(QcirError::QubitCountMismatch {
                gate: gate.name().to_string(),
                expected: gate.num_qubits(),
                got: qubits.len(),
            });
        }
        for (i, q) in qubits.iter().enumerate() {
            if !self.ins.contains_key(q) {
                return Err(QcirError::QubitNotFound(*q));
            }
            if qubits[..i].contains(q) {
                return Err(QcirError::DuplicateQubit {
                    qubit: *q,
                    gate: gate.name().to_string(),
                });
            }
        }

        let id = self.next_gate_id;
        self.next_gate_id += 1;
        let node = self
            .graph
            .add_node(DagNode::Op(QCirGate { id, gate, qubits: qubits.clone() }));

        for q in qubits {
            let prev = self.wire_front[&q];
            let out = self.outs[&q];
            let edge = self
                .graph
                .edges_directed(out, Direction::Incoming)
                .find(|e| *e.weight() == q && e.source() == prev)
                .map(|e| e.id())
                .expect("wire front always connects to the output terminal");
            self.graph.remove_edge(edge);
            self.graph.add_edge(prev, node, q);
            self.graph.add_edge(node, out, q);
            self.wire_front.insert(q, node);
        }
        Ok(self)
    }

    // =========================================================================
    // Fluent gate API
    // =========================================================================

    /// Apply a Hadamard gate.
    pub fn h(&mut self, q: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::H, [q])
    }

    /// Apply a Pauli-X gate.
    pub fn x(&mut self, q: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::X, [q])
    }

    /// Apply a Pauli-Y gate.
    pub fn y(&mut self, q: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::Y, [q])
    }

    /// Apply a Pauli-Z gate.
    pub fn z(&mut self, q: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::Z, [q])
    }

    /// Apply an S gate.
    pub fn s(&mut self, q: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::S, [q])
    }

    /// Apply an S-dagger gate.
    pub fn sdg(&mut self, q: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::Sdg, [q])
    }

    /// Apply a T gate.
    pub fn t(&mut self, q: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::T, [q])
    }

    /// Apply a T-dagger gate.
    pub fn tdg(&mut self, q: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::Tdg, [q])
    }

    /// Apply an Rz rotation.
    pub fn rz(&mut self, theta: Phase, q: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::Rz(theta), [q])
    }

    /// Apply an Rx rotation.
    pub fn rx(&mut self, theta: Phase, q: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::Rx(theta), [q])
    }

    /// Apply an Ry rotation.
    pub fn ry(&mut self, theta: Phase, q: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::Ry(theta), [q])
    }

    /// Apply a phase gate.
    pub fn p(&mut self, theta: Phase, q: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::P(theta), [q])
    }

    /// Apply a CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::CX, [control, target])
    }

    /// Apply a CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::CZ, [control, target])
    }

    /// Apply a SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::Swap, [q1, q2])
    }

    /// Apply a Toffoli gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> QcirResult<&mut Self> {
        self.apply(GateType::CCX, [c1, c2, target])
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Gates in topological (application) order.
    pub fn gates(&self) -> Vec<QCirGate> {
        let order = petgraph::algo::toposort(&self.graph, None)
            .expect("circuit DAG is acyclic by construction");
        let mut gates: Vec<QCirGate> = order
            .into_iter()
            .filter_map(|n| match &self.graph[n] {
                DagNode::Op(g) => Some(g.clone()),
                _ => None,
            })
            .collect();
        // Toposort is stable only up to wire constraints; gate ids give the
        // deterministic application order.
        gates.sort_by_key(|g| g.id);
        gates
    }

    /// Circuit depth: the longest chain of gates over any wire path.
    pub fn depth(&self) -> usize {
        let order = petgraph::algo::toposort(&self.graph, None)
            .expect("circuit DAG is acyclic by construction");
        let mut dist: FxHashMap<NodeIndex, usize> = FxHashMap::default();
        let mut max = 0;
        for n in order {
            let pred_max = self
                .graph
                .neighbors_directed(n, Direction::Incoming)
                .map(|p| dist[&p])
                .max()
                .unwrap_or(0);
            let here = pred_max + usize::from(matches!(self.graph[n], DagNode::Op(_)));
            max = max.max(here);
            dist.insert(n, here);
        }
        max
    }

    /// Number of T-like gates (T, T†, and rotations with denominator 4).
    pub fn t_count(&self) -> usize {
        self.gates()
            .iter()
            .filter(|g| match g.gate {
                GateType::T | GateType::Tdg => true,
                GateType::Rz(p) | GateType::P(p) | GateType::Rx(p) | GateType::Ry(p) => {
                    p.is_t_like()
                }
                _ => false,
            })
            .count()
    }

    /// Count of two-qubit gates.
    pub fn two_qubit_count(&self) -> usize {
        self.gates().iter().filter(|g| g.qubits.len() == 2).count()
    }

    /// The inverse circuit: gates reversed, each replaced by its adjoint.
    pub fn adjoint(&self) -> QCir {
        let mut inv = QCir::with_qubits(self.num_qubits());
        for g in self.gates().into_iter().rev() {
            inv.apply(g.gate.adjoint(), g.qubits)
                .expect("operands were valid in the source circuit");
        }
        inv
    }
}

impl std::fmt::Display for QCir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "qcir: {} qubits, {} gates", self.num_qubits(), self.num_gates())?;
        for g in self.gates() {
            writeln!(f, "  {g}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_circuit() {
        let c = QCir::with_qubits(2);
        assert_eq!(c.num_qubits(), 2);
        assert_eq!(c.num_gates(), 0);
        assert_eq!(c.depth(), 0);
    }

    #[test]
    fn test_fluent_api_and_order() {
        let mut c = QCir::with_qubits(2);
        c.h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .t(QubitId(1))
            .unwrap();
        let names: Vec<&str> = c.gates().iter().map(|g| g.gate.name()).collect();
        assert_eq!(names, vec!["h", "cx", "t"]);
        assert_eq!(c.depth(), 3);
    }

    #[test]
    fn test_depth_counts_parallel_gates_once() {
        let mut c = QCir::with_qubits(2);
        c.h(QubitId(0)).unwrap().h(QubitId(1)).unwrap();
        assert_eq!(c.depth(), 1);
    }

    #[test]
    fn test_operand_validation() {
        let mut c = QCir::with_qubits(2);
        assert!(matches!(
            c.cx(QubitId(0), QubitId(0)),
            Err(QcirError::DuplicateQubit { .. })
        ));
        assert!(matches!(
            c.h(QubitId(7)),
            Err(QcirError::QubitNotFound(QubitId(7)))
        ));
        assert!(matches!(
            c.apply(GateType::CX, [QubitId(0)]),
            Err(QcirError::QubitCountMismatch { .. })
        ));
    }

    #[test]
    fn test_t_count() {
        let mut c = QCir::with_qubits(1);
        c.t(QubitId(0))
            .unwrap()
            .tdg(QubitId(0))
            .unwrap()
            .rz(Phase::new(3, 4), QubitId(0))
            .unwrap()
            .s(QubitId(0))
            .unwrap();
        assert_eq!(c.t_count(), 3);
    }

    #[test]
    fn test_adjoint_reverses_and_inverts() {
        let mut c = QCir::with_qubits(2);
        c.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap().s(QubitId(1)).unwrap();
        let inv = c.adjoint();
        let names: Vec<&str> = inv.gates().iter().map(|g| g.gate.name()).collect();
        assert_eq!(names, vec!["sdg", "cx", "h"]);
    }
}
