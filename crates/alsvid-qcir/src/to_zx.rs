//! Gate-by-gate translation of a circuit into a ZX graph.
//!
//! Each qubit wire keeps a running "end" vertex; a gate appends its spider
//! form to the ends of the wires it acts on. Hadamard gates become H-box
//! vertices (so that hadamard simplification can fuse adjacent pairs), and
//! global phases introduced by the Rz/Rx/Ry conventions are folded into the
//! graph scalar.

use tracing::debug;

use alsvid_zx::{EdgeType, Phase, VertexId, VertexType, ZxGraph, ZxResult};

use crate::circuit::QCir;
use crate::error::QcirResult;
use crate::gate::{GateType, QCirGate, QubitId};

impl QCir {
    /// Translate the circuit into a ZX graph.
    pub fn to_zx_graph(&self) -> QcirResult<ZxGraph> {
        let mut g = ZxGraph::new();
        let n = self.num_qubits();
        let mut ends: Vec<VertexId> = Vec::with_capacity(n);
        for q in 0..n {
            ends.push(g.add_input(q as i32)?);
        }
        let mut col = 0;
        for gate in self.gates() {
            col += 1;
            apply_gate(&mut g, &mut ends, &gate, col)?;
        }
        for (q, &end) in ends.iter().enumerate() {
            let out = g.add_output(q as i32)?;
            g.set_col(out, col + 1);
            g.add_edge(end, out, EdgeType::Simple)?;
        }
        debug!(
            "translated {} gates into {} vertices / {} edges",
            self.num_gates(),
            g.num_vertices(),
            g.num_edges()
        );
        Ok(g)
    }
}

fn apply_gate(g: &mut ZxGraph, ends: &mut [VertexId], gate: &QCirGate, col: i32) -> ZxResult<()> {
    let qs = &gate.qubits;
    match gate.gate {
        GateType::H => {
            append(g, ends, qs[0], VertexType::HBox, Phase::pi(), col)?;
        }
        GateType::X => {
            append(g, ends, qs[0], VertexType::XSpider, Phase::pi(), col)?;
        }
        GateType::Y => {
            // Y = i·X·Z: a π Z spider then a π X spider, global phase i.
            append(g, ends, qs[0], VertexType::ZSpider, Phase::pi(), col)?;
            append(g, ends, qs[0], VertexType::XSpider, Phase::pi(), col)?;
            g.scalar_mut().mul_phase(Phase::new(1, 2));
        }
        GateType::Z => {
            append(g, ends, qs[0], VertexType::ZSpider, Phase::pi(), col)?;
        }
        GateType::S => {
            append(g, ends, qs[0], VertexType::ZSpider, Phase::new(1, 2), col)?;
        }
        GateType::Sdg => {
            append(g, ends, qs[0], VertexType::ZSpider, Phase::new(-1, 2), col)?;
        }
        GateType::T => {
            append(g, ends, qs[0], VertexType::ZSpider, Phase::new(1, 4), col)?;
        }
        GateType::Tdg => {
            append(g, ends, qs[0], VertexType::ZSpider, Phase::new(-1, 4), col)?;
        }
        GateType::P(p) => {
            append(g, ends, qs[0], VertexType::ZSpider, p, col)?;
        }
        GateType::Rz(p) => {
            append(g, ends, qs[0], VertexType::ZSpider, p, col)?;
            g.scalar_mut().mul_phase(-p / 2);
        }
        GateType::Rx(p) => {
            append(g, ends, qs[0], VertexType::XSpider, p, col)?;
            g.scalar_mut().mul_phase(-p / 2);
        }
        GateType::Ry(p) => {
            // Ry(θ) = S · Rx(θ) · S†.
            append(g, ends, qs[0], VertexType::ZSpider, Phase::new(-1, 2), col)?;
            append(g, ends, qs[0], VertexType::XSpider, p, col)?;
            append(g, ends, qs[0], VertexType::ZSpider, Phase::new(1, 2), col)?;
            g.scalar_mut().mul_phase(-p / 2);
        }
        GateType::CX => {
            let ctrl = append(g, ends, qs[0], VertexType::ZSpider, Phase::zero(), col)?;
            let targ = append(g, ends, qs[1], VertexType::XSpider, Phase::zero(), col)?;
            g.add_edge(ctrl, targ, EdgeType::Simple)?;
        }
        GateType::CZ => {
            let ctrl = append(g, ends, qs[0], VertexType::ZSpider, Phase::zero(), col)?;
            let targ = append(g, ends, qs[1], VertexType::ZSpider, Phase::zero(), col)?;
            g.add_edge(ctrl, targ, EdgeType::Hadamard)?;
        }
        GateType::Swap => {
            // Three alternating CNOTs at the ZX layer.
            for (c, t) in [(qs[0], qs[1]), (qs[1], qs[0]), (qs[0], qs[1])] {
                let gate = QCirGate { id: gate.id, gate: GateType::CX, qubits: vec![c, t] };
                apply_gate(g, ends, &gate, col)?;
            }
        }
        GateType::CCX => {
            for (gt, operands) in toffoli_network(qs[0], qs[1], qs[2]) {
                let gate = QCirGate { id: gate.id, gate: gt, qubits: operands };
                apply_gate(g, ends, &gate, col)?;
            }
        }
    }
    Ok(())
}

/// Append one spider to a wire and advance its end.
fn append(
    g: &mut ZxGraph,
    ends: &mut [VertexId],
    q: QubitId,
    vtype: VertexType,
    phase: Phase,
    col: i32,
) -> ZxResult<VertexId> {
    let v = g.add_vertex(q.0 as i32, vtype, phase);
    g.set_col(v, col);
    g.add_edge(ends[q.0 as usize], v, EdgeType::Simple)?;
    ends[q.0 as usize] = v;
    Ok(v)
}

/// The standard 7-T Clifford+T realization of the Toffoli gate.
fn toffoli_network(c1: QubitId, c2: QubitId, t: QubitId) -> Vec<(GateType, Vec<QubitId>)> {
    vec![
        (GateType::H, vec![t]),
        (GateType::CX, vec![c2, t]),
        (GateType::Tdg, vec![t]),
        (GateType::CX, vec![c1, t]),
        (GateType::T, vec![t]),
        (GateType::CX, vec![c2, t]),
        (GateType::Tdg, vec![t]),
        (GateType::CX, vec![c1, t]),
        (GateType::T, vec![c2]),
        (GateType::T, vec![t]),
        (GateType::H, vec![t]),
        (GateType::CX, vec![c1, c2]),
        (GateType::T, vec![c1]),
        (GateType::Tdg, vec![c2]),
        (GateType::CX, vec![c1, c2]),
    ]
}
