//! Circuit-to-tensor semantics of the QCir → ZX → tensor pipeline.

use ndarray::Array2;
use num_complex::Complex64;

use alsvid_qcir::{QCir, QubitId};
use alsvid_tensor::{equivalent_up_to_scalar, max_abs_diff, to_matrix};

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn mat2(entries: [[Complex64; 2]; 2]) -> Array2<Complex64> {
    Array2::from_shape_vec((2, 2), entries.into_iter().flatten().collect()).unwrap()
}

#[test]
fn test_empty_two_qubit_circuit_is_the_identity() {
    let circuit = QCir::with_qubits(2);
    let graph = circuit.to_zx_graph().unwrap();

    assert_eq!(graph.num_inputs(), 2);
    assert_eq!(graph.num_outputs(), 2);
    assert_eq!(graph.num_vertices(), 4);
    assert_eq!(graph.num_edges(), 2);

    let m = to_matrix(&graph).unwrap();
    assert!(max_abs_diff(&m, &Array2::eye(4)) < 1e-12);
}

#[test]
fn test_cnot_circuit_gives_the_cnot_matrix() {
    let mut circuit = QCir::with_qubits(2);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    let graph = circuit.to_zx_graph().unwrap();

    let m = to_matrix(&graph).unwrap();
    let mut cnot = Array2::zeros((4, 4));
    cnot[[0, 0]] = c(1.0, 0.0);
    cnot[[1, 1]] = c(1.0, 0.0);
    cnot[[2, 3]] = c(1.0, 0.0);
    cnot[[3, 2]] = c(1.0, 0.0);
    assert!(max_abs_diff(&m, &cnot) < 1e-12);
}

#[test]
fn test_cz_circuit_gives_the_cz_matrix() {
    let mut circuit = QCir::with_qubits(2);
    circuit.cz(QubitId(0), QubitId(1)).unwrap();
    let graph = circuit.to_zx_graph().unwrap();

    let m = to_matrix(&graph).unwrap();
    let mut cz = Array2::eye(4);
    cz[[3, 3]] = c(-1.0, 0.0);
    assert!(max_abs_diff(&m, &cz) < 1e-12);
}

#[test]
fn test_swap_lowers_to_three_cnots_with_swap_semantics() {
    let mut circuit = QCir::with_qubits(2);
    circuit.swap(QubitId(0), QubitId(1)).unwrap();
    let graph = circuit.to_zx_graph().unwrap();

    let m = to_matrix(&graph).unwrap();
    let mut swap = Array2::zeros((4, 4));
    swap[[0, 0]] = c(1.0, 0.0);
    swap[[1, 2]] = c(1.0, 0.0);
    swap[[2, 1]] = c(1.0, 0.0);
    swap[[3, 3]] = c(1.0, 0.0);
    assert!(max_abs_diff(&m, &swap) < 1e-12);
}

fn single_gate_matrix(apply: impl FnOnce(&mut QCir)) -> Array2<Complex64> {
    let mut circuit = QCir::with_qubits(1);
    apply(&mut circuit);
    to_matrix(&circuit.to_zx_graph().unwrap()).unwrap()
}

#[test]
fn test_single_qubit_gate_matrices() {
    let s = 1.0 / 2f64.sqrt();

    let h = mat2([[c(s, 0.0), c(s, 0.0)], [c(s, 0.0), c(-s, 0.0)]]);
    let m = single_gate_matrix(|q| {
        q.h(QubitId(0)).unwrap();
    });
    assert!(max_abs_diff(&m, &h) < 1e-12);

    let t = mat2([[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(s, s)]]);
    let m = single_gate_matrix(|q| {
        q.t(QubitId(0)).unwrap();
    });
    assert!(max_abs_diff(&m, &t) < 1e-12);

    let x = mat2([[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]]);
    let m = single_gate_matrix(|q| {
        q.x(QubitId(0)).unwrap();
    });
    assert!(max_abs_diff(&m, &x) < 1e-12);

    let y = mat2([[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]]);
    let m = single_gate_matrix(|q| {
        q.y(QubitId(0)).unwrap();
    });
    assert!(max_abs_diff(&m, &y) < 1e-12);

    let sdg = mat2([[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(0.0, -1.0)]]);
    let m = single_gate_matrix(|q| {
        q.sdg(QubitId(0)).unwrap();
    });
    assert!(max_abs_diff(&m, &sdg) < 1e-12);
}

#[test]
fn test_h_t_h_sandwich() {
    let mut circuit = QCir::with_qubits(1);
    circuit.h(QubitId(0)).unwrap().t(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
    let graph = circuit.to_zx_graph().unwrap();

    // H · T · H computed by hand.
    let e = Complex64::from_polar(1.0, std::f64::consts::FRAC_PI_4);
    let half = c(0.5, 0.0);
    let expected = mat2([
        [half * (c(1.0, 0.0) + e), half * (c(1.0, 0.0) - e)],
        [half * (c(1.0, 0.0) - e), half * (c(1.0, 0.0) + e)],
    ]);

    let m = to_matrix(&graph).unwrap();
    assert!(max_abs_diff(&m, &expected) < 1e-12);
}

#[test]
fn test_adjoint_graph_is_the_conjugate_transpose() {
    let mut circuit = QCir::with_qubits(1);
    circuit.t(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
    let graph = circuit.to_zx_graph().unwrap();
    let m = to_matrix(&graph).unwrap();

    let mut adj = graph.clone();
    adj.adjoint();
    let madj = to_matrix(&adj).unwrap();

    let dagger = m.t().mapv(|z| z.conj());
    assert!(max_abs_diff(&madj, &dagger) < 1e-12);
}

#[test]
fn test_toffoli_network_matches_toffoli_up_to_scalar() {
    let mut circuit = QCir::with_qubits(3);
    circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
    let graph = circuit.to_zx_graph().unwrap();

    let mut ccx = Array2::eye(8);
    ccx[[6, 6]] = c(0.0, 0.0);
    ccx[[7, 7]] = c(0.0, 0.0);
    ccx[[6, 7]] = c(1.0, 0.0);
    ccx[[7, 6]] = c(1.0, 0.0);

    let m = to_matrix(&graph).unwrap();
    assert!(equivalent_up_to_scalar(&m, &ccx, 1e-9));
}
