//! End-to-end behavior of the named strategies.

use alsvid_qcir::{QCir, QubitId};
use alsvid_simp::Simplifier;
use alsvid_tensor::{equivalent_up_to_scalar, to_matrix};
use alsvid_zx::ZxGraph;

fn graph_of(circuit: &QCir) -> ZxGraph {
    circuit.to_zx_graph().unwrap()
}

/// A small Clifford+T circuit that exercises fusion, pivots, and gadgets.
fn mixed_circuit() -> QCir {
    let mut c = QCir::with_qubits(3);
    c.h(QubitId(0))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .t(QubitId(1))
        .unwrap()
        .cz(QubitId(1), QubitId(2))
        .unwrap()
        .s(QubitId(2))
        .unwrap()
        .cx(QubitId(1), QubitId(2))
        .unwrap()
        .h(QubitId(1))
        .unwrap()
        .tdg(QubitId(0))
        .unwrap();
    c
}

#[test]
fn test_full_reduce_preserves_semantics() {
    let circuit = mixed_circuit();
    let mut g = graph_of(&circuit);
    let before = to_matrix(&g).unwrap();

    Simplifier::new(&mut g).full_reduce();

    assert!(g.is_valid());
    let after = to_matrix(&g).unwrap();
    assert!(equivalent_up_to_scalar(&before, &after, 1e-9));
}

#[test]
fn test_full_reduce_produces_graph_like_form() {
    let mut g = graph_of(&mixed_circuit());
    Simplifier::new(&mut g).full_reduce();
    assert!(g.is_graph_like(), "full_reduce must land in graph-like form");
}

#[test]
fn test_full_reduce_is_idempotent_on_counts() {
    let mut g = graph_of(&mixed_circuit());
    Simplifier::new(&mut g).full_reduce();
    let (v, e, t) = (g.num_vertices(), g.num_edges(), g.t_count());
    Simplifier::new(&mut g).full_reduce();
    assert_eq!((g.num_vertices(), g.num_edges(), g.t_count()), (v, e, t));
}

#[test]
fn test_clifford_circuit_reduces_t_count_to_zero() {
    let mut c = QCir::with_qubits(2);
    c.h(QubitId(0))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .s(QubitId(1))
        .unwrap()
        .cz(QubitId(0), QubitId(1))
        .unwrap();
    let mut g = graph_of(&c);
    Simplifier::new(&mut g).full_reduce();
    assert_eq!(g.t_count(), 0);
}

#[test]
fn test_cnot_survives_full_reduce() {
    let mut c = QCir::with_qubits(2);
    c.cx(QubitId(0), QubitId(1)).unwrap();
    let mut g = c.to_zx_graph().unwrap();
    let before = to_matrix(&g).unwrap();

    Simplifier::new(&mut g).full_reduce();

    // A CNOT is already minimal: the pair of connected spiders survives
    // and the semantics are untouched.
    assert_eq!(g.t_count(), 0);
    assert!(g.is_valid());
    assert!(!g.is_identity());
    let after = to_matrix(&g).unwrap();
    assert!(equivalent_up_to_scalar(&before, &after, 1e-9));
}

#[test]
fn test_t_count_scenario() {
    // H; T; H has T-count 1 before and after reduction.
    let mut c = QCir::with_qubits(1);
    c.h(QubitId(0)).unwrap().t(QubitId(0)).unwrap().h(QubitId(0)).unwrap();

    let mut g = graph_of(&c);
    assert_eq!(g.t_count(), 1);
    Simplifier::new(&mut g).full_reduce();
    assert_eq!(g.t_count(), 1);

    // dynamic_reduce with the optimum as target lands on the same counts.
    let mut h = graph_of(&c);
    Simplifier::new(&mut h).dynamic_reduce(1);
    assert_eq!(h.t_count(), 1);
    assert_eq!(h.num_vertices(), g.num_vertices());
    assert_eq!(h.num_edges(), g.num_edges());
}

#[test]
fn test_bell_adjoint_compose_reduces_to_identity() {
    let mut bell = QCir::with_qubits(2);
    bell.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();

    let mut g = graph_of(&bell);
    let mut adjoint = g.clone();
    adjoint.adjoint();
    g.compose(adjoint).unwrap();

    Simplifier::new(&mut g).full_reduce();
    assert!(g.is_identity(), "U†∘U must reduce to the identity");
}

#[test]
fn test_symbolic_reduce_preserves_semantics() {
    let circuit = mixed_circuit();
    let mut g = graph_of(&circuit);
    let before = to_matrix(&g).unwrap();
    Simplifier::new(&mut g).symbolic_reduce();
    assert!(g.is_valid());
    let after = to_matrix(&g).unwrap();
    assert!(equivalent_up_to_scalar(&before, &after, 1e-9));
}

#[test]
fn test_strategies_record_procedures() {
    let mut g = graph_of(&mixed_circuit());
    Simplifier::new(&mut g).full_reduce();
    assert_eq!(g.procedures(), &["FR".to_string()]);

    let mut h = graph_of(&mixed_circuit());
    Simplifier::new(&mut h).dynamic_reduce(0);
    assert_eq!(h.procedures(), &["DR".to_string()]);
}

#[test]
fn test_universal_invariants_hold_after_every_strategy() {
    for strategy in 0..3 {
        let mut g = graph_of(&mixed_circuit());
        let mut simp = Simplifier::new(&mut g);
        match strategy {
            0 => simp.full_reduce(),
            1 => simp.dynamic_reduce(2),
            _ => {
                simp.clifford_simp();
            }
        }
        assert!(g.is_valid(), "strategy {strategy} violated the invariants");
        // No boundary lost its wire.
        assert_eq!(g.num_inputs(), 3);
        assert_eq!(g.num_outputs(), 3);
    }
}

#[test]
fn test_phase_gadget_circuit_fuses_gadgets() {
    // Two CX-conjugated T rotations on the same parity support fuse into
    // one S-angle gadget, cutting the T-count to zero.
    let mut c = QCir::with_qubits(2);
    c.cx(QubitId(0), QubitId(1))
        .unwrap()
        .t(QubitId(1))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .t(QubitId(1))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap();

    let mut g = graph_of(&c);
    let before = to_matrix(&g).unwrap();
    assert_eq!(g.t_count(), 2);
    Simplifier::new(&mut g).full_reduce();
    assert_eq!(g.t_count(), 0, "the two T rotations must fuse into S");
    let after = to_matrix(&g).unwrap();
    assert!(equivalent_up_to_scalar(&before, &after, 1e-9));
}

#[test]
fn test_rule_by_name_round_trip() {
    for name in alsvid_simp::RULE_NAMES {
        let rule = alsvid_simp::rule_by_name(name).expect("every listed rule resolves");
        let mut g = ZxGraph::new();
        let _ = g.add_input(0).unwrap();
        // An empty-ish graph matches nothing; the call must be a no-op.
        assert!(rule.find_matches(&g).is_empty());
    }
    assert!(alsvid_simp::rule_by_name("nonsense").is_none());
}
