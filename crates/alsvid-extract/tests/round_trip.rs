//! Extraction round trips: the extracted circuit's tensor matches the
//! diagram it came from.

use alsvid_extract::{Extractor, ExtractorOptions};
use alsvid_qcir::{QCir, QubitId};
use alsvid_simp::Simplifier;
use alsvid_tensor::{equivalent_up_to_scalar, to_matrix};
use alsvid_zx::{EdgeType, Phase, VertexType, ZxGraph};

/// Extract a circuit and check its tensor against the original diagram.
fn assert_round_trip(graph: &ZxGraph) {
    let before = to_matrix(graph).expect("diagram evaluates");
    let mut working = graph.clone();
    let result = Extractor::new(&mut working, ExtractorOptions::default())
        .expect("diagram is extractable")
        .extract()
        .expect("extraction succeeds");
    let reconstructed = result.circuit.to_zx_graph().expect("circuit translates");
    let after = to_matrix(&reconstructed).expect("reconstruction evaluates");
    assert!(
        equivalent_up_to_scalar(&before, &after, 1e-9),
        "extracted circuit diverges from the diagram"
    );
}

#[test]
fn test_round_trip_phase_wire() {
    let mut g = ZxGraph::new();
    let i = g.add_input(0).unwrap();
    let z = g.add_vertex(0, VertexType::ZSpider, Phase::new(1, 4));
    let o = g.add_output(0).unwrap();
    g.add_edge(i, z, EdgeType::Simple).unwrap();
    g.add_edge(z, o, EdgeType::Simple).unwrap();
    assert_round_trip(&g);
}

#[test]
fn test_round_trip_cnot_shaped_graph() {
    let mut g = ZxGraph::new();
    let i0 = g.add_input(0).unwrap();
    let z0 = g.add_vertex(0, VertexType::ZSpider, Phase::zero());
    let o0 = g.add_output(0).unwrap();
    g.add_edge(i0, z0, EdgeType::Simple).unwrap();
    g.add_edge(z0, o0, EdgeType::Simple).unwrap();

    let i1 = g.add_input(1).unwrap();
    let w1 = g.add_vertex(1, VertexType::ZSpider, Phase::zero());
    let z1 = g.add_vertex(1, VertexType::ZSpider, Phase::zero());
    let z2 = g.add_vertex(1, VertexType::ZSpider, Phase::zero());
    let o1 = g.add_output(1).unwrap();
    g.add_edge(i1, w1, EdgeType::Simple).unwrap();
    g.add_edge(w1, z1, EdgeType::Hadamard).unwrap();
    g.add_edge(z1, z2, EdgeType::Hadamard).unwrap();
    g.add_edge(z2, o1, EdgeType::Simple).unwrap();
    g.add_edge(z0, z1, EdgeType::Hadamard).unwrap();
    assert_round_trip(&g);
}

#[test]
fn test_round_trip_dense_parity_layer() {
    let rows = [
        [true, true, false],
        [false, true, true],
        [true, true, true],
    ];
    let mut g = ZxGraph::new();
    let mut backs = vec![];
    for q in 0..3 {
        let i = g.add_input(q).unwrap();
        let b = g.add_vertex(q, VertexType::ZSpider, Phase::zero());
        g.add_edge(i, b, EdgeType::Simple).unwrap();
        backs.push(b);
    }
    for (r, row) in rows.iter().enumerate() {
        let q = r as i32;
        let f = g.add_vertex(q, VertexType::ZSpider, Phase::zero());
        let o = g.add_output(q).unwrap();
        g.add_edge(f, o, EdgeType::Simple).unwrap();
        for (c, &connected) in row.iter().enumerate() {
            if connected {
                g.add_edge(f, backs[c], EdgeType::Hadamard).unwrap();
            }
        }
    }
    assert_round_trip(&g);
}

#[test]
fn test_round_trip_frontier_phases_and_cz() {
    let mut g = ZxGraph::new();
    let mut spiders = vec![];
    for q in 0..2 {
        let i = g.add_input(q).unwrap();
        let z = g.add_vertex(q, VertexType::ZSpider, if q == 0 { Phase::new(1, 2) } else { Phase::new(1, 4) });
        let o = g.add_output(q).unwrap();
        g.add_edge(i, z, EdgeType::Simple).unwrap();
        g.add_edge(z, o, EdgeType::Simple).unwrap();
        spiders.push(z);
    }
    g.add_edge(spiders[0], spiders[1], EdgeType::Hadamard).unwrap();
    assert_round_trip(&g);
}

// =============================================================================
// The full pipeline: circuit → graph → full_reduce → extract → circuit
// =============================================================================

fn assert_pipeline(circuit: &QCir) {
    let graph = circuit.to_zx_graph().unwrap();
    let before = to_matrix(&graph).unwrap();

    let mut reduced = graph.clone();
    Simplifier::new(&mut reduced).full_reduce();
    assert!(reduced.is_valid());

    let result = Extractor::new(&mut reduced, ExtractorOptions::default())
        .expect("reduced diagram is extractable")
        .extract()
        .expect("extraction succeeds");

    let reconstructed = result.circuit.to_zx_graph().unwrap();
    let after = to_matrix(&reconstructed).unwrap();
    assert!(
        equivalent_up_to_scalar(&before, &after, 1e-9),
        "pipeline diverged for circuit:\n{circuit}"
    );
}

#[test]
fn test_pipeline_h_t_h() {
    let mut c = QCir::with_qubits(1);
    c.h(QubitId(0)).unwrap().t(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
    assert_pipeline(&c);
}

#[test]
fn test_pipeline_double_hadamard_extracts_empty_circuit() {
    let mut c = QCir::with_qubits(1);
    c.h(QubitId(0)).unwrap().h(QubitId(0)).unwrap();

    let mut g = c.to_zx_graph().unwrap();
    Simplifier::new(&mut g).full_reduce();
    assert!(g.is_identity());

    let result = Extractor::new(&mut g, ExtractorOptions::default())
        .unwrap()
        .extract()
        .unwrap();
    assert_eq!(result.circuit.num_gates(), 0);
}

#[test]
fn test_pipeline_clifford_circuit() {
    let mut c = QCir::with_qubits(2);
    c.h(QubitId(0))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .s(QubitId(1))
        .unwrap()
        .h(QubitId(1))
        .unwrap();
    assert_pipeline(&c);
}

#[test]
fn test_pipeline_clifford_t_circuit() {
    let mut c = QCir::with_qubits(2);
    c.cx(QubitId(0), QubitId(1))
        .unwrap()
        .t(QubitId(1))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .h(QubitId(0))
        .unwrap()
        .t(QubitId(0))
        .unwrap();
    assert_pipeline(&c);
}

#[test]
fn test_extraction_loop_steps_to_completion() {
    let mut c = QCir::with_qubits(1);
    c.h(QubitId(0)).unwrap().t(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
    let mut g = c.to_zx_graph().unwrap();
    Simplifier::new(&mut g).full_reduce();

    let mut extractor = Extractor::new(&mut g, ExtractorOptions::default()).unwrap();
    // Step a bounded number of rounds; the diagram is tiny.
    let mut remaining = true;
    for _ in 0..32 {
        remaining = extractor.extraction_loop(1).unwrap();
        if !remaining {
            break;
        }
    }
    assert!(!remaining, "stepwise extraction must terminate");
}
