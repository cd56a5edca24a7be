//! Cancellation safety of the simplifier loops.
//!
//! Kept in its own test binary: the stop flag is process-wide, so this is
//! the only test in the process that trips it.

use alsvid_qcir::{QCir, QubitId};
use alsvid_simp::Simplifier;

#[test]
fn test_stop_flag_leaves_a_valid_graph() {
    let mut c = QCir::with_qubits(2);
    c.h(QubitId(0))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .t(QubitId(1))
        .unwrap()
        .h(QubitId(1))
        .unwrap();
    let mut g = c.to_zx_graph().unwrap();

    alsvid_zx::request_stop();
    Simplifier::new(&mut g).full_reduce();
    alsvid_zx::clear_stop();

    // The interrupted run is marked and the graph still satisfies the
    // universal invariants.
    assert_eq!(g.procedures(), &["FR[INT]".to_string()]);
    assert!(g.is_valid());
    assert_eq!(g.num_inputs(), 2);
    assert_eq!(g.num_outputs(), 2);
}
