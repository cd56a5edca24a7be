//! Cancellation safety of the tensor evaluator.
//!
//! Kept in its own test binary: the stop flag is process-wide, so this is
//! the only test in the process that trips it.

use alsvid_tensor::{TensorError, to_matrix};
use alsvid_zx::{EdgeType, ZxGraph};

#[test]
fn test_stop_flag_aborts_evaluation_cleanly() {
    let mut g = ZxGraph::new();
    let i = g.add_input(0).unwrap();
    let o = g.add_output(0).unwrap();
    g.add_edge(i, o, EdgeType::Simple).unwrap();

    alsvid_zx::request_stop();
    let result = to_matrix(&g);
    alsvid_zx::clear_stop();

    assert!(matches!(result, Err(TensorError::Cancelled)));
    // The graph is untouched and still valid.
    assert!(g.is_valid());
    assert!(to_matrix(&g).is_ok());
}
