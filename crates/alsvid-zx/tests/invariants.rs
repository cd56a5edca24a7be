//! Property tests: the universal invariants survive arbitrary public
//! mutation sequences.

use proptest::prelude::*;

use alsvid_zx::{EdgeType, Phase, VertexType, ZxGraph};

#[derive(Debug, Clone)]
enum Op {
    AddSpider { qubit: i32, x_colour: bool, numer: i64, denom: i64 },
    AddEdge { a: usize, b: usize, hadamard: bool },
    RemoveEdge { a: usize, b: usize },
    RemoveVertex { a: usize },
    Toggle { a: usize },
    RemoveIsolated,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..4i32, any::<bool>(), -8..8i64, 1..8i64).prop_map(|(qubit, x_colour, numer, denom)| {
            Op::AddSpider { qubit, x_colour, numer, denom }
        }),
        (0..32usize, 0..32usize, any::<bool>())
            .prop_map(|(a, b, hadamard)| Op::AddEdge { a, b, hadamard }),
        (0..32usize, 0..32usize).prop_map(|(a, b)| Op::RemoveEdge { a, b }),
        (0..32usize).prop_map(|a| Op::RemoveVertex { a }),
        (0..32usize).prop_map(|a| Op::Toggle { a }),
        Just(Op::RemoveIsolated),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_mutations_preserve_validity(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut g = ZxGraph::new();
        // Anchor the graph with a couple of boundary wires.
        for q in 0..2 {
            let i = g.add_input(q).unwrap();
            let o = g.add_output(q).unwrap();
            g.add_edge(i, o, EdgeType::Simple).unwrap();
        }

        for op in ops {
            let ids = g.vertex_ids();
            match op {
                Op::AddSpider { qubit, x_colour, numer, denom } => {
                    let vtype = if x_colour { VertexType::XSpider } else { VertexType::ZSpider };
                    g.add_vertex(qubit, vtype, Phase::new(numer, denom));
                }
                Op::AddEdge { a, b, hadamard } => {
                    if ids.is_empty() { continue; }
                    let (a, b) = (ids[a % ids.len()], ids[b % ids.len()]);
                    let etype = if hadamard { EdgeType::Hadamard } else { EdgeType::Simple };
                    // Boundary-degree and self-loop rejections are expected;
                    // the graph must stay canonical either way.
                    let _ = g.add_edge(a, b, etype);
                }
                Op::RemoveEdge { a, b } => {
                    if ids.is_empty() { continue; }
                    let (a, b) = (ids[a % ids.len()], ids[b % ids.len()]);
                    let _ = g.remove_edge(a, b, None);
                }
                Op::RemoveVertex { a } => {
                    if ids.is_empty() { continue; }
                    let v = ids[a % ids.len()];
                    // Keep the boundary wires alive so validity stays
                    // meaningful.
                    if !g.inputs().contains(&v) && !g.outputs().contains(&v) {
                        g.remove_vertex(v);
                    }
                }
                Op::Toggle { a } => {
                    if ids.is_empty() { continue; }
                    let _ = g.toggle_vertex(ids[a % ids.len()]);
                }
                Op::RemoveIsolated => g.remove_isolated_vertices(),
            }

            // Removing a vertex can orphan a boundary; every other
            // violation is a bug. Check the parts that must always hold.
            for v in g.vertices() {
                for &(w, et) in v.neighbors() {
                    prop_assert!(w != v.id(), "self-loop survived");
                    let back = g
                        .vertex(w)
                        .expect("neighbor exists")
                        .neighbors()
                        .iter()
                        .filter(|&&(n, t)| n == v.id() && t == et)
                        .count();
                    let here = v
                        .neighbors()
                        .iter()
                        .filter(|&&(n, t)| n == w && t == et)
                        .count();
                    prop_assert_eq!(here, back, "asymmetric neighbor relation");
                    if v.vtype().is_spider()
                        && g.vertex(w).expect("neighbor exists").vtype().is_spider()
                    {
                        prop_assert!(here <= 1, "reducible parallel edges survived");
                    }
                }
            }
        }
    }

    #[test]
    fn prop_edges_listed_once(n in 2usize..8, extra in 0usize..10) {
        let mut g = ZxGraph::new();
        let vs: Vec<_> = (0..n)
            .map(|q| g.add_vertex(q as i32, VertexType::ZSpider, Phase::zero()))
            .collect();
        for k in 0..extra {
            let a = vs[k % n];
            let b = vs[(k * 7 + 1) % n];
            if a != b {
                let _ = g.add_edge(a, b, EdgeType::Hadamard);
            }
        }
        let edges = g.edges();
        let total: usize = g.vertices().map(|v| v.degree()).sum();
        prop_assert_eq!(edges.len() * 2, total);
    }
}
