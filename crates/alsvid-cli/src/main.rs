//! `alsvid` — drive the ZX engine from the command line.
//!
//! One command per invocation: read a `.zx` file, act on it, print or
//! write the result. Exit code 0 on success, 1 on user error.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use alsvid_extract::{Extractor, ExtractorOptions, GFlowCalculator};
use alsvid_simp::{RULE_NAMES, Simplifier, rule_by_name};
use alsvid_tensor::to_matrix;
use alsvid_zx::{EdgeType, Phase, VertexId, VertexType, ZxGraph, io};

#[derive(Parser)]
#[command(name = "alsvid", version, about = "ZX-calculus circuit compiler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Operate on ZX graphs.
    #[command(subcommand)]
    Zx(ZxCommand),
    /// Extract a circuit from a graph-like diagram.
    Extract {
        /// Input `.zx` file.
        file: PathBuf,
        /// CNOT-synthesis optimization level (0-3).
        #[arg(long, default_value_t = 1)]
        optimize_level: u8,
        /// Block size for level-0 Gaussian elimination.
        #[arg(long, default_value_t = 4)]
        block_size: usize,
        /// Keep CNOTs that would cancel with earlier ones.
        #[arg(long)]
        no_filter_cx: bool,
        /// Record the residual qubit permutation instead of emitting swaps.
        #[arg(long)]
        no_permute: bool,
    },
}

#[derive(Subcommand)]
enum ZxCommand {
    /// Print a summary of a graph.
    Print {
        /// Input `.zx` file.
        file: PathBuf,
    },
    /// Check structural predicates.
    Test {
        /// Input `.zx` file.
        file: PathBuf,
        /// Check the universal invariants.
        #[arg(long)]
        valid: bool,
        /// Check emptiness.
        #[arg(long)]
        empty: bool,
        /// Check graph-likeness.
        #[arg(long)]
        graph_like: bool,
        /// Check whether the graph is a bare identity.
        #[arg(long)]
        identity: bool,
    },
    /// Re-serialize a graph (normalizing ids unless asked otherwise).
    Write {
        /// Input `.zx` file.
        file: PathBuf,
        /// Output path.
        #[arg(short, long)]
        output: PathBuf,
        /// Keep the original vertex ids.
        #[arg(long)]
        keep_id: bool,
    },
    /// Render a graph as TikZ or a standalone LaTeX document.
    Draw {
        /// Input `.zx` file.
        file: PathBuf,
        /// Output path.
        #[arg(short, long)]
        output: PathBuf,
        /// Emit a full LaTeX document instead of a bare tikzpicture.
        #[arg(long)]
        tex: bool,
    },
    /// Take the adjoint of a graph.
    Adjoint {
        /// Input `.zx` file.
        file: PathBuf,
        /// Output path.
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Run a named simplification strategy.
    Optimize {
        /// Input `.zx` file.
        file: PathBuf,
        /// Strategy: full-reduce, dynamic-reduce, symbolic-reduce,
        /// clifford, interior-clifford.
        #[arg(long, default_value = "full-reduce")]
        strategy: String,
        /// T-count target for dynamic-reduce.
        #[arg(long, default_value_t = 0)]
        t_target: usize,
        /// Output path (defaults to printing a summary).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Apply a single rewrite rule to fixed point.
    Rule {
        /// Input `.zx` file (not needed with --list).
        file: Option<PathBuf>,
        /// Rule name (see --list).
        #[arg(long)]
        name: Option<String>,
        /// List the available rules.
        #[arg(long)]
        list: bool,
        /// Output path.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Add or remove a single vertex.
    Vertex {
        /// Input `.zx` file.
        file: PathBuf,
        /// Remove the vertex with this id instead of adding one.
        #[arg(long)]
        remove: Option<u64>,
        /// Vertex type for additions: zspider, xspider, or hbox.
        #[arg(long, default_value = "zspider")]
        vertex_type: String,
        /// Qubit row for additions.
        #[arg(long, default_value_t = 0)]
        qubit: i32,
        /// Phase in ASCII π notation.
        #[arg(long, default_value = "0")]
        phase: String,
        /// Output path.
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Add or remove a single edge.
    Edge {
        /// Input `.zx` file.
        file: PathBuf,
        /// First endpoint id.
        #[arg(long)]
        from: u64,
        /// Second endpoint id.
        #[arg(long)]
        to: u64,
        /// Edge type: simple or hadamard.
        #[arg(long, default_value = "simple")]
        edge_type: String,
        /// Remove the edge instead of adding it.
        #[arg(long)]
        remove: bool,
        /// Output path.
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Interpose a typed spider on a boundary wire.
    Assign {
        /// Input `.zx` file.
        file: PathBuf,
        /// Qubit index of the boundary.
        #[arg(long)]
        qubit: i32,
        /// Act on the input side (default: output side).
        #[arg(long)]
        input: bool,
        /// Vertex type: zspider, xspider, or hbox.
        #[arg(long, default_value = "zspider")]
        vertex_type: String,
        /// Phase in ASCII π notation (e.g. `pi/2`).
        #[arg(long, default_value = "0")]
        phase: String,
        /// Output path.
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Compute the generalized flow.
    Gflow {
        /// Input `.zx` file.
        file: PathBuf,
        /// Restrict to the XY measurement plane.
        #[arg(long)]
        plain: bool,
        /// Force layers to be independent sets.
        #[arg(long)]
        independent_layers: bool,
    },
    /// Evaluate the graph as a matrix.
    Tensor {
        /// Input `.zx` file.
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Zx(cmd) => run_zx(cmd),
        Command::Extract { file, optimize_level, block_size, no_filter_cx, no_permute } => {
            let mut graph = load(&file, true)?;
            let options = ExtractorOptions {
                optimize_level: optimize_level.min(3),
                block_size,
                filter_cx: !no_filter_cx,
                permute_qubits: !no_permute,
                ..Default::default()
            };
            let result = Extractor::new(&mut graph, options)?.extract()?;
            print!("{}", result.circuit);
            if !result.permutation.is_empty() {
                println!("residual permutation: {:?}", result.permutation);
            }
            Ok(())
        }
    }
}

fn run_zx(cmd: ZxCommand) -> Result<()> {
    match cmd {
        ZxCommand::Print { file } => {
            let g = load(&file, true)?;
            println!(
                "graph: {} inputs, {} outputs, {} vertices, {} edges",
                g.num_inputs(),
                g.num_outputs(),
                g.num_vertices(),
                g.num_edges()
            );
            println!(
                "T-count: {}, non-Clifford: {}, density: {:.4}",
                g.t_count(),
                g.non_clifford_count(),
                g.density()
            );
            if !g.procedures().is_empty() {
                println!("procedures: {}", g.procedures().join(" -> "));
            }
            Ok(())
        }
        ZxCommand::Test { file, valid, empty, graph_like, identity } => {
            let g = load(&file, true)?;
            let mut ok = true;
            if valid {
                report("valid", g.is_valid(), &mut ok);
            }
            if empty {
                report("empty", g.is_empty(), &mut ok);
            }
            if graph_like {
                report("graph-like", g.is_graph_like(), &mut ok);
            }
            if identity {
                report("identity", g.is_identity(), &mut ok);
            }
            if !ok {
                bail!("one or more checks failed");
            }
            Ok(())
        }
        ZxCommand::Write { file, output, keep_id } => {
            let g = load(&file, keep_id)?;
            std::fs::write(&output, io::write_zx(&g))
                .with_context(|| format!("cannot write {}", output.display()))?;
            Ok(())
        }
        ZxCommand::Draw { file, output, tex } => {
            let g = load(&file, true)?;
            let rendered = if tex { io::write_tex(&g) } else { io::write_tikz(&g) };
            std::fs::write(&output, rendered)
                .with_context(|| format!("cannot write {}", output.display()))?;
            Ok(())
        }
        ZxCommand::Adjoint { file, output } => {
            let mut g = load(&file, true)?;
            g.adjoint();
            std::fs::write(&output, io::write_zx(&g))
                .with_context(|| format!("cannot write {}", output.display()))?;
            Ok(())
        }
        ZxCommand::Optimize { file, strategy, t_target, output } => {
            let mut g = load(&file, true)?;
            let mut simp = Simplifier::new(&mut g);
            match strategy.as_str() {
                "full-reduce" => simp.full_reduce(),
                "dynamic-reduce" => simp.dynamic_reduce(t_target),
                "symbolic-reduce" => simp.symbolic_reduce(),
                "clifford" => {
                    simp.clifford_simp();
                }
                "interior-clifford" => {
                    simp.interior_clifford_simp();
                }
                other => bail!("unknown strategy `{other}`"),
            }
            finish_graph(&g, output)
        }
        ZxCommand::Rule { file, name, list, output } => {
            if list {
                for name in RULE_NAMES {
                    println!("{name}");
                }
                return Ok(());
            }
            let Some(name) = name else { bail!("pass --name <rule> or --list") };
            let Some(file) = file else { bail!("missing input file") };
            let rule = rule_by_name(&name)
                .with_context(|| format!("unknown rule `{name}` (try --list)"))?;
            let mut g = load(&file, true)?;
            let iterations = Simplifier::new(&mut g).simp(rule.as_ref());
            println!("{}: {} iterations", rule.name(), iterations);
            finish_graph(&g, output)
        }
        ZxCommand::Vertex { file, remove, vertex_type, qubit, phase, output } => {
            let mut g = load(&file, true)?;
            match remove {
                Some(id) => g.remove_vertex(VertexId(id)),
                None => {
                    let vtype = parse_vertex_type(&vertex_type)?;
                    let phase = Phase::parse_ascii(&phase)
                        .with_context(|| format!("cannot parse phase `{phase}`"))?;
                    g.add_vertex(qubit, vtype, phase);
                }
            }
            std::fs::write(&output, io::write_zx(&g))
                .with_context(|| format!("cannot write {}", output.display()))?;
            Ok(())
        }
        ZxCommand::Edge { file, from, to, edge_type, remove, output } => {
            let etype = match edge_type.as_str() {
                "simple" => EdgeType::Simple,
                "hadamard" => EdgeType::Hadamard,
                other => bail!("unknown edge type `{other}`"),
            };
            let mut g = load(&file, true)?;
            if remove {
                g.remove_edge(VertexId(from), VertexId(to), Some(etype))?;
            } else {
                g.add_edge(VertexId(from), VertexId(to), etype)?;
            }
            std::fs::write(&output, io::write_zx(&g))
                .with_context(|| format!("cannot write {}", output.display()))?;
            Ok(())
        }
        ZxCommand::Assign { file, qubit, input, vertex_type, phase, output } => {
            let vtype = parse_vertex_type(&vertex_type)?;
            let phase = Phase::parse_ascii(&phase)
                .with_context(|| format!("cannot parse phase `{phase}`"))?;
            let mut g = load(&file, true)?;
            g.assign_boundary(qubit, input, vtype, phase)?;
            std::fs::write(&output, io::write_zx(&g))
                .with_context(|| format!("cannot write {}", output.display()))?;
            Ok(())
        }
        ZxCommand::Gflow { file, plain, independent_layers } => {
            let g = load(&file, true)?;
            let calc = GFlowCalculator { extended: !plain, independent_layers };
            let flow = calc.calculate(&g);
            if !flow.valid {
                bail!("no gflow; unresolved vertices: {:?}", flow.failed);
            }
            for (i, layer) in flow.levels.iter().enumerate() {
                let ids: Vec<String> = layer.iter().map(|v| v.to_string()).collect();
                println!("layer {i}: {}", ids.join(" "));
            }
            Ok(())
        }
        ZxCommand::Tensor { file } => {
            let g = load(&file, true)?;
            let m = to_matrix(&g)?;
            for row in m.rows() {
                let cells: Vec<String> = row.iter().map(|z| format!("{z:.4}")).collect();
                println!("[{}]", cells.join(", "));
            }
            Ok(())
        }
    }
}

fn load(path: &PathBuf, keep_id: bool) -> Result<ZxGraph> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    Ok(io::read_zx(&text, keep_id)?)
}

fn finish_graph(graph: &ZxGraph, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, io::write_zx(graph))
                .with_context(|| format!("cannot write {}", path.display()))?;
        }
        None => {
            println!(
                "result: {} vertices, {} edges, T-count {}",
                graph.num_vertices(),
                graph.num_edges(),
                graph.t_count()
            );
        }
    }
    Ok(())
}

fn parse_vertex_type(name: &str) -> Result<VertexType> {
    Ok(match name {
        "zspider" => VertexType::ZSpider,
        "xspider" => VertexType::XSpider,
        "hbox" => VertexType::HBox,
        other => bail!("unknown vertex type `{other}`"),
    })
}

fn report(name: &str, result: bool, ok: &mut bool) {
    println!("{name}: {}", if result { "yes" } else { "no" });
    if !result {
        *ok = false;
    }
}
