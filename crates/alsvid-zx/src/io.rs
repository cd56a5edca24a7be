//! `.zx` file format and TikZ export.
//!
//! The `.zx` format describes one vertex per line:
//!
//! ```text
//! // comments start with a double slash
//! I0 0
//! O1 0 (S:2)
//! Z2 0 (S:0) (S:1) pi/2
//! ```
//!
//! The leading token is a type tag (`I`, `O`, `Z`, `X`, `H`) glued to the
//! vertex id, followed by the qubit index, the neighbor list as
//! `(edge-tag:id)` pairs, and an optional trailing phase in ASCII π
//! notation. Each undirected edge appears once, on the line of its
//! larger-id endpoint. `H` vertices default to phase π.

use std::fmt::Write as _;

use crate::error::{ZxError, ZxResult};
use crate::graph::ZxGraph;
use crate::phase::Phase;
use crate::vertex::{EdgeType, VertexId, VertexType};

/// Serialize a graph to the `.zx` text format.
pub fn write_zx(graph: &ZxGraph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// alsvid zx graph ({} vertices)", graph.num_vertices());
    for v in graph.vertices() {
        let tag = if graph.inputs().contains(&v.id()) {
            'I'
        } else if graph.outputs().contains(&v.id()) {
            'O'
        } else {
            v.vtype().tag()
        };
        let _ = write!(out, "{tag}{} {}", v.id().0, v.qubit());
        for &(w, et) in v.neighbors() {
            if w.0 < v.id().0 {
                let _ = write!(out, " ({}:{})", et.tag(), w.0);
            }
        }
        if !v.phase().is_zero() && v.vtype() != VertexType::Boundary {
            let _ = write!(out, " {}", v.phase().ascii());
        }
        let _ = writeln!(out);
    }
    out
}

/// Parse the `.zx` text format.
///
/// With `keep_id` the original ids are retained; otherwise ids are
/// compacted to `0..n` in reading order.
pub fn read_zx(text: &str, keep_id: bool) -> ZxResult<ZxGraph> {
    struct Line {
        number: usize,
        tag: char,
        id: u64,
        qubit: i32,
        neighbors: Vec<(EdgeType, u64)>,
        phase: Option<Phase>,
    }

    let mut lines: Vec<Line> = vec![];
    for (idx, raw) in text.lines().enumerate() {
        let number = idx + 1;
        let parse_err = |reason: &str| ZxError::Parse { line: number, reason: reason.to_string() };
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let head = tokens.next().expect("non-empty line");
        let tag = head.chars().next().expect("non-empty token");
        if !"IOZXH".contains(tag) {
            return Err(parse_err(&format!("unknown vertex tag `{tag}`")));
        }
        let id: u64 = head[1..]
            .parse()
            .map_err(|_| parse_err("expected an integer vertex id after the tag"))?;
        let qubit: i32 = tokens
            .next()
            .ok_or_else(|| parse_err("missing qubit index"))?
            .parse()
            .map_err(|_| parse_err("qubit index is not an integer"))?;

        let mut neighbors = vec![];
        let mut phase = None;
        for tok in tokens {
            if let Some(inner) = tok.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
                let (etag, nid) = inner
                    .split_once(':')
                    .ok_or_else(|| parse_err("neighbor must be written as (S:id) or (H:id)"))?;
                let etype = match etag {
                    "S" => EdgeType::Simple,
                    "H" => EdgeType::Hadamard,
                    _ => return Err(parse_err(&format!("unknown edge tag `{etag}`"))),
                };
                let nid: u64 = nid
                    .parse()
                    .map_err(|_| parse_err("neighbor id is not an integer"))?;
                neighbors.push((etype, nid));
            } else if phase.is_none() {
                phase = Some(
                    Phase::parse_ascii(tok)
                        .ok_or_else(|| parse_err(&format!("cannot parse phase `{tok}`")))?,
                );
            } else {
                return Err(parse_err(&format!("unexpected token `{tok}`")));
            }
        }
        lines.push(Line { number, tag, id, qubit, neighbors, phase });
    }

    let mut graph = ZxGraph::new();
    let mut id_map = rustc_hash::FxHashMap::default();
    for (pos, line) in lines.iter().enumerate() {
        let vid = if keep_id { VertexId(line.id) } else { VertexId(pos as u64) };
        let (vtype, default_phase) = match line.tag {
            'I' | 'O' => (VertexType::Boundary, Phase::zero()),
            'Z' => (VertexType::ZSpider, Phase::zero()),
            'X' => (VertexType::XSpider, Phase::zero()),
            'H' => (VertexType::HBox, Phase::pi()),
            _ => unreachable!("validated above"),
        };
        let phase = line.phase.unwrap_or(default_phase);
        if !graph.insert_with_id(vid, line.qubit, vtype, phase) {
            return Err(ZxError::Parse {
                line: line.number,
                reason: format!("duplicate vertex id {}", line.id),
            });
        }
        id_map.insert(line.id, vid);
        match line.tag {
            'I' => graph.register_input(vid),
            'O' => graph.register_output(vid),
            _ => {}
        }
    }

    for line in &lines {
        let u = id_map[&line.id];
        for &(etype, nid) in &line.neighbors {
            let v = *id_map.get(&nid).ok_or_else(|| ZxError::Parse {
                line: line.number,
                reason: format!("neighbor id {nid} is not defined anywhere in the file"),
            })?;
            graph.add_edge(u, v, etype).map_err(|e| ZxError::Parse {
                line: line.number,
                reason: e.to_string(),
            })?;
        }
    }

    if !graph.is_valid() {
        return Err(ZxError::Parse {
            line: 0,
            reason: "parsed graph violates the boundary or uniqueness invariants".to_string(),
        });
    }
    Ok(graph)
}

/// Render the graph as a standalone TikZ picture.
pub fn write_tikz(graph: &ZxGraph) -> String {
    let mut out = String::new();
    out.push_str("\\begin{tikzpicture}[\n");
    out.push_str("  zvert/.style={circle, draw=green!60!black, fill=green!20},\n");
    out.push_str("  xvert/.style={circle, draw=red!60!black, fill=red!20},\n");
    out.push_str("  hvert/.style={rectangle, draw=yellow!60!black, fill=yellow!20},\n");
    out.push_str("  bvert/.style={circle, draw=black},\n");
    out.push_str("]\n");
    for v in graph.vertices() {
        let style = match v.vtype() {
            VertexType::Boundary => "bvert",
            VertexType::ZSpider => "zvert",
            VertexType::XSpider => "xvert",
            VertexType::HBox => "hvert",
        };
        let label = if v.phase().is_zero() || v.is_boundary() {
            String::new()
        } else {
            format!("${}$", v.phase().ascii().replace("pi", "\\pi"))
        };
        let _ = writeln!(
            out,
            "  \\node[{style}] (v{}) at ({}, {}) {{{label}}};",
            v.id().0,
            v.col(),
            -v.qubit()
        );
    }
    for (u, v, et) in graph.edges() {
        let style = match et {
            EdgeType::Simple => "",
            EdgeType::Hadamard => "[dashed, blue]",
        };
        let _ = writeln!(out, "  \\draw{style} (v{}) -- (v{});", u.0, v.0);
    }
    out.push_str("\\end{tikzpicture}\n");
    out
}

/// Wrap the TikZ picture in a standalone LaTeX document.
pub fn write_tex(graph: &ZxGraph) -> String {
    format!(
        "\\documentclass[tikz]{{standalone}}\n\\begin{{document}}\n{}\\end{{document}}\n",
        write_tikz(graph)
    )
}
