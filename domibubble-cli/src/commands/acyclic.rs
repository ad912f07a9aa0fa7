use std::path::Path;

use anyhow::Context;
use domibubble::analysis::CycleBreaker;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{edge_outputs, load_graph, EdgeOutput},
    output::{print_output, print_section, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct AcyclicOutput {
    passes: usize,
    edges: Vec<EdgeOutput>,
    reversed_edges: Vec<EdgeOutput>,
    topological_order: Vec<String>,
}

pub fn run(path: &Path, max_passes: Option<usize>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let graph = load_graph(path)?;

    let breaker = match max_passes {
        Some(limit) => CycleBreaker::new().with_pass_limit(limit),
        None => CycleBreaker::new(),
    };
    let acyclic = breaker
        .run(&graph)
        .with_context(|| format!("cycle breaking of {} failed", path.display()))?;

    let reversed = acyclic.reversed_edge_keys();
    let output = AcyclicOutput {
        passes: acyclic.passes(),
        edges: edge_outputs(acyclic.edge_keys()),
        reversed_edges: edge_outputs(reversed.iter().map(|(u, v)| (u, v))),
        topological_order: acyclic.topological_order_keys(),
    };

    print_output(&output, opts, |output| {
        println!("Passes:          {}", output.passes);
        println!("Order:           {}", output.topological_order.join(" "));

        let mut edges = TabWriter::new(vec![("Source", Align::Left), ("Target", Align::Left)])
            .indent("  ");
        for edge in &output.edges {
            edges.row(vec![edge.source.clone(), edge.target.clone()]);
        }
        print_section("Edges", &edges, "(none)");

        let mut reversed = TabWriter::new(vec![("Source", Align::Left), ("Target", Align::Left)])
            .indent("  ");
        for edge in &output.reversed_edges {
            reversed.row(vec![edge.source.clone(), edge.target.clone()]);
        }
        print_section("Reversed edges", &reversed, "(none)");
    })
}
