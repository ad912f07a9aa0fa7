use std::path::Path;

use anyhow::Context;
use domibubble::{
    pipeline::{Pipeline, PipelineReport},
    Bubble,
};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{
        edge_outputs, hides_super_root, load_graph, node_label, root_label, EdgeOutput,
        StageOptions,
    },
    output::{print_output, print_section, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct BubbleOutput {
    start: String,
    end: String,
    ids: Bubble,
}

#[derive(Debug, Serialize)]
struct TreeNodeOutput {
    node: String,
    idom: Option<String>,
    depth: usize,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    node_count: usize,
    edge_count: usize,
    passes: usize,
    reversed_edges: Vec<EdgeOutput>,
    topological_order: Vec<String>,
    root: String,
    tree: Vec<TreeNodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unreachable: Vec<String>,
    bubbles: Vec<BubbleOutput>,
}

impl AnalyzeOutput {
    fn from_report(report: &PipelineReport<String>) -> Self {
        let acyclic = report.acyclic();
        let tree = report.tree();
        let label = |node| node_label(acyclic, tree, node);

        // A hidden super-root is neither listed as an idom nor counted in depths
        let hidden = hides_super_root(report);
        let reversed = acyclic.reversed_edge_keys();

        Self {
            node_count: acyclic.node_count(),
            edge_count: acyclic.edge_count(),
            passes: acyclic.passes(),
            reversed_edges: edge_outputs(reversed.iter().map(|(u, v)| (u, v))),
            topological_order: acyclic.topological_order_keys(),
            root: root_label(report),
            tree: tree
                .nodes()
                .map(|node| TreeNodeOutput {
                    node: label(node),
                    idom: tree
                        .immediate_dominator(node)
                        .filter(|&parent| !(hidden && tree.is_super_root(parent)))
                        .map(label),
                    depth: tree
                        .depth(node)
                        .unwrap_or_default()
                        .saturating_sub(usize::from(hidden)),
                })
                .collect(),
            unreachable: report.unreachable_keys(),
            bubbles: report
                .bubbles()
                .iter()
                .map(|&bubble| BubbleOutput {
                    start: label(bubble.start),
                    end: label(bubble.end),
                    ids: bubble,
                })
                .collect(),
        }
    }
}

pub fn run(path: &Path, options: &StageOptions, opts: &GlobalOptions) -> anyhow::Result<()> {
    let graph = load_graph(path)?;

    let report = Pipeline::new(options.pipeline_config())
        .run(&graph)
        .with_context(|| format!("analysis of {} failed", path.display()))?;

    print_output(&AnalyzeOutput::from_report(&report), opts, |output| {
        println!("Nodes:           {}", output.node_count);
        println!("Edges:           {}", output.edge_count);
        println!("Passes:          {}", output.passes);
        println!("Root:            {}", output.root);
        println!("Order:           {}", output.topological_order.join(" "));

        let mut reversed = TabWriter::new(vec![("Source", Align::Left), ("Target", Align::Left)])
            .indent("  ");
        for edge in &output.reversed_edges {
            reversed.row(vec![edge.source.clone(), edge.target.clone()]);
        }
        print_section("Reversed edges", &reversed, "(none)");

        let mut dominators = TabWriter::new(vec![
            ("Node", Align::Left),
            ("Idom", Align::Left),
            ("Depth", Align::Right),
        ])
        .indent("  ");
        for entry in &output.tree {
            dominators.row(vec![
                entry.node.clone(),
                entry.idom.clone().unwrap_or_else(|| "-".to_string()),
                entry.depth.to_string(),
            ]);
        }
        print_section("Dominator tree", &dominators, "(empty)");

        if !output.unreachable.is_empty() {
            println!("\nUnreachable:     {}", output.unreachable.join(" "));
        }

        let mut bubbles =
            TabWriter::new(vec![("Start", Align::Left), ("End", Align::Left)]).indent("  ");
        for bubble in &output.bubbles {
            bubbles.row(vec![bubble.start.clone(), bubble.end.clone()]);
        }
        print_section("Bubbles", &bubbles, "(none)");
    })
}
