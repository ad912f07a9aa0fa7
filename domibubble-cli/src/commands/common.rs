use std::path::Path;

use anyhow::{bail, Context};
use domibubble::{
    pipeline::{PipelineConfig, PipelineReport},
    AcyclicGraph, DominatorTree, IndexedGraph, NodeId,
};
use serde::Serialize;

/// Label used for the synthetic super-root in text and JSON output.
pub const SUPER_ROOT_LABEL: &str = "<super-root>";

/// Stage options shared by the `analyze` and `domtree` subcommands.
#[derive(Debug, Clone, Default)]
pub struct StageOptions {
    pub entry: Option<String>,
    pub allow_unreachable: bool,
    pub max_passes: Option<usize>,
    pub show_super_root: bool,
}

impl StageOptions {
    pub fn pipeline_config(&self) -> PipelineConfig<String> {
        PipelineConfig {
            entry: self.entry.clone(),
            allow_unreachable: self.allow_unreachable,
            pass_limit: self.max_passes,
            include_super_root: self.show_super_root,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EdgeOutput {
    pub source: String,
    pub target: String,
}

impl EdgeOutput {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Load an edge-list file.
pub fn load_graph(path: &Path) -> anyhow::Result<IndexedGraph<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file: {}", path.display()))?;
    parse_edge_list(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse an edge list.
///
/// One `source target` pair per line, separated by whitespace. A line holding a single
/// token declares an isolated node. `#` starts a comment; blank lines are ignored.
pub fn parse_edge_list(text: &str) -> anyhow::Result<IndexedGraph<String>> {
    let mut graph = IndexedGraph::new();

    for (line_no, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default();
        let tokens: Vec<&str> = content.split_whitespace().collect();
        match tokens.as_slice() {
            [] => {}
            [node] => {
                graph.add_node((*node).to_string());
            }
            [source, target] => {
                graph.add_edge((*source).to_string(), (*target).to_string())?;
            }
            _ => bail!(
                "line {}: expected `source target`, found {} tokens",
                line_no + 1,
                tokens.len()
            ),
        }
    }

    Ok(graph)
}

/// Display label of a node, resolving the synthetic super-root.
pub fn node_label(acyclic: &AcyclicGraph<String>, tree: &DominatorTree, node: NodeId) -> String {
    if tree.is_super_root(node) {
        return SUPER_ROOT_LABEL.to_string();
    }
    acyclic
        .get_key(node)
        .cloned()
        .unwrap_or_else(|| node.to_string())
}

/// Whether the report has a super-root that the output should not show.
pub fn hides_super_root(report: &PipelineReport<String>) -> bool {
    report.tree().super_root().is_some() && !report.includes_super_root()
}

/// Root label of a report.
///
/// A hidden super-root is reported as its natural entries, space separated.
pub fn root_label(report: &PipelineReport<String>) -> String {
    let (acyclic, tree) = (report.acyclic(), report.tree());
    if hides_super_root(report) {
        tree.entries()
            .iter()
            .map(|&entry| node_label(acyclic, tree, entry))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        node_label(acyclic, tree, tree.root())
    }
}

/// Key pairs as serializable edges.
pub fn edge_outputs<'a>(edges: impl IntoIterator<Item = (&'a String, &'a String)>) -> Vec<EdgeOutput> {
    edges
        .into_iter()
        .map(|(source, target)| EdgeOutput::new(source.as_str(), target.as_str()))
        .collect()
}
