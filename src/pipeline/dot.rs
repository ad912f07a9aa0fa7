//! Graphviz export of pipeline results.
//!
//! The render functions serialize one stage each. [`DotObserver`] renders all three
//! after a successful run and parks them behind a [`DotHandle`] the caller keeps.

use std::{
    fmt::Display,
    hash::Hash,
    sync::{Arc, Mutex},
};

use crate::{
    analysis::AcyclicGraph,
    pipeline::{PipelineObserver, PipelineReport},
    utils::{
        dot::DotWriter,
        graph::{algorithms::DominatorTree, IndexedGraph, NodeId},
    },
    Error, Result,
};

const SUPER_ROOT_ID: &str = "super_root";

fn node_id(node: NodeId) -> String {
    node.to_string()
}

fn write_nodes<K>(dot: &mut DotWriter, graph: &IndexedGraph<K>)
where
    K: Hash + Eq + Clone + Display,
{
    for (node, key) in graph.inner().nodes() {
        dot.node(&node_id(node), &key.to_string(), &[]);
    }
}

/// Renders the input graph.
pub fn render_graph<K>(graph: &IndexedGraph<K>, title: &str) -> String
where
    K: Hash + Eq + Clone + Display,
{
    let mut dot = DotWriter::new("input");
    dot.title(title);
    write_nodes(&mut dot, graph);
    for (source, target) in graph.edges() {
        dot.edge(&node_id(source), &node_id(target), &[]);
    }
    dot.finish()
}

/// Renders the acyclic graph, drawing reversed edges dashed and red.
pub fn render_acyclic<K>(acyclic: &AcyclicGraph<K>, title: &str) -> String
where
    K: Hash + Eq + Clone + Display,
{
    let edges: Vec<(NodeId, NodeId)> = acyclic.edges().collect();
    let mut reversed = vec![false; edges.len()];
    for &position in acyclic.reversal_positions() {
        if let Some(flag) = reversed.get_mut(position) {
            *flag = true;
        }
    }

    let mut dot = DotWriter::new("acyclic");
    dot.title(title);
    write_nodes(&mut dot, acyclic.graph());
    for (&(source, target), &is_reversed) in edges.iter().zip(&reversed) {
        let attrs: &[(&str, &str)] = if is_reversed {
            &[("style", "dashed"), ("color", "red"), ("label", "reversed")]
        } else {
            &[]
        };
        dot.edge(&node_id(source), &node_id(target), attrs);
    }
    dot.finish()
}

/// Renders the dominator tree. Bubble start nodes are drawn as double circles and
/// the edge to their end node is highlighted.
pub fn render_tree<K>(report: &PipelineReport<K>, title: &str) -> String
where
    K: Hash + Eq + Clone + Display,
{
    let acyclic = report.acyclic();
    let tree: &DominatorTree = report.tree();
    let bubble_edges: Vec<(NodeId, NodeId)> =
        report.bubbles().iter().map(|bubble| bubble.as_pair()).collect();

    let mut dot = DotWriter::new("domtree");
    dot.title(title);

    let show_super_root = report.includes_super_root() && tree.super_root().is_some();
    if show_super_root {
        dot.node(SUPER_ROOT_ID, "super-root", &[("shape", "point")]);
    }

    for node in tree.nodes() {
        let label = acyclic
            .get_key(node)
            .map(ToString::to_string)
            .unwrap_or_default();
        let attrs: &[(&str, &str)] = if bubble_edges.iter().any(|&(start, _)| start == node) {
            &[("shape", "doublecircle")]
        } else {
            &[]
        };
        dot.node(&node_id(node), &label, attrs);
    }

    for (parent, child) in report.tree_edges() {
        let from = if tree.is_super_root(parent) {
            SUPER_ROOT_ID.to_string()
        } else {
            node_id(parent)
        };
        let attrs: &[(&str, &str)] = if bubble_edges.contains(&(parent, child)) {
            &[("color", "blue"), ("penwidth", "2")]
        } else {
            &[]
        };
        dot.edge(&from, &node_id(child), attrs);
    }
    dot.finish()
}

/// Graphviz documents for the three pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotDocuments {
    /// The input graph
    pub input: String,
    /// The acyclic graph after cycle breaking
    pub acyclic: String,
    /// The dominator tree
    pub tree: String,
}

/// Caller-side access to the documents a [`DotObserver`] produced.
#[derive(Debug, Clone, Default)]
pub struct DotHandle {
    slot: Arc<Mutex<Option<DotDocuments>>>,
}

impl DotHandle {
    /// Takes the documents of the most recent successful run.
    ///
    /// Returns `None` if no run completed since the last call.
    #[must_use]
    pub fn take(&self) -> Option<DotDocuments> {
        self.slot.lock().ok()?.take()
    }
}

/// Observer rendering the input graph, the acyclic graph and the dominator tree.
///
/// # Examples
///
/// ```rust
/// use domibubble::{
///     make_graph,
///     pipeline::{DotObserver, Pipeline, PipelineConfig},
/// };
///
/// let graph = make_graph(["a", "b"], [("a", "b"), ("b", "a")])?;
/// let observer = DotObserver::new();
/// let handle = observer.handle();
///
/// Pipeline::new(PipelineConfig::default())
///     .observe(Box::new(observer))
///     .run(&graph)?;
///
/// let documents = handle.take().unwrap();
/// assert!(documents.acyclic.contains("reversed"));
/// # Ok::<(), domibubble::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DotObserver {
    handle: DotHandle,
}

impl DotObserver {
    /// Creates an observer with an empty output slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle sharing this observer's output slot.
    #[must_use]
    pub fn handle(&self) -> DotHandle {
        self.handle.clone()
    }
}

impl<K> PipelineObserver<K> for DotObserver
where
    K: Hash + Eq + Clone + Display,
{
    fn name(&self) -> &'static str {
        "dot"
    }

    fn on_complete(&mut self, input: &IndexedGraph<K>, report: &PipelineReport<K>) -> Result<()> {
        let documents = DotDocuments {
            input: render_graph(input, "input graph"),
            acyclic: render_acyclic(report.acyclic(), "acyclic graph"),
            tree: render_tree(report, "dominator tree"),
        };

        let mut slot = self
            .handle
            .slot
            .lock()
            .map_err(|_| Error::Observer("dot output slot poisoned".to_string()))?;
        *slot = Some(documents);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        make_graph,
        pipeline::{Pipeline, PipelineConfig},
    };

    #[test]
    fn test_render_graph_lists_nodes_and_edges() {
        let graph = make_graph(["entry", "exit"], [("entry", "exit")]).unwrap();
        let text = render_graph(&graph, "cfg");

        assert!(text.contains("\"n0\" [label=\"entry\"];"));
        assert!(text.contains("\"n1\" [label=\"exit\"];"));
        assert!(text.contains("\"n0\" -> \"n1\";"));
    }

    #[test]
    fn test_render_acyclic_marks_appended_edge() {
        // 0 -> 1 -> 2 -> 1: (2, 1) is replaced by a second 1 -> 2
        let graph = make_graph([0, 1, 2], [(0, 1), (1, 2), (2, 1)]).unwrap();
        let report = Pipeline::new(PipelineConfig::default()).run(&graph).unwrap();
        let text = render_acyclic(report.acyclic(), "acyclic");

        let plain = text.matches("\"n1\" -> \"n2\";").count();
        let marked = text
            .matches("\"n1\" -> \"n2\" [style=\"dashed\", color=\"red\", label=\"reversed\"];")
            .count();
        assert_eq!((plain, marked), (1, 1));

        // The appended edge is the one drawn as reversed, not the original 1 -> 2
        let original_at = text.find("\"n1\" -> \"n2\";").unwrap();
        let appended_at = text.find("\"n1\" -> \"n2\" [style").unwrap();
        assert!(original_at < appended_at);
    }

    #[test]
    fn test_render_acyclic_marks_each_component() {
        let graph = make_graph(0..7, [
            (0, 1),
            (1, 2),
            (2, 1),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 6),
            (6, 4),
        ])
        .unwrap();
        let report = Pipeline::new(PipelineConfig::default()).run(&graph).unwrap();
        let text = render_acyclic(report.acyclic(), "acyclic");

        assert_eq!(text.matches("label=\"reversed\"").count(), 2);
        assert!(text.contains("\"n4\" -> \"n6\" [style=\"dashed\""));
        assert!(!text.contains("\"n6\" -> \"n4\""));
    }

    #[test]
    fn test_render_tree_highlights_bubbles() {
        let graph = make_graph(0..5, [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]).unwrap();
        let report = Pipeline::new(PipelineConfig::default()).run(&graph).unwrap();
        let text = render_tree(&report, "tree");

        assert!(text.contains("\"n3\" [label=\"3\", shape=\"doublecircle\"];"));
        assert!(text.contains("\"n3\" -> \"n4\" [color=\"blue\", penwidth=\"2\"];"));
        assert!(text.contains("\"n0\" -> \"n3\";"));
        assert!(!text.contains(SUPER_ROOT_ID));
    }

    #[test]
    fn test_render_tree_with_super_root() {
        let graph = make_graph([0, 1, 2], [(0, 2), (1, 2)]).unwrap();
        let config = PipelineConfig {
            include_super_root: true,
            ..PipelineConfig::default()
        };
        let report = Pipeline::new(config).run(&graph).unwrap();
        let text = render_tree(&report, "tree");

        assert!(text.contains("\"super_root\" [label=\"super-root\", shape=\"point\"];"));
        assert!(text.contains("\"super_root\" -> \"n2\";"));
    }

    #[test]
    fn test_observer_fills_handle_once() {
        let graph = make_graph(["a<b>"], Vec::<(&str, &str)>::new()).unwrap();
        let observer = DotObserver::new();
        let handle = observer.handle();

        Pipeline::new(PipelineConfig::default())
            .observe(Box::new(observer))
            .run(&graph)
            .unwrap();

        let documents = handle.take().unwrap();
        assert!(documents.input.contains("label=\"a\\<b\\>\""));
        assert!(documents.tree.starts_with("digraph \"domtree\""));
        assert!(handle.take().is_none());
    }
}
