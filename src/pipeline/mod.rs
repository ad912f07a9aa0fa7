//! End-to-end driver for the three analysis stages.
//!
//! [`Pipeline`] runs cycle breaking, dominator tree construction and bubble
//! extraction with the options of a [`PipelineConfig`]. Once all three stages have
//! succeeded, the finished [`PipelineReport`] is handed to every registered
//! [`PipelineObserver`] in registration order. Observers are strictly post-processing:
//! they see immutable results and cannot influence the analysis.
//!
//! # Examples
//!
//! ```rust
//! use domibubble::{
//!     make_graph,
//!     pipeline::{Pipeline, PipelineConfig},
//! };
//!
//! let graph = make_graph(0..5, [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)])?;
//!
//! let mut pipeline = Pipeline::new(PipelineConfig::default());
//! let report = pipeline.run(&graph)?;
//! assert_eq!(report.bubble_keys(), vec![(3, 4)]);
//! assert_eq!(report.tree_edge_keys(), vec![(0, 1), (0, 2), (0, 3), (3, 4)]);
//! # Ok::<(), domibubble::Error>(())
//! ```

mod dot;

use std::{fmt, hash::Hash};

use log::debug;

use crate::{
    analysis::{find_bubbles, AcyclicGraph, Bubble, CycleBreaker, DominatorTreeBuilder},
    utils::graph::{algorithms::DominatorTree, IndexedGraph, NodeId},
    Error, Result,
};

pub use dot::{render_acyclic, render_graph, render_tree, DotDocuments, DotHandle, DotObserver};

/// Options for a [`Pipeline`] run.
///
/// The default configuration resolves the dominator tree root automatically, rejects
/// unreachable nodes, bounds cycle breaking by the input's edge count and hides the
/// synthetic super-root from tree edge listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig<K> {
    /// Explicit dominator tree root; `None` derives it from the natural entries
    pub entry: Option<K>,
    /// Exclude unreachable nodes instead of failing
    pub allow_unreachable: bool,
    /// Maximum number of cycle breaking passes; `None` uses the input's edge count
    pub pass_limit: Option<usize>,
    /// Keep edges leaving the synthetic super-root in [`PipelineReport::tree_edges`]
    pub include_super_root: bool,
}

impl<K> Default for PipelineConfig<K> {
    fn default() -> Self {
        Self {
            entry: None,
            allow_unreachable: false,
            pass_limit: None,
            include_super_root: false,
        }
    }
}

impl<K> PipelineConfig<K> {
    /// Creates a configuration that tolerates unreachable nodes.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            allow_unreachable: true,
            ..Self::default()
        }
    }

    /// Sets the explicit dominator tree root.
    #[must_use]
    pub fn with_entry(mut self, entry: K) -> Self {
        self.entry = Some(entry);
        self
    }
}

/// Post-processing hook invoked after a successful pipeline run.
pub trait PipelineObserver<K>: Send + Sync
where
    K: Hash + Eq + Clone,
{
    /// Name used in error messages and logs.
    fn name(&self) -> &'static str;

    /// Receives the finished results.
    ///
    /// # Errors
    ///
    /// An error aborts [`Pipeline::run`]; it is reported as [`Error::Observer`].
    fn on_complete(&mut self, input: &IndexedGraph<K>, report: &PipelineReport<K>) -> Result<()>;
}

/// Results of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport<K>
where
    K: Hash + Eq + Clone,
{
    acyclic: AcyclicGraph<K>,
    tree: DominatorTree,
    bubbles: Vec<Bubble>,
    include_super_root: bool,
}

impl<K> PipelineReport<K>
where
    K: Hash + Eq + Clone,
{
    /// Returns the acyclic graph produced by cycle breaking.
    #[must_use]
    pub fn acyclic(&self) -> &AcyclicGraph<K> {
        &self.acyclic
    }

    /// Returns the dominator tree.
    #[must_use]
    pub fn tree(&self) -> &DominatorTree {
        &self.tree
    }

    /// Returns the bubbles in topological order of their start node.
    #[must_use]
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// Returns whether tree edges from the synthetic super-root are reported.
    #[must_use]
    pub fn includes_super_root(&self) -> bool {
        self.include_super_root
    }

    /// Returns the dominator tree edges `(immediate dominator, node)`.
    ///
    /// Edges leaving a synthetic super-root are only present when the configuration
    /// asked for them.
    #[must_use]
    pub fn tree_edges(&self) -> Vec<(NodeId, NodeId)> {
        if self.include_super_root {
            self.tree.edges_with_super_root()
        } else {
            self.tree.edges()
        }
    }

    /// Returns the dominator tree edges as key pairs, super-root edges excluded.
    #[must_use]
    pub fn tree_edge_keys(&self) -> Vec<(K, K)> {
        self.key_pairs(self.tree.edges())
    }

    /// Returns the bubbles as `(start, end)` key pairs.
    #[must_use]
    pub fn bubble_keys(&self) -> Vec<(K, K)> {
        self.key_pairs(self.bubbles.iter().map(Bubble::as_pair))
    }

    /// Returns the keys of the nodes excluded from the tree as unreachable.
    #[must_use]
    pub fn unreachable_keys(&self) -> Vec<K> {
        self.acyclic
            .graph()
            .map_nodes_to_keys(self.tree.unreachable())
    }

    /// Consumes the report and returns its parts.
    #[must_use]
    pub fn into_parts(self) -> (AcyclicGraph<K>, DominatorTree, Vec<Bubble>) {
        (self.acyclic, self.tree, self.bubbles)
    }

    fn key_pairs(&self, pairs: impl IntoIterator<Item = (NodeId, NodeId)>) -> Vec<(K, K)> {
        pairs
            .into_iter()
            .filter_map(|(a, b)| {
                Some((
                    self.acyclic.get_key(a)?.clone(),
                    self.acyclic.get_key(b)?.clone(),
                ))
            })
            .collect()
    }
}

/// Runs cycle breaking, dominator tree construction and bubble extraction.
pub struct Pipeline<K>
where
    K: Hash + Eq + Clone,
{
    config: PipelineConfig<K>,
    observers: Vec<Box<dyn PipelineObserver<K>>>,
}

impl<K> Pipeline<K>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    /// Creates a pipeline without observers.
    #[must_use]
    pub fn new(config: PipelineConfig<K>) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Registers an observer; observers run in registration order.
    #[must_use]
    pub fn observe(mut self, observer: Box<dyn PipelineObserver<K>>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig<K> {
        &self.config
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Analyzes `graph`.
    ///
    /// # Errors
    ///
    /// Propagates the error of the first failing stage. Observers are only invoked
    /// after every stage succeeded; the first failing observer aborts the run with
    /// [`Error::Observer`].
    pub fn run(&mut self, graph: &IndexedGraph<K>) -> Result<PipelineReport<K>> {
        let breaker = match self.config.pass_limit {
            Some(limit) => CycleBreaker::new().with_pass_limit(limit),
            None => CycleBreaker::new(),
        };
        let acyclic = breaker.run(graph)?;

        let tree = DominatorTreeBuilder::new()
            .entry(self.config.entry.clone())
            .allow_unreachable(self.config.allow_unreachable)
            .build(&acyclic)?;

        let bubbles = find_bubbles(&acyclic, &tree);
        debug!(
            "pipeline finished: {} reversed edge(s), {} bubble(s)",
            acyclic.reversed_edges().len(),
            bubbles.len()
        );

        let report = PipelineReport {
            acyclic,
            tree,
            bubbles,
            include_super_root: self.config.include_super_root,
        };

        for observer in &mut self.observers {
            observer
                .on_complete(graph, &report)
                .map_err(|err| Error::Observer(format!("{}: {err}", observer.name())))?;
        }

        Ok(report)
    }
}
