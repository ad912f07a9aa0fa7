//! Cycle breaking by back edge reversal.
//!
//! [`CycleBreaker`] turns an arbitrary [`IndexedGraph`] into an [`AcyclicGraph`] by
//! repeatedly reversing one DFS back edge per cyclic strongly connected component
//! until a topological order exists.
//!
//! # Pass Structure
//!
//! Each pass runs [`tarjan_scc`](algorithms::tarjan_scc) over the current graph. For
//! every component with more than one node, the back edge `(u, v)` maximizing
//! `index[u] + index[v]` is chosen, ties going to the smallest `(u, v)`. The first
//! occurrence of each chosen edge is removed and `(v, u)` is appended to the edge list.
//!
//! Reversing a back edge keeps the DFS tree and the discovery indices of the next
//! pass intact and turns the edge into a forward edge, so the number of back edges
//! strictly decreases. The pass limit therefore only trips on a defect or on a limit
//! configured below the number of back edges.

use std::hash::Hash;

use log::{debug, warn};

use crate::{
    utils::graph::{
        algorithms::{self, SccDecomposition},
        GraphBase, IndexedGraph, NodeId, Predecessors, Successors,
    },
    Error, Result,
};

/// An acyclic graph produced by [`CycleBreaker`].
///
/// Has the same node set (and `NodeId`s) and the same number of edges as the graph it
/// was derived from. A reversal may introduce a parallel edge; parallel edges are kept.
///
/// The topological order is computed once when the graph is created and reused by
/// every later analysis, so ranks are consistent across stages.
///
/// Only the cycle breaker can construct this type.
#[derive(Debug, Clone)]
pub struct AcyclicGraph<K>
where
    K: Hash + Eq + Clone,
{
    /// The rewritten graph
    graph: IndexedGraph<K>,
    /// Cached topological order
    order: Vec<NodeId>,
    /// Position of each node in `order`
    rank: Vec<usize>,
    /// Edges that were reversed, in their original orientation
    reversed: Vec<(NodeId, NodeId)>,
    /// Positions in the edge list of the edges added by reversal, ascending
    added: Vec<usize>,
    /// Number of reversal passes performed
    passes: usize,
}

impl<K> AcyclicGraph<K>
where
    K: Hash + Eq + Clone,
{
    fn new(
        graph: IndexedGraph<K>,
        order: Vec<NodeId>,
        reversed: Vec<(NodeId, NodeId)>,
        mut added: Vec<usize>,
        passes: usize,
    ) -> Self {
        added.sort_unstable();

        let mut rank = vec![0; order.len()];
        for (position, node) in order.iter().enumerate() {
            rank[node.index()] = position;
        }

        Self {
            graph,
            order,
            rank,
            reversed,
            added,
            passes,
        }
    }

    /// Returns the underlying keyed graph.
    #[must_use]
    pub fn graph(&self) -> &IndexedGraph<K> {
        &self.graph
    }

    /// Consumes the wrapper and returns the underlying keyed graph.
    #[must_use]
    pub fn into_inner(self) -> IndexedGraph<K> {
        self.graph
    }

    /// Returns the cached topological order.
    #[must_use]
    pub fn topological_order(&self) -> &[NodeId] {
        &self.order
    }

    /// Returns the cached topological order as keys.
    #[must_use]
    pub fn topological_order_keys(&self) -> Vec<K> {
        self.graph.map_nodes_to_keys(&self.order)
    }

    /// Returns the position of `node` in the topological order.
    #[must_use]
    pub fn rank(&self, node: NodeId) -> Option<usize> {
        self.rank.get(node.index()).copied()
    }

    /// Returns the edges that were reversed, in their original `(u, v)` orientation.
    ///
    /// Each entry corresponds to one appended `(v, u)` edge. An edge reversed in two
    /// different passes appears twice.
    #[must_use]
    pub fn reversed_edges(&self) -> &[(NodeId, NodeId)] {
        &self.reversed
    }

    /// Returns the positions, in [`edges`](Self::edges) order, of the edges added by
    /// reversal, ascending.
    ///
    /// An added edge that a later pass reversed again is replaced by its own reversal.
    #[must_use]
    pub fn reversal_positions(&self) -> &[usize] {
        &self.added
    }

    /// Returns the reversed edges as key pairs in their original orientation.
    #[must_use]
    pub fn reversed_edge_keys(&self) -> Vec<(K, K)> {
        self.reversed
            .iter()
            .filter_map(|&(u, v)| Some((self.get_key(u)?.clone(), self.get_key(v)?.clone())))
            .collect()
    }

    /// Returns the number of reversal passes needed to reach acyclicity.
    #[must_use]
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges, parallel edges included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns all edges in edge-list order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.graph.edges()
    }

    /// Returns all edges as key pairs in edge-list order.
    pub fn edge_keys(&self) -> impl Iterator<Item = (&K, &K)> + '_ {
        self.graph.edge_keys()
    }

    /// Returns the raw in-degree of a node; parallel edges and self-loops count.
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.graph.in_degree(node)
    }

    /// Returns the `NodeId` of a key.
    #[must_use]
    pub fn get_node_id(&self, key: &K) -> Option<NodeId> {
        self.graph.get_node_id(key)
    }

    /// Returns the key of a `NodeId`.
    #[must_use]
    pub fn get_key(&self, node: NodeId) -> Option<&K> {
        self.graph.get_key(node)
    }

    /// Returns the natural entries: nodes without predecessors other than themselves.
    pub fn entry_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.inner().entry_nodes()
    }
}

impl<K> GraphBase for AcyclicGraph<K>
where
    K: Hash + Eq + Clone,
{
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        self.graph.node_ids()
    }
}

impl<K> Successors for AcyclicGraph<K>
where
    K: Hash + Eq + Clone,
{
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.successors(node)
    }
}

impl<K> Predecessors for AcyclicGraph<K>
where
    K: Hash + Eq + Clone,
{
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.predecessors(node)
    }
}

/// Reverses back edges until a graph becomes acyclic.
///
/// # Examples
///
/// ```rust
/// use domibubble::{analysis::CycleBreaker, make_graph};
///
/// // 0 -> 1 -> 2 -> 1, 2 -> 3
/// let graph = make_graph([0, 1, 2, 3], [(0, 1), (1, 2), (2, 1), (2, 3)])?;
/// let acyclic = CycleBreaker::new().run(&graph)?;
///
/// assert_eq!(acyclic.reversed_edge_keys(), vec![(2, 1)]);
/// assert_eq!(acyclic.edge_count(), 4);
/// assert_eq!(acyclic.topological_order_keys(), vec![0, 1, 2, 3]);
/// # Ok::<(), domibubble::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleBreaker {
    pass_limit: Option<usize>,
}

impl CycleBreaker {
    /// Creates a cycle breaker whose pass limit is the input's edge count.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the maximum number of reversal passes.
    #[must_use]
    pub fn with_pass_limit(mut self, limit: usize) -> Self {
        self.pass_limit = Some(limit);
        self
    }

    /// Produces an acyclic version of `graph`.
    ///
    /// An acyclic input (self-loops are not cycles) is returned unchanged after zero
    /// passes, which makes the operation idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleBreakingFailure`] if the graph is still cyclic after the
    /// pass limit.
    pub fn run<K>(&self, graph: &IndexedGraph<K>) -> Result<AcyclicGraph<K>>
    where
        K: Hash + Eq + Clone,
    {
        let limit = self.pass_limit.unwrap_or(graph.edge_count());
        let mut current = graph.clone();
        let mut reversed = Vec::new();
        let mut added: Vec<usize> = Vec::new();
        let mut passes = 0;

        loop {
            if let Some(order) = algorithms::topological_sort(&current) {
                debug!(
                    "graph acyclic after {passes} pass(es), {} edge(s) reversed",
                    reversed.len()
                );
                return Ok(AcyclicGraph::new(current, order, reversed, added, passes));
            }

            let scc = algorithms::tarjan_scc(&current);
            if passes >= limit {
                let remaining_cycles = scc.nontrivial().count();
                warn!(
                    "cycle breaking gave up after {passes} pass(es) with {remaining_cycles} cyclic component(s) left"
                );
                return Err(Error::CycleBreakingFailure {
                    passes,
                    remaining_cycles,
                });
            }

            let chosen = select_reversals(&scc);
            let mut edges: Vec<(NodeId, NodeId)> = current.edges().collect();
            for &(u, v) in &chosen {
                debug!("pass {}: reversing back edge {u} -> {v}", passes + 1);
                if let Some(position) = edges.iter().position(|&edge| edge == (u, v)) {
                    edges.remove(position);
                    added.retain(|&p| p != position);
                    for p in &mut added {
                        if *p > position {
                            *p -= 1;
                        }
                    }
                }
                added.push(edges.len());
                edges.push((v, u));
            }

            current = current.with_edges(edges)?;
            reversed.extend(chosen);
            passes += 1;
        }
    }
}

/// Picks one back edge per cyclic component.
///
/// The result is ordered like the components of `scc`.
fn select_reversals(scc: &SccDecomposition) -> Vec<(NodeId, NodeId)> {
    let component = scc.component_map();
    let mut best: Vec<Option<(NodeId, NodeId)>> = vec![None; scc.components.len()];

    let score = |(u, v): (NodeId, NodeId)| scc.discovery[u.index()] + scc.discovery[v.index()];

    for &edge in &scc.back_edges {
        let slot = &mut best[component[edge.0.index()]];
        let replace = match *slot {
            None => true,
            Some(current) => {
                let (candidate_score, current_score) = (score(edge), score(current));
                candidate_score > current_score
                    || (candidate_score == current_score && edge < current)
            }
        };
        if replace {
            *slot = Some(edge);
        }
    }

    best.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_graph;

    fn ids<K: Hash + Eq + Clone>(graph: &AcyclicGraph<K>, edges: &[(K, K)]) -> Vec<(NodeId, NodeId)> {
        edges
            .iter()
            .map(|(u, v)| (graph.get_node_id(u).unwrap(), graph.get_node_id(v).unwrap()))
            .collect()
    }

    #[test]
    fn test_acyclic_input_is_unchanged() {
        let graph = make_graph([0, 1, 2, 3], [(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap();
        let acyclic = CycleBreaker::new().run(&graph).unwrap();

        assert_eq!(acyclic.passes(), 0);
        assert!(acyclic.reversed_edges().is_empty());
        assert_eq!(
            acyclic.edges().collect::<Vec<_>>(),
            graph.edges().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_self_loop_is_not_a_cycle() {
        let graph = make_graph([0, 1], [(0, 0), (0, 1), (1, 1)]).unwrap();
        let acyclic = CycleBreaker::new().run(&graph).unwrap();

        assert_eq!(acyclic.passes(), 0);
        assert_eq!(acyclic.edge_count(), 3);
    }

    #[test]
    fn test_two_node_cycle_appends_reversed_edge() {
        let graph = make_graph([0, 1, 2, 3], [(0, 1), (1, 2), (2, 1), (2, 3)]).unwrap();
        let acyclic = CycleBreaker::new().run(&graph).unwrap();

        assert_eq!(acyclic.passes(), 1);
        assert_eq!(acyclic.reversed_edges(), ids(&acyclic, &[(2, 1)]).as_slice());
        let edges: Vec<(i32, i32)> = acyclic.edge_keys().map(|(u, v)| (*u, *v)).collect();
        assert_eq!(edges, vec![(0, 1), (1, 2), (2, 3), (1, 2)]);
        assert_eq!(acyclic.reversal_positions(), &[3]);
        assert_eq!(acyclic.in_degree(acyclic.get_node_id(&2).unwrap()), 2);
    }

    #[test]
    fn test_reversal_positions_follow_removals() {
        let graph = make_graph(
            [0, 1, 2, 3, 4, 5, 6],
            [(0, 1), (1, 2), (2, 1), (2, 3), (3, 4), (4, 5), (5, 6), (6, 4)],
        )
        .unwrap();
        let acyclic = CycleBreaker::new().run(&graph).unwrap();
        let edges: Vec<(NodeId, NodeId)> = acyclic.edges().collect();

        assert_eq!(acyclic.passes(), 1);
        assert_eq!(acyclic.reversal_positions().len(), 2);
        for &position in acyclic.reversal_positions() {
            let (v, u) = edges[position];
            assert!(acyclic.reversed_edges().contains(&(u, v)));
        }
        assert_eq!(acyclic.reversal_positions(), &[6, 7]);
    }

    #[test]
    fn test_complete_digraph_positions_stay_valid() {
        let graph = make_graph([0, 1, 2], [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)]).unwrap();
        let acyclic = CycleBreaker::new().run(&graph).unwrap();
        let edges: Vec<(NodeId, NodeId)> = acyclic.edges().collect();

        assert!(acyclic.reversal_positions().len() <= acyclic.reversed_edges().len());
        assert!(acyclic
            .reversal_positions()
            .iter()
            .all(|&position| position < edges.len()));
        assert!(acyclic.reversal_positions().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_loop_reverses_latest_back_edge() {
        let graph = make_graph(
            0..=10,
            [
                (0, 1),
                (1, 2),
                (2, 3),
                (3, 4),
                (4, 5),
                (2, 5),
                (5, 6),
                (6, 7),
                (7, 8),
                (8, 9),
                (9, 6),
                (9, 10),
            ],
        )
        .unwrap();
        let acyclic = CycleBreaker::new().run(&graph).unwrap();

        assert_eq!(acyclic.reversed_edge_keys(), vec![(9, 6)]);
        assert_eq!(acyclic.topological_order_keys(), (0..=10).collect::<Vec<_>>());
        assert_eq!(acyclic.rank(acyclic.get_node_id(&10).unwrap()), Some(10));
    }

    #[test]
    fn test_independent_cycles_broken_in_one_pass() {
        // {0,1} and {2,3} are separate components
        let graph = make_graph([0, 1, 2, 3], [(0, 1), (1, 0), (1, 2), (2, 3), (3, 2)]).unwrap();
        let acyclic = CycleBreaker::new().run(&graph).unwrap();

        assert_eq!(acyclic.passes(), 1);
        assert_eq!(acyclic.reversed_edges().len(), 2);
        assert_eq!(acyclic.edge_count(), 5);
    }

    #[test]
    fn test_complete_digraph_terminates() {
        let graph = make_graph(
            [0, 1, 2],
            [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)],
        )
        .unwrap();
        let acyclic = CycleBreaker::new().run(&graph).unwrap();

        assert_eq!(acyclic.passes(), 3);
        assert_eq!(acyclic.reversed_edge_keys(), vec![(2, 1), (2, 0), (1, 0)]);
        assert_eq!(acyclic.edge_count(), 6);
        assert!(algorithms::topological_sort(&acyclic).is_some());
    }

    #[test]
    fn test_pass_limit_exceeded() {
        let graph = make_graph([0, 1], [(0, 1), (1, 0)]).unwrap();
        let err = CycleBreaker::new().with_pass_limit(0).run(&graph).unwrap_err();

        assert_eq!(
            err,
            Error::CycleBreakingFailure {
                passes: 0,
                remaining_cycles: 1,
            }
        );
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let graph = make_graph([0, 1, 2], [(0, 1), (1, 2), (2, 0)]).unwrap();
        let first = CycleBreaker::new().run(&graph).unwrap();
        let second = CycleBreaker::new().run(first.graph()).unwrap();

        assert_eq!(second.passes(), 0);
        assert_eq!(
            second.edges().collect::<Vec<_>>(),
            first.edges().collect::<Vec<_>>()
        );
        assert_eq!(second.topological_order(), first.topological_order());
    }

    #[test]
    fn test_long_cycle_does_not_overflow() {
        let n = 10_000;
        let mut edges: Vec<(usize, usize)> = (0..n - 1).map(|i| (i, i + 1)).collect();
        edges.push((n - 1, 0));
        let graph = make_graph(0..n, edges).unwrap();
        let acyclic = CycleBreaker::new().run(&graph).unwrap();

        assert_eq!(acyclic.passes(), 1);
        assert_eq!(acyclic.reversed_edge_keys(), vec![(n - 1, 0)]);
        assert_eq!(acyclic.topological_order().len(), n);
    }
}
