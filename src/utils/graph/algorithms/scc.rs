//! Strongly Connected Components (SCC) using Tarjan's algorithm.
//!
//! A strongly connected component is a maximal set of vertices such that there is a
//! path from every vertex to every other vertex in the set. Besides the components,
//! the traversal reports what the cycle breaker needs to pick edges to reverse: the
//! discovery index of every node and the DFS back edges.
//!
//! The depth-first search runs on an explicit frame stack instead of native
//! recursion, so graph depth is bounded by heap memory only.

use crate::utils::graph::{NodeId, Successors};

/// Marker for nodes the traversal has not reached yet.
const UNVISITED: usize = usize::MAX;

/// Result of a Tarjan traversal.
///
/// Roots are visited in ascending `NodeId` order and successors in adjacency order,
/// so the decomposition of a given graph is fully deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SccDecomposition {
    /// Components in reverse topological order (sinks first).
    pub components: Vec<Vec<NodeId>>,
    /// Discovery index of each node, indexed by `NodeId`.
    pub discovery: Vec<usize>,
    /// Edges `(u, v)` whose target was on the active DFS path when the edge was
    /// examined, in the order they were found. Self-loops are never back edges.
    pub back_edges: Vec<(NodeId, NodeId)>,
}

impl SccDecomposition {
    /// Returns the components containing more than one node.
    pub fn nontrivial(&self) -> impl Iterator<Item = &[NodeId]> + '_ {
        self.components
            .iter()
            .filter(|scc| scc.len() > 1)
            .map(Vec::as_slice)
    }

    /// Returns `true` if the graph has no cycle other than self-loops.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        self.back_edges.is_empty()
    }

    /// Maps every node to the position of its component in [`components`](Self::components).
    #[must_use]
    pub fn component_map(&self) -> Vec<usize> {
        let mut map = vec![0; self.discovery.len()];
        for (scc_idx, scc) in self.components.iter().enumerate() {
            for &node in scc {
                map[node.index()] = scc_idx;
            }
        }
        map
    }
}

/// Runs Tarjan's algorithm over the whole graph.
///
/// # Complexity
///
/// - Time: O(V + E)
/// - Space: O(V + E); adjacency is materialized once so traversal frames only
///   carry a cursor
///
/// # Examples
///
/// ```rust
/// use domibubble::utils::graph::{algorithms::tarjan_scc, DirectedGraph, NodeId};
///
/// // 0 -> 1 -> 2 -> 1
/// let mut graph: DirectedGraph<()> = DirectedGraph::new();
/// let a = graph.add_node(());
/// let b = graph.add_node(());
/// let c = graph.add_node(());
/// graph.add_edge(a, b)?;
/// graph.add_edge(b, c)?;
/// graph.add_edge(c, b)?;
///
/// let scc = tarjan_scc(&graph);
/// assert_eq!(scc.nontrivial().count(), 1);
/// assert_eq!(scc.back_edges, vec![(c, b)]);
/// # Ok::<(), domibubble::Error>(())
/// ```
pub fn tarjan_scc<G>(graph: &G) -> SccDecomposition
where
    G: Successors,
{
    let node_count = graph.node_count();
    let adjacency: Vec<Vec<NodeId>> = graph
        .node_ids()
        .map(|node| graph.successors(node).collect())
        .collect();

    let mut state = TarjanState::new(node_count);
    for root in graph.node_ids() {
        if state.index[root.index()] == UNVISITED {
            state.strongconnect(&adjacency, root);
        }
    }

    SccDecomposition {
        components: state.sccs,
        discovery: state.index,
        back_edges: state.back_edges,
    }
}

/// Computes the strongly connected components of a directed graph.
///
/// The SCCs are returned in reverse topological order: if there is an edge from
/// SCC A to SCC B, then A appears after B in the result.
pub fn strongly_connected_components<G>(graph: &G) -> Vec<Vec<NodeId>>
where
    G: Successors,
{
    tarjan_scc(graph).components
}

/// A suspended DFS visit: the node and the next adjacency slot to examine.
struct Frame {
    node: NodeId,
    cursor: usize,
}

/// Mutable state of one Tarjan traversal.
struct TarjanState {
    /// Discovery index for each node (`UNVISITED` if not yet visited)
    index: Vec<usize>,
    /// Lowlink value for each node
    lowlink: Vec<usize>,
    /// Whether a node is currently on the component stack
    on_stack: Vec<bool>,
    /// Whether a node is an ancestor on the active DFS path
    on_path: Vec<bool>,
    /// The component stack
    stack: Vec<NodeId>,
    /// Current index counter
    current_index: usize,
    /// Collected SCCs
    sccs: Vec<Vec<NodeId>>,
    /// Collected back edges
    back_edges: Vec<(NodeId, NodeId)>,
}

impl TarjanState {
    fn new(n: usize) -> Self {
        Self {
            index: vec![UNVISITED; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            on_path: vec![false; n],
            stack: Vec::new(),
            current_index: 0,
            sccs: Vec::new(),
            back_edges: Vec::new(),
        }
    }

    fn discover(&mut self, v: NodeId) {
        let v_idx = v.index();
        self.index[v_idx] = self.current_index;
        self.lowlink[v_idx] = self.current_index;
        self.current_index += 1;
        self.stack.push(v);
        self.on_stack[v_idx] = true;
        self.on_path[v_idx] = true;
    }

    fn strongconnect(&mut self, adjacency: &[Vec<NodeId>], root: NodeId) {
        let mut frames = vec![Frame {
            node: root,
            cursor: 0,
        }];
        self.discover(root);

        while let Some(frame) = frames.last_mut() {
            let v = frame.node;
            let v_idx = v.index();

            if let Some(&w) = adjacency[v_idx].get(frame.cursor) {
                frame.cursor += 1;
                let w_idx = w.index();

                if self.index[w_idx] == UNVISITED {
                    self.discover(w);
                    frames.push(Frame { node: w, cursor: 0 });
                } else {
                    if self.on_path[w_idx] && w != v {
                        self.back_edges.push((v, w));
                    }
                    if self.on_stack[w_idx] {
                        self.lowlink[v_idx] = self.lowlink[v_idx].min(self.index[w_idx]);
                    }
                }
                continue;
            }

            // All successors of v examined: leave v and propagate its lowlink
            frames.pop();
            self.on_path[v_idx] = false;
            if let Some(parent) = frames.last() {
                let p_idx = parent.node.index();
                self.lowlink[p_idx] = self.lowlink[p_idx].min(self.lowlink[v_idx]);
            }

            if self.lowlink[v_idx] == self.index[v_idx] {
                let mut scc = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack[w.index()] = false;
                    scc.push(w);
                    if w == v {
                        break;
                    }
                }
                self.sccs.push(scc);
            }
        }
    }
}
