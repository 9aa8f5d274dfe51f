//! Labeled directed multigraphs with a cross-graph mating relation.
//!
//! The engine works on two graphs of the same shape: the netlist graph
//! (one node per logic instance) and the device graph (one node per
//! physical site). A node's label is an opaque category tag — two nodes
//! are placement-compatible iff their labels are equal — and a placement
//! is a partial bijection between the two graphs, stored as reciprocal
//! `mate` IDs.
//!
//! Nodes and edges are created up front and never removed; only the mate
//! relation mutates during placement. The per-label indexes are built on
//! demand (the engine builds them once, before the anneal loop) and are
//! deliberately *not* kept consistent across later mate mutations.

use crate::ids::{EdgeId, NodeId, PortId};
use serde::{Deserialize, Serialize};
use weft_common::Arena;

/// A node in a netlist or device graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Opaque category tag; placement may only mate equal labels.
    pub label: u32,
    /// The node's partner in the companion graph, if currently placed.
    pub mate: Option<NodeId>,
    /// Outgoing edges, in insertion order.
    pub out_edges: Vec<EdgeId>,
}

/// A directed edge feeding a specific input port of its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// The driving node.
    pub src: NodeId,
    /// The receiving node.
    pub dst: NodeId,
    /// Which input pin of `dst` this edge feeds.
    pub port: PortId,
}

/// A labeled directed multigraph with a mating relation to a companion graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    nodes: Arena<NodeId, Node>,
    edges: Arena<EdgeId, Edge>,
    /// Per-label node counts; valid only after [`count_labels`](Self::count_labels).
    #[serde(skip)]
    label_counts: Vec<u32>,
    /// Per-label node lists; valid only after
    /// [`index_nodes_by_label`](Self::index_nodes_by_label).
    #[serde(skip)]
    nodes_by_label: Vec<Vec<NodeId>>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unmated node with the given label and returns its ID.
    pub fn add_node(&mut self, label: u32) -> NodeId {
        self.nodes.alloc(Node {
            label,
            mate: None,
            out_edges: Vec::new(),
        })
    }

    /// Adds an edge from `src` to `dst` feeding input `port` of `dst`.
    ///
    /// Parallel edges are allowed; the graph is a multigraph.
    ///
    /// # Panics
    ///
    /// Panics if `src` or `dst` is not a node of this graph.
    pub fn add_edge(&mut self, src: NodeId, dst: NodeId, port: PortId) -> EdgeId {
        // Touch dst so a bad ID fails here rather than during cost scans.
        let _ = self.nodes.get(dst);
        let id = self.edges.alloc(Edge { src, dst, port });
        self.nodes.get_mut(src).out_edges.push(id);
        id
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the node with the given ID.
    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes.get(id)
    }

    /// Returns the edge with the given ID.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        self.edges.get(id)
    }

    /// Iterates over `(NodeId, &Node)` pairs in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Iterates over all node IDs in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.ids()
    }

    /// Iterates over `(EdgeId, &Edge)` pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter()
    }

    /// Returns the outgoing edges of `node`, in insertion order.
    pub fn out_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.nodes.get(node).out_edges
    }

    /// Returns `node`'s mate in the companion graph, if any.
    pub fn mate_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).mate
    }

    /// Mates `a` in this graph with `b` in the companion graph.
    ///
    /// Any prior mate of `a` (in `other`) and any prior mate of `b` (in
    /// this graph) are detached first, so the relation stays a partial
    /// bijection; the reciprocal update is atomic from the caller's view.
    pub fn mate(&mut self, a: NodeId, other: &mut Graph, b: NodeId) {
        if let Some(prev) = self.nodes.get_mut(a).mate.take() {
            other.nodes.get_mut(prev).mate = None;
        }
        if let Some(prev) = other.nodes.get_mut(b).mate.take() {
            self.nodes.get_mut(prev).mate = None;
        }
        self.nodes.get_mut(a).mate = Some(b);
        other.nodes.get_mut(b).mate = Some(a);
    }

    /// Detaches `a` and its mate symmetrically. No-op if `a` is unmated.
    pub fn unmate(&mut self, a: NodeId, other: &mut Graph) {
        if let Some(m) = self.nodes.get_mut(a).mate.take() {
            other.nodes.get_mut(m).mate = None;
        }
    }

    /// Returns the maximum label across all nodes (0 for an empty graph).
    pub fn max_label(&self) -> u32 {
        self.nodes.values().map(|n| n.label).max().unwrap_or(0)
    }

    /// Populates the per-label node counters.
    pub fn count_labels(&mut self) {
        let mut counts = vec![0u32; self.max_label() as usize + 1];
        for node in self.nodes.values() {
            counts[node.label as usize] += 1;
        }
        self.label_counts = counts;
    }

    /// Returns the number of nodes with the given label.
    ///
    /// Reflects the state as of the last [`count_labels`](Self::count_labels)
    /// call; 0 for any label not seen then.
    pub fn num_nodes_with_label(&self, label: u32) -> u32 {
        self.label_counts.get(label as usize).copied().unwrap_or(0)
    }

    /// Populates the per-label node lists used for `(label, index)` access.
    pub fn index_nodes_by_label(&mut self) {
        let mut index: Vec<Vec<NodeId>> = vec![Vec::new(); self.max_label() as usize + 1];
        for (id, node) in self.nodes.iter() {
            index[node.label as usize].push(id);
        }
        self.nodes_by_label = index;
    }

    /// Returns the nodes with the given label, in insertion order.
    ///
    /// Empty until [`index_nodes_by_label`](Self::index_nodes_by_label) has
    /// been called.
    pub fn nodes_with_label(&self, label: u32) -> &[NodeId] {
        self.nodes_by_label
            .get(label as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the `i`-th node with the given label.
    ///
    /// # Panics
    ///
    /// Panics if the by-label index has not been built or `i` is out of
    /// range for the label.
    pub fn node_by_label_and_index(&self, label: u32, i: usize) -> NodeId {
        self.nodes_by_label[label as usize][i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(p: u32) -> PortId {
        PortId::from_raw(p)
    }

    #[test]
    fn add_nodes_and_edges() {
        let mut g = Graph::new();
        let a = g.add_node(0);
        let b = g.add_node(1);
        let e = g.add_edge(a, b, port(2));

        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.out_edges(a), &[e]);
        assert!(g.out_edges(b).is_empty());
        assert_eq!(g.edge(e).src, a);
        assert_eq!(g.edge(e).dst, b);
        assert_eq!(g.edge(e).port, port(2));
    }

    #[test]
    fn parallel_edges_are_kept() {
        let mut g = Graph::new();
        let a = g.add_node(0);
        let b = g.add_node(0);
        g.add_edge(a, b, port(0));
        g.add_edge(a, b, port(0));
        g.add_edge(a, b, port(1));
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.out_edges(a).len(), 3);
    }

    #[test]
    fn mate_is_symmetric() {
        let mut net = Graph::new();
        let mut dev = Graph::new();
        let n = net.add_node(0);
        let d = dev.add_node(0);

        net.mate(n, &mut dev, d);
        assert_eq!(net.mate_of(n), Some(d));
        assert_eq!(dev.mate_of(d), Some(n));
    }

    #[test]
    fn remating_breaks_old_pair_on_both_sides() {
        let mut net = Graph::new();
        let mut dev = Graph::new();
        let n0 = net.add_node(0);
        let n1 = net.add_node(0);
        let d0 = dev.add_node(0);
        let d1 = dev.add_node(0);

        net.mate(n0, &mut dev, d0);
        net.mate(n1, &mut dev, d1);

        // Steal d1 for n0: both old pairs must dissolve cleanly.
        net.mate(n0, &mut dev, d1);
        assert_eq!(net.mate_of(n0), Some(d1));
        assert_eq!(dev.mate_of(d1), Some(n0));
        assert_eq!(net.mate_of(n1), None);
        assert_eq!(dev.mate_of(d0), None);
    }

    #[test]
    fn unmate_detaches_both_sides() {
        let mut net = Graph::new();
        let mut dev = Graph::new();
        let n = net.add_node(3);
        let d = dev.add_node(3);

        net.mate(n, &mut dev, d);
        net.unmate(n, &mut dev);
        assert_eq!(net.mate_of(n), None);
        assert_eq!(dev.mate_of(d), None);

        // Unmating an unmated node is a no-op.
        net.unmate(n, &mut dev);
        assert_eq!(net.mate_of(n), None);
    }

    #[test]
    fn max_label() {
        let mut g = Graph::new();
        assert_eq!(g.max_label(), 0);
        g.add_node(2);
        g.add_node(7);
        g.add_node(1);
        assert_eq!(g.max_label(), 7);
    }

    #[test]
    fn label_counts() {
        let mut g = Graph::new();
        g.add_node(0);
        g.add_node(2);
        g.add_node(2);
        g.count_labels();
        assert_eq!(g.num_nodes_with_label(0), 1);
        assert_eq!(g.num_nodes_with_label(1), 0);
        assert_eq!(g.num_nodes_with_label(2), 2);
        assert_eq!(g.num_nodes_with_label(99), 0);
    }

    #[test]
    fn by_label_index() {
        let mut g = Graph::new();
        let a = g.add_node(1);
        let b = g.add_node(0);
        let c = g.add_node(1);

        assert!(g.nodes_with_label(1).is_empty());
        g.index_nodes_by_label();
        assert_eq!(g.nodes_with_label(0), &[b]);
        assert_eq!(g.nodes_with_label(1), &[a, c]);
        assert_eq!(g.node_by_label_and_index(1, 0), a);
        assert_eq!(g.node_by_label_and_index(1, 1), c);
        assert!(g.nodes_with_label(5).is_empty());
    }

    #[test]
    fn indexes_are_not_tracked_after_mutation() {
        let mut g = Graph::new();
        g.add_node(0);
        g.count_labels();
        g.add_node(0);
        // Stale until rebuilt, by design.
        assert_eq!(g.num_nodes_with_label(0), 1);
        g.count_labels();
        assert_eq!(g.num_nodes_with_label(0), 2);
    }

    #[test]
    fn serde_roundtrip_preserves_mates() {
        let mut net = Graph::new();
        let mut dev = Graph::new();
        let n0 = net.add_node(0);
        let n1 = net.add_node(1);
        net.add_edge(n0, n1, port(4));
        let d0 = dev.add_node(0);
        net.mate(n0, &mut dev, d0);

        let json = serde_json::to_string(&net).unwrap();
        let restored: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.node_count(), 2);
        assert_eq!(restored.edge_count(), 1);
        assert_eq!(restored.mate_of(n0), Some(d0));
        assert_eq!(restored.edge(EdgeId::from_raw(0)).port, port(4));
        // Derived indexes are not serialized; rebuild before use.
        assert!(restored.nodes_with_label(0).is_empty());
    }
}
