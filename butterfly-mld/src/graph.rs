//! Base graph consumed by cell storage construction
//!
//! Construction only needs a handful of capabilities, expressed by
//! [`BaseGraph`]. [`StaticGraph`] is the CSR implementation used by the
//! `graph.csr` format and the tests.
//!
//! Edges are directed half-edges stored at their tail. A road segment
//! u→v traversable in one direction appears twice: at u with the forward
//! flag and at v with the backward flag.

use std::ops::Range;

use crate::types::{EdgeId, NodeId};

/// Edge may be traversed from its tail to its target
pub const FORWARD: u8 = 0b01;
/// Edge may be traversed from its target to its tail
pub const BACKWARD: u8 = 0b10;

/// Capabilities cell storage construction needs from a graph
pub trait BaseGraph {
    fn num_nodes(&self) -> usize;

    /// Outgoing edges of `node`
    fn edge_range(&self, node: NodeId) -> Range<EdgeId>;

    fn target(&self, edge: EdgeId) -> NodeId;

    fn is_forward(&self, edge: EdgeId) -> bool;

    fn is_backward(&self, edge: EdgeId) -> bool;
}

/// Edge handed to [`StaticGraph::from_edges`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InputEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub flags: u8,
}

/// Immutable CSR graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticGraph {
    pub offsets: Vec<u64>, // n_nodes + 1
    pub heads: Vec<NodeId>,
    pub flags: Vec<u8>,
}

impl StaticGraph {
    /// Build from unsorted edges. Every edge endpoint must be `< n_nodes`.
    pub fn from_edges(n_nodes: usize, mut edges: Vec<InputEdge>) -> Self {
        edges.sort_unstable();

        let mut offsets = vec![0u64; n_nodes + 1];
        for edge in &edges {
            offsets[edge.source as usize + 1] += 1;
        }
        for i in 0..n_nodes {
            offsets[i + 1] += offsets[i];
        }

        let heads = edges.iter().map(|e| e.target).collect();
        let flags = edges.iter().map(|e| e.flags).collect();

        Self {
            offsets,
            heads,
            flags,
        }
    }

    /// Build from one-way arcs: u→v becomes a forward edge at u and a
    /// backward edge at v.
    pub fn from_arcs(n_nodes: usize, arcs: &[(NodeId, NodeId)]) -> Self {
        let mut edges = Vec::with_capacity(arcs.len() * 2);
        for &(source, target) in arcs {
            edges.push(InputEdge {
                source,
                target,
                flags: FORWARD,
            });
            edges.push(InputEdge {
                source: target,
                target: source,
                flags: BACKWARD,
            });
        }
        Self::from_edges(n_nodes, edges)
    }

    pub fn num_edges(&self) -> usize {
        self.heads.len()
    }
}

impl BaseGraph for StaticGraph {
    fn num_nodes(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    #[inline]
    fn edge_range(&self, node: NodeId) -> Range<EdgeId> {
        let start = self.offsets[node as usize] as EdgeId;
        let end = self.offsets[node as usize + 1] as EdgeId;
        start..end
    }

    #[inline]
    fn target(&self, edge: EdgeId) -> NodeId {
        self.heads[edge as usize]
    }

    #[inline]
    fn is_forward(&self, edge: EdgeId) -> bool {
        self.flags[edge as usize] & FORWARD != 0
    }

    #[inline]
    fn is_backward(&self, edge: EdgeId) -> bool {
        self.flags[edge as usize] & BACKWARD != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_arcs_adds_reverse_edges() {
        let graph = StaticGraph::from_arcs(3, &[(0, 1), (1, 2)]);

        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_edges(), 4);
        assert_eq!(graph.offsets, vec![0, 1, 3, 4]);

        let e = graph.edge_range(0).start;
        assert_eq!(graph.target(e), 1);
        assert!(graph.is_forward(e));
        assert!(!graph.is_backward(e));

        // Node 1: backward edge to 0, forward edge to 2
        let edges: Vec<_> = graph
            .edge_range(1)
            .map(|e| (graph.target(e), graph.is_forward(e), graph.is_backward(e)))
            .collect();
        assert_eq!(edges, vec![(0, false, true), (2, true, false)]);
    }

    #[test]
    fn test_isolated_nodes_have_empty_ranges() {
        let graph = StaticGraph::from_arcs(4, &[(0, 3)]);
        assert!(graph.edge_range(1).is_empty());
        assert!(graph.edge_range(2).is_empty());
        assert_eq!(graph.edge_range(3).len(), 1);
    }

    #[test]
    fn test_two_way_edge() {
        let graph = StaticGraph::from_edges(
            2,
            vec![
                InputEdge {
                    source: 1,
                    target: 0,
                    flags: FORWARD | BACKWARD,
                },
                InputEdge {
                    source: 0,
                    target: 1,
                    flags: FORWARD | BACKWARD,
                },
            ],
        );
        for node in 0..2 {
            let e = graph.edge_range(node).start;
            assert!(graph.is_forward(e) && graph.is_backward(e));
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = StaticGraph::default();
        assert_eq!(graph.num_nodes(), 0);
        assert_eq!(graph.num_edges(), 0);
    }
}
