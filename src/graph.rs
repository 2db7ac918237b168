//! Undirected adjacency-set graph.
//!
//! Nodes are kept in insertion order and each node owns a sorted set of its
//! neighbors. Edges are stored symmetrically, so there are no multi-edges.
//! Self-loops and same-kind edges are accepted; the graph does not police
//! what callers connect.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::node::{NodeId, NodeKind};

static NO_NEIGHBORS: BTreeSet<NodeId> = BTreeSet::new();

/// Adjacency-set undirected graph over [`NodeId`]s.
///
/// # Examples
///
/// ```
/// use pubgraph::Graph;
///
/// let mut graph = Graph::new();
/// graph.add_edge("person:p1", "pub:pb1");
/// assert!(graph.neighbors("pub:pb1").iter().any(|n| n.as_str() == "person:p1"));
/// assert!(graph.neighbors("person:unknown").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: HashMap<NodeId, BTreeSet<NodeId>>,
    order: Vec<NodeId>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node if absent. Returns true if the node is new.
    pub fn add_node(&mut self, id: impl Into<NodeId>) -> bool {
        let id = id.into();
        if self.adjacency.contains_key(id.as_str()) {
            return false;
        }
        self.order.push(id.clone());
        self.adjacency.insert(id, BTreeSet::new());
        true
    }

    /// Connects `a` and `b`, creating either endpoint if needed.
    ///
    /// Returns true if the edge is new.
    pub fn add_edge(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> bool {
        let a = a.into();
        let b = b.into();
        self.add_node(a.clone());
        self.add_node(b.clone());

        let inserted = self
            .adjacency
            .get_mut(a.as_str())
            .is_some_and(|set| set.insert(b.clone()));
        if let Some(set) = self.adjacency.get_mut(b.as_str()) {
            set.insert(a);
        }
        inserted
    }

    /// Neighbors of `id`; empty for an unknown node.
    #[must_use]
    pub fn neighbors(&self, id: &str) -> &BTreeSet<NodeId> {
        self.adjacency.get(id).unwrap_or(&NO_NEIGHBORS)
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.order.iter()
    }

    /// Nodes of one kind, in insertion order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &NodeId> + '_ {
        self.order.iter().filter(move |id| id.kind() == Some(kind))
    }

    /// Returns true if `id` is a node.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Number of undirected edges. A self-loop counts once.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        let (loops, ends) = self
            .adjacency
            .iter()
            .fold((0, 0), |(loops, ends), (id, set)| {
                let is_loop = usize::from(set.contains(id.as_str()));
                (loops + is_loop, ends + set.len() - is_loop)
            });
        loops + ends / 2
    }

    /// Number of distinct neighbors of `id`.
    #[must_use]
    pub fn degree(&self, id: &str) -> usize {
        self.neighbors(id).len()
    }

    /// Each undirected edge once, as `(lower, higher)` endpoints.
    ///
    /// Edges are listed in node enumeration order, then neighbor order.
    #[must_use]
    pub fn edges(&self) -> Vec<(&NodeId, &NodeId)> {
        let mut out = Vec::new();
        for node in &self.order {
            for neighbor in self.neighbors(node.as_str()) {
                if node <= neighbor {
                    out.push((node, neighbor));
                }
            }
        }
        out
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph:")?;
        for node in &self.order {
            let neighbors: Vec<&str> = self.neighbors(node.as_str()).iter().map(NodeId::as_str).collect();
            writeln!(f, "  {node} -> [{}]", neighbors.join(", "))?;
        }
        Ok(())
    }
}
