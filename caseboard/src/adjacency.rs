use crate::model::{Edge, EdgeId, NodeId};
use std::collections::{BTreeSet, HashMap};

static NO_EDGES: BTreeSet<EdgeId> = BTreeSet::new();

/// Node id -> ids of the edges touching it, as source or target.
///
/// Kept in step with every edge add/remove so geometry updates only visit
/// the moved node's degree. Nodes without edges have no entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyIndex {
    by_node: HashMap<NodeId, BTreeSet<EdgeId>>,
}

impl AdjacencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Self {
        let mut index = AdjacencyIndex::new();
        for e in edges {
            index.on_edge_added(e);
        }
        index
    }

    pub fn on_edge_added(&mut self, edge: &Edge) {
        self.by_node.entry(edge.source).or_default().insert(edge.id);
        self.by_node.entry(edge.target).or_default().insert(edge.id);
    }

    pub fn on_edge_removed(&mut self, edge: &Edge) {
        for node in [edge.source, edge.target] {
            if let Some(set) = self.by_node.get_mut(&node) {
                set.remove(&edge.id);
                if set.is_empty() {
                    self.by_node.remove(&node);
                }
            }
        }
    }

    pub fn edges_of(&self, node: NodeId) -> &BTreeSet<EdgeId> {
        self.by_node.get(&node).unwrap_or(&NO_EDGES)
    }

    /// Deduplicated union of `edges_of` over several nodes.
    pub fn edges_of_all<I>(&self, nodes: I) -> BTreeSet<EdgeId>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut out = BTreeSet::new();
        for n in nodes {
            out.extend(self.edges_of(n).iter().copied());
        }
        out
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.edges_of(node).len()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.by_node.contains_key(&node)
    }

    pub fn mentions_edge(&self, edge: EdgeId) -> bool {
        self.by_node.values().any(|s| s.contains(&edge))
    }

    pub fn clear(&mut self) {
        self.by_node.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    fn edge(id: EdgeId, source: NodeId, target: NodeId) -> Edge {
        Edge {
            id,
            source,
            target,
            label: String::new(),
            color: Color::EDGE,
            hidden: false,
        }
    }

    #[test]
    fn add_then_remove_leaves_no_entries() {
        let mut idx = AdjacencyIndex::new();
        let e1 = edge(1, 10, 20);
        let e2 = edge(2, 10, 30);
        idx.on_edge_added(&e1);
        idx.on_edge_added(&e2);
        assert_eq!(idx.degree(10), 2);
        assert_eq!(idx.edges_of(20).iter().copied().collect::<Vec<_>>(), vec![1]);
        idx.on_edge_removed(&e1);
        assert!(!idx.contains_node(20));
        assert_eq!(idx.degree(10), 1);
        idx.on_edge_removed(&e2);
        assert_eq!(idx, AdjacencyIndex::new());
    }

    #[test]
    fn union_is_deduplicated() {
        let edges = [edge(1, 1, 2), edge(2, 2, 3), edge(3, 3, 4)];
        let idx = AdjacencyIndex::rebuild(edges.iter());
        let all: Vec<_> = idx.edges_of_all([2, 3]).into_iter().collect();
        assert_eq!(all, vec![1, 2, 3]);
        assert!(idx.edges_of(99).is_empty());
    }
}
