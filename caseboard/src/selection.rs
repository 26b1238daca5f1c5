use crate::model::{EdgeId, NodeId};
use crate::render::EntityRef;
use std::collections::BTreeSet;

/// What the user has picked. A node and an edge are never selected together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Empty,
    Node(NodeId),
    Edge(EdgeId),
    /// Two or more nodes, from a marquee.
    Nodes(BTreeSet<NodeId>),
}

impl Selection {
    /// Normalises a node set: none is `Empty`, one is `Node`.
    pub fn from_nodes(nodes: BTreeSet<NodeId>) -> Self {
        let mut it = nodes.iter();
        match (it.next(), it.next()) {
            (None, _) => Selection::Empty,
            (Some(&only), None) => Selection::Node(only),
            _ => Selection::Nodes(nodes),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty)
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Selection::Nodes(_))
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        match self {
            Selection::Node(n) => *n == id,
            Selection::Nodes(set) => set.contains(&id),
            _ => false,
        }
    }

    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        match self {
            Selection::Node(n) => BTreeSet::from([*n]),
            Selection::Nodes(set) => set.clone(),
            _ => BTreeSet::new(),
        }
    }

    pub fn edge(&self) -> Option<EdgeId> {
        match self {
            Selection::Edge(e) => Some(*e),
            _ => None,
        }
    }

    pub fn entities(&self) -> BTreeSet<EntityRef> {
        match self {
            Selection::Empty => BTreeSet::new(),
            Selection::Edge(e) => BTreeSet::from([EntityRef::Edge(*e)]),
            _ => self.node_ids().into_iter().map(EntityRef::Node).collect(),
        }
    }

    /// Drops a removed entity from the selection.
    pub fn forget(&mut self, entity: EntityRef) {
        let next = match (&*self, entity) {
            (Selection::Node(n), EntityRef::Node(id)) if *n == id => Selection::Empty,
            (Selection::Edge(e), EntityRef::Edge(id)) if *e == id => Selection::Empty,
            (Selection::Nodes(set), EntityRef::Node(id)) if set.contains(&id) => {
                let mut rest = set.clone();
                rest.remove(&id);
                Selection::from_nodes(rest)
            }
            _ => return,
        };
        *self = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_sets_normalise() {
        assert_eq!(Selection::from_nodes(BTreeSet::new()), Selection::Empty);
        assert_eq!(Selection::from_nodes(BTreeSet::from([4])), Selection::Node(4));
        assert!(Selection::from_nodes(BTreeSet::from([4, 5])).is_multi());
    }

    #[test]
    fn forgetting_shrinks_multi_selection() {
        let mut s = Selection::from_nodes(BTreeSet::from([1, 2]));
        s.forget(EntityRef::Node(2));
        assert_eq!(s, Selection::Node(1));
        s.forget(EntityRef::Edge(1));
        assert_eq!(s, Selection::Node(1));
        s.forget(EntityRef::Node(1));
        assert!(s.is_empty());
    }
}
