//! Batches of node descriptions.

use crate::id::NodeId;
use crate::node::Node;

/// Tree-wide information carried by the first (or a complete) update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tree {
    /// The identity of the root node.
    pub root: NodeId,
}

impl Tree {
    /// Describe a tree rooted at `root`.
    pub fn new(root: NodeId) -> Self {
        Self { root }
    }
}

/// An ordered batch of new or changed nodes to merge into the live tree.
///
/// Nodes are kept in insertion order. Adding the same identity twice is
/// allowed here; the platform adapter rejects such an update when it is
/// pushed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeUpdate {
    /// `(identity, node)` pairs in insertion order.
    pub nodes: Vec<(NodeId, Node)>,
    /// Root information. Required on the first update an adapter sees.
    pub tree: Option<Tree>,
    /// The node that has keyboard focus, if it changed.
    pub focus: Option<NodeId>,
}

impl TreeUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an update that establishes a tree rooted at `root`.
    pub fn with_root(root: NodeId) -> Self {
        Self {
            tree: Some(Tree::new(root)),
            ..Self::default()
        }
    }

    /// Append a node under `id`, taking ownership of it.
    pub fn add(&mut self, id: NodeId, node: Node) {
        self.nodes.push((id, node));
    }

    /// Set the root of the tree.
    pub fn set_root(&mut self, root: NodeId) {
        self.tree = Some(Tree::new(root));
    }

    /// Set the focused node.
    pub fn set_focus(&mut self, focus: NodeId) {
        self.focus = Some(focus);
    }

    /// Number of nodes in the update.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the update carries no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node added to this update.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|(node_id, _)| *node_id == id)
            .map(|(_, node)| node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeBuilder;
    use crate::role::Role;

    #[test]
    fn test_insertion_order() {
        let mut update = TreeUpdate::with_root(NodeId::from(1u64));
        update.add(NodeId::from(3u64), NodeBuilder::new(Role::Button).build());
        update.add(NodeId::from(1u64), NodeBuilder::new(Role::Window).build());
        update.add(NodeId::from(2u64), NodeBuilder::new(Role::StaticText).build());

        let ids: Vec<_> = update.nodes.iter().map(|(id, _)| id.low()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(update.len(), 3);
        assert_eq!(update.tree, Some(Tree::new(NodeId::from(1u64))));
    }

    #[test]
    fn test_node_lookup() {
        let mut update = TreeUpdate::new();
        assert!(update.is_empty());
        update.add(NodeId::from(5u64), NodeBuilder::new(Role::Link).build());
        assert_eq!(
            update.node(NodeId::from(5u64)).map(Node::role),
            Some(Role::Link)
        );
        assert!(update.node(NodeId::from(6u64)).is_none());
    }
}
