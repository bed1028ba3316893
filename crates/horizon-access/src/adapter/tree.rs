//! The live accessibility tree held by the platform adapter.

use std::collections::{HashMap, HashSet};
use std::ops::Deref;

use horizon_access_core::logging::targets;
use horizon_access_core::{Node, NodeId, TreeUpdate};

use crate::bridge::ViewIdMap;
use crate::error::{AdapterError, AdapterResult};

/// How a traversal treats a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// The node is visible to the platform.
    Include,
    /// The node is skipped but its children are hoisted into its place.
    ExcludeNode,
    /// The node and its whole subtree are skipped.
    ExcludeSubtree,
}

/// Summary of a successfully applied update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeChanges {
    /// Nodes that were added or replaced.
    pub updated: usize,
    /// Nodes removed because they are no longer reachable from the root.
    pub removed: usize,
}

/// The current state of the accessibility tree.
///
/// Every node in a `LiveTree` is reachable from the root and owns a virtual
/// view id.
#[derive(Debug, Clone)]
pub struct LiveTree {
    nodes: HashMap<NodeId, Node>,
    parents: HashMap<NodeId, NodeId>,
    root: NodeId,
    focus: Option<NodeId>,
    view_ids: ViewIdMap,
}

impl LiveTree {
    /// Build a tree from its initial update, which must name a root.
    pub(crate) fn new(update: TreeUpdate, first_view_id: i32) -> AdapterResult<Self> {
        let root = update.tree.ok_or(AdapterError::MissingRoot)?.root;
        let mut tree = Self {
            nodes: HashMap::new(),
            parents: HashMap::new(),
            root,
            focus: None,
            view_ids: ViewIdMap::new(first_view_id),
        };
        tree.apply(update)?;
        Ok(tree)
    }

    /// Validate `update` against the current state, then merge it.
    ///
    /// Nothing is modified unless validation succeeds.
    pub(crate) fn apply(&mut self, update: TreeUpdate) -> AdapterResult<TreeChanges> {
        self.validate(&update)?;

        let TreeUpdate { nodes, tree, focus } = update;
        let updated = nodes.len();
        self.nodes.extend(nodes);
        if let Some(tree) = tree {
            self.root = tree.root;
        }
        if focus.is_some() {
            self.focus = focus;
        }

        let removed = self.rebuild_structure();
        if let Some(focus) = self.focus
            && !self.nodes.contains_key(&focus)
        {
            tracing::debug!(target: targets::ADAPTER, %focus, "focused node left the tree");
            self.focus = None;
        }
        Ok(TreeChanges { updated, removed })
    }

    fn validate(&self, update: &TreeUpdate) -> AdapterResult<()> {
        let mut incoming = HashSet::with_capacity(update.nodes.len());
        for (id, _) in &update.nodes {
            if !incoming.insert(*id) {
                return Err(AdapterError::DuplicateNode(*id));
            }
        }
        let exists = |id: &NodeId| incoming.contains(id) || self.nodes.contains_key(id);

        let root = update.tree.map_or(self.root, |tree| tree.root);
        if !exists(&root) {
            return Err(AdapterError::MissingNode(root));
        }
        for (_, node) in &update.nodes {
            if let Some(child) = node.children().iter().find(|child| !exists(child)) {
                return Err(AdapterError::MissingNode(*child));
            }
        }
        if let Some(focus) = update.focus
            && !exists(&focus)
        {
            return Err(AdapterError::MissingNode(focus));
        }
        Ok(())
    }

    /// Recompute parent links from the root, drop unreachable nodes and
    /// assign view ids to new ones. Returns the number of nodes removed.
    fn rebuild_structure(&mut self) -> usize {
        let mut parents = HashMap::with_capacity(self.nodes.len());
        let mut reachable = HashSet::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        reachable.insert(self.root);

        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            for &child in node.children() {
                // A node listed under two parents keeps the first one seen.
                if reachable.insert(child) {
                    parents.insert(child, id);
                    stack.push(child);
                }
            }
        }

        let before = self.nodes.len();
        let view_ids = &mut self.view_ids;
        self.nodes.retain(|id, _| {
            let keep = reachable.contains(id);
            if !keep {
                view_ids.release(*id);
            }
            keep
        });
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        // Deterministic assignment order for new nodes.
        ids.sort_unstable();
        for id in ids {
            self.view_ids.assign(id);
        }
        self.parents = parents;
        before - self.nodes.len()
    }

    /// Identity of the root node.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The root node.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.root,
            node: &self.nodes[&self.root],
        }
    }

    /// The focused node, if any.
    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    /// Look up a node by identity.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.nodes.get_key_value(&id).map(|(&id, node)| NodeRef {
            tree: self,
            id,
            node,
        })
    }

    /// Look up a node by its virtual view id.
    pub fn node_by_view_id(&self, view_id: i32) -> Option<NodeRef<'_>> {
        self.view_ids
            .node_id(view_id)
            .and_then(|id| self.node(id))
    }

    /// The virtual view id assigned to `id`.
    pub fn view_id(&self, id: NodeId) -> Option<i32> {
        self.view_ids.view_id(id)
    }

    /// Whether a node with this identity is in the tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a live tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A node in a [`LiveTree`] together with its position in the tree.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a LiveTree,
    id: NodeId,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    /// The node's identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's data.
    pub fn data(&self) -> &'a Node {
        self.node
    }

    /// The virtual view id assigned to the node.
    pub fn view_id(&self) -> i32 {
        // Every live node is assigned an id by `rebuild_structure`.
        self.tree
            .view_id(self.id)
            .unwrap_or(crate::bridge::HOST_VIEW_ID)
    }

    /// Whether this is the root node.
    pub fn is_root(&self) -> bool {
        self.id == self.tree.root
    }

    /// Whether this node has keyboard focus.
    pub fn is_focused(&self) -> bool {
        self.tree.focus == Some(self.id)
    }

    /// The direct parent, `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let parent = *self.tree.parents.get(&self.id)?;
        self.tree.node(parent)
    }

    /// Direct children in order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.node
            .children()
            .iter()
            .filter_map(move |&child| tree.node(child))
    }

    /// Children as seen through `filter`: excluded nodes are replaced by
    /// their own filtered children and excluded subtrees are dropped.
    pub fn filtered_children(
        &self,
        filter: &impl Fn(&NodeRef<'_>) -> FilterResult,
    ) -> Vec<NodeRef<'a>> {
        let mut result = Vec::new();
        self.collect_filtered_children(filter, &mut result);
        result
    }

    fn collect_filtered_children(
        &self,
        filter: &impl Fn(&NodeRef<'_>) -> FilterResult,
        out: &mut Vec<NodeRef<'a>>,
    ) {
        for child in self.children() {
            match filter(&child) {
                FilterResult::Include => out.push(child),
                FilterResult::ExcludeNode => child.collect_filtered_children(filter, out),
                FilterResult::ExcludeSubtree => {}
            }
        }
    }

    /// The nearest ancestor that `filter` includes.
    pub fn filtered_parent(
        &self,
        filter: &impl Fn(&NodeRef<'_>) -> FilterResult,
    ) -> Option<NodeRef<'a>> {
        let mut current = self.parent();
        while let Some(parent) = current {
            if filter(&parent) == FilterResult::Include {
                return Some(parent);
            }
            current = parent.parent();
        }
        None
    }
}

impl Deref for NodeRef<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_access_core::{NodeBuilder, Role};

    fn id(raw: u64) -> NodeId {
        NodeId::from(raw)
    }

    fn node(role: Role, children: &[u64]) -> Node {
        let mut builder = NodeBuilder::new(role);
        builder.set_children(children.iter().copied().map(id).collect::<Vec<_>>());
        builder.build()
    }

    fn sample() -> LiveTree {
        let mut update = TreeUpdate::with_root(id(1));
        update.add(id(1), node(Role::Window, &[2, 3]));
        update.add(id(2), node(Role::GenericContainer, &[4]));
        update.add(id(3), node(Role::Button, &[]));
        update.add(id(4), node(Role::StaticText, &[]));
        LiveTree::new(update, 0).unwrap()
    }

    #[test]
    fn test_initial_update_requires_root() {
        let mut update = TreeUpdate::new();
        update.add(id(1), node(Role::Window, &[]));
        assert_eq!(LiveTree::new(update, 0).unwrap_err(), AdapterError::MissingRoot);
    }

    #[test]
    fn test_parents_and_view_ids() {
        let tree = sample();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root().view_id(), 0);
        let text = tree.node(id(4)).unwrap();
        assert_eq!(text.parent().map(|p| p.id()), Some(id(2)));
        assert_eq!(tree.node_by_view_id(text.view_id()).map(|n| n.id()), Some(id(4)));
        assert!(tree.root().parent().is_none());
    }

    #[test]
    fn test_filtered_children_hoist_excluded_nodes() {
        let tree = sample();
        let filter = |node: &NodeRef<'_>| {
            if node.role() == Role::GenericContainer {
                FilterResult::ExcludeNode
            } else {
                FilterResult::Include
            }
        };
        let children: Vec<_> = tree
            .root()
            .filtered_children(&filter)
            .iter()
            .map(|n| n.id())
            .collect();
        assert_eq!(children, vec![id(4), id(3)]);

        let text = tree.node(id(4)).unwrap();
        assert_eq!(text.filtered_parent(&filter).map(|p| p.id()), Some(id(1)));
    }

    #[test]
    fn test_rejected_update_leaves_tree_unchanged() {
        let mut tree = sample();
        let mut update = TreeUpdate::new();
        update.add(id(3), node(Role::Button, &[99]));
        assert_eq!(tree.apply(update).unwrap_err(), AdapterError::MissingNode(id(99)));
        assert!(tree.node(id(3)).unwrap().children().next().is_none());

        let mut update = TreeUpdate::new();
        update.add(id(3), node(Role::Button, &[]));
        update.add(id(3), node(Role::Link, &[]));
        assert_eq!(tree.apply(update).unwrap_err(), AdapterError::DuplicateNode(id(3)));
        assert_eq!(tree.node(id(3)).unwrap().role(), Role::Button);
    }

    #[test]
    fn test_unreachable_nodes_release_view_ids() {
        let mut tree = sample();
        let old_view_id = tree.node(id(4)).unwrap().view_id();

        let mut update = TreeUpdate::new();
        update.add(id(1), node(Role::Window, &[3]));
        let changes = tree.apply(update).unwrap();
        assert_eq!(changes, TreeChanges { updated: 1, removed: 2 });
        assert!(!tree.contains(id(2)));
        assert!(tree.node_by_view_id(old_view_id).is_none());
        assert_eq!(tree.view_id(id(3)), Some(2));
    }

    #[test]
    fn test_focus_cleared_when_node_leaves() {
        let mut tree = sample();
        let mut update = TreeUpdate::new();
        update.set_focus(id(3));
        tree.apply(update).unwrap();
        assert!(tree.node(id(3)).unwrap().is_focused());

        let mut update = TreeUpdate::new();
        update.add(id(1), node(Role::Window, &[2]));
        tree.apply(update).unwrap();
        assert_eq!(tree.focus(), None);
    }
}
