//! Consume-once owning handles.
//!
//! Builders, nodes and tree updates are handed from owner to owner along a
//! fixed path:
//!
//! ```text
//! NodeBuilderHandle --build--> NodeHandle --add--> TreeUpdateHandle --push--> Adapter
//! ```
//!
//! Native Rust code gets this for free from move semantics. Binding layers
//! cannot: a foreign object keeps its handle after the resource behind it
//! has moved on. The handles in this module carry an explicit
//! [`HandleState`] that only ever moves from `Active` to `Consumed`, and
//! every entry point checks it first, so using a handle after hand-off
//! fails with [`LifecycleError::IllegalState`] instead of touching a
//! resource someone else now owns.
//!
//! [`release`](NodeBuilderHandle::release) is valid in every state and is
//! a no-op once the handle is consumed, so owners may call it defensively.

use crate::error::{HandleKind, LifecycleError, Result};
use crate::id::NodeId;
use crate::logging::targets;
use crate::node::{Node, NodeBuilder, Rect, Toggled};
use crate::role::Role;
use crate::update::TreeUpdate;

/// The lifecycle state of an owning handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleState {
    /// The handle owns its resource.
    Active,
    /// The resource was handed off or released. Terminal.
    Consumed,
}

fn illegal_state(kind: HandleKind, operation: &'static str) -> LifecycleError {
    tracing::error!(target: targets::LIFECYCLE, %kind, operation, "operation on consumed handle");
    LifecycleError::illegal_state(kind, operation)
}

/// A resource slot that can be emptied exactly once.
#[derive(Debug)]
struct Slot<T> {
    kind: HandleKind,
    value: Option<T>,
}

impl<T> Slot<T> {
    fn new(kind: HandleKind, value: T) -> Self {
        tracing::trace!(target: targets::LIFECYCLE, %kind, "handle created");
        Self {
            kind,
            value: Some(value),
        }
    }

    fn state(&self) -> HandleState {
        if self.value.is_some() {
            HandleState::Active
        } else {
            HandleState::Consumed
        }
    }

    fn check_active(&self, operation: &'static str) -> Result<()> {
        match self.value {
            Some(_) => Ok(()),
            None => Err(illegal_state(self.kind, operation)),
        }
    }

    fn get(&self, operation: &'static str) -> Result<&T> {
        match &self.value {
            Some(value) => Ok(value),
            None => Err(illegal_state(self.kind, operation)),
        }
    }

    fn get_mut(&mut self, operation: &'static str) -> Result<&mut T> {
        let kind = self.kind;
        match &mut self.value {
            Some(value) => Ok(value),
            None => Err(illegal_state(kind, operation)),
        }
    }

    fn take(&mut self, operation: &'static str) -> Result<T> {
        match self.value.take() {
            Some(value) => {
                tracing::trace!(target: targets::LIFECYCLE, kind = %self.kind, operation, "handle consumed");
                Ok(value)
            }
            None => Err(illegal_state(self.kind, operation)),
        }
    }

    fn release(&mut self) -> bool {
        let released = self.value.take().is_some();
        if released {
            tracing::trace!(target: targets::LIFECYCLE, kind = %self.kind, "handle released");
        }
        released
    }
}

/// An owning handle to a [`NodeBuilder`].
///
/// # Example
///
/// ```
/// use horizon_access_core::{HandleState, NodeBuilderHandle, Role};
///
/// let mut builder = NodeBuilderHandle::new(Role::Button);
/// builder.set_name("OK").unwrap();
/// let node = builder.build().unwrap();
///
/// assert_eq!(builder.state(), HandleState::Consumed);
/// assert!(builder.build().is_err());
/// assert_eq!(node.role().unwrap(), Role::Button);
/// ```
#[derive(Debug)]
pub struct NodeBuilderHandle {
    slot: Slot<NodeBuilder>,
}

impl NodeBuilderHandle {
    /// Create an active builder handle for a node with the given role.
    pub fn new(role: Role) -> Self {
        Self::from(NodeBuilder::new(role))
    }

    /// The current lifecycle state.
    pub fn state(&self) -> HandleState {
        self.slot.state()
    }

    /// Whether the handle still owns its builder.
    pub fn is_active(&self) -> bool {
        self.state() == HandleState::Active
    }

    /// Run `f` against the staged builder.
    ///
    /// This is the general entry point for properties without a dedicated
    /// setter on the handle.
    pub fn with_builder<R>(&mut self, f: impl FnOnce(&mut NodeBuilder) -> R) -> Result<R> {
        self.slot.get_mut("modify node builder").map(f)
    }

    /// Set the accessible name.
    pub fn set_name(&mut self, name: impl Into<Box<str>>) -> Result<()> {
        self.slot.get_mut("set name")?.set_name(name);
        Ok(())
    }

    /// Set the description.
    pub fn set_description(&mut self, description: impl Into<Box<str>>) -> Result<()> {
        self.slot.get_mut("set description")?.set_description(description);
        Ok(())
    }

    /// Set the bounding rectangle.
    pub fn set_bounds(&mut self, bounds: Rect) -> Result<()> {
        self.slot.get_mut("set bounds")?.set_bounds(bounds);
        Ok(())
    }

    /// Replace the list of children.
    pub fn set_children(&mut self, children: impl Into<Vec<NodeId>>) -> Result<()> {
        self.slot.get_mut("set children")?.set_children(children);
        Ok(())
    }

    /// Set the toggled state.
    pub fn set_toggled(&mut self, toggled: Toggled) -> Result<()> {
        self.slot.get_mut("set toggled")?.set_toggled(toggled);
        Ok(())
    }

    /// The role fixed at construction.
    pub fn role(&self) -> Result<Role> {
        self.slot.get("read role").map(NodeBuilder::role)
    }

    /// Finish the node, consuming this handle.
    ///
    /// Fails with [`LifecycleError::IllegalState`] if the handle was
    /// already built or released.
    pub fn build(&mut self) -> Result<NodeHandle> {
        let builder = self.slot.take("build node")?;
        Ok(NodeHandle::from(builder.build()))
    }

    /// Release the builder. No-op once consumed.
    pub fn release(&mut self) {
        self.slot.release();
    }
}

impl From<NodeBuilder> for NodeBuilderHandle {
    fn from(builder: NodeBuilder) -> Self {
        Self {
            slot: Slot::new(HandleKind::NodeBuilder, builder),
        }
    }
}

/// An owning handle to a finished [`Node`].
#[derive(Debug)]
pub struct NodeHandle {
    slot: Slot<Node>,
}

impl NodeHandle {
    /// The current lifecycle state.
    pub fn state(&self) -> HandleState {
        self.slot.state()
    }

    /// Whether the handle still owns its node.
    pub fn is_active(&self) -> bool {
        self.state() == HandleState::Active
    }

    /// Borrow the node.
    pub fn node(&self) -> Result<&Node> {
        self.slot.get("read node")
    }

    /// The node's role.
    pub fn role(&self) -> Result<Role> {
        self.slot.get("read role").map(Node::role)
    }

    /// The node's name.
    pub fn name(&self) -> Result<Option<&str>> {
        self.slot.get("read name").map(Node::name)
    }

    /// Release the node. No-op once consumed.
    pub fn release(&mut self) {
        self.slot.release();
    }

    fn check_active(&self, operation: &'static str) -> Result<()> {
        self.slot.check_active(operation)
    }

    fn take(&mut self, operation: &'static str) -> Result<Node> {
        self.slot.take(operation)
    }
}

impl From<Node> for NodeHandle {
    fn from(node: Node) -> Self {
        Self {
            slot: Slot::new(HandleKind::Node, node),
        }
    }
}

/// An owning handle to a [`TreeUpdate`] under construction.
///
/// Adding a node consumes the node's handle; the update itself stays
/// active until it is pushed to a platform adapter or released.
#[derive(Debug)]
pub struct TreeUpdateHandle {
    slot: Slot<TreeUpdate>,
}

impl TreeUpdateHandle {
    /// Create an active, empty update handle.
    pub fn new() -> Self {
        Self::from(TreeUpdate::new())
    }

    /// The current lifecycle state.
    pub fn state(&self) -> HandleState {
        self.slot.state()
    }

    /// Whether the handle still owns its update.
    pub fn is_active(&self) -> bool {
        self.state() == HandleState::Active
    }

    /// Move `node` into this update under `id`.
    ///
    /// Both handles must be active. On success `node` is consumed; on
    /// failure neither handle changes state.
    pub fn add(&mut self, id: NodeId, node: &mut NodeHandle) -> Result<()> {
        self.slot.check_active("add node")?;
        node.check_active("add node to tree update")?;
        let update = self.slot.get_mut("add node")?;
        update.add(id, node.take("add node to tree update")?);
        tracing::trace!(target: targets::LIFECYCLE, %id, nodes = update.len(), "node added to tree update");
        Ok(())
    }

    /// Set the root of the tree.
    pub fn set_root(&mut self, root: NodeId) -> Result<()> {
        self.slot.get_mut("set root")?.set_root(root);
        Ok(())
    }

    /// Set the focused node.
    pub fn set_focus(&mut self, focus: NodeId) -> Result<()> {
        self.slot.get_mut("set focus")?.set_focus(focus);
        Ok(())
    }

    /// Number of nodes added so far.
    pub fn len(&self) -> Result<usize> {
        self.slot.get("read length").map(TreeUpdate::len)
    }

    /// Take the update out for hand-off to a platform adapter, consuming
    /// this handle.
    pub fn hand_off(&mut self) -> Result<TreeUpdate> {
        self.slot.take("push tree update")
    }

    /// Release the update and every node it holds. No-op once consumed.
    pub fn release(&mut self) {
        self.slot.release();
    }
}

impl Default for TreeUpdateHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl From<TreeUpdate> for TreeUpdateHandle {
    fn from(update: TreeUpdate) -> Self {
        Self {
            slot: Slot::new(HandleKind::TreeUpdate, update),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_illegal_state(result: Result<impl std::fmt::Debug>, kind: HandleKind) -> bool {
        matches!(result, Err(LifecycleError::IllegalState { kind: k, .. }) if k == kind)
    }

    #[test]
    fn test_new_handles_are_active() {
        assert_eq!(NodeBuilderHandle::new(Role::Button).state(), HandleState::Active);
        assert_eq!(TreeUpdateHandle::new().state(), HandleState::Active);
    }

    #[test]
    fn test_build_twice_fails() {
        let mut builder = NodeBuilderHandle::new(Role::Button);
        let node = builder.build().unwrap();
        assert!(node.is_active());
        assert!(!builder.is_active());
        assert!(is_illegal_state(builder.build(), HandleKind::NodeBuilder));
    }

    #[test]
    fn test_builder_setters_after_build_fail() {
        let mut builder = NodeBuilderHandle::new(Role::Button);
        builder.build().unwrap();
        assert!(is_illegal_state(builder.set_name("late"), HandleKind::NodeBuilder));
        assert!(is_illegal_state(builder.role(), HandleKind::NodeBuilder));
        assert!(is_illegal_state(
            builder.with_builder(|b| b.set_hidden()),
            HandleKind::NodeBuilder
        ));
    }

    #[test]
    fn test_add_consumes_node() {
        let mut builder = NodeBuilderHandle::new(Role::StaticText);
        builder.set_name("Foo").unwrap();
        let mut node = builder.build().unwrap();
        let mut update = TreeUpdateHandle::new();

        update.add(NodeId::from_parts(1, 0), &mut node).unwrap();

        assert_eq!(node.state(), HandleState::Consumed);
        assert!(update.is_active());
        assert_eq!(update.len().unwrap(), 1);
        assert!(is_illegal_state(node.role(), HandleKind::Node));
        assert!(is_illegal_state(node.name(), HandleKind::Node));
    }

    #[test]
    fn test_add_same_node_twice_fails() {
        let mut node = NodeBuilderHandle::new(Role::Image).build().unwrap();
        let mut update = TreeUpdateHandle::new();
        update.add(NodeId::from_parts(1, 0), &mut node).unwrap();
        assert!(is_illegal_state(
            update.add(NodeId::from_parts(2, 0), &mut node),
            HandleKind::Node
        ));
        assert_eq!(update.len().unwrap(), 1);
    }

    #[test]
    fn test_add_to_consumed_update_keeps_node() {
        let mut update = TreeUpdateHandle::new();
        update.hand_off().unwrap();

        let mut node = NodeBuilderHandle::new(Role::Image).build().unwrap();
        assert!(is_illegal_state(
            update.add(NodeId::from_parts(1, 0), &mut node),
            HandleKind::TreeUpdate
        ));
        assert!(node.is_active());
    }

    #[test]
    fn test_hand_off_once() {
        let mut update = TreeUpdateHandle::new();
        update.set_root(NodeId::from_parts(1, 0)).unwrap();
        let taken = update.hand_off().unwrap();
        assert_eq!(taken.tree.map(|t| t.root), Some(NodeId::from_parts(1, 0)));
        assert!(is_illegal_state(update.hand_off(), HandleKind::TreeUpdate));
        assert!(is_illegal_state(update.set_focus(NodeId::from_parts(1, 0)), HandleKind::TreeUpdate));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut builder = NodeBuilderHandle::new(Role::Button);
        builder.release();
        builder.release();
        assert_eq!(builder.state(), HandleState::Consumed);

        let mut node = NodeBuilderHandle::new(Role::Button).build().unwrap();
        node.release();
        node.release();
        assert!(is_illegal_state(node.node(), HandleKind::Node));

        let mut update = TreeUpdateHandle::new();
        update.release();
        update.release();
        assert!(is_illegal_state(update.len(), HandleKind::TreeUpdate));
    }

    #[test]
    fn test_release_after_hand_off_is_noop() {
        let mut builder = NodeBuilderHandle::new(Role::Button);
        let _node = builder.build().unwrap();
        builder.release();
        assert_eq!(builder.state(), HandleState::Consumed);
    }
}
