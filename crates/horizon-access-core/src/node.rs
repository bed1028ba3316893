//! Node descriptions and the builder that stages them.

use crate::action::Action;
use crate::id::NodeId;
use crate::role::Role;

/// An axis-aligned rectangle in the host view's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x0: f64,
    /// Top edge.
    pub y0: f64,
    /// Right edge.
    pub x1: f64,
    /// Bottom edge.
    pub y1: f64,
}

impl Rect {
    /// Create a rectangle from its edges.
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Whether the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// The toggled state of a checkable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Toggled {
    /// Unchecked.
    False,
    /// Checked.
    True,
    /// Indeterminate.
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct NodeData {
    role: Role,
    name: Option<Box<str>>,
    description: Option<Box<str>>,
    value: Option<Box<str>>,
    bounds: Option<Rect>,
    children: Vec<NodeId>,
    actions: Vec<Action>,
    toggled: Option<Toggled>,
    selected: Option<bool>,
    disabled: bool,
    hidden: bool,
    protected: bool,
}

/// A mutable staging area for one node's properties.
///
/// The role is fixed at construction; everything else can be set any number
/// of times before [`build`](Self::build) turns the builder into an
/// immutable [`Node`].
///
/// # Example
///
/// ```
/// use horizon_access_core::{Action, NodeBuilder, Rect, Role};
///
/// let mut builder = NodeBuilder::new(Role::Button);
/// builder.set_name("OK");
/// builder.set_bounds(Rect::new(0.0, 0.0, 80.0, 24.0));
/// builder.add_action(Action::Click);
/// let node = builder.build();
///
/// assert_eq!(node.role(), Role::Button);
/// assert_eq!(node.name(), Some("OK"));
/// ```
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    data: NodeData,
}

impl NodeBuilder {
    /// Create a builder for a node with the given role.
    pub fn new(role: Role) -> Self {
        Self {
            data: NodeData {
                role,
                ..NodeData::default()
            },
        }
    }

    /// The role fixed at construction.
    pub fn role(&self) -> Role {
        self.data.role
    }

    /// Set the accessible name.
    pub fn set_name(&mut self, name: impl Into<Box<str>>) {
        self.data.name = Some(name.into());
    }

    /// Clear the accessible name.
    pub fn clear_name(&mut self) {
        self.data.name = None;
    }

    /// Set the longer description announced after the name.
    pub fn set_description(&mut self, description: impl Into<Box<str>>) {
        self.data.description = Some(description.into());
    }

    /// Set the textual value (text field contents, slider value text).
    pub fn set_value(&mut self, value: impl Into<Box<str>>) {
        self.data.value = Some(value.into());
    }

    /// Set the bounding rectangle.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.data.bounds = Some(bounds);
    }

    /// Replace the list of children.
    pub fn set_children(&mut self, children: impl Into<Vec<NodeId>>) {
        self.data.children = children.into();
    }

    /// Append a child.
    pub fn push_child(&mut self, child: NodeId) {
        self.data.children.push(child);
    }

    /// Declare an action this node supports. Duplicates are ignored.
    pub fn add_action(&mut self, action: Action) {
        if !self.data.actions.contains(&action) {
            self.data.actions.push(action);
        }
    }

    /// Set the toggled state, which makes the node checkable.
    pub fn set_toggled(&mut self, toggled: Toggled) {
        self.data.toggled = Some(toggled);
    }

    /// Set the selected state of a selectable node.
    pub fn set_selected(&mut self, selected: bool) {
        self.data.selected = Some(selected);
    }

    /// Mark the node as disabled.
    pub fn set_disabled(&mut self) {
        self.data.disabled = true;
    }

    /// Mark the node (and its subtree) as hidden from assistive technologies.
    pub fn set_hidden(&mut self) {
        self.data.hidden = true;
    }

    /// Mark the node's content as protected, as in a password field.
    pub fn set_protected(&mut self) {
        self.data.protected = true;
    }

    /// Finish the node.
    pub fn build(self) -> Node {
        Node { data: self.data }
    }
}

/// An immutable description of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    data: NodeData,
}

impl Node {
    /// The node's role.
    pub fn role(&self) -> Role {
        self.data.role
    }

    /// The accessible name.
    pub fn name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }

    /// The description.
    pub fn description(&self) -> Option<&str> {
        self.data.description.as_deref()
    }

    /// The textual value.
    pub fn value(&self) -> Option<&str> {
        self.data.value.as_deref()
    }

    /// The bounding rectangle.
    pub fn bounds(&self) -> Option<Rect> {
        self.data.bounds
    }

    /// Child identities in order.
    pub fn children(&self) -> &[NodeId] {
        &self.data.children
    }

    /// Supported actions.
    pub fn actions(&self) -> &[Action] {
        &self.data.actions
    }

    /// Whether the node supports `action`.
    pub fn supports_action(&self, action: Action) -> bool {
        self.data.actions.contains(&action)
    }

    /// The toggled state, if the node is checkable.
    pub fn toggled(&self) -> Option<Toggled> {
        self.data.toggled
    }

    /// The selected state, if the node is selectable.
    pub fn is_selected(&self) -> Option<bool> {
        self.data.selected
    }

    /// Whether the node is disabled.
    pub fn is_disabled(&self) -> bool {
        self.data.disabled
    }

    /// Whether the node is hidden.
    pub fn is_hidden(&self) -> bool {
        self.data.hidden
    }

    /// Whether the node's content is protected.
    pub fn is_protected(&self) -> bool {
        self.data.protected
    }

    /// Whether assistive technologies can move focus to the node.
    pub fn is_focusable(&self) -> bool {
        self.supports_action(Action::Focus)
    }
}
