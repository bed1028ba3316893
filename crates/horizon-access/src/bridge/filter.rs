//! Which live nodes are exposed to the platform.

use horizon_access_core::Role;

use crate::adapter::{FilterResult, NodeRef};

/// Decides which nodes appear as virtual views.
///
/// Hidden nodes are dropped with their subtree. Purely structural nodes
/// (generic containers and inline text boxes) are dropped but their children
/// are hoisted to the nearest exposed ancestor. The focused node is always
/// exposed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeFilter {
    expose_generic_containers: bool,
}

impl NodeFilter {
    /// Create a filter.
    pub fn new(expose_generic_containers: bool) -> Self {
        Self {
            expose_generic_containers,
        }
    }

    /// Classify `node`.
    pub fn evaluate(&self, node: &NodeRef<'_>) -> FilterResult {
        if node.is_focused() {
            return FilterResult::Include;
        }
        if node.is_hidden() {
            return FilterResult::ExcludeSubtree;
        }
        match node.role() {
            Role::InlineTextBox => FilterResult::ExcludeNode,
            Role::GenericContainer if !self.expose_generic_containers => {
                FilterResult::ExcludeNode
            }
            _ => FilterResult::Include,
        }
    }

    /// The filter as a closure for tree traversal.
    pub fn as_fn(&self) -> impl Fn(&NodeRef<'_>) -> FilterResult + '_ {
        move |node| self.evaluate(node)
    }
}
