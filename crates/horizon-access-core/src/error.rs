//! Error types for the tree update protocol.

use std::fmt;

/// The kind of owning handle an operation was attempted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// A [`NodeBuilderHandle`](crate::NodeBuilderHandle).
    NodeBuilder,
    /// A [`NodeHandle`](crate::NodeHandle).
    Node,
    /// A [`TreeUpdateHandle`](crate::TreeUpdateHandle).
    TreeUpdate,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeBuilder => write!(f, "node builder"),
            Self::Node => write!(f, "node"),
            Self::TreeUpdate => write!(f, "tree update"),
        }
    }
}

/// Errors raised by the handle lifecycle.
///
/// These indicate a programming error in the caller: the handle's resource
/// has already been handed off or released. They are never produced by
/// ordinary runtime conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// An operation was attempted on a consumed handle.
    #[error("cannot {operation}: {kind} has already been consumed")]
    IllegalState {
        /// The kind of handle.
        kind: HandleKind,
        /// The operation that was rejected.
        operation: &'static str,
    },
}

impl LifecycleError {
    /// Create an illegal-state error.
    pub fn illegal_state(kind: HandleKind, operation: &'static str) -> Self {
        Self::IllegalState { kind, operation }
    }

    /// The kind of handle the rejected operation targeted.
    pub fn kind(&self) -> HandleKind {
        match self {
            Self::IllegalState { kind, .. } => *kind,
        }
    }
}

/// Result type alias for lifecycle operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;
