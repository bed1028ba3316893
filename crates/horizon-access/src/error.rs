//! Error types for the platform adapter, bindings, and configuration.

use std::path::PathBuf;

use horizon_access_core::{HandleKind, LifecycleError, NodeId};

/// Errors raised when a tree update cannot be applied to the live tree.
///
/// A rejected update leaves the live tree untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// The first update pushed to an adapter did not name a root.
    #[error("the initial tree update must specify a root node")]
    MissingRoot,

    /// The same identity was added twice to one update.
    #[error("node {0} appears more than once in the same tree update")]
    DuplicateNode(NodeId),

    /// A root, child, or focus reference names a node that is neither in
    /// the update nor in the live tree.
    #[error("node {0} is referenced but not present in the tree")]
    MissingNode(NodeId),

    /// The update handle was already consumed.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Errors raised at the integer-handle boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// The handle is null, stale, or refers to a different kind of resource.
    #[error("{kind} handle {handle:#x} is not active")]
    IllegalState {
        /// The kind of resource the caller expected.
        kind: HandleKind,
        /// The raw handle value.
        handle: u64,
    },

    /// The role ordinal is outside the role table.
    #[error("invalid role ordinal {0}")]
    InvalidRole(i32),

    /// Text crossing the boundary was not valid UTF-8.
    #[error("text is not valid UTF-8")]
    InvalidUtf8,

    /// The adapter rejected a pushed update.
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration '{path}': {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for [`BridgeConfig`](crate::BridgeConfig).
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a validation error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Result type alias for adapter operations.
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Result type alias for binding operations.
pub type BindingResult<T> = std::result::Result<T, BindingError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
