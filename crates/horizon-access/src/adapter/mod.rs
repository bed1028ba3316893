//! The platform adapter that owns the live accessibility tree.
//!
//! Applications hand finished [`TreeUpdate`]s to an [`Adapter`]; the
//! [`VirtualViewBridge`](crate::VirtualViewBridge) reads the resulting tree
//! when the platform's accessibility service asks about a view.
//!
//! The tree is built lazily. An adapter created with [`Adapter::new`] stays
//! inactive until something needs the tree, at which point it asks its
//! [`ActivationHandler`] for the initial update. Until then
//! [`Adapter::update_if_active`] skips the (possibly expensive) work of
//! building updates nobody will read.
//!
//! # Example
//!
//! ```
//! use horizon_access::Adapter;
//! use horizon_access_core::{NodeBuilder, NodeId, Role, TreeUpdate};
//!
//! let root = NodeId::from_parts(1, 0);
//! let adapter = Adapter::new(move || {
//!     let mut update = TreeUpdate::with_root(root);
//!     update.add(root, NodeBuilder::new(Role::Window).build());
//!     Some(update)
//! });
//!
//! assert!(!adapter.is_active());
//! let tree = adapter.read().expect("tree is built on first read");
//! assert_eq!(tree.root_id(), root);
//! ```

mod tree;

pub use tree::{FilterResult, LiveTree, NodeRef, TreeChanges};

use parking_lot::{MappedRwLockReadGuard, Mutex, RwLock, RwLockReadGuard};

use horizon_access_core::logging::targets;
use horizon_access_core::{TreeUpdate, TreeUpdateHandle};

use crate::config::BridgeConfig;
use crate::error::{AdapterError, AdapterResult};

/// Supplies the initial tree when an adapter is first activated.
///
/// The handler runs while the adapter is activating and must not call back
/// into the same adapter.
pub trait ActivationHandler: Send {
    /// Build the initial tree, or return `None` if it is not available yet.
    fn request_initial_tree(&mut self) -> Option<TreeUpdate>;
}

impl<F> ActivationHandler for F
where
    F: FnMut() -> Option<TreeUpdate> + Send,
{
    fn request_initial_tree(&mut self) -> Option<TreeUpdate> {
        self()
    }
}

/// Owns the live tree and serializes pushes into it.
///
/// Pushes take the write lock; reads take a recursive read lock, so a
/// reader never sees a half-applied update.
pub struct Adapter {
    tree: RwLock<Option<LiveTree>>,
    activation: Mutex<Option<Box<dyn ActivationHandler>>>,
    first_view_id: i32,
}

impl Adapter {
    /// Create an inactive adapter that builds its tree on demand.
    pub fn new(handler: impl ActivationHandler + 'static) -> Self {
        Self::with_config(handler, &BridgeConfig::default())
    }

    /// Create an inactive adapter that assigns view ids per `config`.
    pub fn with_config(handler: impl ActivationHandler + 'static, config: &BridgeConfig) -> Self {
        Self {
            tree: RwLock::new(None),
            activation: Mutex::new(Some(Box::new(handler))),
            first_view_id: config.first_virtual_view_id,
        }
    }

    /// Create an adapter that is active from the start.
    pub fn with_tree(initial: TreeUpdate) -> AdapterResult<Self> {
        Self::with_tree_and_config(initial, &BridgeConfig::default())
    }

    /// Create an active adapter that assigns view ids per `config`.
    pub fn with_tree_and_config(initial: TreeUpdate, config: &BridgeConfig) -> AdapterResult<Self> {
        let tree = LiveTree::new(initial, config.first_virtual_view_id)?;
        tracing::debug!(target: targets::ADAPTER, nodes = tree.len(), "adapter created with initial tree");
        Ok(Self {
            tree: RwLock::new(Some(tree)),
            activation: Mutex::new(None),
            first_view_id: config.first_virtual_view_id,
        })
    }

    /// Whether the live tree exists.
    ///
    /// Safe to call while holding a snapshot from [`Adapter::read`].
    pub fn is_active(&self) -> bool {
        self.tree.read_recursive().is_some()
    }

    /// Build the tree through the activation handler if it does not exist
    /// yet. Returns whether the adapter is active afterwards.
    pub fn activate(&self) -> bool {
        if self.is_active() {
            return true;
        }
        let mut activation = self.activation.lock();
        // Another thread may have activated while we waited for the handler.
        if self.is_active() {
            return true;
        }
        let Some(handler) = activation.as_mut() else {
            return false;
        };
        let Some(initial) = handler.request_initial_tree() else {
            tracing::debug!(target: targets::ADAPTER, "initial tree not available yet");
            return false;
        };
        match LiveTree::new(initial, self.first_view_id) {
            Ok(tree) => {
                let mut guard = self.tree.write();
                // A concurrent push may have supplied the tree already.
                if guard.is_none() {
                    tracing::debug!(target: targets::ADAPTER, nodes = tree.len(), "adapter activated");
                    *guard = Some(tree);
                }
                true
            }
            Err(error) => {
                tracing::warn!(target: targets::ADAPTER, %error, "initial tree rejected");
                false
            }
        }
    }

    /// Merge `update` into the live tree.
    ///
    /// If the adapter is not active yet, `update` becomes the initial tree
    /// and must name a root. On error the live tree is unchanged.
    pub fn push(&self, update: TreeUpdate) -> AdapterResult<TreeChanges> {
        let mut guard = self.tree.write();
        let mut activated = false;
        let result = match guard.as_mut() {
            Some(tree) => tree.apply(update),
            None => {
                let updated = update.len();
                LiveTree::new(update, self.first_view_id).map(|tree| {
                    *guard = Some(tree);
                    activated = true;
                    TreeChanges {
                        updated,
                        removed: 0,
                    }
                })
            }
        };
        drop(guard);
        if activated {
            // The handler is no longer needed once a tree exists.
            self.activation.lock().take();
        }
        match &result {
            Ok(changes) => tracing::debug!(
                target: targets::ADAPTER,
                updated = changes.updated,
                removed = changes.removed,
                "tree update applied"
            ),
            Err(error) => tracing::warn!(target: targets::ADAPTER, %error, "tree update rejected"),
        }
        result
    }

    /// Consume a checked update handle and push its contents.
    ///
    /// Fails with [`AdapterError::Lifecycle`] if the handle was already
    /// consumed.
    pub fn push_handle(&self, handle: &mut TreeUpdateHandle) -> AdapterResult<TreeChanges> {
        let update = handle.hand_off()?;
        self.push(update)
    }

    /// Push the update built by `updater`, but only if the tree exists.
    ///
    /// Returns `Ok(None)` without calling `updater` when inactive.
    pub fn update_if_active<F>(&self, updater: F) -> AdapterResult<Option<TreeChanges>>
    where
        F: FnOnce() -> TreeUpdate,
    {
        let mut guard = self.tree.write();
        let Some(tree) = guard.as_mut() else {
            return Ok(None);
        };
        let changes = tree.apply(updater()).inspect_err(|error| {
            tracing::warn!(target: targets::ADAPTER, %error, "tree update rejected");
        })?;
        tracing::debug!(
            target: targets::ADAPTER,
            updated = changes.updated,
            removed = changes.removed,
            "tree update applied"
        );
        Ok(Some(changes))
    }

    /// A consistent snapshot of the live tree, activating it if needed.
    ///
    /// The snapshot holds a recursive read lock until dropped; pushes wait
    /// for it. Returns `None` if the tree cannot be built yet.
    pub fn read(&self) -> Option<MappedRwLockReadGuard<'_, LiveTree>> {
        // An active tree never goes back to `None`. Callers already holding
        // a snapshot must not queue behind a waiting writer.
        if let Ok(tree) = RwLockReadGuard::try_map(self.tree.read_recursive(), Option::as_ref) {
            return Some(tree);
        }
        if !self.activate() {
            return None;
        }
        RwLockReadGuard::try_map(self.tree.read_recursive(), Option::as_ref).ok()
    }

    /// Number of nodes in the live tree, zero when inactive.
    pub fn node_count(&self) -> usize {
        self.tree.read_recursive().as_ref().map_or(0, LiveTree::len)
    }
}

impl std::fmt::Debug for Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter")
            .field("active", &self.is_active())
            .field("nodes", &self.node_count())
            .field("first_view_id", &self.first_view_id)
            .finish()
    }
}
