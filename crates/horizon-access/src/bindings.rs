//! Integer handles for binding layers.
//!
//! Foreign-language bindings cannot hold Rust values directly; they hold
//! `u64` handles into a [`HandleTable`]. Handles are generation-checked
//! slot keys, so a handle whose resource was consumed or dropped never
//! reaches reused storage: it is rejected with
//! [`BindingError::IllegalState`]. `0` is never a valid handle and can be
//! used as null on the foreign side.
//!
//! The table follows the same consume-once protocol as the checked handles
//! in `horizon_access_core`: building consumes a builder, adding consumes a
//! node, pushing consumes an update, and dropping is idempotent.
//!
//! # Example
//!
//! ```
//! use horizon_access::{Adapter, HandleTable};
//! use horizon_access_core::Role;
//!
//! let table = HandleTable::new();
//! let builder = table.builder_new(i32::from(Role::Window.ordinal())).unwrap();
//! table.builder_set_name(builder, "Main".as_bytes()).unwrap();
//! let node = table.builder_build(builder).unwrap();
//!
//! let update = table.update_new();
//! table.update_set_root(update, 1, 0).unwrap();
//! table.update_add_node(update, 1, 0, node).unwrap();
//!
//! let adapter = Adapter::new(|| None);
//! table.push(update, &adapter).unwrap();
//! assert_eq!(adapter.node_count(), 1);
//! assert!(table.is_empty());
//! ```

use parking_lot::Mutex;
use slotmap::{Key, KeyData, SlotMap, new_key_type};

use horizon_access_core::logging::targets;
use horizon_access_core::{HandleKind, Node, NodeBuilder, NodeId, Rect, Role, TreeUpdate};

use crate::adapter::{Adapter, TreeChanges};
use crate::error::{BindingError, BindingResult};

new_key_type! {
    /// Slot key behind a raw handle.
    struct HandleKey;
}

impl HandleKey {
    fn as_raw(self) -> u64 {
        self.data().as_ffi()
    }

    fn from_raw(raw: u64) -> Option<Self> {
        // Occupied slot keys always carry a non-zero version, so 0 is free
        // to mean null.
        (raw != 0).then(|| Self::from(KeyData::from_ffi(raw)))
    }
}

#[derive(Debug)]
enum Resource {
    Builder(NodeBuilder),
    Node(Node),
    Update(TreeUpdate),
}

impl Resource {
    fn kind(&self) -> HandleKind {
        match self {
            Self::Builder(_) => HandleKind::NodeBuilder,
            Self::Node(_) => HandleKind::Node,
            Self::Update(_) => HandleKind::TreeUpdate,
        }
    }
}

/// Owns every builder, node and update that a binding layer holds by handle.
#[derive(Debug, Default)]
pub struct HandleTable {
    slots: Mutex<SlotMap<HandleKey, Resource>>,
}

fn illegal_state(kind: HandleKind, handle: u64) -> BindingError {
    tracing::error!(target: targets::BINDINGS, %kind, handle, "handle is not active");
    BindingError::IllegalState { kind, handle }
}

impl HandleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Whether no resources are live.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Whether `handle` refers to a live resource of `kind`.
    pub fn is_active(&self, handle: u64, kind: HandleKind) -> bool {
        HandleKey::from_raw(handle).is_some_and(|key| {
            self.slots
                .lock()
                .get(key)
                .is_some_and(|resource| resource.kind() == kind)
        })
    }

    fn insert(&self, resource: Resource) -> u64 {
        let kind = resource.kind();
        let handle = self.slots.lock().insert(resource).as_raw();
        tracing::trace!(target: targets::BINDINGS, %kind, handle, "handle created");
        handle
    }

    fn with<R>(
        &self,
        handle: u64,
        kind: HandleKind,
        f: impl FnOnce(&mut Resource) -> R,
    ) -> BindingResult<R> {
        let key = HandleKey::from_raw(handle).ok_or_else(|| illegal_state(kind, handle))?;
        let mut slots = self.slots.lock();
        match slots.get_mut(key) {
            Some(resource) if resource.kind() == kind => Ok(f(resource)),
            _ => Err(illegal_state(kind, handle)),
        }
    }

    fn take(&self, handle: u64, kind: HandleKind) -> BindingResult<Resource> {
        let key = HandleKey::from_raw(handle).ok_or_else(|| illegal_state(kind, handle))?;
        let mut slots = self.slots.lock();
        match slots.get(key) {
            Some(resource) if resource.kind() == kind => {
                slots.remove(key).ok_or_else(|| illegal_state(kind, handle))
            }
            _ => Err(illegal_state(kind, handle)),
        }
    }

    fn release(&self, handle: u64, kind: HandleKind) {
        let Some(key) = HandleKey::from_raw(handle) else {
            return;
        };
        let mut slots = self.slots.lock();
        match slots.get(key) {
            Some(resource) if resource.kind() == kind => {
                slots.remove(key);
                tracing::trace!(target: targets::BINDINGS, %kind, handle, "handle dropped");
            }
            Some(resource) => {
                tracing::warn!(
                    target: targets::BINDINGS,
                    expected = %kind,
                    actual = %resource.kind(),
                    handle,
                    "drop ignored for handle of a different kind"
                );
            }
            None => {}
        }
    }

    /// Create a builder for the role with the given ordinal.
    pub fn builder_new(&self, role_ordinal: i32) -> BindingResult<u64> {
        let role = u8::try_from(role_ordinal)
            .ok()
            .and_then(Role::from_ordinal)
            .ok_or(BindingError::InvalidRole(role_ordinal))?;
        Ok(self.insert(Resource::Builder(NodeBuilder::new(role))))
    }

    fn with_builder<R>(
        &self,
        handle: u64,
        f: impl FnOnce(&mut NodeBuilder) -> R,
    ) -> BindingResult<R> {
        self.with(handle, HandleKind::NodeBuilder, |resource| match resource {
            Resource::Builder(builder) => Some(f(builder)),
            _ => None,
        })?
        .ok_or_else(|| illegal_state(HandleKind::NodeBuilder, handle))
    }

    /// Set the builder's name from UTF-8 bytes.
    pub fn builder_set_name(&self, handle: u64, name: &[u8]) -> BindingResult<()> {
        self.with_builder(handle, |_| ())?;
        let name = std::str::from_utf8(name).map_err(|_| BindingError::InvalidUtf8)?;
        self.with_builder(handle, |builder| builder.set_name(name))
    }

    /// Set the builder's bounds.
    pub fn builder_set_bounds(
        &self,
        handle: u64,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    ) -> BindingResult<()> {
        self.with_builder(handle, |builder| {
            builder.set_bounds(Rect::new(x0, y0, x1, y1))
        })
    }

    /// Append a child identity to the builder.
    pub fn builder_push_child(&self, handle: u64, low: i64, high: i64) -> BindingResult<()> {
        self.with_builder(handle, |builder| {
            builder.push_child(NodeId::from_signed_parts(low, high))
        })
    }

    /// Consume the builder and return a handle to the finished node.
    pub fn builder_build(&self, handle: u64) -> BindingResult<u64> {
        match self.take(handle, HandleKind::NodeBuilder)? {
            Resource::Builder(builder) => Ok(self.insert(Resource::Node(builder.build()))),
            _ => Err(illegal_state(HandleKind::NodeBuilder, handle)),
        }
    }

    /// Release a builder. Stale handles are ignored.
    pub fn builder_drop(&self, handle: u64) {
        self.release(handle, HandleKind::NodeBuilder);
    }

    /// Release a node. Stale handles are ignored.
    pub fn node_drop(&self, handle: u64) {
        self.release(handle, HandleKind::Node);
    }

    /// Create an empty update.
    pub fn update_new(&self) -> u64 {
        self.insert(Resource::Update(TreeUpdate::new()))
    }

    fn with_update<R>(
        &self,
        handle: u64,
        f: impl FnOnce(&mut TreeUpdate) -> R,
    ) -> BindingResult<R> {
        self.with(handle, HandleKind::TreeUpdate, |resource| match resource {
            Resource::Update(update) => Some(f(update)),
            _ => None,
        })?
        .ok_or_else(|| illegal_state(HandleKind::TreeUpdate, handle))
    }

    /// Consume `node` and add it to `update` under the identity
    /// `(low, high)`.
    ///
    /// Both handles are checked before anything is consumed.
    pub fn update_add_node(&self, update: u64, low: i64, high: i64, node: u64) -> BindingResult<()> {
        let (update_key, node_key) = {
            let update_key = HandleKey::from_raw(update)
                .ok_or_else(|| illegal_state(HandleKind::TreeUpdate, update))?;
            let node_key =
                HandleKey::from_raw(node).ok_or_else(|| illegal_state(HandleKind::Node, node))?;
            (update_key, node_key)
        };

        let mut slots = self.slots.lock();
        if !matches!(slots.get(update_key), Some(Resource::Update(_))) {
            return Err(illegal_state(HandleKind::TreeUpdate, update));
        }
        let Some(Resource::Node(_)) = slots.get(node_key) else {
            return Err(illegal_state(HandleKind::Node, node));
        };
        let Some(Resource::Node(data)) = slots.remove(node_key) else {
            return Err(illegal_state(HandleKind::Node, node));
        };
        let id = NodeId::from_signed_parts(low, high);
        match slots.get_mut(update_key) {
            Some(Resource::Update(pending)) => {
                pending.add(id, data);
                tracing::trace!(target: targets::BINDINGS, %id, node, update, "node added to update");
                Ok(())
            }
            _ => Err(illegal_state(HandleKind::TreeUpdate, update)),
        }
    }

    /// Set the root of `update`.
    pub fn update_set_root(&self, update: u64, low: i64, high: i64) -> BindingResult<()> {
        self.with_update(update, |pending| {
            pending.set_root(NodeId::from_signed_parts(low, high))
        })
    }

    /// Set the focus of `update`.
    pub fn update_set_focus(&self, update: u64, low: i64, high: i64) -> BindingResult<()> {
        self.with_update(update, |pending| {
            pending.set_focus(NodeId::from_signed_parts(low, high))
        })
    }

    /// Release an update and every node it holds. Stale handles are ignored.
    pub fn update_drop(&self, handle: u64) {
        self.release(handle, HandleKind::TreeUpdate);
    }

    /// Consume `update` and push it into `adapter`.
    ///
    /// The update is consumed even if the adapter rejects it.
    pub fn push(&self, update: u64, adapter: &Adapter) -> BindingResult<TreeChanges> {
        match self.take(update, HandleKind::TreeUpdate)? {
            Resource::Update(data) => Ok(adapter.push(data)?),
            _ => Err(illegal_state(HandleKind::TreeUpdate, update)),
        }
    }
}
