//! Platform adapter and virtual-view bridge for Horizon Access.
//!
//! An application describes its UI with the types from
//! [`horizon_access_core`] and pushes [`TreeUpdate`]s into an [`Adapter`],
//! which owns the live tree. A [`VirtualViewBridge`] serves that tree to a
//! view-based accessibility API, addressing nodes by 32-bit virtual view
//! ids with [`HOST_VIEW_ID`] standing for the host view itself.
//!
//! Binding layers that can only hold integers use a [`HandleTable`] instead
//! of the Rust handle types.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use horizon_access::{ActionArguments, Adapter, HostView, NodeInfo, VirtualViewBridge};
//! use horizon_access_core::{NodeBuilder, NodeId, Role, TreeUpdate};
//!
//! struct Host;
//!
//! impl HostView for Host {
//!     fn initialize_info(&self, info: &mut NodeInfo) {
//!         info.class_name = Some("android.view.View".into());
//!     }
//!
//!     fn package_name(&self) -> Option<String> {
//!         Some("com.example.app".into())
//!     }
//!
//!     fn perform_accessibility_action(&self, _action: i32, _args: &ActionArguments) -> bool {
//!         false
//!     }
//! }
//!
//! let root = NodeId::from_parts(1, 0);
//! let label = NodeId::from_parts(2, 0);
//!
//! let mut window = NodeBuilder::new(Role::Window);
//! window.push_child(label);
//! let mut text = NodeBuilder::new(Role::StaticText);
//! text.set_name("Hello");
//!
//! let mut update = TreeUpdate::with_root(root);
//! update.add(root, window.build());
//! update.add(label, text.build());
//!
//! let adapter = Arc::new(Adapter::with_tree(update).unwrap());
//! let bridge = VirtualViewBridge::new(adapter.clone(), Arc::new(Host));
//!
//! let host = bridge.resolve_info(horizon_access::HOST_VIEW_ID).unwrap();
//! let child = bridge.resolve_info(host.children[0]).unwrap();
//! assert_eq!(child.text.as_deref(), Some("Hello"));
//! assert_eq!(child.package_name.as_deref(), Some("com.example.app"));
//! ```
//!
//! # Feature Flags
//!
//! - `accesskit` (default): conversion of updates to AccessKit types.

pub mod adapter;
pub mod bindings;
pub mod bridge;
pub mod config;
pub mod error;
#[cfg(feature = "accesskit")]
pub mod export;

pub use adapter::{ActivationHandler, Adapter, FilterResult, LiveTree, NodeRef, TreeChanges};
pub use bindings::HandleTable;
pub use bridge::{
    ActionArguments, ActionHandlerRouter, ApiShape, ArgumentValue, HOST_VIEW_ID, HostView,
    NativeNodeInfo, NodeActionRouter, NodeFilter, NodeInfo, PlatformCapabilities,
    UnhandledNodeActions, VirtualViewBridge,
};
pub use config::{BridgeConfig, BridgeConfigBuilder, NonRootActions};
pub use error::{AdapterError, AdapterResult, BindingError, BindingResult, ConfigError, ConfigResult};

pub use horizon_access_core::TreeUpdate;

static_assertions::assert_impl_all!(Adapter: Send, Sync);
static_assertions::assert_impl_all!(VirtualViewBridge: Send, Sync);
static_assertions::assert_impl_all!(HandleTable: Send, Sync);
