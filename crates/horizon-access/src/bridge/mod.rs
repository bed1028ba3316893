//! The virtual-view bridge.
//!
//! Platforms whose accessibility API is built around views address the
//! nodes of a custom-drawn UI as *virtual views* of one real host view,
//! using 32-bit ids. [`VirtualViewBridge`] answers those queries from the
//! live tree of an [`Adapter`]:
//!
//! - [`HOST_VIEW_ID`] (`-1`) is the host view itself. Its record starts from
//!   the host's own defaults and is completed with the root node.
//! - Every other id is resolved against the live tree. Ids that do not
//!   resolve produce no record; the platform treats the view as gone.
//!
//! Actions on the host view go to the host's own handler. Actions on other
//! views go to the bridge's [`NodeActionRouter`], which declines them unless
//! the application installs a handler.
//!
//! Each call reads one consistent snapshot of the tree and nothing is cached
//! between calls.

mod actions;
mod filter;
mod host;
mod info;
mod marshal;
mod view_id;

pub use actions::{ActionHandlerRouter, NodeActionRouter, UnhandledNodeActions, translate_action};
pub use filter::NodeFilter;
pub use host::{ActionArguments, ArgumentValue, HostView};
pub use info::{NodeInfo, class_name};
pub use marshal::{
    ACTION_OBJECTS_API_LEVEL, ApiShape, InfoFlag, NativeNodeInfo, PlatformCapabilities,
    action_codes,
};
pub use view_id::HOST_VIEW_ID;
pub(crate) use view_id::ViewIdMap;

use std::sync::Arc;

use horizon_access_core::ActionHandler;
use horizon_access_core::logging::targets;

use crate::adapter::Adapter;
use crate::config::{BridgeConfig, NonRootActions};

/// Presents an [`Adapter`]'s live tree as virtual views of a host view.
pub struct VirtualViewBridge {
    adapter: Arc<Adapter>,
    host: Arc<dyn HostView>,
    router: Box<dyn NodeActionRouter>,
    shape: ApiShape,
    filter: NodeFilter,
    package_name: Option<String>,
    non_root_actions: NonRootActions,
}

impl VirtualViewBridge {
    /// Create a bridge with the default configuration.
    pub fn new(adapter: Arc<Adapter>, host: Arc<dyn HostView>) -> Self {
        Self::with_config(adapter, host, &BridgeConfig::default())
    }

    /// Create a bridge configured by `config`.
    ///
    /// The marshalling shape is chosen here, once, from the configured
    /// platform capabilities.
    pub fn with_config(adapter: Arc<Adapter>, host: Arc<dyn HostView>, config: &BridgeConfig) -> Self {
        let shape = config.api_shape();
        tracing::debug!(target: targets::BRIDGE, ?shape, api_level = ?config.api_level, "bridge created");
        Self {
            adapter,
            host,
            router: Box::new(UnhandledNodeActions),
            shape,
            filter: NodeFilter::new(config.expose_generic_containers),
            package_name: config.package_name.clone(),
            non_root_actions: config.non_root_actions,
        }
    }

    /// Replace the router for non-root actions.
    pub fn with_router(mut self, router: impl NodeActionRouter + 'static) -> Self {
        self.router = Box::new(router);
        self
    }

    /// Route non-root actions to `handler` if the configuration allows it.
    ///
    /// With `non_root_actions = "unhandled"` the handler is ignored and
    /// non-root actions keep reporting `false`.
    pub fn with_action_handler(self, handler: impl ActionHandler + 'static) -> Self {
        match self.non_root_actions {
            NonRootActions::RouteToHandler => self.with_router(ActionHandlerRouter::new(handler)),
            NonRootActions::Unhandled => {
                tracing::debug!(
                    target: targets::BRIDGE,
                    "action handler ignored; non-root actions are configured as unhandled"
                );
                self
            }
        }
    }

    /// The adapter whose tree is presented.
    pub fn adapter(&self) -> &Arc<Adapter> {
        &self.adapter
    }

    /// The marshalling shape in use.
    pub fn api_shape(&self) -> ApiShape {
        self.shape
    }

    /// Describe the virtual view `virtual_view_id`.
    ///
    /// Returns `None` if the id does not name a live node. The host view
    /// always has a record.
    pub fn resolve_info(&self, virtual_view_id: i32) -> Option<NodeInfo> {
        if virtual_view_id == HOST_VIEW_ID {
            return Some(self.host_info());
        }

        let Some(tree) = self.adapter.read() else {
            tracing::debug!(target: targets::BRIDGE, virtual_view_id, "no tree to resolve against");
            return None;
        };
        let Some(node) = tree.node_by_view_id(virtual_view_id) else {
            tracing::debug!(target: targets::BRIDGE, virtual_view_id, "virtual view not found");
            return None;
        };
        let mut info = NodeInfo::new(virtual_view_id);
        info.populate(&node, &self.filter);
        drop(tree);

        self.stamp_package(&mut info);
        Some(info)
    }

    fn host_info(&self) -> NodeInfo {
        let mut info = NodeInfo::new(HOST_VIEW_ID);
        // The host fills its defaults without the tree lock held, so it may
        // query the bridge itself.
        self.host.initialize_info(&mut info);
        info.virtual_view_id = HOST_VIEW_ID;
        if let Some(tree) = self.adapter.read() {
            info.populate(&tree.root(), &self.filter);
        }
        self.stamp_package(&mut info);
        info
    }

    fn stamp_package(&self, info: &mut NodeInfo) {
        let package = self
            .package_name
            .clone()
            .or_else(|| self.host.package_name());
        if let Some(package) = package {
            info.package_name = Some(package);
        }
    }

    /// Describe `virtual_view_id` into a native record using the configured
    /// API shape. Returns `false` if the id does not name a live node.
    pub fn create_accessibility_node_info(
        &self,
        virtual_view_id: i32,
        target: &mut dyn NativeNodeInfo,
    ) -> bool {
        match self.resolve_info(virtual_view_id) {
            Some(info) => {
                self.shape.write(&info, target);
                true
            }
            None => false,
        }
    }

    /// Perform a platform action on a virtual view.
    ///
    /// Host view actions are forwarded unchanged to the host, and its result
    /// is returned. Other views go to the non-root action router; ids that
    /// do not resolve return `false`.
    pub fn perform_action(&self, virtual_view_id: i32, action: i32, arguments: &ActionArguments) -> bool {
        if virtual_view_id == HOST_VIEW_ID {
            let handled = self.host.perform_accessibility_action(action, arguments);
            tracing::trace!(target: targets::BRIDGE, action, handled, "host view action");
            return handled;
        }

        let target = self.adapter.read().and_then(|tree| {
            let node = tree.node_by_view_id(virtual_view_id)?;
            Some(node.id())
        });
        let Some(target) = target else {
            tracing::debug!(target: targets::BRIDGE, virtual_view_id, action, "action on unknown virtual view");
            return false;
        };
        self.router.route(target, action, arguments)
    }
}

impl std::fmt::Debug for VirtualViewBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualViewBridge")
            .field("adapter", &self.adapter)
            .field("shape", &self.shape)
            .field("filter", &self.filter)
            .field("package_name", &self.package_name)
            .field("non_root_actions", &self.non_root_actions)
            .finish_non_exhaustive()
    }
}
