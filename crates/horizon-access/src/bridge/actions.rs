//! Routing of actions aimed at nodes other than the host view.

use std::sync::Arc;

use horizon_access_core::logging::targets;
use horizon_access_core::{Action, ActionData, ActionHandler, ActionRequest, NodeId};

use super::host::ActionArguments;
use super::marshal::action_codes;

/// Handles platform actions on virtual views that resolve to tree nodes.
///
/// This is where non-root actions enter the application. The bridge
/// resolves the virtual view id and releases the tree before calling
/// [`route`](Self::route), so implementations may push updates.
pub trait NodeActionRouter: Send + Sync {
    /// Perform `action` on `target`. Returns whether it was handled.
    fn route(&self, target: NodeId, action: i32, arguments: &ActionArguments) -> bool;
}

/// Declines every action.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnhandledNodeActions;

impl NodeActionRouter for UnhandledNodeActions {
    fn route(&self, target: NodeId, action: i32, _arguments: &ActionArguments) -> bool {
        tracing::debug!(target: targets::BRIDGE, %target, action, "non-root action not handled");
        false
    }
}

/// Translates platform actions into [`ActionRequest`]s for an application
/// [`ActionHandler`].
pub struct ActionHandlerRouter {
    handler: Arc<dyn ActionHandler>,
}

impl ActionHandlerRouter {
    /// Forward translated requests to `handler`.
    pub fn new(handler: impl ActionHandler + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Forward translated requests to a shared handler.
    pub fn from_arc(handler: Arc<dyn ActionHandler>) -> Self {
        Self { handler }
    }
}

impl std::fmt::Debug for ActionHandlerRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionHandlerRouter").finish_non_exhaustive()
    }
}

impl NodeActionRouter for ActionHandlerRouter {
    fn route(&self, target: NodeId, action: i32, arguments: &ActionArguments) -> bool {
        let Some((action, data)) = translate_action(action, arguments) else {
            tracing::debug!(target: targets::BRIDGE, %target, action, "no mapping for platform action");
            return false;
        };
        tracing::trace!(target: targets::BRIDGE, %target, ?action, "routing action to handler");
        self.handler.do_action(ActionRequest {
            action,
            target,
            data,
        });
        true
    }
}

/// Map a platform action code to an [`Action`] and its payload.
pub fn translate_action(code: i32, arguments: &ActionArguments) -> Option<(Action, Option<ActionData>)> {
    let action = match code {
        action_codes::FOCUS => Action::Focus,
        action_codes::CLEAR_FOCUS => Action::Blur,
        action_codes::CLICK => Action::Click,
        action_codes::LONG_CLICK => Action::ShowContextMenu,
        action_codes::SCROLL_FORWARD => Action::ScrollForward,
        action_codes::SCROLL_BACKWARD => Action::ScrollBackward,
        action_codes::EXPAND => Action::Expand,
        action_codes::COLLAPSE => Action::Collapse,
        action_codes::SET_TEXT => {
            let text = arguments.text(action_codes::ARGUMENT_SET_TEXT).unwrap_or_default();
            return Some((Action::SetValue, Some(ActionData::Value(text.into()))));
        }
        _ => return None,
    };
    Some((action, None))
}
