//! Actions that assistive technologies can request on a node.

use crate::id::NodeId;

/// An action a node can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Activate the node (press a button, follow a link).
    Click,
    /// Move keyboard focus to the node.
    Focus,
    /// Remove keyboard focus from the node.
    Blur,
    /// Expand a collapsible node.
    Expand,
    /// Collapse an expandable node.
    Collapse,
    /// Scroll the node's content forward by one page.
    ScrollForward,
    /// Scroll the node's content backward by one page.
    ScrollBackward,
    /// Show the node's context menu.
    ShowContextMenu,
    /// Replace the node's value. Carries [`ActionData::Value`].
    SetValue,
}

/// Extra data carried by some action requests.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionData {
    /// The new value for [`Action::SetValue`].
    Value(Box<str>),
}

/// A request from an assistive technology to perform an action on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    /// The action to perform.
    pub action: Action,
    /// The node the action targets.
    pub target: NodeId,
    /// Optional action payload.
    pub data: Option<ActionData>,
}

/// Receives action requests and routes them to the application.
///
/// Implementations are called from whichever thread the platform's
/// accessibility service runs on.
pub trait ActionHandler: Send + Sync {
    /// Perform the requested action.
    fn do_action(&self, request: ActionRequest);
}

impl<F> ActionHandler for F
where
    F: Fn(ActionRequest) + Send + Sync,
{
    fn do_action(&self, request: ActionRequest) {
        self(request)
    }
}
