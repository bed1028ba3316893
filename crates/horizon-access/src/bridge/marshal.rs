//! Writing [`NodeInfo`] records into the platform's native node objects.
//!
//! The platform exposes node records through two API shapes. Older
//! releases only offer the record itself, with actions set as one legacy
//! bitmask. Newer releases are driven through a compatibility shim that
//! adds actions one object at a time. Both shapes carry the same
//! information, so the bridge fills a single [`NodeInfo`] and picks a
//! marshaller once at setup.

use horizon_access_core::Rect;

use super::info::NodeInfo;

/// Platform action codes.
pub mod action_codes {
    /// Give the node input focus.
    pub const FOCUS: i32 = 0x0000_0001;
    /// Take input focus away from the node.
    pub const CLEAR_FOCUS: i32 = 0x0000_0002;
    /// Select the node.
    pub const SELECT: i32 = 0x0000_0004;
    /// Clear the node's selection.
    pub const CLEAR_SELECTION: i32 = 0x0000_0008;
    /// Click the node.
    pub const CLICK: i32 = 0x0000_0010;
    /// Long-click the node.
    pub const LONG_CLICK: i32 = 0x0000_0020;
    /// Scroll forward.
    pub const SCROLL_FORWARD: i32 = 0x0000_1000;
    /// Scroll backward.
    pub const SCROLL_BACKWARD: i32 = 0x0000_2000;
    /// Expand the node.
    pub const EXPAND: i32 = 0x0004_0000;
    /// Collapse the node.
    pub const COLLAPSE: i32 = 0x0008_0000;
    /// Replace the node's text.
    pub const SET_TEXT: i32 = 0x0020_0000;

    /// Argument key carrying the text for [`SET_TEXT`].
    pub const ARGUMENT_SET_TEXT: &str = "ACTION_ARGUMENT_SET_TEXT_CHARSEQUENCE";
}

/// Boolean properties of a native node record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoFlag {
    /// The node has a checked state.
    Checkable,
    /// The node is checked; only meaningful with `Checkable`.
    Checked,
    /// The node accepts input.
    Enabled,
    /// The node can take input focus.
    Focusable,
    /// The node has input focus.
    Focused,
    /// The node's text is a password.
    Password,
    /// The node is selected.
    Selected,
    /// The node reacts to clicks.
    Clickable,
    /// The node is on screen.
    VisibleToUser,
}

/// A platform-native node record being filled in.
///
/// `virtual_view_id` arguments are always relative to the host view; the
/// host itself is addressed as [`HOST_VIEW_ID`](super::HOST_VIEW_ID).
pub trait NativeNodeInfo {
    /// Mark the record as describing `virtual_view_id`.
    fn set_source(&mut self, virtual_view_id: i32);
    /// Set the parent virtual view.
    fn set_parent(&mut self, virtual_view_id: i32);
    /// Append a child virtual view.
    fn add_child(&mut self, virtual_view_id: i32);
    /// Set the widget class name.
    fn set_class_name(&mut self, class_name: &str);
    /// Set the owning package.
    fn set_package_name(&mut self, package_name: &str);
    /// Set the text.
    fn set_text(&mut self, text: &str);
    /// Set the content description.
    fn set_content_description(&mut self, description: &str);
    /// Set the current value, such as the contents of a text field.
    fn set_value(&mut self, value: &str);
    /// Set the bounds in host view coordinates.
    fn set_bounds(&mut self, bounds: Rect);
    /// Set a boolean property.
    fn set_flag(&mut self, flag: InfoFlag, value: bool);
    /// Set all actions at once as a bitmask of single-bit action codes.
    fn set_action_mask(&mut self, mask: i32);
    /// Add one action.
    fn add_action(&mut self, action: i32);
}

/// The platform capabilities that affect marshalling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformCapabilities {
    /// Platform API level, `None` if unknown (treated as current).
    pub api_level: Option<u32>,
}

/// The API level at which action objects replaced the legacy bitmask.
pub const ACTION_OBJECTS_API_LEVEL: u32 = 21;

/// How node records are written to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiShape {
    /// Write the native record directly, actions as a legacy bitmask.
    DirectRecord,
    /// Write through the compatibility shim, one action at a time.
    CompatShim,
}

impl ApiShape {
    /// Pick the shape supported by `capabilities`.
    pub fn detect(capabilities: PlatformCapabilities) -> Self {
        match capabilities.api_level {
            Some(level) if level < ACTION_OBJECTS_API_LEVEL => Self::DirectRecord,
            _ => Self::CompatShim,
        }
    }

    /// Write `info` into `target`.
    pub fn write(self, info: &NodeInfo, target: &mut dyn NativeNodeInfo) {
        write_common(info, target);
        match self {
            Self::DirectRecord => {
                let mask = info.actions.iter().fold(0, |mask, action| mask | action);
                if mask != 0 {
                    target.set_action_mask(mask);
                }
            }
            Self::CompatShim => {
                for &action in &info.actions {
                    target.add_action(action);
                }
            }
        }
    }
}

fn write_common(info: &NodeInfo, target: &mut dyn NativeNodeInfo) {
    target.set_source(info.virtual_view_id);
    if let Some(parent) = info.parent {
        target.set_parent(parent);
    }
    for &child in &info.children {
        target.add_child(child);
    }
    if let Some(class_name) = &info.class_name {
        target.set_class_name(class_name);
    }
    if let Some(package_name) = &info.package_name {
        target.set_package_name(package_name);
    }
    if let Some(text) = &info.text {
        target.set_text(text);
    }
    if let Some(description) = &info.content_description {
        target.set_content_description(description);
    }
    if let Some(value) = &info.value {
        target.set_value(value);
    }
    if let Some(bounds) = info.bounds {
        target.set_bounds(bounds);
    }
    if info.checkable {
        target.set_flag(InfoFlag::Checkable, true);
        target.set_flag(InfoFlag::Checked, info.checked);
    }
    target.set_flag(InfoFlag::Enabled, info.enabled);
    target.set_flag(InfoFlag::Focusable, info.focusable);
    target.set_flag(InfoFlag::Focused, info.focused);
    target.set_flag(InfoFlag::Password, info.password);
    target.set_flag(InfoFlag::Selected, info.selected);
    target.set_flag(InfoFlag::Clickable, info.clickable);
    target.set_flag(InfoFlag::VisibleToUser, info.visible_to_user);
}
