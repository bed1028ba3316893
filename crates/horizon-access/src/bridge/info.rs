//! Platform-neutral node records and how they are filled from the live tree.

use horizon_access_core::{Action, Rect, Role, Toggled};

use super::filter::NodeFilter;
use super::marshal::{InfoFlag, NativeNodeInfo, action_codes};
use super::view_id::HOST_VIEW_ID;
use crate::adapter::NodeRef;

/// Everything the platform learns about one virtual view.
///
/// The bridge fills a `NodeInfo` and then writes it into the platform's own
/// record with an [`ApiShape`](super::ApiShape). `NodeInfo` also implements
/// [`NativeNodeInfo`], so marshalled output can be read back and compared.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    /// The virtual view this record describes.
    pub virtual_view_id: i32,
    /// Parent virtual view, `None` when the parent is the host view.
    pub parent: Option<i32>,
    /// Exposed children in order.
    pub children: Vec<i32>,
    /// Role of the node. Not marshalled; the platform sees `class_name`.
    pub role: Role,
    /// Platform widget class derived from the role.
    pub class_name: Option<String>,
    /// Package of the application that owns the host view.
    pub package_name: Option<String>,
    /// The accessible name.
    pub text: Option<String>,
    /// The node's description.
    pub content_description: Option<String>,
    /// The current value, such as the contents of a text field.
    pub value: Option<String>,
    /// Bounds in host view coordinates.
    pub bounds: Option<Rect>,
    /// Whether the node has a checked state.
    pub checkable: bool,
    /// Whether the node is checked; mixed counts as checked.
    pub checked: bool,
    /// Whether the node accepts input.
    pub enabled: bool,
    /// Whether the node can take input focus.
    pub focusable: bool,
    /// Whether the node has input focus.
    pub focused: bool,
    /// Whether the node's text is a password.
    pub password: bool,
    /// Whether the node is selected.
    pub selected: bool,
    /// Whether the node reacts to clicks.
    pub clickable: bool,
    /// Whether the node is on screen.
    pub visible_to_user: bool,
    /// Platform action codes, ascending.
    pub actions: Vec<i32>,
}

impl NodeInfo {
    /// An empty record for `virtual_view_id`.
    pub fn new(virtual_view_id: i32) -> Self {
        Self {
            virtual_view_id,
            parent: None,
            children: Vec::new(),
            role: Role::Unknown,
            class_name: None,
            package_name: None,
            text: None,
            content_description: None,
            value: None,
            bounds: None,
            checkable: false,
            checked: false,
            enabled: false,
            focusable: false,
            focused: false,
            password: false,
            selected: false,
            clickable: false,
            visible_to_user: false,
            actions: Vec::new(),
        }
    }

    /// Whether this record describes the host view.
    pub fn is_host(&self) -> bool {
        self.virtual_view_id == HOST_VIEW_ID
    }

    /// Whether the record advertises `action`.
    pub fn has_action(&self, action: i32) -> bool {
        self.actions.contains(&action)
    }

    /// Fill this record from a live node.
    ///
    /// The node's filtered children become child views. Its filtered parent
    /// becomes the parent view unless that parent is the root, whose
    /// children belong to the host view.
    pub(crate) fn populate(&mut self, node: &NodeRef<'_>, filter: &NodeFilter) {
        let filter = filter.as_fn();
        self.children
            .extend(node.filtered_children(&filter).iter().map(NodeRef::view_id));
        if let Some(parent) = node.filtered_parent(&filter)
            && !parent.is_root()
        {
            self.parent = Some(parent.view_id());
        }

        let data = node.data();
        self.role = data.role();
        if self.class_name.is_none() || !self.is_host() {
            self.class_name = Some(class_name(data.role()).to_owned());
        }
        if let Some(toggled) = data.toggled() {
            self.checkable = true;
            self.checked = matches!(toggled, Toggled::True | Toggled::Mixed);
        }
        self.enabled = !data.is_disabled();
        self.focusable = data.is_focusable();
        self.focused = node.is_focused();
        self.password = data.is_protected();
        self.selected = if data.role().is_radio_like() {
            data.toggled() == Some(Toggled::True)
        } else {
            data.is_selected().unwrap_or(false)
        };
        self.clickable = data.supports_action(Action::Click);
        self.visible_to_user = !data.is_hidden() && data.bounds().is_none_or(|b| !b.is_empty());
        if let Some(name) = data.name() {
            self.text = Some(name.to_owned());
        }
        if let Some(description) = data.description() {
            self.content_description = Some(description.to_owned());
        }
        if let Some(value) = data.value() {
            self.value = Some(value.to_owned());
        }
        if let Some(bounds) = data.bounds() {
            self.bounds = Some(bounds);
        }

        for action in platform_actions(node) {
            if !self.actions.contains(&action) {
                self.actions.push(action);
            }
        }
        self.actions.sort_unstable();
    }
}

/// Platform action codes for the actions a node supports.
fn platform_actions(node: &NodeRef<'_>) -> Vec<i32> {
    let focused = node.is_focused();
    let mut actions: Vec<i32> = node
        .actions()
        .iter()
        .filter_map(|action| match action {
            Action::Focus if focused => Some(action_codes::CLEAR_FOCUS),
            Action::Focus => Some(action_codes::FOCUS),
            Action::Blur if focused => Some(action_codes::CLEAR_FOCUS),
            Action::Blur => None,
            Action::Click => Some(action_codes::CLICK),
            Action::ShowContextMenu => Some(action_codes::LONG_CLICK),
            Action::ScrollForward => Some(action_codes::SCROLL_FORWARD),
            Action::ScrollBackward => Some(action_codes::SCROLL_BACKWARD),
            Action::Expand => Some(action_codes::EXPAND),
            Action::Collapse => Some(action_codes::COLLAPSE),
            Action::SetValue => Some(action_codes::SET_TEXT),
        })
        .collect();
    actions.sort_unstable();
    actions.dedup();
    actions
}

/// The platform widget class used to describe `role`.
pub fn class_name(role: Role) -> &'static str {
    match role {
        Role::Button | Role::DefaultButton => "android.widget.Button",
        Role::ToggleButton => "android.widget.ToggleButton",
        Role::CheckBox | Role::MenuItemCheckBox => "android.widget.CheckBox",
        Role::RadioButton | Role::MenuItemRadio => "android.widget.RadioButton",
        Role::RadioGroup => "android.widget.RadioGroup",
        Role::Switch => "android.widget.Switch",
        Role::Image => "android.widget.ImageView",
        Role::Slider => "android.widget.SeekBar",
        Role::ProgressIndicator | Role::Meter => "android.widget.ProgressBar",
        Role::ComboBox | Role::EditableComboBox => "android.widget.Spinner",
        Role::List | Role::ListBox => "android.widget.ListView",
        Role::Grid | Role::Table | Role::TreeGrid | Role::ListGrid => "android.widget.GridView",
        Role::ScrollView => "android.widget.ScrollView",
        Role::TabList => "android.widget.TabWidget",
        Role::WebView | Role::RootWebArea => "android.webkit.WebView",
        Role::StaticText | Role::Paragraph | Role::Heading | Role::Link => {
            "android.widget.TextView"
        }
        role if role.is_text_input() => "android.widget.EditText",
        _ => "android.view.View",
    }
}

impl NativeNodeInfo for NodeInfo {
    fn set_source(&mut self, virtual_view_id: i32) {
        self.virtual_view_id = virtual_view_id;
    }

    fn set_parent(&mut self, virtual_view_id: i32) {
        self.parent = Some(virtual_view_id);
    }

    fn add_child(&mut self, virtual_view_id: i32) {
        self.children.push(virtual_view_id);
    }

    fn set_class_name(&mut self, class_name: &str) {
        self.class_name = Some(class_name.to_owned());
    }

    fn set_package_name(&mut self, package_name: &str) {
        self.package_name = Some(package_name.to_owned());
    }

    fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_owned());
    }

    fn set_content_description(&mut self, description: &str) {
        self.content_description = Some(description.to_owned());
    }

    fn set_value(&mut self, value: &str) {
        self.value = Some(value.to_owned());
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
    }

    fn set_flag(&mut self, flag: InfoFlag, value: bool) {
        let field = match flag {
            InfoFlag::Checkable => &mut self.checkable,
            InfoFlag::Checked => &mut self.checked,
            InfoFlag::Enabled => &mut self.enabled,
            InfoFlag::Focusable => &mut self.focusable,
            InfoFlag::Focused => &mut self.focused,
            InfoFlag::Password => &mut self.password,
            InfoFlag::Selected => &mut self.selected,
            InfoFlag::Clickable => &mut self.clickable,
            InfoFlag::VisibleToUser => &mut self.visible_to_user,
        };
        *field = value;
    }

    fn set_action_mask(&mut self, mask: i32) {
        for bit in 0..i32::BITS {
            let action = mask & (1 << bit);
            if action != 0 && !self.actions.contains(&action) {
                self.actions.push(action);
            }
        }
    }

    fn add_action(&mut self, action: i32) {
        if !self.actions.contains(&action) {
            self.actions.push(action);
        }
    }
}
