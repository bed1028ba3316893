//! Conversion to AccessKit types.
//!
//! The same [`TreeUpdate`]s that feed the virtual-view bridge can drive
//! AccessKit's desktop platform adapters. AccessKit identifies nodes with a
//! 64-bit id, so only identities whose high half is zero can be exported.

use horizon_access_core::{Action, Node, NodeId, Role, Toggled, TreeUpdate};

/// Errors raised while exporting to AccessKit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    /// The identity does not fit in AccessKit's 64-bit node id.
    #[error("node {0} does not fit in a 64-bit AccessKit node id")]
    IdOutOfRange(NodeId),
    /// Neither the update nor the caller names a focused node or a root.
    #[error("update names no focus and no root")]
    MissingFocus,
}

/// Convert a role to the closest AccessKit role.
pub fn to_accesskit_role(role: Role) -> accesskit::Role {
    match role {
        Role::Window => accesskit::Role::Window,
        Role::Dialog | Role::AlertDialog => accesskit::Role::Dialog,
        Role::Button | Role::DefaultButton => accesskit::Role::Button,
        Role::CheckBox => accesskit::Role::CheckBox,
        Role::RadioButton => accesskit::Role::RadioButton,
        Role::MultilineTextInput => accesskit::Role::MultilineTextInput,
        role if role.is_text_input() => accesskit::Role::TextInput,
        Role::StaticText | Role::Paragraph => accesskit::Role::Label,
        Role::Link => accesskit::Role::Link,
        Role::Image => accesskit::Role::Image,
        Role::ProgressIndicator => accesskit::Role::ProgressIndicator,
        Role::Slider => accesskit::Role::Slider,
        Role::SpinButton => accesskit::Role::SpinButton,
        Role::ComboBox => accesskit::Role::ComboBox,
        Role::List | Role::ListBox => accesskit::Role::List,
        Role::ListItem | Role::ListBoxOption => accesskit::Role::ListItem,
        Role::Tree => accesskit::Role::Tree,
        Role::TreeItem => accesskit::Role::TreeItem,
        Role::Table => accesskit::Role::Table,
        Role::Row => accesskit::Role::Row,
        Role::Cell => accesskit::Role::Cell,
        Role::ColumnHeader => accesskit::Role::ColumnHeader,
        Role::RowHeader => accesskit::Role::RowHeader,
        Role::MenuBar => accesskit::Role::MenuBar,
        Role::Menu => accesskit::Role::Menu,
        Role::MenuItem => accesskit::Role::MenuItem,
        Role::MenuItemCheckBox => accesskit::Role::MenuItemCheckBox,
        Role::MenuItemRadio => accesskit::Role::MenuItemRadio,
        Role::Toolbar => accesskit::Role::Toolbar,
        Role::Status => accesskit::Role::Status,
        Role::TabList => accesskit::Role::TabList,
        Role::Tab => accesskit::Role::Tab,
        Role::TabPanel => accesskit::Role::TabPanel,
        Role::ScrollBar => accesskit::Role::ScrollBar,
        Role::ScrollView => accesskit::Role::ScrollView,
        Role::Splitter => accesskit::Role::Splitter,
        Role::Group | Role::RadioGroup => accesskit::Role::Group,
        Role::Tooltip => accesskit::Role::Tooltip,
        Role::Grid => accesskit::Role::Grid,
        Role::ColorWell => accesskit::Role::ColorWell,
        Role::Alert => accesskit::Role::Alert,
        Role::GenericContainer => accesskit::Role::GenericContainer,
        Role::Pane => accesskit::Role::Pane,
        _ => accesskit::Role::Unknown,
    }
}

/// Convert an identity to an AccessKit node id.
pub fn to_accesskit_id(id: NodeId) -> Result<accesskit::NodeId, ExportError> {
    if id.high() == 0 {
        Ok(accesskit::NodeId(id.low()))
    } else {
        Err(ExportError::IdOutOfRange(id))
    }
}

fn to_accesskit_action(action: Action) -> accesskit::Action {
    match action {
        Action::Click => accesskit::Action::Click,
        Action::Focus => accesskit::Action::Focus,
        Action::Blur => accesskit::Action::Blur,
        Action::Expand => accesskit::Action::Expand,
        Action::Collapse => accesskit::Action::Collapse,
        Action::ScrollForward => accesskit::Action::ScrollDown,
        Action::ScrollBackward => accesskit::Action::ScrollUp,
        Action::ShowContextMenu => accesskit::Action::ShowContextMenu,
        Action::SetValue => accesskit::Action::SetValue,
    }
}

/// Convert a node.
pub fn to_accesskit_node(node: &Node) -> Result<accesskit::Node, ExportError> {
    let mut out = accesskit::Node::new(to_accesskit_role(node.role()));
    if let Some(name) = node.name() {
        out.set_label(name);
    }
    if let Some(description) = node.description() {
        out.set_description(description);
    }
    if let Some(value) = node.value() {
        out.set_value(value);
    }
    if let Some(bounds) = node.bounds() {
        out.set_bounds(accesskit::Rect {
            x0: bounds.x0,
            y0: bounds.y0,
            x1: bounds.x1,
            y1: bounds.y1,
        });
    }
    let children = node
        .children()
        .iter()
        .map(|&child| to_accesskit_id(child))
        .collect::<Result<Vec<_>, _>>()?;
    if !children.is_empty() {
        out.set_children(children);
    }
    for &action in node.actions() {
        out.add_action(to_accesskit_action(action));
    }
    if let Some(toggled) = node.toggled() {
        out.set_toggled(match toggled {
            Toggled::False => accesskit::Toggled::False,
            Toggled::True => accesskit::Toggled::True,
            Toggled::Mixed => accesskit::Toggled::Mixed,
        });
    }
    if let Some(selected) = node.is_selected() {
        out.set_selected(selected);
    }
    if node.is_disabled() {
        out.set_disabled();
    }
    if node.is_hidden() {
        out.set_hidden();
    }
    Ok(out)
}

/// Convert an update.
///
/// AccessKit requires every update to name the focused node. When `update`
/// carries no focus, `current_focus` is kept, and the update's root is used
/// only when nothing had focus before.
pub fn to_accesskit_update(
    update: &TreeUpdate,
    current_focus: Option<NodeId>,
) -> Result<accesskit::TreeUpdate, ExportError> {
    let nodes = update
        .nodes
        .iter()
        .map(|(id, node)| Ok((to_accesskit_id(*id)?, to_accesskit_node(node)?)))
        .collect::<Result<Vec<_>, ExportError>>()?;
    let tree = update
        .tree
        .map(|tree| to_accesskit_id(tree.root).map(accesskit::Tree::new))
        .transpose()?;
    let focus = update
        .focus
        .or(current_focus)
        .or(update.tree.map(|tree| tree.root))
        .ok_or(ExportError::MissingFocus)?;
    Ok(accesskit::TreeUpdate {
        nodes,
        tree,
        focus: to_accesskit_id(focus)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_access_core::{NodeBuilder, Rect};

    #[test]
    fn test_id_range() {
        assert_eq!(
            to_accesskit_id(NodeId::from_parts(42, 0)),
            Ok(accesskit::NodeId(42))
        );
        let wide = NodeId::from_parts(1, 1);
        assert_eq!(to_accesskit_id(wide), Err(ExportError::IdOutOfRange(wide)));
    }

    #[test]
    fn test_roles() {
        assert_eq!(to_accesskit_role(Role::StaticText), accesskit::Role::Label);
        assert_eq!(to_accesskit_role(Role::SearchInput), accesskit::Role::TextInput);
        assert_eq!(to_accesskit_role(Role::DocCover), accesskit::Role::Unknown);
    }

    #[test]
    fn test_update() {
        let root = NodeId::from(1u64);
        let button = NodeId::from(2u64);

        let mut window = NodeBuilder::new(Role::Window);
        window.push_child(button);
        let mut ok = NodeBuilder::new(Role::Button);
        ok.set_name("OK");
        ok.set_bounds(Rect::new(0.0, 0.0, 40.0, 20.0));
        ok.add_action(Action::Click);
        ok.set_toggled(Toggled::True);

        let mut update = TreeUpdate::with_root(root);
        update.add(root, window.build());
        update.add(button, ok.build());

        let exported = to_accesskit_update(&update, None).unwrap();
        assert_eq!(exported.nodes.len(), 2);
        assert_eq!(exported.focus, accesskit::NodeId(1));
        assert_eq!(exported.tree.map(|tree| tree.root), Some(accesskit::NodeId(1)));

        let (id, node) = &exported.nodes[1];
        assert_eq!(*id, accesskit::NodeId(2));
        assert_eq!(node.role(), accesskit::Role::Button);
        assert_eq!(node.label(), Some("OK"));
        assert!(node.supports_action(accesskit::Action::Click));
        assert_eq!(node.toggled(), Some(accesskit::Toggled::True));
        assert_eq!(exported.nodes[0].1.children(), &[accesskit::NodeId(2)]);
    }

    #[test]
    fn test_wide_child_rejected() {
        let wide = NodeId::from_parts(0, 7);
        let mut builder = NodeBuilder::new(Role::Group);
        builder.push_child(wide);
        assert_eq!(
            to_accesskit_node(&builder.build()).unwrap_err(),
            ExportError::IdOutOfRange(wide)
        );
    }

    #[test]
    fn test_focus_kept_across_full_update() {
        let root = NodeId::from(1u64);
        let field = NodeId::from(2u64);
        let mut window = NodeBuilder::new(Role::Window);
        window.push_child(field);
        let mut update = TreeUpdate::with_root(root);
        update.add(root, window.build());
        update.add(field, NodeBuilder::new(Role::TextInput).build());

        let exported = to_accesskit_update(&update, Some(field)).unwrap();
        assert_eq!(exported.focus, accesskit::NodeId(2));

        update.focus = Some(root);
        let exported = to_accesskit_update(&update, Some(field)).unwrap();
        assert_eq!(exported.focus, accesskit::NodeId(1));
    }

    #[test]
    fn test_focus_required() {
        let mut update = TreeUpdate::new();
        update.add(NodeId::from(3u64), NodeBuilder::new(Role::Button).build());
        assert_eq!(
            to_accesskit_update(&update, None).unwrap_err(),
            ExportError::MissingFocus
        );
        let exported = to_accesskit_update(&update, Some(NodeId::from(3u64))).unwrap();
        assert_eq!(exported.focus, accesskit::NodeId(3));
    }
}
