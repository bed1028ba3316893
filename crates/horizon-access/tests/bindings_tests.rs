//! Integration tests for the integer-handle boundary.

use std::sync::Arc;

use horizon_access::{
    Adapter, AdapterError, BindingError, BridgeConfig, HOST_VIEW_ID, HandleTable, HostView,
    NodeInfo, VirtualViewBridge,
};
use horizon_access_core::{HandleKind, NodeId, Role};

struct Host;

impl HostView for Host {
    fn initialize_info(&self, _info: &mut NodeInfo) {}

    fn package_name(&self) -> Option<String> {
        None
    }

    fn perform_accessibility_action(&self, _action: i32, _args: &horizon_access::ActionArguments) -> bool {
        true
    }
}

fn ordinal(role: Role) -> i32 {
    i32::from(role.ordinal())
}

fn is_illegal(result: Result<impl std::fmt::Debug, BindingError>, expected: HandleKind) -> bool {
    matches!(result, Err(BindingError::IllegalState { kind, .. }) if kind == expected)
}

#[test]
fn test_tree_built_through_handles() {
    let table = HandleTable::new();

    let window = table.builder_new(ordinal(Role::Window)).unwrap();
    table.builder_set_name(window, "Settings".as_bytes()).unwrap();
    table.builder_push_child(window, 2, 0).unwrap();
    table.builder_push_child(window, 3, 0).unwrap();
    let window = table.builder_build(window).unwrap();

    let toggle = table.builder_new(ordinal(Role::Switch)).unwrap();
    table.builder_set_name(toggle, "Wi-Fi".as_bytes()).unwrap();
    table.builder_set_bounds(toggle, 0.0, 0.0, 200.0, 48.0).unwrap();
    let toggle = table.builder_build(toggle).unwrap();

    let heading = table.builder_new(ordinal(Role::Heading)).unwrap();
    table.builder_set_name(heading, "Réseau".as_bytes()).unwrap();
    let heading = table.builder_build(heading).unwrap();

    let update = table.update_new();
    table.update_set_root(update, 1, 0).unwrap();
    table.update_set_focus(update, 2, 0).unwrap();
    table.update_add_node(update, 1, 0, window).unwrap();
    table.update_add_node(update, 2, 0, toggle).unwrap();
    table.update_add_node(update, 3, 0, heading).unwrap();

    let adapter = Arc::new(Adapter::new(|| None));
    let changes = table.push(update, &adapter).unwrap();
    assert_eq!(changes.updated, 3);
    assert!(table.is_empty());

    let bridge = VirtualViewBridge::with_config(adapter.clone(), Arc::new(Host), &BridgeConfig::default());
    let host = bridge.resolve_info(HOST_VIEW_ID).unwrap();
    assert_eq!(host.text.as_deref(), Some("Settings"));
    assert_eq!(host.children.len(), 2);

    let toggle = bridge.resolve_info(host.children[0]).unwrap();
    assert_eq!(toggle.role, Role::Switch);
    assert_eq!(toggle.text.as_deref(), Some("Wi-Fi"));
    assert!(toggle.focused);
    assert_eq!(toggle.class_name.as_deref(), Some("android.widget.Switch"));

    let heading = bridge.resolve_info(host.children[1]).unwrap();
    assert_eq!(heading.text.as_deref(), Some("Réseau"));
}

#[test]
fn test_every_handle_rejected_after_consumption() {
    let table = HandleTable::new();
    let builder = table.builder_new(ordinal(Role::Button)).unwrap();
    let node = table.builder_build(builder).unwrap();
    let update = table.update_new();
    table.update_set_root(update, 1, 0).unwrap();
    table.update_add_node(update, 1, 0, node).unwrap();
    let adapter = Adapter::new(|| None);
    table.push(update, &adapter).unwrap();

    assert!(is_illegal(table.builder_build(builder), HandleKind::NodeBuilder));
    assert!(is_illegal(
        table.builder_set_name(builder, b"late"),
        HandleKind::NodeBuilder
    ));
    assert!(is_illegal(table.update_add_node(update, 2, 0, node), HandleKind::TreeUpdate));
    assert!(is_illegal(table.update_set_focus(update, 1, 0), HandleKind::TreeUpdate));
    assert!(is_illegal(table.push(update, &adapter), HandleKind::TreeUpdate));

    // Drops of consumed handles are no-ops.
    table.builder_drop(builder);
    table.node_drop(node);
    table.update_drop(update);
    assert_eq!(adapter.node_count(), 1);
}

#[test]
fn test_duplicate_identity_rejected_by_adapter() {
    let table = HandleTable::new();
    let adapter = Adapter::new(|| None);

    let update = table.update_new();
    table.update_set_root(update, 1, 0).unwrap();
    for _ in 0..2 {
        let builder = table.builder_new(ordinal(Role::Window)).unwrap();
        let node = table.builder_build(builder).unwrap();
        table.update_add_node(update, 1, 0, node).unwrap();
    }

    assert_eq!(
        table.push(update, &adapter),
        Err(BindingError::Adapter(AdapterError::DuplicateNode(
            NodeId::from_parts(1, 0)
        )))
    );
    assert!(!adapter.is_active());
}

#[test]
fn test_dropped_update_releases_nodes() {
    let table = HandleTable::new();
    let update = table.update_new();
    for low in 1..=3 {
        let builder = table.builder_new(ordinal(Role::ListItem)).unwrap();
        let node = table.builder_build(builder).unwrap();
        table.update_add_node(update, low, 0, node).unwrap();
    }
    assert_eq!(table.len(), 1);
    table.update_drop(update);
    table.update_drop(update);
    assert!(table.is_empty());
}

#[test]
fn test_handles_are_not_reused_after_release() {
    let table = HandleTable::new();
    let first = table.update_new();
    table.update_drop(first);
    let second = table.update_new();
    assert_ne!(first, second, "slot reuse bumps the generation");
    assert!(is_illegal(table.update_set_root(first, 1, 0), HandleKind::TreeUpdate));
    table.update_set_root(second, 1, 0).unwrap();
}
