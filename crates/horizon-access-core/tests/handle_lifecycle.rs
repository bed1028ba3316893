//! Integration tests for the consume-once handle protocol.

use horizon_access_core::{
    Action, HandleKind, HandleState, LifecycleError, NodeBuilderHandle, NodeHandle, NodeId, Rect,
    Role, TreeUpdateHandle,
};

fn button(name: &str) -> NodeHandle {
    let mut builder = NodeBuilderHandle::new(Role::Button);
    builder.set_name(name).unwrap();
    builder
        .set_bounds(Rect::from_origin_size(0.0, 0.0, 80.0, 24.0))
        .unwrap();
    builder.with_builder(|b| b.add_action(Action::Click)).unwrap();
    builder.build().unwrap()
}

#[test]
fn test_full_hand_off_chain() {
    let root = NodeId::from_parts(1, 0);
    let ok = NodeId::from_parts(2, 0);

    let mut window = NodeBuilderHandle::new(Role::Window);
    window.set_children(vec![ok]).unwrap();
    let mut window = window.build().unwrap();
    let mut ok_button = button("OK");

    let mut update = TreeUpdateHandle::new();
    update.set_root(root).unwrap();
    update.add(root, &mut window).unwrap();
    update.add(ok, &mut ok_button).unwrap();

    let update = update.hand_off().unwrap();
    assert_eq!(update.len(), 2);
    let node = update.node(ok).unwrap();
    assert_eq!(node.name(), Some("OK"));
    assert!(node.supports_action(Action::Click));
    assert_eq!(window.state(), HandleState::Consumed);
    assert_eq!(ok_button.state(), HandleState::Consumed);
}

#[test]
fn test_every_operation_on_consumed_node_fails() {
    let mut node = button("Cancel");
    let mut update = TreeUpdateHandle::new();
    update.add(NodeId::from_parts(9, 0), &mut node).unwrap();

    let errors = [
        node.role().err(),
        node.name().err(),
        node.node().err(),
        update.add(NodeId::from_parts(10, 0), &mut node).err(),
    ];
    for error in errors {
        assert_eq!(
            error.map(|e| e.kind()),
            Some(HandleKind::Node),
            "consumed node must reject every operation"
        );
    }

    // Releasing after hand-off is allowed and changes nothing.
    node.release();
    assert_eq!(update.len().unwrap(), 1);
}

#[test]
fn test_error_message_names_operation() {
    let mut builder = NodeBuilderHandle::new(Role::Link);
    builder.build().unwrap();
    let err = builder.build().unwrap_err();
    assert_eq!(
        err,
        LifecycleError::IllegalState {
            kind: HandleKind::NodeBuilder,
            operation: "build node",
        }
    );
    assert_eq!(
        err.to_string(),
        "cannot build node: node builder has already been consumed"
    );
}

#[test]
fn test_released_update_drops_contained_nodes() {
    let mut update = TreeUpdateHandle::new();
    let mut node = button("Apply");
    update.add(NodeId::from_parts(3, 0), &mut node).unwrap();
    update.release();
    assert_eq!(update.state(), HandleState::Consumed);
    assert!(update.hand_off().is_err());
}
