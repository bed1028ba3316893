//! Virtual view ids and their allocation.

use std::collections::HashMap;

use horizon_access_core::NodeId;

/// The virtual view id that addresses the host view itself.
pub const HOST_VIEW_ID: i32 = -1;

/// Bidirectional map between live node identities and virtual view ids.
///
/// Ids are handed out sequentially starting at the configured first id,
/// wrapping around the `i32` range and skipping [`HOST_VIEW_ID`] and any id
/// still assigned. A node keeps its id for as long as it stays in the tree.
#[derive(Debug, Clone)]
pub(crate) struct ViewIdMap {
    by_node: HashMap<NodeId, i32>,
    by_view: HashMap<i32, NodeId>,
    next: i32,
}

impl ViewIdMap {
    pub(crate) fn new(first: i32) -> Self {
        Self {
            by_node: HashMap::new(),
            by_view: HashMap::new(),
            next: first,
        }
    }

    /// Return the id of `node`, assigning a fresh one if it has none.
    pub(crate) fn assign(&mut self, node: NodeId) -> i32 {
        if let Some(&id) = self.by_node.get(&node) {
            return id;
        }
        // The id space is larger than any tree that fits in memory, so a
        // free id always exists.
        let id = loop {
            let candidate = self.next;
            self.next = self.next.wrapping_add(1);
            if candidate != HOST_VIEW_ID && !self.by_view.contains_key(&candidate) {
                break candidate;
            }
        };
        self.by_node.insert(node, id);
        self.by_view.insert(id, node);
        id
    }

    /// Forget the id of `node`, making it available again.
    pub(crate) fn release(&mut self, node: NodeId) -> Option<i32> {
        let id = self.by_node.remove(&node)?;
        self.by_view.remove(&id);
        Some(id)
    }

    pub(crate) fn view_id(&self, node: NodeId) -> Option<i32> {
        self.by_node.get(&node).copied()
    }

    pub(crate) fn node_id(&self, view_id: i32) -> Option<NodeId> {
        self.by_view.get(&view_id).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_node.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sequential_and_stable() {
        let mut map = ViewIdMap::new(0);
        let a = NodeId::from(10u64);
        let b = NodeId::from(20u64);
        assert_eq!(map.assign(a), 0);
        assert_eq!(map.assign(b), 1);
        assert_eq!(map.assign(a), 0);
        assert_eq!(map.node_id(1), Some(b));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_skips_host_view_id() {
        let mut map = ViewIdMap::new(-2);
        assert_eq!(map.assign(NodeId::from(1u64)), -2);
        assert_eq!(map.assign(NodeId::from(2u64)), 0);
        assert_eq!(map.node_id(HOST_VIEW_ID), None);
    }

    #[test]
    fn test_release_and_wraparound_skip_used_ids() {
        let mut map = ViewIdMap::new(i32::MAX);
        let a = NodeId::from(1u64);
        let b = NodeId::from(2u64);
        assert_eq!(map.assign(a), i32::MAX);
        assert_eq!(map.assign(b), i32::MIN);

        assert_eq!(map.release(a), Some(i32::MAX));
        assert_eq!(map.release(a), None);
        assert_eq!(map.view_id(a), None);
        assert_eq!(map.node_id(i32::MAX), None);
        assert_eq!(map.view_id(b), Some(i32::MIN));
    }

    #[test]
    fn test_released_id_not_reused_while_in_use() {
        let mut map = ViewIdMap::new(0);
        for raw in 0..3u64 {
            map.assign(NodeId::from(raw));
        }
        map.release(NodeId::from(1u64));
        // Counter moves on rather than immediately recycling id 1.
        assert_eq!(map.assign(NodeId::from(9u64)), 3);
    }

    proptest! {
        #[test]
        fn assignments_stay_bijective(
            first in any::<i32>(),
            ops in prop::collection::vec((any::<bool>(), 0u64..16), 0..64),
        ) {
            let mut map = ViewIdMap::new(first);
            for (assign, raw) in ops {
                let node = NodeId::from(raw);
                if assign {
                    let id = map.assign(node);
                    prop_assert_ne!(id, HOST_VIEW_ID);
                    prop_assert_eq!(map.node_id(id), Some(node));
                } else {
                    map.release(node);
                    prop_assert_eq!(map.view_id(node), None);
                }
            }
            prop_assert_eq!(map.by_node.len(), map.by_view.len());
            for (&node, &id) in &map.by_node {
                prop_assert_eq!(map.node_id(id), Some(node));
            }
        }
    }
}
