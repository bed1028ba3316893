//! The native host view and the argument bundles passed to its actions.

use std::collections::BTreeMap;

use super::info::NodeInfo;

/// A value in an [`ActionArguments`] bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    /// A boolean flag.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Text(String),
}

/// The opaque argument bundle that accompanies a platform action.
///
/// The bridge forwards it to the host view unchanged and only looks inside
/// when translating an action for the application's own handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionArguments {
    entries: BTreeMap<String, ArgumentValue>,
}

impl ActionArguments {
    /// An empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: ArgumentValue) -> &mut Self {
        self.entries.insert(key.into(), value);
        self
    }

    /// Look up an entry.
    pub fn get(&self, key: &str) -> Option<&ArgumentValue> {
        self.entries.get(key)
    }

    /// Look up a text entry.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(ArgumentValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bundle has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgumentValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// The native view that hosts the accessibility tree.
///
/// The bridge addresses it with [`HOST_VIEW_ID`](super::HOST_VIEW_ID). It
/// may be called from the platform's accessibility thread.
pub trait HostView: Send + Sync {
    /// Fill `info` with the view's own defaults (bounds, class name and
    /// so on) before the root node's semantics are added.
    fn initialize_info(&self, info: &mut NodeInfo);

    /// The package that owns the view.
    fn package_name(&self) -> Option<String>;

    /// The view's own action handler. Returns whether the action was handled.
    fn perform_accessibility_action(&self, action: i32, arguments: &ActionArguments) -> bool;
}
