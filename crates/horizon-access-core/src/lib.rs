//! Core types for Horizon Access.
//!
//! This crate defines the data an application uses to describe its UI to
//! assistive technologies, and the ownership protocol for handing that data
//! to a platform adapter:
//!
//! - **Identity**: [`NodeId`], a 128-bit node identifier
//! - **Roles**: [`Role`], the frequency-ordered role table
//! - **Nodes**: [`NodeBuilder`] stages properties, [`Node`] is the finished,
//!   immutable description
//! - **Updates**: [`TreeUpdate`], an ordered batch of `(NodeId, Node)` pairs
//! - **Handles**: [`NodeBuilderHandle`], [`NodeHandle`] and
//!   [`TreeUpdateHandle`], consume-once wrappers for binding layers that
//!   cannot rely on move semantics
//!
//! # Example
//!
//! ```
//! use horizon_access_core::{NodeBuilder, NodeId, Role, TreeUpdate};
//!
//! let root = NodeId::from_parts(1, 0);
//! let label = NodeId::from_parts(2, 0);
//!
//! let mut window = NodeBuilder::new(Role::Window);
//! window.push_child(label);
//!
//! let mut text = NodeBuilder::new(Role::StaticText);
//! text.set_name("Hello");
//!
//! let mut update = TreeUpdate::with_root(root);
//! update.add(root, window.build());
//! update.add(label, text.build());
//! assert_eq!(update.len(), 2);
//! ```

mod action;
mod error;
mod id;
mod lifecycle;
pub mod logging;
mod node;
mod role;
mod update;

pub use action::{Action, ActionData, ActionHandler, ActionRequest};
pub use error::{HandleKind, LifecycleError, Result};
pub use id::NodeId;
pub use lifecycle::{HandleState, NodeBuilderHandle, NodeHandle, TreeUpdateHandle};
pub use node::{Node, NodeBuilder, Rect, Toggled};
pub use role::{Role, UnknownRoleOrdinal};
pub use update::{Tree, TreeUpdate};
