//! Pensions DOM - Document Object Model
//!
//! Arena-backed DOM tree the page enhancer runs against.
//!
//! - Nodes live in a `Vec` and reference each other through [`NodeId`]
//! - Class lists are cached per element and kept in sync with `class`
//! - Selectors cover the subset the frontend scripts use
//! - Events and listeners are plain data, dispatched by the embedder

mod node;
mod tree;
mod document;
mod classlist;
mod selector;
mod forms;
pub mod events;

pub use node::{Node, NodeData, ElementData, TextData, Attribute, ControlState};
pub use tree::{DomTree, Children};
pub use document::Document;
pub use classlist::DOMTokenList;
pub use selector::{Selector, SelectorError};
pub use events::{Event, EventType, EventTarget, Key, Listener, ListenerId, Listeners};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#none")
        }
    }
}
