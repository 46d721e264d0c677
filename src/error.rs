//! Error type
//!
//! Every failure here is a contract violation: a malformed description,
//! a stale handle, or a live tree that does not match the old
//! description it was paired with. None of them are retryable.
//!
//! Author: Moroya Sakamoto

use thiserror::Error;

use crate::arena::NodeId;

/// Reconciliation and surface errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An element description has an empty tag name
    #[error("element description has an empty tag name")]
    EmptyTag,

    /// The live node has no parent to be removed from or replaced in
    #[error("live node is detached from any parent")]
    Detached,

    /// The live tree has fewer children than the old description promised
    #[error("live node has no child at index {index} (child count {count})")]
    MissingChild { index: usize, count: usize },

    /// Handle does not name a node in this surface
    #[error("unknown live node {0}")]
    UnknownNode(NodeId),

    /// Attribute or child operation on a text node
    #[error("live node {0} is not an element")]
    NotAnElement(NodeId),

    /// `child` is not a direct child of `parent`
    #[error("live node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Inserting `child` under `parent` would make a node its own ancestor
    #[error("inserting {child} under {parent} would create a cycle")]
    HierarchyCycle { parent: NodeId, child: NodeId },

    /// An earlier pass failed mid-way; the mounted root must be unmounted first
    #[error("root was left half-patched by a failed update")]
    Poisoned,
}

/// Crate result alias
pub type Result<T> = core::result::Result<T, Error>;
