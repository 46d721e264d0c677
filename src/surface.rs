//! Rendering surface interface
//!
//! The builder and reconciler never touch live nodes directly. Every
//! read and write goes through this trait, so the same algorithm can
//! drive the in-memory [`ArenaDom`](crate::arena::ArenaDom), a
//! recording decorator, or a host DOM binding.
//!
//! Author: Moroya Sakamoto

use core::fmt::Debug;

use crate::error::Result;

/// Host tree that live nodes belong to
///
/// Handles are opaque: the surface owns the nodes, callers only hold
/// identifiers. Mutating calls return an error for stale or mismatched
/// handles instead of panicking.
pub trait Surface {
    /// Opaque live node handle
    type Node: Clone + PartialEq + Debug;

    /// Create a detached element
    fn create_element(&mut self, tag: &str) -> Self::Node;

    /// Create a detached text node
    fn create_text_node(&mut self, text: &str) -> Self::Node;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<()>;

    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<()>;

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

    /// Put `new_child` at the position `old_child` occupies; `old_child` becomes detached
    fn replace_child(
        &mut self,
        parent: &Self::Node,
        new_child: &Self::Node,
        old_child: &Self::Node,
    ) -> Result<()>;

    /// Detach `child` from `parent`
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

    /// Replace the content of a text node
    fn set_text_content(&mut self, node: &Self::Node, text: &str) -> Result<()>;

    fn parent_of(&self, node: &Self::Node) -> Option<Self::Node>;

    fn child_at(&self, parent: &Self::Node, index: usize) -> Option<Self::Node>;

    fn child_count(&self, parent: &Self::Node) -> usize;
}
