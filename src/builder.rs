//! Tree builder
//!
//! Turns a description into a fresh live subtree. Never touches an
//! existing live node, except that [`mount`] appends the result.
//!
//! Author: Moroya Sakamoto

use tracing::trace;

use crate::error::Result;
use crate::surface::Surface;
use crate::vnode::VNode;

/// Build a detached live subtree for `vnode`
///
/// The description is validated first, so a malformed one allocates
/// nothing and returns [`Error::EmptyTag`](crate::Error::EmptyTag).
pub fn build<S: Surface>(surface: &mut S, vnode: &VNode) -> Result<S::Node> {
    vnode.validate()?;
    build_unchecked(surface, vnode)
}

/// Build `vnode` and append it as the last child of `parent`
pub fn mount<S: Surface>(surface: &mut S, parent: &S::Node, vnode: &VNode) -> Result<S::Node> {
    let node = build(surface, vnode)?;
    surface.append_child(parent, &node)?;
    Ok(node)
}

/// Build without validating; callers have already checked the whole tree
pub(crate) fn build_unchecked<S: Surface>(surface: &mut S, vnode: &VNode) -> Result<S::Node> {
    match vnode {
        VNode::Text(text) => Ok(surface.create_text_node(text)),
        VNode::Element(el) => {
            trace!(tag = %el.tag, attrs = el.attrs.len(), children = el.children.len(), "build element");
            let node = surface.create_element(&el.tag);
            for (name, value) in &el.attrs {
                surface.set_attribute(&node, name, value)?;
            }
            for child in &el.children {
                let child_node = build_unchecked(surface, child)?;
                surface.append_child(&node, &child_node)?;
            }
            Ok(node)
        }
    }
}
