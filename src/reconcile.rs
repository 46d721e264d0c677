//! Reconciler
//!
//! Patches a live subtree in place so it matches a new description,
//! given the description it currently represents. Dispatch order:
//!
//! 1. both text: rewrite content if it changed
//! 2. old missing: build new, append under the live node (the parent)
//! 3. new missing: remove the live node from its parent
//! 4. same tag: diff attributes, then children by position
//! 5. anything else (tag change, text ↔ element): build new and replace
//!
//! Children are matched by index, not by key. Reordering `[a, b]` into
//! `[b, a]` rewrites both slots instead of moving nodes. Growth and
//! shrinkage always happen at the tail.
//!
//! Author: Moroya Sakamoto

use tracing::{debug, trace};

use crate::builder::build_unchecked;
use crate::error::{Error, Result};
use crate::surface::Surface;
use crate::vnode::{VElement, VNode};

/// Update `node` from `old` to `new`
///
/// `node` must be the live node built for `old`. When `old` is `None`,
/// `node` is the parent the new subtree is appended to. `(None, None)`
/// does nothing.
///
/// An error means the live tree did not match `old` or the surface
/// rejected a handle. The tree may be partially patched at that point
/// and a second pass with the same `old` is not safe.
pub fn reconcile<S: Surface>(
    surface: &mut S,
    old: Option<&VNode>,
    new: Option<&VNode>,
    node: &S::Node,
) -> Result<()> {
    if let Some(new) = new {
        new.validate()?;
    }
    debug!(
        old_nodes = old.map_or(0, VNode::node_count),
        new_nodes = new.map_or(0, VNode::node_count),
        "reconcile"
    );
    patch(surface, old, new, node)
}

fn patch<S: Surface>(
    surface: &mut S,
    old: Option<&VNode>,
    new: Option<&VNode>,
    node: &S::Node,
) -> Result<()> {
    match (old, new) {
        (None, None) => Ok(()),
        (None, Some(new)) => {
            trace!(parent = ?node, "append new subtree");
            let child = build_unchecked(surface, new)?;
            surface.append_child(node, &child)
        }
        (Some(_), None) => {
            trace!(node = ?node, "remove subtree");
            let parent = surface.parent_of(node).ok_or(Error::Detached)?;
            surface.remove_child(&parent, node)
        }
        (Some(VNode::Text(old_text)), Some(VNode::Text(new_text))) => {
            if old_text != new_text {
                surface.set_text_content(node, new_text)?;
            }
            Ok(())
        }
        (Some(VNode::Element(old_el)), Some(VNode::Element(new_el))) if old_el.tag == new_el.tag => {
            update_element(surface, old_el, new_el, node)
        }
        (Some(_), Some(new)) => replace(surface, new, node),
    }
}

/// Tag change or text ↔ element: no reuse, build fresh and swap
fn replace<S: Surface>(surface: &mut S, new: &VNode, node: &S::Node) -> Result<()> {
    trace!(node = ?node, tag = new.tag().unwrap_or("#text"), "replace subtree");
    let parent = surface.parent_of(node).ok_or(Error::Detached)?;
    let fresh = build_unchecked(surface, new)?;
    surface.replace_child(&parent, &fresh, node)
}

fn update_element<S: Surface>(
    surface: &mut S,
    old: &VElement,
    new: &VElement,
    node: &S::Node,
) -> Result<()> {
    diff_attributes(surface, old, new, node)?;
    diff_children(surface, old, new, node)
}

fn diff_attributes<S: Surface>(
    surface: &mut S,
    old: &VElement,
    new: &VElement,
    node: &S::Node,
) -> Result<()> {
    for name in old.attrs.keys() {
        if !new.attrs.contains_key(name) {
            surface.remove_attribute(node, name)?;
        }
    }
    for (name, value) in &new.attrs {
        if old.attrs.get(name) != Some(value) {
            surface.set_attribute(node, name, value)?;
        }
    }
    Ok(())
}

fn diff_children<S: Surface>(
    surface: &mut S,
    old: &VElement,
    new: &VElement,
    node: &S::Node,
) -> Result<()> {
    let shared = old.children.len().min(new.children.len());

    for (index, (old_child, new_child)) in old.children.iter().zip(&new.children).enumerate() {
        let live = surface.child_at(node, index).ok_or_else(|| Error::MissingChild {
            index,
            count: surface.child_count(node),
        })?;
        patch(surface, Some(old_child), Some(new_child), &live)?;
    }

    for extra in &new.children[shared..] {
        let child = build_unchecked(surface, extra)?;
        surface.append_child(node, &child)?;
    }

    // Trim from the end, exactly `excess` removals
    let live_count = surface.child_count(node);
    let excess = live_count.saturating_sub(new.children.len());
    if excess > 0 {
        trace!(node = ?node, excess, "trim trailing children");
    }
    for _ in 0..excess {
        let count = surface.child_count(node);
        let last = count
            .checked_sub(1)
            .and_then(|index| surface.child_at(node, index))
            .ok_or(Error::MissingChild { index: count.saturating_sub(1), count })?;
        surface.remove_child(node, &last)?;
    }
    Ok(())
}
