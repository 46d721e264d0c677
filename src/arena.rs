//! In-memory rendering surface
//!
//! Flat arena of live nodes with O(1) id lookup and O(1) parent lookup.
//! Follows DOM semantics closely enough to test the reconciler against:
//! inserting an attached node moves it, removed nodes stay allocated
//! (detached) until [`collect_garbage`](crate::gc::collect_garbage)
//! sweeps them.
//!
//! Author: Moroya Sakamoto

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap as HashMap;
#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::surface::Surface;
use crate::vnode::{Attributes, VElement, VNode};

/// Unique live node identifier
///
/// Ids come from a monotonic counter and are never reused, not even
/// after [`collect_garbage`](crate::gc::collect_garbage) frees a node, so
/// a stale handle cannot alias a newer node. At 64 bits the counter does
/// not run out within the life of a process.
pub type NodeId = u64;

/// What a live node holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveKind {
    /// Text node
    Text(String),
    /// Element with tag and attributes
    Element { tag: String, attrs: Attributes },
}

/// Live node
#[derive(Debug, Clone)]
pub struct LiveNode {
    /// Unique identifier within the arena
    pub id: NodeId,
    /// Text or element payload
    pub kind: LiveKind,
    /// Child node IDs, in document order
    pub children: Vec<NodeId>,
}

impl LiveNode {
    pub fn element(id: NodeId, tag: &str) -> Self {
        Self {
            id,
            kind: LiveKind::Element {
                tag: String::from(tag),
                attrs: Attributes::new(),
            },
            children: Vec::new(),
        }
    }

    pub fn text(id: NodeId, text: &str) -> Self {
        Self {
            id,
            kind: LiveKind::Text(String::from(text)),
            children: Vec::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, LiveKind::Text(_))
    }

    /// Tag name, `None` for text nodes
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            LiveKind::Element { tag, .. } => Some(tag),
            LiveKind::Text(_) => None,
        }
    }

    /// Text content of a text node
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            LiveKind::Text(t) => Some(t),
            LiveKind::Element { .. } => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        match &self.kind {
            LiveKind::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            LiveKind::Text(_) => None,
        }
    }

    /// All attributes; empty for text nodes
    pub fn attributes(&self) -> Option<&Attributes> {
        match &self.kind {
            LiveKind::Element { attrs, .. } => Some(attrs),
            LiveKind::Text(_) => None,
        }
    }
}

/// Arena DOM — flat storage of live nodes with O(1) ID lookup via HashMap index
#[derive(Debug, Clone)]
pub struct ArenaDom {
    nodes: Vec<LiveNode>,
    /// Maps NodeId → index in `nodes` Vec for O(1) lookup
    index: HashMap<NodeId, usize>,
    /// Maps child NodeId → parent NodeId for O(1) parent lookup
    parent_index: HashMap<NodeId, NodeId>,
    root_id: NodeId,
    next_id: NodeId,
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaDom {
    /// New arena holding a single `body` root container
    pub fn new() -> Self {
        let root = LiveNode::element(0, "body");
        let mut index = HashMap::new();
        index.insert(0, 0);
        Self {
            nodes: vec![root],
            index,
            parent_index: HashMap::new(),
            root_id: 0,
            next_id: 1,
        }
    }

    fn alloc(&mut self, node: impl FnOnce(NodeId) -> LiveNode) -> NodeId {
        // Monotonic, never reused; see `NodeId`
        let id = self.next_id;
        self.next_id += 1;
        let idx = self.nodes.len();
        self.nodes.push(node(id));
        self.index.insert(id, idx);
        id
    }

    /// Get node by ID — O(1) via HashMap index
    pub fn get_node(&self, id: NodeId) -> Option<&LiveNode> {
        self.index.get(&id).map(|&idx| &self.nodes[idx])
    }

    fn get_node_mut(&mut self, id: NodeId) -> Option<&mut LiveNode> {
        self.index.get(&id).map(|&idx| &mut self.nodes[idx])
    }

    fn require(&self, id: NodeId) -> Result<&LiveNode> {
        self.get_node(id).ok_or(Error::UnknownNode(id))
    }

    fn require_mut(&mut self, id: NodeId) -> Result<&mut LiveNode> {
        self.get_node_mut(id).ok_or(Error::UnknownNode(id))
    }

    /// Root container ID
    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// Total allocated node count, detached nodes included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All allocated nodes
    pub fn nodes(&self) -> &[LiveNode] {
        &self.nodes
    }

    /// Parent of a node — O(1) via parent index
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent_index.get(&id).copied()
    }

    /// Children of a node; empty for unknown IDs
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get_node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// True if `node` is `ancestor` or lies beneath it
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    /// True if the node is reachable from the root container
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.get_node(id).is_some() && self.contains(self.root_id, id)
    }

    /// Read a live subtree back into a description
    pub fn snapshot(&self, id: NodeId) -> Option<VNode> {
        let node = self.get_node(id)?;
        match &node.kind {
            LiveKind::Text(text) => Some(VNode::Text(text.clone())),
            LiveKind::Element { tag, attrs } => {
                let children = node
                    .children
                    .iter()
                    .map(|&child| self.snapshot(child))
                    .collect::<Option<Vec<_>>>()?;
                Some(VNode::Element(VElement {
                    tag: tag.clone(),
                    attrs: attrs.clone(),
                    children,
                }))
            }
        }
    }

    /// Serialize a live subtree as HTML
    ///
    /// Attributes are written in name order. Every element gets an
    /// explicit closing tag.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let node = match self.get_node(id) {
            Some(n) => n,
            None => return,
        };
        match &node.kind {
            LiveKind::Text(text) => escape_into(text, false, out),
            LiveKind::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                out.push('>');
                for &child in &node.children {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    /// Unlink a node from its current parent, if any
    fn detach(&mut self, id: NodeId) {
        if let Some(parent_id) = self.parent_index.remove(&id) {
            if let Some(parent) = self.get_node_mut(parent_id) {
                parent.children.retain(|&c| c != id);
            }
        }
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.require(parent)?.is_text() {
            return Err(Error::NotAnElement(parent));
        }
        self.require(child)?;
        if self.contains(child, parent) {
            return Err(Error::HierarchyCycle { parent, child });
        }
        Ok(())
    }

    fn position_of(&self, parent: NodeId, child: NodeId) -> Result<usize> {
        self.require(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(Error::NotAChild { parent, child })
    }

    /// Drop every node for which `keep` is false, then rebuild the indexes
    pub(crate) fn retain_nodes(&mut self, mut keep: impl FnMut(NodeId) -> bool) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|n| keep(n.id));
        self.index.clear();
        for (idx, node) in self.nodes.iter().enumerate() {
            self.index.insert(node.id, idx);
        }
        let index = &self.index;
        self.parent_index
            .retain(|child, parent| index.contains_key(child) && index.contains_key(parent));
        for node in &mut self.nodes {
            node.children.retain(|c| index.contains_key(c));
        }
        before - self.nodes.len()
    }
}

fn escape_into(s: &str, attr: bool, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

impl Surface for ArenaDom {
    type Node = NodeId;

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(|id| LiveNode::element(id, tag))
    }

    fn create_text_node(&mut self, text: &str) -> NodeId {
        self.alloc(|id| LiveNode::text(id, text))
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<()> {
        match &mut self.require_mut(*node)?.kind {
            LiveKind::Element { attrs, .. } => {
                attrs.insert(String::from(name), String::from(value));
                Ok(())
            }
            LiveKind::Text(_) => Err(Error::NotAnElement(*node)),
        }
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<()> {
        match &mut self.require_mut(*node)?.kind {
            LiveKind::Element { attrs, .. } => {
                attrs.remove(name);
                Ok(())
            }
            LiveKind::Text(_) => Err(Error::NotAnElement(*node)),
        }
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<()> {
        let (parent, child) = (*parent, *child);
        self.check_insert(parent, child)?;
        self.detach(child);
        self.require_mut(parent)?.children.push(child);
        self.parent_index.insert(child, parent);
        Ok(())
    }

    fn replace_child(&mut self, parent: &NodeId, new_child: &NodeId, old_child: &NodeId) -> Result<()> {
        let (parent, new_child, old_child) = (*parent, *new_child, *old_child);
        self.position_of(parent, old_child)?;
        if new_child == old_child {
            return Ok(());
        }
        self.check_insert(parent, new_child)?;
        // Detaching a sibling shifts positions, so look the slot up afterwards
        self.detach(new_child);
        let pos = self.position_of(parent, old_child)?;
        self.require_mut(parent)?.children[pos] = new_child;
        self.parent_index.remove(&old_child);
        self.parent_index.insert(new_child, parent);
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<()> {
        let pos = self.position_of(*parent, *child)?;
        self.require_mut(*parent)?.children.remove(pos);
        self.parent_index.remove(child);
        Ok(())
    }

    fn set_text_content(&mut self, node: &NodeId, text: &str) -> Result<()> {
        let id = *node;
        if let LiveKind::Text(content) = &mut self.require_mut(id)?.kind {
            *content = String::from(text);
            return Ok(());
        }
        // Elements lose their children and get a single text child
        let old_children = core::mem::take(&mut self.require_mut(id)?.children);
        for child in old_children {
            self.parent_index.remove(&child);
        }
        let text_id = self.create_text_node(text);
        self.require_mut(id)?.children.push(text_id);
        self.parent_index.insert(text_id, id);
        Ok(())
    }

    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
    }

    fn child_at(&self, parent: &NodeId, index: usize) -> Option<NodeId> {
        self.children(*parent).get(index).copied()
    }

    fn child_count(&self, parent: &NodeId) -> usize {
        self.children(*parent).len()
    }
}
