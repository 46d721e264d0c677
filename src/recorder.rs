//! Mutation recorder
//!
//! Surface decorator that forwards every call to an inner surface and
//! logs each mutation that succeeded. Useful for asserting what a
//! reconcile pass actually wrote, and for batching the log to a remote
//! renderer.
//!
//! Author: Moroya Sakamoto

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::error::Result;
use crate::surface::Surface;

/// A single write against a rendering surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<N> {
    /// Element allocated (detached)
    CreateElement { node: N, tag: String },
    /// Text node allocated (detached)
    CreateText { node: N, text: String },
    /// Attribute set or overwritten
    SetAttribute { node: N, name: String, value: String },
    /// Attribute removed
    RemoveAttribute { node: N, name: String },
    /// Child appended at the tail
    AppendChild { parent: N, child: N },
    /// `old_child` swapped out for `new_child`
    ReplaceChild { parent: N, new_child: N, old_child: N },
    /// Child detached
    RemoveChild { parent: N, child: N },
    /// Text content rewritten
    SetText { node: N, text: String },
}

impl<N> Mutation<N> {
    /// Allocation only; does not change any attached tree
    pub fn is_creation(&self) -> bool {
        matches!(self, Mutation::CreateElement { .. } | Mutation::CreateText { .. })
    }

    /// Changes child lists
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Mutation::AppendChild { .. } | Mutation::ReplaceChild { .. } | Mutation::RemoveChild { .. }
        )
    }
}

/// Surface wrapper that records successful mutations
#[derive(Debug, Clone)]
pub struct Recorder<S: Surface> {
    inner: S,
    log: Vec<Mutation<S::Node>>,
}

impl<S: Surface> Recorder<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            log: Vec::new(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Direct access; writes made through this are not recorded
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Mutations recorded so far, oldest first
    pub fn mutations(&self) -> &[Mutation<S::Node>] {
        &self.log
    }

    /// Drain the log
    pub fn take_mutations(&mut self) -> Vec<Mutation<S::Node>> {
        core::mem::take(&mut self.log)
    }

    /// Mutations that touched existing nodes (creations excluded)
    pub fn writes(&self) -> impl Iterator<Item = &Mutation<S::Node>> {
        self.log.iter().filter(|m| !m.is_creation())
    }

    fn record(&mut self, result: Result<()>, mutation: impl FnOnce() -> Mutation<S::Node>) -> Result<()> {
        if result.is_ok() {
            self.log.push(mutation());
        }
        result
    }
}

impl<S: Surface> Surface for Recorder<S> {
    type Node = S::Node;

    fn create_element(&mut self, tag: &str) -> S::Node {
        let node = self.inner.create_element(tag);
        self.log.push(Mutation::CreateElement {
            node: node.clone(),
            tag: String::from(tag),
        });
        node
    }

    fn create_text_node(&mut self, text: &str) -> S::Node {
        let node = self.inner.create_text_node(text);
        self.log.push(Mutation::CreateText {
            node: node.clone(),
            text: String::from(text),
        });
        node
    }

    fn set_attribute(&mut self, node: &S::Node, name: &str, value: &str) -> Result<()> {
        let result = self.inner.set_attribute(node, name, value);
        self.record(result, || Mutation::SetAttribute {
            node: node.clone(),
            name: String::from(name),
            value: String::from(value),
        })
    }

    fn remove_attribute(&mut self, node: &S::Node, name: &str) -> Result<()> {
        let result = self.inner.remove_attribute(node, name);
        self.record(result, || Mutation::RemoveAttribute {
            node: node.clone(),
            name: String::from(name),
        })
    }

    fn append_child(&mut self, parent: &S::Node, child: &S::Node) -> Result<()> {
        let result = self.inner.append_child(parent, child);
        self.record(result, || Mutation::AppendChild {
            parent: parent.clone(),
            child: child.clone(),
        })
    }

    fn replace_child(&mut self, parent: &S::Node, new_child: &S::Node, old_child: &S::Node) -> Result<()> {
        let result = self.inner.replace_child(parent, new_child, old_child);
        self.record(result, || Mutation::ReplaceChild {
            parent: parent.clone(),
            new_child: new_child.clone(),
            old_child: old_child.clone(),
        })
    }

    fn remove_child(&mut self, parent: &S::Node, child: &S::Node) -> Result<()> {
        let result = self.inner.remove_child(parent, child);
        self.record(result, || Mutation::RemoveChild {
            parent: parent.clone(),
            child: child.clone(),
        })
    }

    fn set_text_content(&mut self, node: &S::Node, text: &str) -> Result<()> {
        let result = self.inner.set_text_content(node, text);
        self.record(result, || Mutation::SetText {
            node: node.clone(),
            text: String::from(text),
        })
    }

    fn parent_of(&self, node: &S::Node) -> Option<S::Node> {
        self.inner.parent_of(node)
    }

    fn child_at(&self, parent: &S::Node, index: usize) -> Option<S::Node> {
        self.inner.child_at(parent, index)
    }

    fn child_count(&self, parent: &S::Node) -> usize {
        self.inner.child_count(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{ArenaDom, NodeId};
    use crate::builder::mount;
    use crate::error::Error;
    use crate::reconcile::reconcile;
    use crate::vnode::{h, VNode};
    #[cfg(not(feature = "std"))]
    use alloc::vec;

    fn no_attrs() -> [(&'static str, &'static str); 0] {
        []
    }

    fn recorder() -> Recorder<ArenaDom> {
        Recorder::new(ArenaDom::new())
    }

    #[test]
    fn test_records_creation_and_append() {
        let mut rec = recorder();
        let node = mount(&mut rec, &0, &VNode::text("hi")).unwrap();
        assert_eq!(
            rec.mutations(),
            &[
                Mutation::CreateText { node, text: String::from("hi") },
                Mutation::AppendChild { parent: 0, child: node },
            ]
        );
    }

    #[test]
    fn test_failed_mutation_not_recorded() {
        let mut rec = recorder();
        let t = rec.create_text_node("t");
        assert_eq!(rec.set_attribute(&t, "a", "1"), Err(Error::NotAnElement(t)));
        assert_eq!(rec.mutations().len(), 1);
        assert!(rec.mutations()[0].is_creation());
    }

    #[test]
    fn test_identical_reconcile_records_nothing() {
        let mut rec = recorder();
        let vnode = h("div", [("class", "a")], ["x", "y"]);
        let d = mount(&mut rec, &0, &vnode).unwrap();
        rec.take_mutations();

        reconcile(&mut rec, Some(&vnode), Some(&vnode), &d).unwrap();
        assert!(rec.mutations().is_empty());
    }

    #[test]
    fn test_changed_attribute_only_writes_once() {
        let mut rec = recorder();
        let old = h("div", [("class", "a"), ("id", "same")], ["x"]);
        let new = h("div", [("class", "b"), ("id", "same")], ["x"]);
        let d = mount(&mut rec, &0, &old).unwrap();
        rec.take_mutations();

        reconcile(&mut rec, Some(&old), Some(&new), &d).unwrap();
        assert_eq!(
            rec.take_mutations(),
            vec![Mutation::SetAttribute {
                node: d,
                name: String::from("class"),
                value: String::from("b"),
            }]
        );
    }

    #[test]
    fn test_tail_shrink_removes_last_first() {
        let mut rec = recorder();
        let old = h("ul", no_attrs(), ["a", "b", "c"]);
        let new = h("ul", no_attrs(), ["a"]);
        let ul = mount(&mut rec, &0, &old).unwrap();
        let kids: Vec<NodeId> = rec.inner().children(ul).to_vec();
        rec.take_mutations();

        reconcile(&mut rec, Some(&old), Some(&new), &ul).unwrap();
        assert_eq!(
            rec.take_mutations(),
            vec![
                Mutation::RemoveChild { parent: ul, child: kids[2] },
                Mutation::RemoveChild { parent: ul, child: kids[1] },
            ]
        );
    }

    #[test]
    fn test_writes_skip_creations() {
        let mut rec = recorder();
        let old = h("div", no_attrs(), Vec::<VNode>::new());
        let new = h("span", no_attrs(), Vec::<VNode>::new());
        let d = mount(&mut rec, &0, &old).unwrap();
        rec.take_mutations();

        reconcile(&mut rec, Some(&old), Some(&new), &d).unwrap();
        let writes: Vec<_> = rec.writes().collect();
        assert_eq!(writes.len(), 1);
        assert!(writes[0].is_structural());
        assert!(matches!(writes[0], Mutation::ReplaceChild { old_child, .. } if *old_child == d));
    }

    #[test]
    fn test_inner_mut_bypasses_log() {
        let mut rec = recorder();
        let t = rec.inner_mut().create_text_node("quiet");
        rec.inner_mut().append_child(&0, &t).unwrap();
        assert!(rec.mutations().is_empty());
        assert_eq!(rec.into_inner().children(0), &[t]);
    }
}
