//! Node descriptions
//!
//! Immutable declarative trees handed to the builder and reconciler.
//! A description is either a text leaf or an element with a tag,
//! attributes, and ordered children. Child order is significant:
//! the reconciler matches children by position.
//!
//! Author: Moroya Sakamoto

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};
#[cfg(feature = "std")]
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Attribute mapping (name -> value), iterated in name order
pub type Attributes = BTreeMap<String, String>;

/// Node description — text leaf or element
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum VNode {
    /// Text leaf
    Text(String),
    /// Element with tag, attributes, and children
    Element(VElement),
}

/// Element description
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VElement {
    /// Tag name (e.g. "div")
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub tag: String,
    /// Attributes
    #[cfg_attr(
        feature = "serde",
        serde(rename = "props", default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    pub attrs: Attributes,
    /// Children, in document order
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<VNode>,
}

impl VElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<VNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VNode>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

impl VNode {
    /// Text leaf
    pub fn text(text: impl Into<String>) -> Self {
        VNode::Text(text.into())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, VNode::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            VNode::Text(s) => Some(s),
            VNode::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&VElement> {
        match self {
            VNode::Text(_) => None,
            VNode::Element(el) => Some(el),
        }
    }

    /// Tag name, `None` for text
    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|el| el.tag.as_str())
    }

    /// Number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        match self {
            VNode::Text(_) => 1,
            VNode::Element(el) => 1 + el.children.iter().map(VNode::node_count).sum::<usize>(),
        }
    }

    /// Height of this subtree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        match self {
            VNode::Text(_) => 1,
            VNode::Element(el) => 1 + el.children.iter().map(VNode::depth).max().unwrap_or(0),
        }
    }

    /// Reject descriptions containing an element with an empty tag
    pub fn validate(&self) -> Result<()> {
        match self {
            VNode::Text(_) => Ok(()),
            VNode::Element(el) => {
                if el.tag.is_empty() {
                    return Err(Error::EmptyTag);
                }
                el.children.iter().try_for_each(VNode::validate)
            }
        }
    }
}

impl From<&str> for VNode {
    fn from(text: &str) -> Self {
        VNode::Text(String::from(text))
    }
}

impl From<String> for VNode {
    fn from(text: String) -> Self {
        VNode::Text(text)
    }
}

impl From<VElement> for VNode {
    fn from(el: VElement) -> Self {
        VNode::Element(el)
    }
}

/// Hyperscript-style element constructor
///
/// ```
/// use alice_vdom::{h, VNode};
///
/// let node = h("div", [("class", "greeting")], ["hi"]);
/// assert_eq!(node.tag(), Some("div"));
/// assert_eq!(node.node_count(), 2);
/// ```
pub fn h<A, K, V, C>(tag: &str, attrs: A, children: C) -> VNode
where
    A: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
    C: IntoIterator,
    C::Item: Into<VNode>,
{
    let mut el = VElement::new(tag).with_children(children);
    for (name, value) in attrs {
        el.attrs.insert(name.into(), value.into());
    }
    VNode::Element(el)
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_deserialize_element_shape() {
        let json = r#"{"type":"div","props":{"class":"a"},"children":["hi"]}"#;
        let node: VNode = serde_json::from_str(json).unwrap();
        assert_eq!(node, h("div", [("class", "a")], ["hi"]));
    }

    #[test]
    fn test_deserialize_props_and_children_optional() {
        let node: VNode = serde_json::from_str(r#"{"type":"br"}"#).unwrap();
        assert_eq!(node, VNode::from(VElement::new("br")));
    }

    #[test]
    fn test_deserialize_text() {
        let node: VNode = serde_json::from_str(r#""plain""#).unwrap();
        assert_eq!(node, VNode::text("plain"));
    }

    #[test]
    fn test_deserialize_missing_type_fails() {
        let result: core::result::Result<VNode, _> =
            serde_json::from_str(r#"{"props":{},"children":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_omits_empty_props() {
        let node = h("p", [("a", "1")], [VNode::from(VElement::new("b"))]);
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(
            json,
            r#"{"type":"p","props":{"a":"1"},"children":[{"type":"b","children":[]}]}"#
        );
    }
}
