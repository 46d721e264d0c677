//! Proptest strategies for reconciler property tests
//!
//! Small alphabets on purpose: colliding tags, attribute names, and
//! text values exercise the in-place paths instead of always replacing.

use alice_vdom::{Attributes, VElement, VNode};
use proptest::prelude::*;

/// Tag drawn from a handful of names so same-tag pairs are common
pub fn arb_tag() -> impl Strategy<Value = String> {
    prop_oneof![Just("div"), Just("span"), Just("p"), Just("ul")].prop_map(String::from)
}

/// Short text, empty included
pub fn arb_text() -> impl Strategy<Value = String> {
    "[a-c]{0,3}"
}

/// Up to three attributes over a shared name pool
pub fn arb_attrs() -> impl Strategy<Value = Attributes> {
    let name = prop_oneof![Just("class"), Just("id"), Just("title")].prop_map(String::from);
    prop::collection::btree_map(name, "[a-c]{0,2}", 0..3)
}

/// Any description: text leaves, elements up to four levels deep
pub fn arb_vnode() -> impl Strategy<Value = VNode> {
    let leaf = arb_text().prop_map(VNode::Text);
    leaf.prop_recursive(4, 32, 4, |inner| {
        (arb_tag(), arb_attrs(), prop::collection::vec(inner, 0..4)).prop_map(
            |(tag, attrs, children)| VNode::Element(VElement { tag, attrs, children }),
        )
    })
}

/// Element-rooted description
pub fn arb_element() -> impl Strategy<Value = VNode> {
    (arb_tag(), arb_attrs(), prop::collection::vec(arb_vnode(), 0..5))
        .prop_map(|(tag, attrs, children)| VNode::Element(VElement { tag, attrs, children }))
}
