//! ALICE-VDOM — Virtual DOM reconciliation
//!
//! Describe the tree, don't mutate it by hand.
//!
//! Declarative node descriptions reconciled onto a live tree in place:
//! - Recursive builder from description to live subtree
//! - Positional (non-keyed) reconciler with minimal attribute writes
//! - Rendering-surface trait so the algorithm never owns live nodes
//! - In-memory arena surface with mark-sweep GC of detached nodes
//! - Mutation recorder for auditing exactly what a pass wrote
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`vnode`] | Node descriptions (text / element), builders, validation |
//! | [`surface`] | Rendering-surface trait (create, attribute, splice, read) |
//! | [`builder`] | Description → fresh live subtree |
//! | [`reconcile`](mod@reconcile) | Old + new description → in-place patch of a live subtree |
//! | [`arena`] | In-memory surface with O(1) lookup, snapshot, and HTML output |
//! | [`gc`] | Mark-sweep collection of detached arena nodes |
//! | [`recorder`] | Surface decorator that logs successful mutations |
//! | [`root`] | Mounted root that owns its current description |
//!
//! # Feature flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `std` | Enable `std` collections (default; otherwise `no_std` + `alloc`) |
//! | `serde` | (De)serialize descriptions as `{"type", "props", "children"}` (default) |
//!
//! # Quick Start
//!
//! ```
//! use alice_vdom::{h, mount, reconcile, ArenaDom};
//!
//! let mut dom = ArenaDom::new();
//! let body = dom.root_id();
//!
//! let old = h("div", [("class", "a")], ["hi"]);
//! let live = mount(&mut dom, &body, &old).unwrap();
//!
//! // Same tag: attributes and text are patched, the node is kept
//! let new = h("div", [("class", "b")], ["bye"]);
//! reconcile(&mut dom, Some(&old), Some(&new), &live).unwrap();
//!
//! assert_eq!(dom.to_html(live), r#"<div class="b">bye</div>"#);
//! ```
//!
//! Author: Moroya Sakamoto

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod arena;
pub mod builder;
pub mod error;
pub mod gc;
pub mod reconcile;
pub mod recorder;
pub mod root;
pub mod surface;
pub mod vnode;

pub use arena::{ArenaDom, LiveKind, LiveNode, NodeId};
pub use builder::{build, mount};
pub use error::{Error, Result};
pub use gc::{collect_garbage, dry_run, GcResult};
pub use reconcile::reconcile;
pub use recorder::{Mutation, Recorder};
pub use root::Root;
pub use surface::Surface;
pub use vnode::{h, Attributes, VElement, VNode};
