//! Mounted root
//!
//! Keeps the current description for one subtree mounted in a
//! container so callers only hand over the next description. The root
//! holds the live handle itself, so siblings coming and going around it
//! never change which node it patches. A tag change replaces the node;
//! the replacement is read back from the same position in the parent.
//!
//! A pass that fails after it started writing leaves the live subtree
//! matching neither description. The root is then poisoned: `update`
//! refuses with [`Error::Poisoned`] until `unmount` clears it.
//!
//! Author: Moroya Sakamoto

use tracing::debug;

use crate::builder::mount;
use crate::error::{Error, Result};
use crate::reconcile::reconcile;
use crate::surface::Surface;
use crate::vnode::VNode;

enum State<N> {
    Unmounted,
    Mounted { live: N, current: VNode },
    /// Live subtree no longer matches any known description
    Poisoned { live: N },
}

/// One description mounted under a container
pub struct Root<S: Surface> {
    container: S::Node,
    state: State<S::Node>,
}

impl<S: Surface> Root<S> {
    /// Append `vnode` at the end of `container` and take ownership of it
    pub fn mount(surface: &mut S, container: S::Node, vnode: VNode) -> Result<Self> {
        let mut root = Self {
            container,
            state: State::Unmounted,
        };
        root.update(surface, vnode)?;
        Ok(root)
    }

    /// Description currently rendered, `None` when unmounted or poisoned
    pub fn current(&self) -> Option<&VNode> {
        match &self.state {
            State::Mounted { current, .. } => Some(current),
            _ => None,
        }
    }

    pub fn container(&self) -> &S::Node {
        &self.container
    }

    /// Live node this root owns, `None` when unmounted
    pub fn live_node(&self) -> Option<&S::Node> {
        match &self.state {
            State::Unmounted => None,
            State::Mounted { live, .. } | State::Poisoned { live } => Some(live),
        }
    }

    /// A failed pass left the live subtree half-patched
    pub fn is_poisoned(&self) -> bool {
        matches!(self.state, State::Poisoned { .. })
    }

    /// Reconcile the mounted subtree to `vnode`; mounts if unmounted
    ///
    /// Errors raised before the first write (invalid `vnode`, detached
    /// live node) keep the old description current. Errors raised
    /// mid-pass poison the root.
    pub fn update(&mut self, surface: &mut S, vnode: VNode) -> Result<()> {
        vnode.validate()?;
        match core::mem::replace(&mut self.state, State::Unmounted) {
            State::Unmounted => {
                let live = mount(surface, &self.container, &vnode)?;
                debug!(node = ?live, "mount root");
                self.state = State::Mounted { live, current: vnode };
            }
            State::Mounted { live, current } => {
                let Some((parent, index)) = locate(&*surface, &live) else {
                    self.state = State::Mounted { live, current };
                    return Err(Error::Detached);
                };
                let patched = reconcile(surface, Some(&current), Some(&vnode), &live)
                    .and_then(|()| surface.child_at(&parent, index).ok_or(Error::Detached));
                match patched {
                    Ok(next) => self.state = State::Mounted { live: next, current: vnode },
                    Err(err) => {
                        debug!(node = ?live, error = %err, "root poisoned");
                        self.state = State::Poisoned { live };
                        return Err(err);
                    }
                }
            }
            poisoned @ State::Poisoned { .. } => {
                self.state = poisoned;
                return Err(Error::Poisoned);
            }
        }
        Ok(())
    }

    /// Remove the owned subtree; a no-op when already unmounted
    ///
    /// A poisoned root is cleared even if its node was already detached.
    pub fn unmount(&mut self, surface: &mut S) -> Result<()> {
        match core::mem::replace(&mut self.state, State::Unmounted) {
            State::Unmounted => {}
            State::Mounted { live, current } => {
                if let Err(err) = reconcile(surface, Some(&current), None, &live) {
                    self.state = State::Mounted { live, current };
                    return Err(err);
                }
                debug!(node = ?live, "unmount root");
            }
            State::Poisoned { live } => {
                if let Some(parent) = surface.parent_of(&live) {
                    if let Err(err) = surface.remove_child(&parent, &live) {
                        self.state = State::Poisoned { live };
                        return Err(err);
                    }
                }
                debug!(node = ?live, "unmount poisoned root");
            }
        }
        Ok(())
    }
}

/// Parent of `node` and its position there
fn locate<S: Surface>(surface: &S, node: &S::Node) -> Option<(S::Node, usize)> {
    let parent = surface.parent_of(node)?;
    let index = (0..surface.child_count(&parent))
        .find(|&i| surface.child_at(&parent, i).as_ref() == Some(node))?;
    Some((parent, index))
}
