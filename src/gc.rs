//! Mark-sweep garbage collection for the arena surface
//!
//! Replace and remove only detach live nodes; the arena keeps them
//! allocated so a caller can re-insert them. This pass frees every
//! node no longer reachable from the root container or an extra root.
//!
//! Author: Moroya Sakamoto

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeSet as HashSet;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::collections::HashSet;

use tracing::debug;

use crate::arena::{ArenaDom, NodeId};

/// Node counts from one sweep of the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcResult {
    /// Nodes still reachable from the root container or an extra root
    pub retained: usize,
    /// Detached nodes freed
    pub collected: usize,
    /// Nodes in the arena before the sweep
    pub total_before: usize,
}

impl GcResult {
    /// At least one node was freed
    #[inline]
    pub fn did_collect(&self) -> bool {
        self.collected > 0
    }
}

/// Free every arena node unreachable from the root container
///
/// `extra_roots` keeps detached subtrees the caller still holds, such as
/// a node it plans to re-insert. Unknown ids in it are ignored.
pub fn collect_garbage(dom: &mut ArenaDom, extra_roots: &[NodeId]) -> GcResult {
    let total_before = dom.node_count();
    let reachable = mark(dom, extra_roots);
    let collected = dom.retain_nodes(|id| reachable.contains(&id));
    debug!(total_before, collected, "arena gc");
    GcResult {
        retained: total_before - collected,
        collected,
        total_before,
    }
}

/// Ids of nodes reachable through child links, depth first
fn mark(dom: &ArenaDom, extra_roots: &[NodeId]) -> HashSet<NodeId> {
    let mut reachable = HashSet::new();
    let mut stack: Vec<NodeId> = Vec::new();

    let roots = core::iter::once(dom.root_id()).chain(extra_roots.iter().copied());
    for root in roots {
        if dom.get_node(root).is_some() && reachable.insert(root) {
            stack.push(root);
        }
    }

    while let Some(id) = stack.pop() {
        for &child in dom.children(id) {
            if reachable.insert(child) {
                stack.push(child);
            }
        }
    }

    reachable
}

/// Node counts `collect_garbage` would report, without freeing anything
pub fn dry_run(dom: &ArenaDom, extra_roots: &[NodeId]) -> GcResult {
    let total_before = dom.node_count();
    let retained = mark(dom, extra_roots).len();
    GcResult {
        retained,
        collected: total_before - retained,
        total_before,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build, mount};
    use crate::reconcile::reconcile;
    use crate::surface::Surface;
    use crate::vnode::{h, VNode};

    fn no_attrs() -> [(&'static str, &'static str); 0] {
        []
    }

    #[test]
    fn gc_fresh_arena() {
        let mut dom = ArenaDom::new();
        let result = collect_garbage(&mut dom, &[]);
        assert_eq!(result.total_before, 1);
        assert_eq!(result.retained, 1);
        assert_eq!(result.collected, 0);
        assert!(!result.did_collect());
    }

    #[test]
    fn gc_all_attached() {
        let mut dom = ArenaDom::new();
        mount(&mut dom, &0, &h("div", no_attrs(), ["a", "b"])).unwrap();
        let result = collect_garbage(&mut dom, &[]);
        assert_eq!(result.retained, 4);
        assert!(!result.did_collect());
    }

    #[test]
    fn gc_collects_detached_subtree() {
        let mut dom = ArenaDom::new();
        let keep = mount(&mut dom, &0, &VNode::text("keep")).unwrap();
        let loose = build(&mut dom, &h("ul", no_attrs(), ["x", "y"])).unwrap();

        let result = collect_garbage(&mut dom, &[]);
        assert_eq!(result.collected, 3);
        assert!(result.did_collect());
        assert!(dom.get_node(loose).is_none());
        assert!(dom.get_node(keep).is_some());
    }

    #[test]
    fn gc_extra_root_keeps_detached() {
        let mut dom = ArenaDom::new();
        let loose = build(&mut dom, &h("p", no_attrs(), ["x"])).unwrap();
        let result = collect_garbage(&mut dom, &[loose]);
        assert_eq!(result.collected, 0);
        assert_eq!(dom.child_count(&loose), 1);
    }

    #[test]
    fn gc_after_replace_frees_old_subtree() {
        let mut dom = ArenaDom::new();
        let old = h("div", no_attrs(), ["a", "b"]);
        let new = h("section", no_attrs(), ["a"]);
        let d = mount(&mut dom, &0, &old).unwrap();
        reconcile(&mut dom, Some(&old), Some(&new), &d).unwrap();

        let result = collect_garbage(&mut dom, &[]);
        assert_eq!(result.collected, old.node_count());
        assert_eq!(dom.node_count(), 1 + new.node_count());
        let live = dom.child_at(&0, 0).unwrap();
        assert_eq!(dom.snapshot(live), Some(new));
    }

    #[test]
    fn gc_nonexistent_root_ignored() {
        let mut dom = ArenaDom::new();
        build(&mut dom, &VNode::text("x")).unwrap();
        let result = collect_garbage(&mut dom, &[0xDEAD]);
        assert_eq!(result.collected, 1);
    }

    #[test]
    fn gc_duplicate_roots_handled() {
        let mut dom = ArenaDom::new();
        let loose = build(&mut dom, &VNode::text("x")).unwrap();
        let result = collect_garbage(&mut dom, &[loose, loose, 0]);
        assert_eq!(result.retained, 2);
        assert_eq!(result.collected, 0);
    }

    #[test]
    fn gc_inner_root_drops_detached_parent() {
        let mut dom = ArenaDom::new();
        let outer = build(&mut dom, &h("div", no_attrs(), [h("span", no_attrs(), ["t"])])).unwrap();
        let inner = dom.child_at(&outer, 0).unwrap();

        collect_garbage(&mut dom, &[inner]);
        assert!(dom.get_node(outer).is_none());
        assert!(dom.parent(inner).is_none());
        assert_eq!(dom.child_count(&inner), 1);
    }

    #[test]
    fn dry_run_does_not_modify() {
        let mut dom = ArenaDom::new();
        build(&mut dom, &VNode::text("orphan")).unwrap();
        let result = dry_run(&dom, &[]);
        assert_eq!(result.collected, 1);
        assert_eq!(dom.node_count(), 2);
    }

    #[test]
    fn dry_run_matches_gc_stats() {
        let mut dom = ArenaDom::new();
        mount(&mut dom, &0, &VNode::text("keep")).unwrap();
        build(&mut dom, &h("b", no_attrs(), ["orphan"])).unwrap();
        let dry = dry_run(&dom, &[]);
        let real = collect_garbage(&mut dom, &[]);
        assert_eq!(dry, real);
        assert_eq!(real.retained + real.collected, real.total_before);
    }

    #[test]
    fn gc_idempotent() {
        let mut dom = ArenaDom::new();
        build(&mut dom, &VNode::text("x")).unwrap();
        assert!(collect_garbage(&mut dom, &[]).did_collect());
        assert!(!collect_garbage(&mut dom, &[]).did_collect());
    }

    #[test]
    fn gc_result_did_collect() {
        let r1 = GcResult {
            retained: 5,
            collected: 0,
            total_before: 5,
        };
        assert!(!r1.did_collect());
        let r2 = GcResult {
            retained: 3,
            collected: 2,
            total_before: 5,
        };
        assert!(r2.did_collect());
    }
}
