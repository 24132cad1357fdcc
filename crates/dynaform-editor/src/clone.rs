//! Copy-on-write path cloning.
//!
//! To change one node of an immutable tree, every node from the root down to
//! it is copied; everything else is shared with the previous version. Readers
//! holding the old root keep seeing the old tree, and untouched subtrees stay
//! `Rc::ptr_eq` across versions.

use std::rc::Rc;

use dynaform_model::{NodeId, TreeNode};
use tracing::{debug, warn};

use crate::error::UuidError;
use crate::lookup::{find_by_uuid, Cursor};

/// Owned copies of the nodes on a root-to-target path.
///
/// Only the target is handed out mutably. The ancestors still hold the
/// previous version of the next node on the path until the clone is committed
/// with [`PathClone::into_root`] or [`PathClone::detach_target`].
#[derive(Debug)]
pub struct PathClone<N> {
    ancestors: Vec<N>,
    target: N,
    /// Previous version of the path, root first, target last.
    originals: Vec<Rc<N>>,
}

/// Result of [`PathClone::detach_target`].
#[derive(Debug)]
pub struct Detached<N> {
    /// New root, or `None` when the target was the root itself.
    pub root: Option<Rc<N>>,
    /// The detached node.
    pub removed: N,
    /// Whether the holder actually contained the target.
    pub detached: bool,
}

impl<N: TreeNode> PathClone<N> {
    /// Copies the path of `cursor` and re-links each copied child to its
    /// copied holder.
    pub fn new(cursor: Cursor<N>) -> Self {
        let (path, target) = cursor.into_parts();
        let mut ancestors: Vec<N> = path.iter().map(|node| N::clone(node)).collect();
        let mut target_copy = N::clone(&target);
        for depth in 1..ancestors.len() {
            let parent = ancestors[depth - 1].uuid().cloned();
            ancestors[depth].set_parent(parent);
        }
        if let Some(holder) = ancestors.last() {
            target_copy.set_parent(holder.uuid().cloned());
        }
        let mut originals = path;
        originals.push(target);
        Self {
            ancestors,
            target: target_copy,
            originals,
        }
    }

    pub fn target(&self) -> &N {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut N {
        &mut self.target
    }

    /// Copied holder of the target.
    pub fn parent(&self) -> Option<&N> {
        self.ancestors.last()
    }

    /// The path as it was before cloning, root first.
    pub fn originals(&self) -> &[Rc<N>] {
        &self.originals
    }

    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Commits the copies and returns the new root.
    pub fn into_root(self) -> Rc<N> {
        let Self {
            ancestors,
            target,
            originals,
        } = self;
        rebuild(ancestors, &originals, Rc::new(target))
    }

    /// Removes the target from its copied holder and commits the rest of the
    /// path.
    ///
    /// A holder that does not contain the target is left as is, with a
    /// warning; the remaining path is still committed.
    pub fn detach_target(self) -> Detached<N> {
        let Self {
            mut ancestors,
            target,
            mut originals,
        } = self;
        let original_target = originals.pop();
        let Some(mut holder) = ancestors.pop() else {
            return Detached {
                root: None,
                removed: target,
                detached: true,
            };
        };
        let detached = original_target.is_some_and(|original| holder.remove_child(&original));
        if !detached {
            warn!(
                holder = %holder.describe(),
                element = %target.describe(),
                "holder does not contain element; skipping detach"
            );
        }
        let root = rebuild(ancestors, &originals, Rc::new(holder));
        Detached {
            root: Some(root),
            removed: target,
            detached,
        }
    }
}

/// Wraps `child` into its copied ancestors, bottom-up.
fn rebuild<N: TreeNode>(ancestors: Vec<N>, originals: &[Rc<N>], child: Rc<N>) -> Rc<N> {
    let mut child = child;
    for (depth, mut holder) in ancestors.into_iter().enumerate().rev() {
        let replaced = holder.replace_child(&originals[depth + 1], child);
        assert!(
            replaced,
            "{} lost its child while the path was cloned",
            holder.describe()
        );
        child = Rc::new(holder);
    }
    child
}

/// Clones the path to `target` in the tree rooted at `root` and hands it to
/// `transform`.
///
/// A miss returns the lookup error without calling `transform`; `root` is
/// never modified either way.
pub fn with_clone_tree<N, R, F>(
    root: &Rc<N>,
    target: &NodeId,
    transform: F,
) -> Result<R, UuidError>
where
    N: TreeNode,
    F: FnOnce(PathClone<N>) -> R,
{
    let cursor = find_by_uuid(root, target)
        .inspect_err(|err| debug!(%err, "clone target lookup failed"))?;
    Ok(transform(PathClone::new(cursor)))
}

/// Clones two paths, one per tree, and hands both to `transform`.
///
/// Both lookups happen before anything is cloned; if either misses, its error
/// is returned and `transform` is not called.
pub fn with_clone_trees<A, B, R, F>(
    first_root: &Rc<A>,
    first_target: &NodeId,
    second_root: &Rc<B>,
    second_target: &NodeId,
    transform: F,
) -> Result<R, UuidError>
where
    A: TreeNode,
    B: TreeNode,
    F: FnOnce(PathClone<A>, PathClone<B>) -> R,
{
    let first = find_by_uuid(first_root, first_target)
        .inspect_err(|err| debug!(%err, "first clone target lookup failed"))?;
    let second = find_by_uuid(second_root, second_target)
        .inspect_err(|err| debug!(%err, "second clone target lookup failed"))?;
    Ok(transform(PathClone::new(first), PathClone::new(second)))
}
