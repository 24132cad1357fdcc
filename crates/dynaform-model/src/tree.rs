//! The seam shared by both editor trees.
//!
//! Nodes are immutable once wrapped in an [`Rc`]: a new version of a tree
//! shares every untouched subtree with the previous version and only
//! reallocates the nodes that changed. Parent back-references are plain
//! identifiers, so a shared subtree keeps a valid `parent` in every version
//! it belongs to.

use std::rc::Rc;

use crate::id::NodeId;

/// A node of the schema tree or of the UI-schema tree.
pub trait TreeNode: Clone {
    fn uuid(&self) -> Option<&NodeId>;

    /// Assigns `id` if the node has none yet. Existing ids are never replaced.
    fn assign_uuid(&mut self, id: NodeId);

    fn parent(&self) -> Option<&NodeId>;

    fn set_parent(&mut self, parent: Option<NodeId>);

    /// Direct children in traversal order.
    fn children(&self) -> Vec<&Rc<Self>>;

    fn children_mut(&mut self) -> Vec<&mut Rc<Self>>;

    /// Removes `child` (compared by reference) from this node.
    ///
    /// Returns `false` when this node does not hold `child`.
    fn remove_child(&mut self, child: &Rc<Self>) -> bool;

    /// Swaps `old` (compared by reference) for `new`.
    ///
    /// Returns `false` when this node does not hold `old`.
    fn replace_child(&mut self, old: &Rc<Self>, new: Rc<Self>) -> bool {
        for slot in self.children_mut() {
            if Rc::ptr_eq(slot, old) {
                *slot = new;
                return true;
            }
        }
        false
    }

    /// Short description used in diagnostics.
    fn describe(&self) -> String;
}

/// Gives `node` and every descendant without an id a fresh one, and points
/// every descendant's `parent` at its holder.
///
/// Descendants are copied on write, so shared subtrees of other versions are
/// left alone.
pub fn ensure_uuids<N: TreeNode>(node: &mut N) {
    if node.uuid().is_none() {
        node.assign_uuid(NodeId::generate());
    }
    let id = node.uuid().cloned();
    for child in node.children_mut() {
        let needs_update = child.uuid().is_none() || child.parent() != id.as_ref();
        if needs_update || has_missing_uuid::<N>(&**child) {
            let child = Rc::make_mut(child);
            child.set_parent(id.clone());
            ensure_uuids(child);
        }
    }
}

fn has_missing_uuid<N: TreeNode>(node: &N) -> bool {
    node.uuid().is_none()
        || node.children().into_iter().any(|child| {
            child.parent() != node.uuid() || has_missing_uuid::<N>(&**child)
        })
}

/// Number of nodes in the tree rooted at `node`.
pub fn count_nodes<N: TreeNode>(node: &N) -> usize {
    1 + node
        .children()
        .into_iter()
        .map(|child| count_nodes::<N>(&**child))
        .sum::<usize>()
}
