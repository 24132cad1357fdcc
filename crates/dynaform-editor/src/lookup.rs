//! Depth-first lookup by id over either editor tree.

use std::collections::HashSet;
use std::rc::Rc;

use dynaform_model::{EditorUiSchemaElement, NodeId, TreeNode};

use crate::error::UuidError;

/// A node found in a tree, together with the chain of nodes leading to it.
#[derive(Debug, Clone)]
pub struct Cursor<N> {
    /// Root first, parent of `target` last.
    ancestors: Vec<Rc<N>>,
    target: Rc<N>,
}

impl<N: TreeNode> Cursor<N> {
    pub fn target(&self) -> &Rc<N> {
        &self.target
    }

    pub fn parent(&self) -> Option<&Rc<N>> {
        self.ancestors.last()
    }

    pub fn ancestors(&self) -> &[Rc<N>] {
        &self.ancestors
    }

    /// Number of edges between the root and the target.
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Root-to-target chain.
    pub fn path(&self) -> Vec<Rc<N>> {
        let mut path = self.ancestors.clone();
        path.push(self.target.clone());
        path
    }

    pub(crate) fn into_parts(self) -> (Vec<Rc<N>>, Rc<N>) {
        (self.ancestors, self.target)
    }

    fn node_at(&self, depth: usize) -> &Rc<N> {
        self.ancestors.get(depth).unwrap_or(&self.target)
    }
}

/// Finds the node carrying `id` in the tree rooted at `root`.
///
/// Children are visited in [`TreeNode::children`] order, so for the UI-schema
/// tree `elements` come before `options.detail`.
pub fn find_by_uuid<N: TreeNode>(root: &Rc<N>, id: &NodeId) -> Result<Cursor<N>, UuidError> {
    let mut ancestors = Vec::new();
    match search(root, id, &mut ancestors) {
        Some(target) => Ok(Cursor { ancestors, target }),
        None => Err(UuidError::NotFound { id: id.clone() }),
    }
}

fn search<N: TreeNode>(node: &Rc<N>, id: &NodeId, ancestors: &mut Vec<Rc<N>>) -> Option<Rc<N>> {
    if node.uuid() == Some(id) {
        return Some(node.clone());
    }
    ancestors.push(node.clone());
    for child in node.children() {
        if let Some(found) = search(child, id, ancestors) {
            return Some(found);
        }
    }
    ancestors.pop();
    None
}

/// Visits every node of the tree in pre-order, with its depth.
pub fn traverse<N, F>(root: &N, visitor: &mut F)
where
    N: TreeNode,
    F: FnMut(&N, usize),
{
    visit(root, 0, visitor);
}

fn visit<N, F>(node: &N, depth: usize, visitor: &mut F)
where
    N: TreeNode,
    F: FnMut(&N, usize),
{
    visitor(node, depth);
    for child in node.children() {
        visit::<N, F>(child, depth + 1, visitor);
    }
}

/// Walks `parent` references up from the cursor's target and returns the
/// first node without a parent.
///
/// # Panics
///
/// Panics if the parent chain revisits an id or names a node other than the
/// one holding the child. Either means a mutation broke the tree.
pub fn get_root<N: TreeNode>(cursor: &Cursor<N>) -> Rc<N> {
    let mut visited = HashSet::new();
    let mut depth = cursor.depth();
    loop {
        let node = cursor.node_at(depth);
        let Some(parent_id) = node.parent() else {
            return node.clone();
        };
        if !visited.insert(parent_id.clone()) {
            panic!("cycle in parent chain at {}", node.describe());
        }
        if depth == 0 {
            // The cursor was anchored below the real root.
            return node.clone();
        }
        let holder = cursor.node_at(depth - 1);
        assert!(
            holder.uuid() == Some(parent_id),
            "{} names parent {parent_id} but is held by {}",
            node.describe(),
            holder.describe()
        );
        depth -= 1;
    }
}

pub fn is_editor_control(element: &EditorUiSchemaElement) -> bool {
    element.is_control()
}

pub fn is_editor_layout(element: &EditorUiSchemaElement) -> bool {
    element.is_layout()
}
