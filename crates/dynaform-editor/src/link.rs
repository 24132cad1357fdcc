//! Bindings between UI controls and schema nodes.
//!
//! A control stores the id of the schema node it is bound to; the schema node
//! stores the ids of every control bound to it. Both sides change together.

use std::rc::Rc;

use dynaform_model::{
    resolve_scope, EditorUiSchemaElement, NodeId, SchemaElement, TreeNode,
};
use tracing::warn;

use crate::clone::with_clone_trees;
use crate::error::{EditorError, UuidError};
use crate::lookup::traverse;

/// Binds `ui` to `schema`.
///
/// Fails without touching either node if one of them has no uuid. Linking
/// the same pair again changes nothing.
pub fn link_elements(
    ui: &mut EditorUiSchemaElement,
    schema: &mut SchemaElement,
) -> Result<(), UuidError> {
    let ui_id = ui.uuid.clone().ok_or_else(|| UuidError::NoUuid {
        element: ui.describe(),
    })?;
    let schema_id = schema.uuid.clone().ok_or_else(|| UuidError::NoUuid {
        element: schema.describe(),
    })?;
    ui.linked_schema_element = Some(schema_id);
    schema.linked_ui_schema_elements.insert(ui_id);
    Ok(())
}

/// Drops the binding between `ui` and `schema`, if there is one.
pub fn unlink_elements(ui: &mut EditorUiSchemaElement, schema: &mut SchemaElement) -> bool {
    let mut changed = false;
    if let Some(ui_id) = &ui.uuid {
        changed |= schema.linked_ui_schema_elements.remove(ui_id);
    }
    if ui.linked_schema_element.is_some() && ui.linked_schema_element == schema.uuid {
        ui.linked_schema_element = None;
        changed = true;
    }
    changed
}

/// Both trees after [`link_schemas`].
#[derive(Debug, Clone)]
pub struct LinkedTrees {
    pub ui_schema: Rc<EditorUiSchemaElement>,
    pub schema: Rc<SchemaElement>,
    /// Scopes of controls that could not be bound.
    pub unresolved: Vec<String>,
}

/// Binds every scoped control of `ui_root` to the schema node its scope
/// resolves to.
///
/// Controls whose scope does not resolve stay unbound and are reported in
/// [`LinkedTrees::unresolved`].
pub fn link_schemas(
    ui_root: &Rc<EditorUiSchemaElement>,
    schema_root: &Rc<SchemaElement>,
) -> LinkedTrees {
    let mut controls: Vec<(Option<NodeId>, String)> = Vec::new();
    traverse(&**ui_root, &mut |node: &EditorUiSchemaElement, _| {
        if !node.is_control() {
            return;
        }
        if let Some(scope) = &node.scope {
            controls.push((node.uuid.clone(), scope.clone()));
        }
    });

    let mut ui_schema = ui_root.clone();
    let mut schema = schema_root.clone();
    let mut unresolved = Vec::new();
    for (control_id, scope) in controls {
        match link_scope(&ui_schema, &schema, control_id, &scope) {
            Ok((new_ui, new_schema)) => {
                ui_schema = new_ui;
                schema = new_schema;
            }
            Err(err) => {
                warn!(%err, scope = %scope, "control stays unbound");
                unresolved.push(scope);
            }
        }
    }
    LinkedTrees {
        ui_schema,
        schema,
        unresolved,
    }
}

type TreePair = (Rc<EditorUiSchemaElement>, Rc<SchemaElement>);

fn link_scope(
    ui_root: &Rc<EditorUiSchemaElement>,
    schema_root: &Rc<SchemaElement>,
    control_id: Option<NodeId>,
    scope: &str,
) -> Result<TreePair, EditorError> {
    let control_id = control_id.ok_or_else(|| UuidError::NoUuid {
        element: format!("Control {scope}"),
    })?;
    let target = resolve_scope(schema_root, scope)?;
    let target_id = target.uuid.clone().ok_or_else(|| UuidError::NoUuid {
        element: target.describe(),
    })?;
    with_clone_trees(
        ui_root,
        &control_id,
        schema_root,
        &target_id,
        |mut ui, mut schema| -> Result<TreePair, EditorError> {
            link_elements(ui.target_mut(), schema.target_mut())?;
            Ok((ui.into_root(), schema.into_root()))
        },
    )?
}

/// Clears every `linked_ui_schema_elements` set of the schema tree.
///
/// Subtrees without links are shared with the input.
pub fn clean_linked_elements(root: &Rc<SchemaElement>) -> Rc<SchemaElement> {
    strip(
        root,
        &|node: &SchemaElement| !node.linked_ui_schema_elements.is_empty(),
        &|node: &mut SchemaElement| node.linked_ui_schema_elements.clear(),
    )
}

/// Clears every `linked_schema_element` of the UI-schema tree.
///
/// Subtrees without links are shared with the input.
pub fn clean_ui_schema_links(root: &Rc<EditorUiSchemaElement>) -> Rc<EditorUiSchemaElement> {
    strip(
        root,
        &|node: &EditorUiSchemaElement| node.linked_schema_element.is_some(),
        &|node: &mut EditorUiSchemaElement| node.linked_schema_element = None,
    )
}

fn strip<N: TreeNode>(
    node: &Rc<N>,
    has_link: &dyn Fn(&N) -> bool,
    clear: &dyn Fn(&mut N),
) -> Rc<N> {
    if !subtree_has_link(&**node, has_link) {
        return node.clone();
    }
    let mut copy = N::clone(node);
    clear(&mut copy);
    for child in copy.children_mut() {
        *child = strip(child, has_link, clear);
    }
    Rc::new(copy)
}

fn subtree_has_link<N: TreeNode>(node: &N, has_link: &dyn Fn(&N) -> bool) -> bool {
    has_link(node)
        || node
            .children()
            .into_iter()
            .any(|child| subtree_has_link::<N>(child, has_link))
}
