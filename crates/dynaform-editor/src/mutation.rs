//! Structural edits of the editor trees.
//!
//! Every operation takes the current roots and returns new ones. Inputs are
//! never modified, so a failed operation leaves nothing behind.

use std::collections::HashSet;
use std::rc::Rc;

use dynaform_model::{
    ensure_uuids, scope_of_path, EditorUiSchemaElement, NodeId, SchemaElement, TreeNode,
};
use tracing::debug;

use crate::categorization::CategorizationService;
use crate::clone::{with_clone_tree, with_clone_trees, PathClone};
use crate::config::EditorConfig;
use crate::error::{EditorError, UuidError};
use crate::link::{clean_ui_schema_links, link_elements};
use crate::lookup::{find_by_uuid, traverse};

/// Insert an element that is not bound to the schema.
#[derive(Debug, Clone)]
pub struct InsertUnscopedRequest {
    pub layout_id: NodeId,
    pub index: isize,
    pub element: EditorUiSchemaElement,
}

/// Insert an element bound to the schema node `schema_id`.
#[derive(Debug, Clone)]
pub struct InsertScopedRequest {
    pub layout_id: NodeId,
    pub schema_id: NodeId,
    pub index: isize,
    pub element: EditorUiSchemaElement,
}

#[derive(Debug, Clone)]
pub struct RemoveRequest {
    pub element_id: NodeId,
}

/// Trees after [`remove_ui_element`].
#[derive(Debug)]
pub struct Removal {
    /// `None` when the removed element was the root.
    pub ui_schema: Option<Rc<EditorUiSchemaElement>>,
    /// The schema with the removed elements' links dropped, if a schema was
    /// given.
    pub schema: Option<Rc<SchemaElement>>,
    pub removed: EditorUiSchemaElement,
}

/// Inserts `request.element` into the layout `request.layout_id`.
///
/// Schema bindings carried by the element or its descendants are dropped.
/// Every node of the element needs a uuid not yet used in the tree, otherwise
/// nothing is inserted.
pub fn insert_unscoped_element(
    ui_root: &Rc<EditorUiSchemaElement>,
    request: InsertUnscopedRequest,
    config: &EditorConfig,
) -> Result<Rc<EditorUiSchemaElement>, EditorError> {
    let InsertUnscopedRequest {
        layout_id,
        index,
        element,
    } = request;
    let element = prepare_element(ui_root, element, config)?;
    with_clone_tree(
        ui_root,
        &layout_id,
        |mut layout| -> Result<Rc<EditorUiSchemaElement>, EditorError> {
            splice_into_layout(&mut layout, index, element, config)?;
            Ok(layout.into_root())
        },
    )?
}

/// Inserts `request.element` into the layout `request.layout_id` and binds it
/// to the schema node `request.schema_id`.
///
/// The element is prepared as for [`insert_unscoped_element`]. A control, or
/// any element carrying a scope, gets the scope of its schema node. Returns
/// the new schema root and the new UI-schema root.
pub fn insert_scoped_element(
    ui_root: &Rc<EditorUiSchemaElement>,
    schema_root: &Rc<SchemaElement>,
    request: InsertScopedRequest,
    config: &EditorConfig,
) -> Result<(Rc<SchemaElement>, Rc<EditorUiSchemaElement>), EditorError> {
    let InsertScopedRequest {
        layout_id,
        schema_id,
        index,
        element,
    } = request;
    let mut element = prepare_element(ui_root, element, config)?;
    with_clone_trees(
        ui_root,
        &layout_id,
        schema_root,
        &schema_id,
        |mut layout, mut schema| -> Result<_, EditorError> {
            if element.is_control() || element.scope.is_some() {
                element.scope = scope_of_path(schema.originals());
            }
            link_elements(&mut element, schema.target_mut())?;
            splice_into_layout(&mut layout, index, element, config)?;
            Ok((schema.into_root(), layout.into_root()))
        },
    )?
}

fn prepare_element(
    ui_root: &EditorUiSchemaElement,
    mut element: EditorUiSchemaElement,
    config: &EditorConfig,
) -> Result<EditorUiSchemaElement, UuidError> {
    if config.assign_missing_uuids {
        ensure_uuids(&mut element);
    }
    let element = unbind(element);
    check_fresh_uuids(ui_root, &element)?;
    Ok(element)
}

/// Drops every `linked_schema_element` in the subtree of `element`.
fn unbind(element: EditorUiSchemaElement) -> EditorUiSchemaElement {
    let element = Rc::new(element);
    let unbound = clean_ui_schema_links(&element);
    if !Rc::ptr_eq(&element, &unbound) {
        debug!(element = %unbound.describe(), "dropping schema bindings of inserted element");
    }
    drop(element);
    Rc::unwrap_or_clone(unbound)
}

/// Every node of `element` has a uuid that occurs neither in `ui_root` nor
/// elsewhere in `element`.
fn check_fresh_uuids(
    ui_root: &EditorUiSchemaElement,
    element: &EditorUiSchemaElement,
) -> Result<(), UuidError> {
    let mut taken: HashSet<NodeId> = HashSet::new();
    traverse(ui_root, &mut |node: &EditorUiSchemaElement, _| {
        if let Some(id) = &node.uuid {
            taken.insert(id.clone());
        }
    });
    let mut outcome = Ok(());
    traverse(element, &mut |node: &EditorUiSchemaElement, _| {
        if outcome.is_err() {
            return;
        }
        outcome = match &node.uuid {
            None => Err(UuidError::NoUuid {
                element: node.describe(),
            }),
            Some(id) if !taken.insert(id.clone()) => {
                Err(UuidError::Duplicate { id: id.clone() })
            }
            Some(_) => Ok(()),
        };
    });
    outcome
}

fn splice_into_layout(
    layout: &mut PathClone<EditorUiSchemaElement>,
    index: isize,
    mut element: EditorUiSchemaElement,
    config: &EditorConfig,
) -> Result<(), EditorError> {
    let holder = layout.target_mut();
    let holder_id = holder.uuid.clone();
    let description = holder.describe();
    let elements = holder
        .elements
        .as_mut()
        .ok_or(EditorError::NotALayout {
            element: description,
        })?;
    let position = config.index_policy.resolve(index, elements.len())?;
    element.parent = holder_id;
    elements.insert(position, Rc::new(element));
    Ok(())
}

/// Removes the element `request.element_id` from the UI-schema tree.
///
/// With a schema, the bindings of the removed element and of its descendants
/// are dropped from the schema nodes they point at; a bound element without a
/// uuid fails the whole removal. Schema nodes that no longer exist are
/// skipped. Categorization state of removed categorizations and categories is
/// released once the removal is certain to succeed.
pub fn remove_ui_element<C>(
    ui_root: &Rc<EditorUiSchemaElement>,
    schema_root: Option<&Rc<SchemaElement>>,
    request: &RemoveRequest,
    categorization: &mut C,
) -> Result<Removal, EditorError>
where
    C: CategorizationService + ?Sized,
{
    let cursor = find_by_uuid(ui_root, &request.element_id)?;

    let schema = match schema_root {
        Some(schema_root) => Some(release_schema_links(schema_root, cursor.target())?),
        None => None,
    };

    let detached = PathClone::new(cursor).detach_target();

    traverse(&detached.removed, &mut |node: &EditorUiSchemaElement, _| {
        if node.is_categorization_like() {
            categorization.remove_element(node);
        }
    });

    Ok(Removal {
        ui_schema: detached.root,
        schema,
        removed: detached.removed,
    })
}

fn release_schema_links(
    schema_root: &Rc<SchemaElement>,
    removed: &Rc<EditorUiSchemaElement>,
) -> Result<Rc<SchemaElement>, UuidError> {
    let mut bound: Vec<(Option<NodeId>, NodeId, String)> = Vec::new();
    traverse(&**removed, &mut |node: &EditorUiSchemaElement, _| {
        if let Some(linked) = &node.linked_schema_element {
            bound.push((node.uuid.clone(), linked.clone(), node.describe()));
        }
    });

    let mut schema = schema_root.clone();
    for (element_id, linked, description) in bound {
        let element_id = element_id.ok_or(UuidError::NoUuid {
            element: description,
        })?;
        match find_by_uuid(&schema, &linked) {
            Ok(cursor) if cursor.target().linked_ui_schema_elements.contains(&element_id) => {
                let mut path = PathClone::new(cursor);
                path.target_mut().linked_ui_schema_elements.remove(&element_id);
                schema = path.into_root();
            }
            Ok(_) => {}
            Err(err) => debug!(%err, element = %element_id, "bound schema element is gone"),
        }
    }
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorization::DefaultCategorizationService;
    use dynaform_model::uischema::{CATEGORIZATION, CATEGORY, VERTICAL_LAYOUT};
    use dynaform_model::PrimitiveType;

    fn layout_with_two() -> Rc<EditorUiSchemaElement> {
        Rc::new(
            EditorUiSchemaElement::new(VERTICAL_LAYOUT)
                .with_uuid("root")
                .with_element(EditorUiSchemaElement::label("first").with_uuid("l1"))
                .with_element(EditorUiSchemaElement::label("second").with_uuid("l2")),
        )
    }

    fn ids(layout: &EditorUiSchemaElement) -> Vec<String> {
        layout
            .elements()
            .iter()
            .map(|e| e.uuid.as_ref().map(ToString::to_string).unwrap_or_default())
            .collect()
    }

    #[test]
    fn unscoped_insert_assigns_uuid_and_parent() {
        let root = layout_with_two();
        let request = InsertUnscopedRequest {
            layout_id: "root".into(),
            index: 1,
            element: EditorUiSchemaElement::new(VERTICAL_LAYOUT)
                .with_element(EditorUiSchemaElement::label("nested")),
        };
        let new_root = insert_unscoped_element(&root, request, &EditorConfig::default()).unwrap();
        let inserted = &new_root.elements()[1];
        assert!(inserted.uuid.is_some());
        assert_eq!(inserted.parent.as_ref().map(NodeId::as_str), Some("root"));
        assert_eq!(inserted.elements()[0].parent, inserted.uuid);
        assert_eq!(root.elements().len(), 2);
    }

    #[test]
    fn insert_into_non_layout_is_rejected() {
        let root = layout_with_two();
        let request = InsertUnscopedRequest {
            layout_id: "l1".into(),
            index: 0,
            element: EditorUiSchemaElement::label("x"),
        };
        let err = insert_unscoped_element(&root, request, &EditorConfig::default()).unwrap_err();
        assert!(matches!(err, EditorError::NotALayout { .. }));
    }

    #[test]
    fn out_of_range_index_is_clamped() {
        let root = layout_with_two();
        let request = InsertUnscopedRequest {
            layout_id: "root".into(),
            index: 42,
            element: EditorUiSchemaElement::label("last").with_uuid("l3"),
        };
        let new_root = insert_unscoped_element(&root, request, &EditorConfig::default()).unwrap();
        assert_eq!(ids(&new_root), vec!["l1", "l2", "l3"]);
    }

    #[test]
    fn scoped_insert_derives_scope_and_links() {
        let ui = layout_with_two();
        let schema = Rc::new(
            SchemaElement::object().with_uuid("s-root").with_property(
                "age",
                SchemaElement::primitive(PrimitiveType::Integer).with_uuid("s-age"),
            ),
        );
        let request = InsertScopedRequest {
            layout_id: "root".into(),
            schema_id: "s-age".into(),
            index: 0,
            element: EditorUiSchemaElement::new("Control").with_uuid("c-age"),
        };
        let (new_schema, new_ui) =
            insert_scoped_element(&ui, &schema, request, &EditorConfig::default()).unwrap();
        let control = &new_ui.elements()[0];
        assert_eq!(control.scope.as_deref(), Some("#/properties/age"));
        assert_eq!(control.linked_schema_element.as_ref().map(NodeId::as_str), Some("s-age"));
        let age = new_schema.property("age").unwrap();
        assert!(age.linked_ui_schema_elements.contains(&"c-age".into()));
        assert!(schema.property("age").unwrap().linked_ui_schema_elements.is_empty());
    }

    #[test]
    fn scoped_insert_without_uuid_fails_when_assignment_is_off() {
        let ui = layout_with_two();
        let schema = Rc::new(SchemaElement::object().with_uuid("s-root"));
        let config = EditorConfig {
            assign_missing_uuids: false,
            ..EditorConfig::default()
        };
        let request = InsertScopedRequest {
            layout_id: "root".into(),
            schema_id: "s-root".into(),
            index: 0,
            element: EditorUiSchemaElement::control("#"),
        };
        let err = insert_scoped_element(&ui, &schema, request, &config).unwrap_err();
        assert!(matches!(err, EditorError::Uuid(UuidError::NoUuid { .. })));
    }

    #[test]
    fn removing_categorization_releases_nested_state() {
        let category = EditorUiSchemaElement::new(CATEGORY).with_uuid("tab");
        let categorization = EditorUiSchemaElement::new(CATEGORIZATION)
            .with_uuid("cats")
            .with_element(category.clone());
        let root = Rc::new(
            EditorUiSchemaElement::new(VERTICAL_LAYOUT)
                .with_uuid("root")
                .with_element(categorization.clone()),
        );
        let mut service = DefaultCategorizationService::new();
        service.set_tab_selection(&categorization, 1);
        service.set_tab_selection(&category, 0);
        assert_eq!(service.len(), 2);

        let removal = remove_ui_element(
            &root,
            None,
            &RemoveRequest {
                element_id: "cats".into(),
            },
            &mut service,
        )
        .unwrap();
        assert!(service.is_empty());
        assert!(removal.schema.is_none());
        assert!(removal.ui_schema.unwrap().elements().is_empty());
    }

    #[test]
    fn bound_element_without_uuid_fails_removal() {
        let mut control = EditorUiSchemaElement::control("#/properties/name");
        control.linked_schema_element = Some("s1".into());
        let mut root = EditorUiSchemaElement::new(VERTICAL_LAYOUT).with_uuid("root");
        let group = EditorUiSchemaElement::new("Group").with_uuid("g").with_element(control);
        root = root.with_element(group);
        let root = Rc::new(root);
        let schema = Rc::new(
            SchemaElement::object().with_uuid("s-root").with_property(
                "name",
                SchemaElement::primitive(PrimitiveType::String).with_uuid("s1"),
            ),
        );
        let mut service = DefaultCategorizationService::new();
        let err = remove_ui_element(
            &root,
            Some(&schema),
            &RemoveRequest {
                element_id: "g".into(),
            },
            &mut service,
        )
        .unwrap_err();
        assert!(matches!(err, EditorError::Uuid(UuidError::NoUuid { .. })));
    }

    fn unscoped(element: EditorUiSchemaElement) -> InsertUnscopedRequest {
        InsertUnscopedRequest {
            layout_id: "root".into(),
            index: 0,
            element,
        }
    }

    #[test]
    fn insert_rejects_uuids_already_in_tree() {
        let root = layout_with_two();
        let config = EditorConfig::default();
        let err = insert_unscoped_element(
            &root,
            unscoped(EditorUiSchemaElement::label("dup").with_uuid("l1")),
            &config,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EditorError::Uuid(UuidError::Duplicate { ref id }) if id.as_str() == "l1"
        ));

        let nested = EditorUiSchemaElement::new(VERTICAL_LAYOUT)
            .with_uuid("fresh")
            .with_element(EditorUiSchemaElement::label("dup").with_uuid("root"));
        let err = insert_unscoped_element(&root, unscoped(nested), &config).unwrap_err();
        assert!(matches!(err, EditorError::Uuid(UuidError::Duplicate { .. })));

        let twice = EditorUiSchemaElement::new(VERTICAL_LAYOUT)
            .with_uuid("twin")
            .with_element(EditorUiSchemaElement::label("again").with_uuid("twin"));
        let err = insert_unscoped_element(&root, unscoped(twice), &config).unwrap_err();
        assert!(matches!(err, EditorError::Uuid(UuidError::Duplicate { .. })));
    }

    #[test]
    fn unscoped_insert_without_uuid_fails_when_assignment_is_off() {
        let root = layout_with_two();
        let config = EditorConfig {
            assign_missing_uuids: false,
            ..EditorConfig::default()
        };
        let request = unscoped(EditorUiSchemaElement::label("x"));
        let err = insert_unscoped_element(&root, request, &config).unwrap_err();
        assert!(matches!(err, EditorError::Uuid(UuidError::NoUuid { .. })));
    }

    #[test]
    fn unscoped_insert_drops_carried_bindings() {
        let root = layout_with_two();
        let mut control = EditorUiSchemaElement::control("#/properties/name").with_uuid("c");
        control.linked_schema_element = Some("s1".into());
        let group = EditorUiSchemaElement::new("Group").with_uuid("g").with_element(control);
        let new_root =
            insert_unscoped_element(&root, unscoped(group), &EditorConfig::default()).unwrap();
        let inserted = &new_root.elements()[0].elements()[0];
        assert_eq!(inserted.uuid.as_ref().map(NodeId::as_str), Some("c"));
        assert!(inserted.linked_schema_element.is_none());
        assert_eq!(inserted.scope.as_deref(), Some("#/properties/name"));
    }

    #[test]
    fn scoped_insert_rewrites_scope_and_binds_only_the_element() {
        let ui = layout_with_two();
        let string = |id: &str| SchemaElement::primitive(PrimitiveType::String).with_uuid(id);
        let schema = Rc::new(
            SchemaElement::object()
                .with_uuid("s-root")
                .with_property("a", string("s-a"))
                .with_property("b", string("s-b")),
        );
        let mut nested = EditorUiSchemaElement::control("#/properties/a").with_uuid("nested");
        nested.linked_schema_element = Some("s-a".into());
        let control = EditorUiSchemaElement::control("#/properties/a")
            .with_uuid("c-b")
            .with_detail(nested);
        let request = InsertScopedRequest {
            layout_id: "root".into(),
            schema_id: "s-b".into(),
            index: 0,
            element: control,
        };
        let (new_schema, new_ui) =
            insert_scoped_element(&ui, &schema, request, &EditorConfig::default()).unwrap();
        let inserted = &new_ui.elements()[0];
        assert_eq!(inserted.scope.as_deref(), Some("#/properties/b"));
        assert_eq!(inserted.linked_schema_element.as_ref().map(NodeId::as_str), Some("s-b"));
        assert!(inserted.detail().unwrap().linked_schema_element.is_none());
        assert!(new_schema.property("a").unwrap().linked_ui_schema_elements.is_empty());
        assert!(Rc::ptr_eq(new_schema.property("a").unwrap(), schema.property("a").unwrap()));
    }
}
