use std::rc::Rc;

use dynaform_editor::{find_by_uuid, get_root, with_clone_tree, with_clone_trees, PathClone};
use dynaform_model::{
    build_editor_ui_schema_tree, build_json_schema, build_schema_tree, resolve_scope,
    SchemaElement, TreeNode,
};
use serde_json::json;

fn person() -> Rc<SchemaElement> {
    build_schema_tree(&json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "address": {
                "type": "object",
                "properties": {"street": {"type": "string"}, "zip": {"type": "string"}}
            },
            "phones": {"type": "array", "items": {"type": "string"}},
            "contact": {"anyOf": [{"type": "string"}, {"type": "integer"}]}
        }
    }))
    .expect("schema must build")
}

fn id_at(root: &Rc<SchemaElement>, scope: &str) -> dynaform_model::NodeId {
    resolve_scope(root, scope)
        .expect("scope must resolve")
        .uuid
        .clone()
        .expect("built nodes carry ids")
}

#[test]
fn schema_clone_shares_siblings_matrix() {
    let cases = [
        ("#/properties/address/properties/zip", "name"),
        ("#/properties/phones/items", "address"),
        ("#/properties/contact/anyOf/1", "phones"),
        ("#/properties/name", "contact"),
    ];
    for (scope, untouched) in cases {
        let root = person();
        let target = id_at(&root, scope);
        let new_root = with_clone_tree(&root, &target, |mut path: PathClone<SchemaElement>| {
            path.target_mut()
                .other
                .insert("description".into(), json!("edited"));
            path.into_root()
        })
        .expect("target exists");

        assert!(!Rc::ptr_eq(&root, &new_root), "{scope}");
        assert!(
            Rc::ptr_eq(
                root.property(untouched).unwrap(),
                new_root.property(untouched).unwrap()
            ),
            "{untouched} must be shared when editing {scope}"
        );
        let edited = resolve_scope(&new_root, scope).unwrap();
        assert_eq!(edited.other["description"], json!("edited"), "{scope}");
        assert!(!resolve_scope(&root, scope).unwrap().other.contains_key("description"));

        let cursor = find_by_uuid(&new_root, &target).unwrap();
        assert!(Rc::ptr_eq(&get_root(&cursor), &new_root), "{scope}");
    }
}

#[test]
fn schema_detach_matrix() {
    let root = person();
    let zip = id_at(&root, "#/properties/address/properties/zip");
    let detached = with_clone_tree(&root, &zip, PathClone::detach_target).unwrap();
    let new_root = detached.root.unwrap();
    assert_eq!(
        build_json_schema(&new_root)["properties"]["address"],
        json!({"type": "object", "properties": {"street": {"type": "string"}}})
    );

    let items = id_at(&root, "#/properties/phones/items");
    let detached = with_clone_tree(&root, &items, PathClone::detach_target).unwrap();
    assert!(detached.root.unwrap().property("phones").unwrap().items().is_none());

    let alternative = id_at(&root, "#/properties/contact/anyOf/0");
    let detached = with_clone_tree(&root, &alternative, PathClone::detach_target).unwrap();
    assert_eq!(
        build_json_schema(&detached.root.unwrap())["properties"]["contact"],
        json!({"anyOf": [{"type": "integer"}]})
    );
}

#[test]
fn dual_clone_edits_both_trees_matrix() {
    let schema = person();
    let ui = build_editor_ui_schema_tree(&json!({
        "type": "VerticalLayout",
        "elements": [{"type": "Label", "text": "a"}, {"type": "Label", "text": "b"}]
    }))
    .unwrap();
    let label_id = ui.elements()[1].uuid.clone().unwrap();
    let name_id = id_at(&schema, "#/properties/name");

    let (new_ui, new_schema) = with_clone_trees(&ui, &label_id, &schema, &name_id, |mut u, mut s| {
        u.target_mut().other.insert("text".into(), json!("Name"));
        s.target_mut().other.insert("title".into(), json!("Name"));
        assert_eq!(u.depth(), 1);
        assert_eq!(s.depth(), 1);
        assert_eq!(s.parent().and_then(TreeNode::uuid), schema.uuid.as_ref());
        (u.into_root(), s.into_root())
    })
    .unwrap();

    assert!(Rc::ptr_eq(&ui.elements()[0], &new_ui.elements()[0]));
    assert_eq!(new_ui.elements()[1].other["text"], json!("Name"));
    assert_eq!(new_schema.property("name").unwrap().other["title"], json!("Name"));
    assert!(Rc::ptr_eq(
        schema.property("address").unwrap(),
        new_schema.property("address").unwrap()
    ));
}
