use std::rc::Rc;

use serde_json::{Map, Value};

use super::child_path;
use crate::error::BuildError;
use crate::id::NodeId;
use crate::uischema::{EditorUiSchemaElement, UiOptions, LAYOUT_TYPES};

/// Builds the editor tree of a UI-schema document.
///
/// Controls come out unlinked; binding them to a schema tree is a separate
/// step.
pub fn build_editor_ui_schema_tree(
    document: &Value,
) -> Result<Rc<EditorUiSchemaElement>, BuildError> {
    build_node(document, None, "").map(Rc::new)
}

fn build_node(
    value: &Value,
    parent: Option<NodeId>,
    path: &str,
) -> Result<EditorUiSchemaElement, BuildError> {
    let obj = value.as_object().ok_or_else(|| BuildError::NotAnObject {
        path: path.to_string(),
    })?;
    let invalid = |keyword: &str| BuildError::InvalidKeyword {
        path: path.to_string(),
        keyword: keyword.to_string(),
    };
    let type_ = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| BuildError::MissingType {
            path: path.to_string(),
        })?
        .to_string();
    let id = NodeId::generate();

    let elements = match obj.get("elements") {
        Some(Value::Array(list)) => {
            let list_path = child_path(path, "elements");
            let built = list
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    build_node(value, Some(id.clone()), &child_path(&list_path, &i.to_string()))
                        .map(Rc::new)
                })
                .collect::<Result<Vec<_>, _>>()?;
            Some(built)
        }
        Some(_) => return Err(invalid("elements")),
        None => LAYOUT_TYPES.contains(&type_.as_str()).then(Vec::new),
    };

    let scope = match obj.get("scope") {
        Some(Value::String(scope)) => Some(scope.clone()),
        Some(_) => return Err(invalid("scope")),
        None => None,
    };

    let options = match obj.get("options") {
        Some(Value::Object(raw)) => {
            let mut options = UiOptions::default();
            for (key, value) in raw {
                if key == "detail" && value.is_object() {
                    let detail_path = child_path(&child_path(path, "options"), "detail");
                    let detail = build_node(value, Some(id.clone()), &detail_path)?;
                    options.detail = Some(Rc::new(detail));
                } else {
                    options.hints.insert(key.clone(), value.clone());
                }
            }
            Some(options)
        }
        Some(_) => return Err(invalid("options")),
        None => None,
    };

    let other = obj
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "type" | "elements" | "scope" | "options"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(EditorUiSchemaElement {
        uuid: Some(id),
        parent,
        type_,
        elements,
        scope,
        linked_schema_element: None,
        options,
        other,
    })
}

/// Exports an editor tree as a UI-schema document.
pub fn build_ui_schema(element: &EditorUiSchemaElement) -> Value {
    let mut out = Map::new();
    out.insert("type".into(), Value::String(element.type_.clone()));
    if let Some(scope) = &element.scope {
        out.insert("scope".into(), Value::String(scope.clone()));
    }
    out.extend(element.other.clone());
    if let Some(elements) = &element.elements {
        out.insert(
            "elements".into(),
            Value::Array(elements.iter().map(|e| build_ui_schema(e)).collect()),
        );
    }
    if let Some(options) = &element.options {
        let mut raw = options.hints.clone();
        if let Some(detail) = &options.detail {
            raw.insert("detail".into(), build_ui_schema(detail));
        }
        out.insert("options".into(), Value::Object(raw));
    }
    Value::Object(out)
}
