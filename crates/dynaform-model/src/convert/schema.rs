use std::collections::BTreeSet;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::child_path;
use crate::error::BuildError;
use crate::id::NodeId;
use crate::schema::{Combinator, PrimitiveType, SchemaElement, SchemaKind};

/// Builds the schema tree of a JSON Schema document.
pub fn build_schema_tree(document: &Value) -> Result<Rc<SchemaElement>, BuildError> {
    build_node(document, None, "")
}

fn build_node(
    value: &Value,
    parent: Option<NodeId>,
    path: &str,
) -> Result<Rc<SchemaElement>, BuildError> {
    let obj = value.as_object().ok_or_else(|| BuildError::NotAnObject {
        path: path.to_string(),
    })?;
    let id = NodeId::generate();
    let (kind, structural) = build_kind(obj, &id, path)?;
    let other = obj
        .iter()
        .filter(|(key, _)| Some(key.as_str()) != structural)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Ok(Rc::new(SchemaElement {
        uuid: Some(id),
        parent,
        kind,
        linked_ui_schema_elements: BTreeSet::new(),
        other,
    }))
}

/// Returns the node kind together with the keyword holding its children.
fn build_kind(
    obj: &Map<String, Value>,
    id: &NodeId,
    path: &str,
) -> Result<(SchemaKind, Option<&'static str>), BuildError> {
    let type_ = obj.get("type").and_then(Value::as_str);
    let invalid = |keyword: &str| BuildError::InvalidKeyword {
        path: path.to_string(),
        keyword: keyword.to_string(),
    };

    if type_ == Some("object") || (type_.is_none() && obj.contains_key("properties")) {
        let mut properties = IndexMap::new();
        if let Some(props) = obj.get("properties") {
            let props = props.as_object().ok_or_else(|| invalid("properties"))?;
            let props_path = child_path(path, "properties");
            for (name, value) in props {
                let child = build_node(value, Some(id.clone()), &child_path(&props_path, name))?;
                properties.insert(name.clone(), child);
            }
        }
        let declared = obj.contains_key("properties");
        return Ok((
            SchemaKind::Object {
                properties,
                declared,
            },
            Some("properties"),
        ));
    }

    if type_ == Some("array") || (type_.is_none() && obj.contains_key("items")) {
        let items = match obj.get("items") {
            None => None,
            Some(value @ Value::Object(_)) => Some(build_node(
                value,
                Some(id.clone()),
                &child_path(path, "items"),
            )?),
            Some(_) => return Err(invalid("items")),
        };
        return Ok((SchemaKind::Array { items }, Some("items")));
    }

    if let Some(primitive) = type_.and_then(PrimitiveType::parse) {
        return Ok((SchemaKind::Primitive(primitive), None));
    }

    if type_.is_none() {
        if let Some(combinator) = Combinator::ALL
            .into_iter()
            .find(|c| obj.contains_key(c.keyword()))
        {
            let keyword = combinator.keyword();
            let list = obj
                .get(keyword)
                .and_then(Value::as_array)
                .ok_or_else(|| invalid(keyword))?;
            let list_path = child_path(path, keyword);
            let alternatives = list
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    build_node(value, Some(id.clone()), &child_path(&list_path, &i.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok((
                SchemaKind::Combinator {
                    combinator,
                    alternatives,
                },
                Some(keyword),
            ));
        }
    }

    Ok((SchemaKind::Untyped, None))
}

/// Exports a schema tree as a JSON Schema document.
pub fn build_json_schema(element: &SchemaElement) -> Value {
    let mut out = element.other.clone();
    match &element.kind {
        SchemaKind::Object {
            properties,
            declared,
        } => {
            let props: Map<String, Value> = properties
                .iter()
                .map(|(name, child)| (name.clone(), build_json_schema(child)))
                .collect();
            if *declared || !props.is_empty() || element.other.get("type").is_none() {
                out.insert("properties".into(), Value::Object(props));
            }
        }
        SchemaKind::Array { items: Some(items) } => {
            out.insert("items".into(), build_json_schema(items));
        }
        SchemaKind::Combinator {
            combinator,
            alternatives,
        } => {
            out.insert(
                combinator.keyword().into(),
                Value::Array(alternatives.iter().map(|a| build_json_schema(a)).collect()),
            );
        }
        SchemaKind::Array { items: None } | SchemaKind::Primitive(_) | SchemaKind::Untyped => {}
    }
    Value::Object(out)
}
