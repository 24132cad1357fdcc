//! Control scopes: JSON Pointers into the data schema, anchored at `#`.
//!
//! A scope such as `#/properties/address/properties/street` addresses the
//! schema node reached by following the pointer components through the
//! schema document. Components use RFC 6901 escaping.

use std::rc::Rc;

use thiserror::Error;

use crate::schema::{SchemaElement, SchemaKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("scope must start with '#': {0:?}")]
    NotAnchored(String),
    #[error("scope pointer must be absolute or empty: {0:?}")]
    NotAbsolute(String),
    #[error("scope {scope:?} does not resolve at component {component:?}")]
    Unresolved { scope: String, component: String },
}

/// Unescapes one pointer component.
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes one pointer component.
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Splits a scope into unescaped pointer components.
///
/// - `"#" -> []`
/// - `"#/properties/a~1b" -> ["properties", "a/b"]`
pub fn parse_scope(scope: &str) -> Result<Vec<String>, ScopeError> {
    let pointer = scope
        .strip_prefix('#')
        .ok_or_else(|| ScopeError::NotAnchored(scope.to_string()))?;
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    if !pointer.starts_with('/') {
        return Err(ScopeError::NotAbsolute(scope.to_string()));
    }
    Ok(pointer.split('/').skip(1).map(unescape_component).collect())
}

/// Joins unescaped components into a scope.
pub fn format_scope(components: &[String]) -> String {
    let mut out = String::from("#");
    for component in components {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Resolves `scope` against the schema tree rooted at `root`.
pub fn resolve_scope(
    root: &Rc<SchemaElement>,
    scope: &str,
) -> Result<Rc<SchemaElement>, ScopeError> {
    let components = parse_scope(scope)?;
    let unresolved = |component: &str| ScopeError::Unresolved {
        scope: scope.to_string(),
        component: component.to_string(),
    };
    let mut node = root.clone();
    let mut iter = components.iter();
    while let Some(component) = iter.next() {
        let next = match (&node.kind, component.as_str()) {
            (SchemaKind::Object { properties, .. }, "properties") => {
                let name = iter.next().ok_or_else(|| unresolved(component))?;
                properties.get(name).ok_or_else(|| unresolved(name))?.clone()
            }
            (SchemaKind::Array { items: Some(items) }, "items") => items.clone(),
            (SchemaKind::Combinator { combinator, alternatives }, keyword)
                if combinator.keyword() == keyword =>
            {
                let index = iter.next().ok_or_else(|| unresolved(component))?;
                index
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| alternatives.get(i))
                    .ok_or_else(|| unresolved(index))?
                    .clone()
            }
            _ => return Err(unresolved(component)),
        };
        node = next;
    }
    Ok(node)
}

/// Builds the scope of the last node in `path`, a chain of nodes from the
/// schema root down to the addressed node.
///
/// Returns `None` if some node of the chain is not a child of its predecessor.
pub fn scope_of_path(path: &[Rc<SchemaElement>]) -> Option<String> {
    let mut components = Vec::new();
    for pair in path.windows(2) {
        let (holder, child) = (&pair[0], &pair[1]);
        match &holder.kind {
            SchemaKind::Object { .. } => {
                components.push("properties".to_string());
                components.push(holder.property_name_of(child)?.to_string());
            }
            SchemaKind::Array { items: Some(items) } if Rc::ptr_eq(items, child) => {
                components.push("items".to_string());
            }
            SchemaKind::Combinator {
                combinator,
                alternatives,
            } => {
                let index = alternatives.iter().position(|a| Rc::ptr_eq(a, child))?;
                components.push(combinator.keyword().to_string());
                components.push(index.to_string());
            }
            _ => return None,
        }
    }
    Some(format_scope(&components))
}
