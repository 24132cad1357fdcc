//! Conversions between JSON documents and editor trees.
//!
//! Building assigns a fresh id to every node and points every node's
//! `parent` at its holder. Exporting drops all editor bookkeeping (ids,
//! parents, links) and reproduces the remaining keywords.

mod schema;
mod uischema;

pub use schema::{build_json_schema, build_schema_tree};
pub use uischema::{build_editor_ui_schema_tree, build_ui_schema};

use crate::scope::escape_component;

fn child_path(path: &str, component: &str) -> String {
    format!("{path}/{}", escape_component(component))
}
