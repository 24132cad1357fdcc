//! Editor trees for a JSON-Schema driven form editor.
//!
//! Two trees are edited side by side:
//!
//! - the data-schema tree ([`SchemaElement`]), built from a JSON Schema
//!   document;
//! - the UI-schema tree ([`EditorUiSchemaElement`]), built from a UI-schema
//!   document describing layouts and controls.
//!
//! Nodes of both trees carry a stable [`NodeId`] and a `parent` id. The trees
//! never point into each other: a control names the schema node it is bound to
//! by id, and the schema node keeps the ids of the controls bound to it.
//!
//! # Example
//!
//! ```
//! use dynaform_model::{build_json_schema, build_schema_tree};
//! use serde_json::json;
//!
//! let doc = json!({"type": "object", "properties": {"name": {"type": "string"}}});
//! let tree = build_schema_tree(&doc).unwrap();
//! assert!(tree.property("name").is_some());
//! assert_eq!(build_json_schema(&tree), doc);
//! ```

mod error;
mod id;

pub mod convert;
pub mod schema;
pub mod scope;
pub mod tree;
pub mod uischema;

pub use convert::{
    build_editor_ui_schema_tree, build_json_schema, build_schema_tree, build_ui_schema,
};
pub use error::BuildError;
pub use id::NodeId;
pub use schema::{Combinator, PrimitiveType, SchemaElement, SchemaKind};
pub use scope::{format_scope, parse_scope, resolve_scope, scope_of_path, ScopeError};
pub use tree::{count_nodes, ensure_uuids, TreeNode};
pub use uischema::{EditorUiSchemaElement, UiOptions};
