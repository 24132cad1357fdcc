//! Copy-on-write editing of the schema and UI-schema trees.
//!
//! Trees are never changed in place. An edit copies the nodes on the path
//! from the root to the edited node and shares every other subtree with the
//! previous version, so a caller holding an old root keeps a consistent
//! snapshot and can detect unchanged subtrees with [`Rc::ptr_eq`].
//!
//! [`EditorStore`] keeps the current roots and applies edits atomically.
//!
//! ```
//! use dynaform_editor::{EditorStore, InsertUnscopedRequest};
//! use dynaform_model::EditorUiSchemaElement;
//! use serde_json::json;
//!
//! let mut store = EditorStore::default();
//! store
//!     .load_documents(
//!         &json!({"type": "object", "properties": {}}),
//!         &json!({"type": "VerticalLayout", "elements": []}),
//!     )
//!     .unwrap();
//! let layout_id = store.state().ui_schema.as_ref().unwrap().uuid.clone().unwrap();
//! store
//!     .add_unscoped_element_to_layout(InsertUnscopedRequest {
//!         layout_id,
//!         index: 0,
//!         element: EditorUiSchemaElement::label("Hello"),
//!     })
//!     .unwrap();
//! assert_eq!(store.state().ui_schema.as_ref().unwrap().elements().len(), 1);
//! ```
//!
//! [`Rc::ptr_eq`]: std::rc::Rc::ptr_eq

mod error;

pub mod categorization;
pub mod clone;
pub mod config;
pub mod link;
pub mod lookup;
pub mod mutation;
pub mod palette;
pub mod store;

pub use categorization::{CategorizationService, DefaultCategorizationService};
pub use clone::{with_clone_tree, with_clone_trees, Detached, PathClone};
pub use config::{EditorConfig, IndexPolicy};
pub use error::{ConfigError, EditorError, UuidError};
pub use link::{
    clean_linked_elements, clean_ui_schema_links, link_elements, link_schemas, unlink_elements,
    LinkedTrees,
};
pub use lookup::{find_by_uuid, get_root, is_editor_control, is_editor_layout, traverse, Cursor};
pub use mutation::{
    insert_scoped_element, insert_unscoped_element, remove_ui_element, InsertScopedRequest,
    InsertUnscopedRequest, Removal, RemoveRequest,
};
pub use palette::{DefaultPaletteService, PaletteElement, PaletteService};
pub use store::{EditorAction, EditorState, EditorStore, ExportedDocuments};
