//! The editor store.
//!
//! Holds the current roots of both trees. Operations compute the next roots
//! with the functions of [`crate::mutation`] and swap them in only when the
//! whole operation succeeded; on error the stored roots stay the same `Rc`s.

use std::rc::Rc;

use dynaform_model::{
    build_editor_ui_schema_tree, build_json_schema, build_schema_tree, build_ui_schema,
    EditorUiSchemaElement, SchemaElement,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::categorization::{CategorizationService, DefaultCategorizationService};
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::link::link_schemas;
use crate::mutation::{
    insert_scoped_element, insert_unscoped_element, remove_ui_element, InsertScopedRequest,
    InsertUnscopedRequest, RemoveRequest,
};
use crate::palette::{PaletteElement, PaletteService};

#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub ui_schema: Option<Rc<EditorUiSchemaElement>>,
    pub schema: Option<Rc<SchemaElement>>,
    pub palette_elements: Vec<PaletteElement>,
}

/// Documents produced by [`EditorStore::export_documents`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportedDocuments {
    pub schema: Option<Value>,
    pub ui_schema: Option<Value>,
}

/// Operations accepted by [`EditorStore::dispatch`].
#[derive(Debug, Clone)]
pub enum EditorAction {
    RemoveUiSchemaElement(RemoveRequest),
    AddUnscopedElementToLayout(InsertUnscopedRequest),
    AddScopedElementToLayout(InsertScopedRequest),
}

#[derive(Debug)]
pub struct EditorStore<C = DefaultCategorizationService> {
    state: EditorState,
    config: EditorConfig,
    categorization: C,
}

impl EditorStore<DefaultCategorizationService> {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_categorization(config, DefaultCategorizationService::new())
    }
}

impl Default for EditorStore<DefaultCategorizationService> {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl<C: CategorizationService> EditorStore<C> {
    pub fn with_categorization(config: EditorConfig, categorization: C) -> Self {
        Self {
            state: EditorState::default(),
            config,
            categorization,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn categorization(&self) -> &C {
        &self.categorization
    }

    pub fn categorization_mut(&mut self) -> &mut C {
        &mut self.categorization
    }

    /// Replaces both trees with the ones built from `schema` and `ui_schema`
    /// and binds every scoped control to its schema node.
    ///
    /// Returns the scopes that could not be bound.
    #[instrument(skip_all)]
    pub fn load_documents(
        &mut self,
        schema: &Value,
        ui_schema: &Value,
    ) -> Result<Vec<String>, EditorError> {
        let schema = build_schema_tree(schema).inspect_err(|err| error!(%err, "invalid schema"))?;
        let ui_schema = build_editor_ui_schema_tree(ui_schema)
            .inspect_err(|err| error!(%err, "invalid UI schema"))?;
        let linked = link_schemas(&ui_schema, &schema);
        if !linked.unresolved.is_empty() {
            warn!(count = linked.unresolved.len(), "some controls stay unbound");
        }
        self.categorization.clear();
        self.state.schema = Some(linked.schema);
        self.state.ui_schema = Some(linked.ui_schema);
        info!("documents loaded");
        Ok(linked.unresolved)
    }

    /// Serializes the current trees without editor bookkeeping.
    pub fn export_documents(&self) -> ExportedDocuments {
        ExportedDocuments {
            schema: self.state.schema.as_deref().map(build_json_schema),
            ui_schema: self.state.ui_schema.as_deref().map(build_ui_schema),
        }
    }

    pub fn load_palette_elements(&mut self, service: &dyn PaletteService) {
        self.state.palette_elements = service.palette_elements();
        debug!(count = self.state.palette_elements.len(), "palette loaded");
    }

    /// Removes an element from the UI schema and drops its schema bindings.
    ///
    /// Removing the root leaves the store without a UI schema.
    #[instrument(skip_all, fields(element = %request.element_id))]
    pub fn remove_ui_schema_element(&mut self, request: RemoveRequest) -> Result<(), EditorError> {
        let ui_root = self.ui_root()?;
        let removal = remove_ui_element(
            &ui_root,
            self.state.schema.as_ref(),
            &request,
            &mut self.categorization,
        )
        .inspect_err(|err| error!(%err, "could not remove UI element"))?;
        if removal.ui_schema.is_none() {
            debug!("root removed; UI schema cleared");
        }
        self.state.ui_schema = removal.ui_schema;
        if removal.schema.is_some() {
            self.state.schema = removal.schema;
        }
        Ok(())
    }

    #[instrument(skip_all, fields(layout = %request.layout_id, index = request.index))]
    pub fn add_unscoped_element_to_layout(
        &mut self,
        request: InsertUnscopedRequest,
    ) -> Result<(), EditorError> {
        let ui_root = self.ui_root()?;
        let ui_schema = insert_unscoped_element(&ui_root, request, &self.config)
            .inspect_err(|err| error!(%err, "could not add UI element"))?;
        self.state.ui_schema = Some(ui_schema);
        Ok(())
    }

    /// Adds an element to a layout and binds it to a schema node. Both new
    /// roots are committed together.
    #[instrument(
        skip_all,
        fields(layout = %request.layout_id, schema = %request.schema_id, index = request.index)
    )]
    pub fn add_scoped_element_to_layout(
        &mut self,
        request: InsertScopedRequest,
    ) -> Result<(), EditorError> {
        let ui_root = self.ui_root()?;
        let schema_root = self
            .state
            .schema
            .clone()
            .ok_or(EditorError::MissingSchema)
            .inspect_err(|err| error!(%err, "could not add UI element"))?;
        let (schema, ui_schema) =
            insert_scoped_element(&ui_root, &schema_root, request, &self.config)
                .inspect_err(|err| error!(%err, "could not add UI element"))?;
        self.state.schema = Some(schema);
        self.state.ui_schema = Some(ui_schema);
        Ok(())
    }

    pub fn dispatch(&mut self, action: EditorAction) -> Result<(), EditorError> {
        match action {
            EditorAction::RemoveUiSchemaElement(request) => self.remove_ui_schema_element(request),
            EditorAction::AddUnscopedElementToLayout(request) => {
                self.add_unscoped_element_to_layout(request)
            }
            EditorAction::AddScopedElementToLayout(request) => {
                self.add_scoped_element_to_layout(request)
            }
        }
    }

    fn ui_root(&self) -> Result<Rc<EditorUiSchemaElement>, EditorError> {
        self.state.ui_schema.clone().ok_or_else(|| {
            error!("no UI schema is loaded");
            EditorError::MissingUiSchema
        })
    }
}
