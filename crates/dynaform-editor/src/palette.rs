//! Elements that can be dragged into a layout without a schema binding.

use std::rc::Rc;

use dynaform_model::uischema::{
    CATEGORIZATION, CATEGORY, GROUP, HORIZONTAL_LAYOUT, LABEL, VERTICAL_LAYOUT,
};
use dynaform_model::{build_editor_ui_schema_tree, BuildError, EditorUiSchemaElement};
use serde_json::{json, Value};

/// One palette entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteElement {
    pub type_: String,
    pub label: String,
    /// UI-schema document the element is created from.
    pub template: Value,
}

impl PaletteElement {
    pub fn new(type_: impl Into<String>, label: impl Into<String>, template: Value) -> Self {
        Self {
            type_: type_.into(),
            label: label.into(),
            template,
        }
    }

    /// Creates a fresh element from the template. Every node of the result
    /// has a new uuid.
    pub fn instantiate(&self) -> Result<EditorUiSchemaElement, BuildError> {
        build_editor_ui_schema_tree(&self.template).map(Rc::unwrap_or_clone)
    }
}

pub trait PaletteService {
    fn palette_elements(&self) -> Vec<PaletteElement>;
}

/// Layouts, group, label and categorization.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPaletteService;

impl PaletteService for DefaultPaletteService {
    fn palette_elements(&self) -> Vec<PaletteElement> {
        vec![
            PaletteElement::new(
                HORIZONTAL_LAYOUT,
                "Horizontal Layout",
                json!({"type": HORIZONTAL_LAYOUT, "elements": []}),
            ),
            PaletteElement::new(
                VERTICAL_LAYOUT,
                "Vertical Layout",
                json!({"type": VERTICAL_LAYOUT, "elements": []}),
            ),
            PaletteElement::new(
                GROUP,
                "Group",
                json!({"type": GROUP, "label": "Group", "elements": []}),
            ),
            PaletteElement::new(LABEL, "Label", json!({"type": LABEL, "text": "Label"})),
            PaletteElement::new(
                CATEGORIZATION,
                "Categorization",
                json!({
                    "type": CATEGORIZATION,
                    "elements": [{"type": CATEGORY, "label": "Category", "elements": []}]
                }),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynaform_model::TreeNode;

    #[test]
    fn every_entry_instantiates_with_its_type() {
        for entry in DefaultPaletteService.palette_elements() {
            let element = entry.instantiate().unwrap();
            assert_eq!(element.type_, entry.type_);
            assert!(element.uuid.is_some());
            assert!(element.parent().is_none());
        }
    }

    #[test]
    fn instances_never_share_ids() {
        let entries = DefaultPaletteService.palette_elements();
        let categorization = entries
            .iter()
            .find(|e| e.type_ == CATEGORIZATION)
            .unwrap();
        let first = categorization.instantiate().unwrap();
        let second = categorization.instantiate().unwrap();
        assert_ne!(first.uuid, second.uuid);
        assert_ne!(first.elements()[0].uuid, second.elements()[0].uuid);
        assert_eq!(first.elements()[0].parent, first.uuid);
    }
}
