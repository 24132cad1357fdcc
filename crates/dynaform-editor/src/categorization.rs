//! Per-categorization editor state.

use std::collections::HashMap;

use dynaform_model::{EditorUiSchemaElement, NodeId};

/// Keeps auxiliary state for Categorization and Category nodes.
pub trait CategorizationService {
    /// Releases whatever is kept for `element`.
    fn remove_element(&mut self, element: &EditorUiSchemaElement);

    /// Releases everything, e.g. when a new document is loaded.
    fn clear(&mut self) {}
}

/// Remembers which tab is selected in each categorization.
#[derive(Debug, Default, Clone)]
pub struct DefaultCategorizationService {
    selected: HashMap<NodeId, usize>,
}

impl DefaultCategorizationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects tab `index` of `categorization`.
    ///
    /// Returns `false` if the element is not a categorization or has no uuid.
    pub fn set_tab_selection(
        &mut self,
        categorization: &EditorUiSchemaElement,
        index: usize,
    ) -> bool {
        if !categorization.is_categorization_like() {
            return false;
        }
        match &categorization.uuid {
            Some(id) => {
                self.selected.insert(id.clone(), index);
                true
            }
            None => false,
        }
    }

    /// Selected tab of the categorization `id`; the first tab by default.
    pub fn tab_selection(&self, id: &NodeId) -> usize {
        self.selected.get(id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl CategorizationService for DefaultCategorizationService {
    fn remove_element(&mut self, element: &EditorUiSchemaElement) {
        if let Some(id) = &element.uuid {
            self.selected.remove(id);
        }
    }

    fn clear(&mut self) {
        self.selected.clear();
    }
}
