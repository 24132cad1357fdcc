//! The UI-schema tree.
//!
//! Layout-like nodes own an ordered `elements` list. Any node may in addition
//! own one `options.detail` element, the nested view of a master-detail
//! pattern.

use std::rc::Rc;

use serde_json::{Map, Value};

use crate::id::NodeId;
use crate::tree::TreeNode;

pub const VERTICAL_LAYOUT: &str = "VerticalLayout";
pub const HORIZONTAL_LAYOUT: &str = "HorizontalLayout";
pub const GROUP: &str = "Group";
pub const CATEGORIZATION: &str = "Categorization";
pub const CATEGORY: &str = "Category";
pub const CONTROL: &str = "Control";
pub const LABEL: &str = "Label";

/// Types that always carry an `elements` list.
pub const LAYOUT_TYPES: [&str; 5] = [
    VERTICAL_LAYOUT,
    HORIZONTAL_LAYOUT,
    GROUP,
    CATEGORIZATION,
    CATEGORY,
];

/// Rendering hints of a UI-schema node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiOptions {
    /// Nested element shown for a selected item.
    pub detail: Option<Rc<EditorUiSchemaElement>>,
    pub hints: Map<String, Value>,
}

impl UiOptions {
    pub fn is_empty(&self) -> bool {
        self.detail.is_none() && self.hints.is_empty()
    }
}

/// A node in the UI-schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorUiSchemaElement {
    pub uuid: Option<NodeId>,
    pub parent: Option<NodeId>,
    pub type_: String,
    /// `Some` exactly on layout-like nodes.
    pub elements: Option<Vec<Rc<EditorUiSchemaElement>>>,
    pub scope: Option<String>,
    pub linked_schema_element: Option<NodeId>,
    pub options: Option<UiOptions>,
    /// Keywords the editor does not interpret (`label`, `text`, `rule`, ...).
    pub other: Map<String, Value>,
}

impl EditorUiSchemaElement {
    pub fn new(type_: impl Into<String>) -> Self {
        let type_ = type_.into();
        let elements = LAYOUT_TYPES.contains(&type_.as_str()).then(Vec::new);
        Self {
            uuid: None,
            parent: None,
            type_,
            elements,
            scope: None,
            linked_schema_element: None,
            options: None,
            other: Map::new(),
        }
    }

    pub fn control(scope: impl Into<String>) -> Self {
        let mut control = Self::new(CONTROL);
        control.scope = Some(scope.into());
        control
    }

    pub fn label(text: impl Into<String>) -> Self {
        let mut label = Self::new(LABEL);
        label.other.insert("text".into(), Value::String(text.into()));
        label
    }

    pub fn with_uuid(mut self, id: impl Into<NodeId>) -> Self {
        self.uuid = Some(id.into());
        self
    }

    /// Appends `child` to `elements`, pointing its `parent` here.
    ///
    /// Non-layout nodes are returned unchanged.
    pub fn with_element(mut self, mut child: EditorUiSchemaElement) -> Self {
        child.parent = self.uuid.clone();
        if let Some(elements) = &mut self.elements {
            elements.push(Rc::new(child));
        }
        self
    }

    /// Installs `detail` as `options.detail`, pointing its `parent` here.
    pub fn with_detail(mut self, mut detail: EditorUiSchemaElement) -> Self {
        detail.parent = self.uuid.clone();
        self.options
            .get_or_insert_with(UiOptions::default)
            .detail = Some(Rc::new(detail));
        self
    }

    pub fn is_layout(&self) -> bool {
        self.elements.is_some()
    }

    pub fn is_control(&self) -> bool {
        self.type_ == CONTROL
    }

    pub fn is_categorization_like(&self) -> bool {
        self.type_ == CATEGORIZATION || self.type_ == CATEGORY
    }

    pub fn detail(&self) -> Option<&Rc<EditorUiSchemaElement>> {
        self.options.as_ref().and_then(|o| o.detail.as_ref())
    }

    pub fn elements(&self) -> &[Rc<EditorUiSchemaElement>] {
        self.elements.as_deref().unwrap_or(&[])
    }
}

impl TreeNode for EditorUiSchemaElement {
    fn uuid(&self) -> Option<&NodeId> {
        self.uuid.as_ref()
    }

    fn assign_uuid(&mut self, id: NodeId) {
        if self.uuid.is_none() {
            self.uuid = Some(id);
        }
    }

    fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn children(&self) -> Vec<&Rc<Self>> {
        let mut out: Vec<&Rc<Self>> = self.elements().iter().collect();
        out.extend(self.detail());
        out
    }

    fn children_mut(&mut self) -> Vec<&mut Rc<Self>> {
        let mut out: Vec<&mut Rc<Self>> = match &mut self.elements {
            Some(elements) => elements.iter_mut().collect(),
            None => Vec::new(),
        };
        if let Some(detail) = self.options.as_mut().and_then(|o| o.detail.as_mut()) {
            out.push(detail);
        }
        out
    }

    /// Splices `child` out of `elements`, or clears `options.detail` when it
    /// holds `child`. An `options` left empty by the latter is dropped.
    fn remove_child(&mut self, child: &Rc<Self>) -> bool {
        let mut removed = false;
        if let Some(elements) = &mut self.elements {
            if let Some(index) = elements.iter().position(|e| Rc::ptr_eq(e, child)) {
                elements.remove(index);
                removed = true;
            }
        }
        if let Some(options) = &mut self.options {
            if options.detail.as_ref().is_some_and(|d| Rc::ptr_eq(d, child)) {
                options.detail = None;
                removed = true;
                if options.is_empty() {
                    self.options = None;
                }
            }
        }
        removed
    }

    fn describe(&self) -> String {
        match &self.uuid {
            Some(id) => format!("{} {id}", self.type_),
            None => format!("{} without uuid", self.type_),
        }
    }
}
