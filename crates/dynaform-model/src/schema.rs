//! The data-schema tree.
//!
//! # Node kinds
//!
//! | Kind          | JSON Schema                         | Children                 |
//! |---------------|-------------------------------------|--------------------------|
//! | `Object`      | `type: object` / `properties`       | named properties         |
//! | `Array`       | `type: array` / `items`             | optional item schema     |
//! | `Primitive`   | `string`, `number`, `integer`, ...  | none                     |
//! | `Combinator`  | `anyOf`, `oneOf`, `allOf`           | alternatives, in order   |
//! | `Untyped`     | anything else (`{}`, `enum`, ...)   | none                     |

use std::collections::BTreeSet;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::id::NodeId;
use crate::tree::TreeNode;

/// Primitive JSON Schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl PrimitiveType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            _ => None,
        }
    }
}

/// Combinator keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    AnyOf,
    OneOf,
    AllOf,
}

impl Combinator {
    pub const ALL: [Combinator; 3] = [Self::AnyOf, Self::OneOf, Self::AllOf];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::AnyOf => "anyOf",
            Self::OneOf => "oneOf",
            Self::AllOf => "allOf",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.keyword() == s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Object {
        /// Named children, in document order.
        properties: IndexMap<String, Rc<SchemaElement>>,
        /// The document spelled out `properties`, even if empty.
        declared: bool,
    },
    Array {
        items: Option<Rc<SchemaElement>>,
    },
    Primitive(PrimitiveType),
    Combinator {
        combinator: Combinator,
        alternatives: Vec<Rc<SchemaElement>>,
    },
    Untyped,
}

/// A node in the data-schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaElement {
    pub uuid: Option<NodeId>,
    pub parent: Option<NodeId>,
    pub kind: SchemaKind,
    /// Ids of the UI-schema nodes bound to this node.
    pub linked_ui_schema_elements: BTreeSet<NodeId>,
    /// Keywords the editor does not interpret, kept for export.
    pub other: Map<String, Value>,
}

impl SchemaElement {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            uuid: None,
            parent: None,
            kind,
            linked_ui_schema_elements: BTreeSet::new(),
            other: Map::new(),
        }
    }

    pub fn object() -> Self {
        Self::new(SchemaKind::Object {
            properties: IndexMap::new(),
            declared: false,
        })
    }

    pub fn primitive(primitive: PrimitiveType) -> Self {
        Self::new(SchemaKind::Primitive(primitive))
    }

    pub fn with_uuid(mut self, id: impl Into<NodeId>) -> Self {
        self.uuid = Some(id.into());
        self
    }

    /// Adds a named property to an object node, pointing its `parent` here.
    ///
    /// Non-object nodes are returned unchanged.
    pub fn with_property(mut self, name: impl Into<String>, mut child: SchemaElement) -> Self {
        child.parent = self.uuid.clone();
        if let SchemaKind::Object { properties, .. } = &mut self.kind {
            properties.insert(name.into(), Rc::new(child));
        }
        self
    }

    /// Returns the kind name used in `type`.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            SchemaKind::Object { .. } => "object",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Primitive(p) => p.as_str(),
            SchemaKind::Combinator { combinator, .. } => combinator.keyword(),
            SchemaKind::Untyped => "untyped",
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, SchemaKind::Object { .. })
    }

    pub fn property(&self, name: &str) -> Option<&Rc<SchemaElement>> {
        match &self.kind {
            SchemaKind::Object { properties, .. } => properties.get(name),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&Rc<SchemaElement>> {
        match &self.kind {
            SchemaKind::Array { items } => items.as_ref(),
            _ => None,
        }
    }

    /// Name under which `child` (compared by reference) is held, if it is a
    /// property of this node.
    pub fn property_name_of(&self, child: &Rc<SchemaElement>) -> Option<&str> {
        match &self.kind {
            SchemaKind::Object { properties, .. } => properties
                .iter()
                .find(|(_, p)| Rc::ptr_eq(p, child))
                .map(|(name, _)| name.as_str()),
            _ => None,
        }
    }
}

impl TreeNode for SchemaElement {
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
        match &self.kind {
            SchemaKind::Object { properties, .. } => properties.values().collect(),
            SchemaKind::Array { items } => items.iter().collect(),
            SchemaKind::Combinator { alternatives, .. } => alternatives.iter().collect(),
            SchemaKind::Primitive(_) | SchemaKind::Untyped => Vec::new(),
        }
    }

    fn children_mut(&mut self) -> Vec<&mut Rc<Self>> {
        match &mut self.kind {
            SchemaKind::Object { properties, .. } => properties.values_mut().collect(),
            SchemaKind::Array { items } => items.iter_mut().collect(),
            SchemaKind::Combinator { alternatives, .. } => alternatives.iter_mut().collect(),
            SchemaKind::Primitive(_) | SchemaKind::Untyped => Vec::new(),
        }
    }

    fn remove_child(&mut self, child: &Rc<Self>) -> bool {
        match &mut self.kind {
            SchemaKind::Object { properties, .. } => {
                match properties.iter().position(|(_, p)| Rc::ptr_eq(p, child)) {
                    Some(index) => {
                        properties.shift_remove_index(index);
                        true
                    }
                    None => false,
                }
            }
            SchemaKind::Array { items } => {
                if items.as_ref().is_some_and(|item| Rc::ptr_eq(item, child)) {
                    *items = None;
                    true
                } else {
                    false
                }
            }
            SchemaKind::Combinator { alternatives, .. } => {
                match alternatives.iter().position(|a| Rc::ptr_eq(a, child)) {
                    Some(index) => {
                        alternatives.remove(index);
                        true
                    }
                    None => false,
                }
            }
            SchemaKind::Primitive(_) | SchemaKind::Untyped => false,
        }
    }

    fn describe(&self) -> String {
        match &self.uuid {
            Some(id) => format!("{} schema element {id}", self.type_name()),
            None => format!("{} schema element without uuid", self.type_name()),
        }
    }
}
