use dynaform_model::{BuildError, NodeId, ScopeError};
use thiserror::Error;

/// Problems with node ids: failed lookups, missing ids and ids that would
/// occur twice in one tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UuidError {
    #[error("no element with uuid {id}")]
    NotFound { id: NodeId },
    #[error("{element} has no uuid")]
    NoUuid { element: String },
    #[error("uuid {id} is already used in the tree")]
    Duplicate { id: NodeId },
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Uuid(#[from] UuidError),
    #[error("{element} is not a layout")]
    NotALayout { element: String },
    #[error("index {index} is out of range for a layout with {len} elements")]
    IndexOutOfRange { index: isize, len: usize },
    #[error("no UI schema is loaded")]
    MissingUiSchema,
    #[error("no schema is loaded")]
    MissingSchema,
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Scope(#[from] ScopeError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Parse(#[from] toml::de::Error),
}
