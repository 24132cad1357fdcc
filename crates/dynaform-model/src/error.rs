use thiserror::Error;

/// Failure to turn a JSON document into an editor tree.
///
/// `path` is the JSON Pointer of the offending value inside the document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("expected a JSON object at {path:?}")]
    NotAnObject { path: String },
    #[error("unsupported value for keyword {keyword:?} at {path:?}")]
    InvalidKeyword { path: String, keyword: String },
    #[error("UI-schema element at {path:?} has no type")]
    MissingType { path: String },
}
