//! Node identities shared by the schema tree and the UI-schema tree.

use std::fmt;
use std::rc::Rc;

/// Identifier of a node within its tree.
///
/// Fresh identifiers are random v4 UUIDs, but any string is accepted so that
/// fixtures can use short readable ids such as `"u1"`. Cloning is cheap: the
/// text is shared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(Rc<str>);

impl NodeId {
    /// Generate a new random identifier.
    pub fn generate() -> Self {
        Self(Rc::from(uuid::Uuid::new_v4().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(Rc::from(value))
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(Rc::from(value))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct_uuids() {
        let a = NodeId::generate();
        let b = NodeId::generate();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn ids_from_strings_compare_by_text() {
        assert_eq!(NodeId::from("u1"), NodeId::from("u1".to_string()));
        assert_eq!(NodeId::from("u1").to_string(), "u1");
    }
}
