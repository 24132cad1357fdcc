//! Editor configuration.
//!
//! ```toml
//! index_policy = "clamp"      # or "reject"
//! assign_missing_uuids = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, EditorError};

/// What to do with an insertion index outside `[0, len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexPolicy {
    /// Negative indices insert first, indices past the end append.
    #[default]
    Clamp,
    Reject,
}

impl IndexPolicy {
    /// Maps a requested index onto a valid insertion position in a list of
    /// `len` elements.
    pub fn resolve(self, index: isize, len: usize) -> Result<usize, EditorError> {
        match usize::try_from(index) {
            Ok(position) if position <= len => Ok(position),
            _ if self == Self::Reject => Err(EditorError::IndexOutOfRange { index, len }),
            Ok(_) => Ok(len),
            Err(_) => Ok(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub index_policy: IndexPolicy,
    /// Give inserted elements (and their descendants) a uuid if they lack
    /// one.
    pub assign_missing_uuids: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            index_policy: IndexPolicy::Clamp,
            assign_missing_uuids: true,
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_matrix() {
        let policy = IndexPolicy::Clamp;
        assert_eq!(policy.resolve(0, 2).unwrap(), 0);
        assert_eq!(policy.resolve(2, 2).unwrap(), 2);
        assert_eq!(policy.resolve(7, 2).unwrap(), 2);
        assert_eq!(policy.resolve(-3, 2).unwrap(), 0);
    }

    #[test]
    fn reject_matrix() {
        let policy = IndexPolicy::Reject;
        assert_eq!(policy.resolve(1, 2).unwrap(), 1);
        assert!(matches!(
            policy.resolve(3, 2),
            Err(EditorError::IndexOutOfRange { index: 3, len: 2 })
        ));
        assert!(policy.resolve(-1, 2).is_err());
    }

    #[test]
    fn parses_toml() {
        let config = EditorConfig::from_toml_str("index_policy = \"reject\"").unwrap();
        assert_eq!(config.index_policy, IndexPolicy::Reject);
        assert!(config.assign_missing_uuids);
        assert_eq!(EditorConfig::from_toml_str("").unwrap(), EditorConfig::default());
        assert!(EditorConfig::from_toml_str("index_polcy = \"clamp\"").is_err());
    }
}
