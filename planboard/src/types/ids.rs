//! Strongly typed record identifiers
//!
//! Every id is an opaque ULID string. The newtypes keep a card id from being
//! passed where a board id is expected; the store treats them all as strings.

use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Common surface of the id newtypes
pub trait EntityId:
    Clone + std::fmt::Debug + std::fmt::Display + PartialEq + Eq + std::hash::Hash + Send + Sync
{
    /// The raw id string
    fn as_str(&self) -> &str;

    /// Fail with `InvalidIdentifier` unless the id is a well-formed ULID
    fn ensure_valid(&self) -> Result<()> {
        validate_id(self.as_str())
    }
}

/// Check that `id` is a well-formed ULID
pub fn validate_id(id: &str) -> Result<()> {
    Ulid::from_string(id)
        .map(|_| ())
        .map_err(|_| PlanError::invalid_identifier(id))
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh id
            pub fn new() -> Self {
                Self(Ulid::new().to_string())
            }

            /// Wrap an existing id string without validating it
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl EntityId for $name {
            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&$name> for $name {
            fn from(id: &$name) -> Self {
                id.clone()
            }
        }
    };
}

define_id!(
    /// Identifier of a user
    UserId
);
define_id!(
    /// Identifier of a project
    ProjectId
);
define_id!(
    /// Identifier of a board
    BoardId
);
define_id!(
    /// Identifier of a card
    CardId
);
define_id!(
    /// Identifier of a comment
    CommentId
);
