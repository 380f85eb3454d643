//! Entity kinds and the `Entity` trait tying a record type to its collection

use super::ids::EntityId;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// The five record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Project,
    Board,
    Card,
    Comment,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::User,
        EntityKind::Project,
        EntityKind::Board,
        EntityKind::Card,
        EntityKind::Comment,
    ];

    /// Singular name, used in errors and op strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Project => "project",
            Self::Board => "board",
            Self::Card => "card",
            Self::Comment => "comment",
        }
    }

    /// Plural collection name, used for storage directories
    pub fn collection(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Project => "projects",
            Self::Board => "boards",
            Self::Card => "cards",
            Self::Comment => "comments",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plain data record stored in one collection.
///
/// Records carry no persistence behaviour; the store does all I/O.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const KIND: EntityKind;
    type Id: EntityId;

    fn id(&self) -> &Self::Id;
}
