//! User records

use super::ids::UserId;
use super::kind::{Entity, EntityKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A registered user.
///
/// `password_hash` is opaque to this crate; hashing happens upstream.
/// `provider_ids` maps an OAuth provider name ("github", "google") to the
/// user's id at that provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    /// Provider the account was created through, if any
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub provider_ids: BTreeMap<String, String>,
    pub created_on: DateTime<Utc>,
}

impl User {
    /// Create a user with a fresh id and the given (already normalized) email
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            email: email.into(),
            password_hash: None,
            name: None,
            picture: None,
            provider: None,
            provider_ids: BTreeMap::new(),
            created_on: Utc::now(),
        }
    }

    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    /// Record the user's id at an OAuth provider
    pub fn with_provider_id(mut self, provider: impl Into<String>, id: impl Into<String>) -> Self {
        let provider = provider.into();
        self.provider_ids.insert(provider.clone(), id.into());
        self.provider.get_or_insert(provider);
        self
    }

    /// True if the user can sign in with a password or through a provider
    pub fn has_credentials(&self) -> bool {
        self.password_hash.as_deref().is_some_and(|h| !h.is_empty())
            || !self.provider_ids.is_empty()
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.id
    }
}

/// Public view of a user, without credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub provider: Option<String>,
    pub created_on: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            picture: user.picture.clone(),
            provider: user.provider.clone(),
            created_on: user.created_on,
        }
    }
}
