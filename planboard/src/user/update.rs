//! UpdateUser command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::processor::logged;
use crate::store::Patch;
use crate::types::{UserId, UserProfile};
use crate::validate::{ensure_email_available, normalize_email};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Update a user's email, password hash, name or picture
#[operation(verb = "update", noun = "user", description = "Update a user's profile or credentials")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateUser {
    /// The user ID
    pub id: UserId,
    /// New email, unique across users
    pub email: Option<String>,
    /// New password hash
    pub password_hash: Option<String>,
    /// New display name
    pub name: Option<String>,
    /// New picture URL
    pub picture: Option<String>,
}

impl UpdateUser {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let mut patch = Patch::new();
        if let Some(email) = &self.email {
            let email = normalize_email(email)?;
            ensure_email_available(ctx.store(), &email, Some(&self.id)).await?;
            patch = patch.set("email", email);
        }
        if let Some(hash) = &self.password_hash {
            if hash.is_empty() {
                return Err(PlanError::invalid_value("password_hash", "must not be empty"));
            }
            patch = patch.set("password_hash", hash.as_str());
        }
        if let Some(name) = &self.name {
            patch = patch.set("name", name.as_str());
        }
        if let Some(picture) = &self.picture {
            patch = patch.set("picture", picture.as_str());
        }

        let user = if patch.is_empty() {
            ctx.users().get(&self.id).await?
        } else {
            ctx.users().update(&self.id, &patch).await?
        };
        Ok(serde_json::to_value(UserProfile::from(&user))?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for UpdateUser {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;

    #[tokio::test]
    async fn test_update_user() {
        let ctx = PlanContext::in_memory();
        let ada = ctx
            .users()
            .insert(&User::new("ada@example.com").with_password_hash("h"))
            .await
            .unwrap();
        let bob = ctx
            .users()
            .insert(&User::new("bob@example.com").with_password_hash("h"))
            .await
            .unwrap();

        // keeping your own email is fine
        let profile = UpdateUser::new(ada.id.clone())
            .with_email("ADA@example.com")
            .with_name("Ada")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(profile["name"], "Ada");

        let err = UpdateUser::new(bob.id.clone())
            .with_email("ada@example.com")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(matches!(err, PlanError::DuplicateEmail { .. }));
        assert_eq!(
            ctx.users().get(&bob.id).await.unwrap().email,
            "bob@example.com"
        );
    }

    #[tokio::test]
    async fn test_password_hash_is_stored_not_returned() {
        let ctx = PlanContext::in_memory();
        let ada = ctx
            .users()
            .insert(&User::new("ada@example.com").with_password_hash("old"))
            .await
            .unwrap();
        let profile = UpdateUser::new(ada.id.clone())
            .with_password_hash("new")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert!(profile.get("password_hash").is_none());
        assert_eq!(
            ctx.users().get(&ada.id).await.unwrap().password_hash.as_deref(),
            Some("new")
        );
    }
}
