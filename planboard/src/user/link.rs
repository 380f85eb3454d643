//! LinkUser command: OAuth find-or-create

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::processor::{ids_at, logged};
use crate::store::{Filter, Patch};
use crate::types::{User, UserProfile};
use crate::validate::{ensure_email_available, normalize_email, require_text, validate_user};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;
use tracing::debug;

/// Resolve a provider identity to a user.
///
/// Looks the user up by provider id, then by email (recording the provider
/// id on the match), and registers a new user when neither finds one.
#[operation(verb = "link", noun = "user", description = "Find or create the user behind an OAuth identity")]
#[derive(Debug, Deserialize, Serialize)]
pub struct LinkUser {
    /// Provider name, e.g. "github"
    pub provider: String,
    /// The user's id at the provider
    pub provider_id: String,
    /// Email reported by the provider
    pub email: String,
    /// Display name reported by the provider
    pub name: Option<String>,
    /// Picture URL reported by the provider
    pub picture: Option<String>,
}

impl LinkUser {
    pub fn new(
        provider: impl Into<String>,
        provider_id: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            provider_id: provider_id.into(),
            email: email.into(),
            name: None,
            picture: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let provider = require_text("provider", &self.provider)?.to_lowercase();
        if provider.contains('.') {
            return Err(PlanError::invalid_value("provider", "must not contain '.'"));
        }
        let provider_id = require_text("provider_id", &self.provider_id)?;
        let email = normalize_email(&self.email)?;
        let id_path = format!("provider_ids.{provider}");

        let by_provider = ctx
            .users()
            .find(&Filter::all().eq(id_path.as_str(), provider_id.as_str()))
            .await?;
        if let Some(user) = by_provider.first() {
            debug!(user = %user.id, %provider, "matched provider id");
            return Ok(linked(user, false));
        }

        let by_email = ctx
            .users()
            .find(&Filter::all().eq("email", email.as_str()))
            .await?;
        if let Some(user) = by_email.first() {
            let mut patch = Patch::new().set(id_path, provider_id);
            if user.provider.is_none() {
                patch = patch.set("provider", provider.as_str());
            }
            if user.name.is_none() {
                if let Some(name) = &self.name {
                    patch = patch.set("name", name.as_str());
                }
            }
            if user.picture.is_none() {
                if let Some(picture) = &self.picture {
                    patch = patch.set("picture", picture.as_str());
                }
            }
            let user = ctx.users().update(&user.id, &patch).await?;
            debug!(user = %user.id, %provider, "linked provider to existing email");
            return Ok(linked(&user, false));
        }

        let mut user = User::new(email).with_provider_id(provider.as_str(), provider_id);
        user.name = self.name.clone();
        user.picture = self.picture.clone();
        validate_user(&user)?;
        ensure_email_available(ctx.store(), &user.email, None).await?;
        let user = ctx.users().insert(&user).await?;
        debug!(user = %user.id, %provider, "registered user from provider");
        Ok(linked(&user, true))
    }
}

fn linked(user: &User, created: bool) -> Value {
    json!({
        "user": UserProfile::from(user),
        "created": created
    })
}

#[async_trait]
impl Execute<PlanContext, PlanError> for LinkUser {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        ids_at(result, &["user.id"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_link_creates_then_finds() {
        let ctx = PlanContext::in_memory();
        let first = LinkUser::new("GitHub", "42", "ada@example.com")
            .with_name("Ada")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(first["created"], true);
        assert_eq!(first["user"]["provider"], "github");

        // same identity, email changed at the provider
        let second = LinkUser::new("github", "42", "ada@new.example.com")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(second["created"], false);
        assert_eq!(second["user"]["id"], first["user"]["id"]);
    }

    #[tokio::test]
    async fn test_link_attaches_to_registered_email() {
        let ctx = PlanContext::in_memory();
        let ada = ctx
            .users()
            .insert(&User::new("ada@example.com").with_password_hash("h"))
            .await
            .unwrap();

        let result = LinkUser::new("google", "g-7", "Ada@Example.com")
            .with_picture("https://example.com/ada.png")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["created"], false);
        assert_eq!(result["user"]["id"], ada.id.as_str());

        let stored = ctx.users().get(&ada.id).await.unwrap();
        assert_eq!(stored.provider_ids.get("google").map(String::as_str), Some("g-7"));
        assert_eq!(stored.password_hash.as_deref(), Some("h"));
        assert_eq!(stored.picture.as_deref(), Some("https://example.com/ada.png"));
    }

    #[tokio::test]
    async fn test_link_rejects_dotted_provider() {
        let ctx = PlanContext::in_memory();
        let err = LinkUser::new("git.hub", "1", "a@b.c")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidValue { .. }));
    }
}
