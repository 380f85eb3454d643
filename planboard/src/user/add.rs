//! AddUser command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::processor::{ids_at, logged};
use crate::types::{User, UserProfile};
use crate::validate::{ensure_email_available, normalize_email, validate_user};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Register a user with a password hash
#[operation(verb = "add", noun = "user", description = "Register a user")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddUser {
    /// Email address, unique across users
    pub email: String,
    /// Password hash computed by the caller
    pub password_hash: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Picture URL
    pub picture: Option<String>,
}

impl AddUser {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: Some(password_hash.into()),
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
        let email = normalize_email(&self.email)?;
        let mut user = User::new(email);
        user.password_hash = self.password_hash.clone();
        user.name = self.name.clone();
        user.picture = self.picture.clone();
        validate_user(&user)?;

        ensure_email_available(ctx.store(), &user.email, None).await?;
        let user = ctx.users().insert(&user).await?;
        Ok(serde_json::to_value(UserProfile::from(&user))?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for AddUser {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        ids_at(result, &["id"])
    }
}
