//! Field validation run before records reach the store

use crate::error::{PlanError, Result};
use crate::store::{Collection, EntityStore, Filter};
use crate::types::{Card, CardId, EntityId, User, UserId};

/// Trim `value` and reject it if nothing is left
pub fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlanError::invalid_value(field, "must not be blank"));
    }
    Ok(trimmed.to_string())
}

/// Trim and lower-case an email, requiring exactly one `@` between
/// non-empty local and domain parts
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(PlanError::missing_field("email"));
    }
    let mut parts = email.split('@');
    let well_formed = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        _ => false,
    };
    if !well_formed {
        return Err(PlanError::invalid_value(
            "email",
            format!("{email:?} is not an email address"),
        ));
    }
    Ok(email)
}

/// A user must be able to sign in somehow
pub fn validate_user(user: &User) -> Result<()> {
    if !user.has_credentials() {
        return Err(PlanError::invalid_value(
            "password_hash",
            "a user needs a password hash or a provider id",
        ));
    }
    Ok(())
}

/// Fail with `DuplicateEmail` if another user holds `email`.
///
/// This is a read before the write, not a constraint: two concurrent
/// registrations with the same email can both pass.
pub async fn ensure_email_available(
    store: &dyn EntityStore,
    email: &str,
    except: Option<&UserId>,
) -> Result<()> {
    let holders = Collection::<User>::new(store)
        .find(&Filter::all().eq("email", email))
        .await?;
    if holders.iter().any(|u| Some(&u.id) != except) {
        return Err(PlanError::DuplicateEmail {
            email: email.to_string(),
        });
    }
    Ok(())
}

/// A comment needs an existing author and an existing card
pub async fn validate_comment_refs(
    store: &dyn EntityStore,
    card: &CardId,
    created_by: &UserId,
) -> Result<()> {
    card.ensure_valid()?;
    created_by.ensure_valid()?;
    if !Collection::<User>::new(store).exists(created_by).await? {
        return Err(PlanError::not_found("user", created_by.as_str()));
    }
    if !Collection::<Card>::new(store).exists(card).await? {
        return Err(PlanError::not_found("card", card.as_str()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::Board;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("name", "  Launch ").unwrap(), "Launch");
        assert!(matches!(
            require_text("name", "   "),
            Err(PlanError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Ada@Example.COM ").unwrap(),
            "ada@example.com"
        );
        for bad in ["ada", "@example.com", "ada@", "a@b@c", "a da@example.com"] {
            assert!(normalize_email(bad).is_err(), "{bad} should be rejected");
        }
        assert!(matches!(
            normalize_email(""),
            Err(PlanError::MissingField { .. })
        ));
    }

    #[test]
    fn test_validate_user_needs_credentials() {
        assert!(validate_user(&User::new("a@b.c")).is_err());
        assert!(validate_user(&User::new("a@b.c").with_password_hash("x")).is_ok());
        assert!(validate_user(&User::new("a@b.c").with_provider_id("google", "1")).is_ok());
    }

    #[tokio::test]
    async fn test_email_precheck() {
        let store = MemoryStore::new();
        let users = Collection::<User>::new(&store);
        let ada = users
            .insert(&User::new("ada@example.com").with_password_hash("h"))
            .await
            .unwrap();

        let err = ensure_email_available(&store, "ada@example.com", None)
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::DuplicateEmail { .. }));

        ensure_email_available(&store, "ada@example.com", Some(&ada.id))
            .await
            .unwrap();
        ensure_email_available(&store, "bob@example.com", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_comment_refs() {
        let store = MemoryStore::new();
        let user = Collection::<User>::new(&store)
            .insert(&User::new("ada@example.com").with_password_hash("h"))
            .await
            .unwrap();
        let board = Collection::<Board>::new(&store)
            .insert(&Board::new("b"))
            .await
            .unwrap();
        let card = Collection::<Card>::new(&store)
            .insert(&Card::new(board.id.clone(), "c"))
            .await
            .unwrap();

        validate_comment_refs(&store, &card.id, &user.id).await.unwrap();

        let err = validate_comment_refs(&store, &CardId::new(), &user.id)
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = validate_comment_refs(&store, &card.id, &UserId::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
