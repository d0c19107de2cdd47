//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! bazaar-cli admin create -e admin@example.com -p 'a long password' \
//!     --first-name Ada --last-name Lovelace
//! bazaar-cli admin promote -e shopper@example.com
//! ```

use bazaar_api::db::users::NewUser;
use bazaar_api::db::{RepositoryError, UserRepository};
use bazaar_api::services::AuthError;
use bazaar_api::services::auth::{hash_password, validate_password};
use bazaar_core::{Email, EmailError, UserRole};
use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password rejected or could not be hashed.
    #[error("{0}")]
    Password(#[from] AuthError),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("User already exists with email: {0}")]
    UserExists(String),

    #[error("No user with email: {0}")]
    UserNotFound(String),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Create a new admin user.
///
/// # Errors
///
/// Returns `AdminError` if the input is invalid, the email is taken, or the
/// database is unreachable.
pub async fn create_user(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), AdminError> {
    let email = Email::parse(email)?;
    validate_password(password)?;
    let first_name = non_blank(first_name, "first_name")?;
    let last_name = non_blank(last_name, "last_name")?;

    let pool = connect().await?;
    let users = UserRepository::new(&pool);

    tracing::info!("Creating admin user: {}", email.as_str());

    let password_hash = hash_password(password)?;
    let user = users
        .create(&NewUser {
            email: &email,
            password_hash: &password_hash,
            first_name,
            last_name,
            phone: None,
            role: UserRole::Admin,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.as_str().to_owned()),
            other => other.into(),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email.as_str()
    );
    Ok(())
}

/// Grant the admin role to an existing user.
///
/// # Errors
///
/// Returns `AdminError::UserNotFound` if no active account has that email.
pub async fn promote(email: &str) -> Result<(), AdminError> {
    let email = Email::parse(email)?;

    let pool = connect().await?;
    let user = UserRepository::new(&pool)
        .set_role(&email, UserRole::Admin)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::UserNotFound(email.as_str().to_owned()),
            other => other.into(),
        })?;

    tracing::info!("User {} ({}) is now an admin", user.id, user.email.as_str());
    Ok(())
}

fn non_blank<'s>(value: &'s str, field: &'static str) -> Result<&'s str, AdminError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AdminError::MissingField(field));
    }
    Ok(trimmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(" Ada ", "first_name").unwrap(), "Ada");
        assert!(matches!(
            non_blank("", "last_name"),
            Err(AdminError::MissingField("last_name"))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input_before_connecting() {
        let err = create_user("not-an-email", "long enough pw", "Ada", "L")
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::InvalidEmail(_)));

        let err = create_user("ada@example.com", "short", "Ada", "L")
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Password(AuthError::WeakPassword(_))));
    }
}
