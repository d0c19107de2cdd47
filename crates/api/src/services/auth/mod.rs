//! Authentication service.
//!
//! Provides password registration and login, and rotation and revocation of
//! JWT refresh tokens.

mod error;
pub mod password;
pub mod tokens;

pub use error::AuthError;
pub use password::{hash_password, validate_password, verify_password};
pub use tokens::{Claims, TokenIssuer, TokenPair, hash_token};

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use bazaar_core::{Email, UserRole};

use crate::db::users::NewUser;
use crate::db::{RefreshTokenRepository, RepositoryError, UserRepository};
use crate::models::User;

/// Body of `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/refresh` and `POST /auth/logout`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// A token pair and the profile it was issued for.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Authentication service.
///
/// Handles registration, login, and the refresh token lifecycle.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    refresh_tokens: RefreshTokenRepository<'a>,
    issuer: &'a TokenIssuer,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, issuer: &'a TokenIssuer) -> Self {
        Self {
            users: UserRepository::new(pool),
            refresh_tokens: RefreshTokenRepository::new(pool),
            issuer,
        }
    }

    /// Register a new customer and sign them in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::MissingField` if a name is blank.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, AuthError> {
        let email = Email::parse(&req.email)?;
        validate_password(&req.password)?;
        let first_name = required(&req.first_name, "first_name")?;
        let last_name = required(&req.last_name, "last_name")?;
        let phone = optional(req.phone.as_deref());

        if self.users.email_exists(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(&req.password)?;

        let user = self
            .users
            .create(&NewUser {
                email: &email,
                password_hash: &password_hash,
                first_name,
                last_name,
                phone,
                role: UserRole::Customer,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "user registered");

        self.issue(user).await
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong
    /// or the account is inactive.
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = Email::parse(&req.email)?;

        let (user, password_hash) = self
            .users
            .get_active_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(&req.password, &password_hash)?;

        tracing::info!(user_id = %user.id, "user logged in");

        self.issue(user).await
    }

    /// Exchange a refresh token for a new pair. The old token is spent.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidRefreshToken` if the token fails
    /// verification or is not (or no longer) stored.
    /// Returns `AuthError::InvalidCredentials` if the account has since been
    /// deactivated or deleted.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self
            .issuer
            .verify(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let owner = self
            .refresh_tokens
            .consume(&hash_token(refresh_token))
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;
        if owner != claims.user_id {
            tracing::warn!(
                token_user_id = %claims.user_id,
                stored_user_id = %owner,
                "refresh token owner mismatch"
            );
            return Err(AuthError::InvalidRefreshToken);
        }

        let user = self
            .users
            .get_by_id(owner)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::InvalidCredentials)?;

        tracing::info!(user_id = %user.id, "refresh token rotated");

        self.issue(user).await
    }

    /// Revoke a refresh token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidRefreshToken` if the token is not stored.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let deleted = self
            .refresh_tokens
            .delete(&hash_token(refresh_token))
            .await?;
        if !deleted {
            return Err(AuthError::InvalidRefreshToken);
        }
        Ok(())
    }

    /// Sign a pair for `user` and store the refresh token digest.
    async fn issue(&self, user: User) -> Result<AuthResponse, AuthError> {
        let pair = self.issuer.issue_pair(&user)?;

        self.refresh_tokens
            .purge_expired_for_user(user.id)
            .await?;
        self.refresh_tokens
            .store(user.id, &hash_token(&pair.refresh_token), pair.refresh_expires_at)
            .await?;

        Ok(AuthResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            user,
        })
    }
}

/// Trim a required text field, rejecting blanks.
pub(crate) fn required<'s>(value: &'s str, field: &'static str) -> Result<&'s str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(trimmed)
}

/// Trim an optional text field; blanks become `None`.
pub(crate) fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required("  Ada ", "first_name").unwrap(), "Ada");
        assert!(matches!(
            required("   ", "last_name"),
            Err(AuthError::MissingField("last_name"))
        ));
    }

    #[test]
    fn test_optional_drops_blank() {
        assert_eq!(optional(Some(" +1 555 0100 ")), Some("+1 555 0100"));
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(None), None);
    }

    #[test]
    fn test_auth_response_never_contains_password_hash() {
        use chrono::Utc;

        let response = AuthResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            user: User {
                id: bazaar_core::UserId::new(1),
                email: Email::parse("ada@example.com").unwrap(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                phone: None,
                role: UserRole::Customer,
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user"]["email"], "ada@example.com");
        assert_eq!(json["user"]["role"], "customer");
        assert!(json["user"].get("password_hash").is_none());
    }
}
