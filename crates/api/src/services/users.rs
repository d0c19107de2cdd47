//! Profile reads and updates for the signed-in user.

use serde::Deserialize;
use sqlx::PgPool;

use bazaar_core::UserId;

use super::auth::{AuthError, optional, required};
use crate::db::{RepositoryError, UserRepository};
use crate::models::User;

/// Body of `PUT /users/profile`.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// User profile service.
pub struct UserService<'a> {
    users: UserRepository<'a>,
}

impl<'a> UserService<'a> {
    /// Create a new user service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Get a user's profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_profile(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Replace first name, last name, and phone.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if a name is blank.
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        req: &UpdateProfileRequest,
    ) -> Result<User, AuthError> {
        let first_name = required(&req.first_name, "first_name")?;
        let last_name = required(&req.last_name, "last_name")?;
        let phone = optional(req.phone.as_deref());

        self.users
            .update_profile(user_id, first_name, last_name, phone)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }
}
