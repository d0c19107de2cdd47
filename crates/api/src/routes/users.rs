//! Profile routes for the signed-in user.

use axum::extract::State;

use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::response::ApiResponse;
use crate::services::UserService;
use crate::services::users::UpdateProfileRequest;
use crate::state::AppState;

/// GET /api/v1/users/profile
///
/// # Errors
///
/// Returns 404 if the account has been deleted since the token was issued.
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<ApiResponse<User>> {
    let user = UserService::new(state.pool()).get_profile(current.id).await?;
    Ok(ApiResponse::ok("Profile retrieved successfully", user))
}

/// PUT /api/v1/users/profile
///
/// # Errors
///
/// Returns 400 if a name is blank.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<ApiResponse<User>> {
    let user = UserService::new(state.pool())
        .update_profile(current.id, &req)
        .await?;
    Ok(ApiResponse::ok("Profile updated successfully", user))
}
