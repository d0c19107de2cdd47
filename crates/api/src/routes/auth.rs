//! Account registration and token routes.

use axum::extract::State;

use crate::error::Result;
use crate::extract::ApiJson;
use crate::response::ApiResponse;
use crate::services::AuthService;
use crate::services::auth::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
use crate::state::AppState;

/// Register a customer account and sign it in.
///
/// POST /api/v1/auth/register
///
/// # Errors
///
/// Returns 400 for invalid input or an email that is already registered.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<ApiResponse<AuthResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens()).register(&req).await?;
    Ok(ApiResponse::created("User registered successfully", auth))
}

/// Sign in with email and password.
///
/// POST /api/v1/auth/login
///
/// # Errors
///
/// Returns 401 if the credentials are wrong or the account is inactive.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens()).login(&req).await?;
    Ok(ApiResponse::created("Login successful", auth))
}

/// Exchange a refresh token for a new token pair.
///
/// POST /api/v1/auth/refresh
///
/// # Errors
///
/// Returns 401 if the refresh token is invalid, expired, or already used.
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> Result<ApiResponse<AuthResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens())
        .refresh(&req.refresh_token)
        .await?;
    Ok(ApiResponse::ok("Token refreshed successfully", auth))
}

/// Revoke a refresh token.
///
/// POST /api/v1/auth/logout
///
/// # Errors
///
/// Returns 401 if the refresh token is not active.
pub async fn logout(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> Result<ApiResponse<()>> {
    AuthService::new(state.pool(), state.tokens())
        .logout(&req.refresh_token)
        .await?;
    Ok(ApiResponse::message("Logged out successfully"))
}
