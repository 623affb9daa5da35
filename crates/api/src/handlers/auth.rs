//! Handlers for registration, login, and the password-reset flow.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use crm_core::error::CoreError;
use crm_core::types::DbId;
use crm_core::validation::{check, FieldErrors};
use crm_db::models::user::{CreateUser, User};
use crm_db::repositories::{PasswordResetRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::auth::reset::{generate_reset_token, hash_reset_token, reset_token_expiry};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Public view of a user account, embedded in auth responses.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub is_superuser: bool,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_superuser: user.is_superuser,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1 to 150 characters"))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    check(&req)?;
    check_password(&req.password)?;

    let input = CreateUser {
        username: req.username.clone(),
        email: req.email.clone(),
        password_hash: hash_password(&req.password)
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?,
        is_superuser: false,
    };
    let user = UserRepo::create(&state.pool, &input).await?;

    tracing::info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(UserInfo::from(&user))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &req.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    let valid = verify_password(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !valid {
        return Err(invalid_credentials());
    }
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let access_token = generate_access_token(user.id, user.is_superuser, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserInfo::from(&user),
    }))
}

/// POST /auth/logout
///
/// Access tokens are stateless; logout is an acknowledgement that the client
/// should discard its token.
pub async fn logout(user: AuthUser) -> Json<serde_json::Value> {
    tracing::info!(user_id = user.user_id, "user logged out");
    Json(serde_json::json!({ "logged_out": true }))
}

/// POST /auth/password-reset
///
/// Always answers 200; whether the email maps to an account is not revealed.
/// The plaintext token is only ever logged for out-of-band delivery.
pub async fn password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(user) = UserRepo::find_by_email(&state.pool, &req.email).await? {
        let (plaintext, hash) = generate_reset_token();
        let token =
            PasswordResetRepo::create(&state.pool, user.id, &hash, reset_token_expiry()).await?;
        tracing::info!(
            user_id = user.id,
            token_id = token.id,
            reset_token = %plaintext,
            "password reset token issued"
        );
    }
    Ok(Json(serde_json::json!({ "sent": true })))
}

/// POST /auth/password-reset/confirm
pub async fn password_reset_confirm(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetConfirm>,
) -> AppResult<Json<serde_json::Value>> {
    let hash = hash_reset_token(&req.token);
    let token = PasswordResetRepo::find_active(&state.pool, &hash)
        .await?
        .ok_or_else(|| {
            let mut fields = FieldErrors::new();
            fields.add("token", "Invalid or expired reset token");
            AppError::Validation(fields)
        })?;

    check_password(&req.new_password)?;

    let new_hash = hash_password(&req.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;
    UserRepo::set_password(&state.pool, token.user_id, &new_hash).await?;
    PasswordResetRepo::mark_used(&state.pool, token.id).await?;

    tracing::info!(user_id = token.user_id, token_id = token.id, "password reset completed");
    Ok(Json(serde_json::json!({ "reset": true })))
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

/// Strength check as a field error on `password`.
pub(crate) fn check_password(password: &str) -> Result<(), AppError> {
    if let Err(msg) = validate_password_strength(password, MIN_PASSWORD_LENGTH) {
        let mut fields = FieldErrors::new();
        fields.add("password", msg);
        return Err(AppError::Validation(fields));
    }
    Ok(())
}
