//! Handlers for the manager's own profile page.

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use crm_core::error::CoreError;
use crm_core::validation::{check, FieldErrors};
use crm_db::models::interaction::InteractionListItem;
use crm_db::models::user::{Profile, UpdateAccount, User};
use crm_db::repositories::{InteractionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::{check_password, UserInfo};
use crate::handlers::see_other;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// The profile page payload: account, avatar, and the manager's own
/// interaction history.
#[derive(Debug, Serialize)]
pub struct ManagerProfile {
    pub user: UserInfo,
    pub profile: Option<Profile>,
    pub interactions: Vec<InteractionListItem>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChangeRequest {
    pub old_password: String,
    pub new_password: String,
}

/// GET /my-profile
pub async fn my_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ManagerProfile>> {
    let account = load_user(&state, &user).await?;
    let profile = UserRepo::profile(&state.pool, user.user_id).await?;
    let interactions = InteractionRepo::list_for_manager(&state.pool, user.user_id).await?;
    Ok(Json(ManagerProfile {
        user: UserInfo::from(&account),
        profile,
        interactions,
    }))
}

/// PUT /profile/update
pub async fn update_account(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateAccount>,
) -> AppResult<Response> {
    check(&input)?;

    let updated = UserRepo::update_account(&state.pool, user.user_id, &input.username, &input.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user.user_id)))?;

    let profile = match &input.avatar_path {
        Some(path) => Some(UserRepo::set_avatar(&state.pool, user.user_id, path).await?),
        None => UserRepo::profile(&state.pool, user.user_id).await?,
    };

    tracing::info!(user_id = user.user_id, "account updated");
    Ok(see_other(
        "/my-profile".to_string(),
        ManagerProfile {
            user: UserInfo::from(&updated),
            profile,
            interactions: Vec::new(),
        },
    ))
}

/// POST /my-profile/password-change
pub async fn password_change(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PasswordChangeRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let account = load_user(&state, &user).await?;

    let valid = verify_password(&req.old_password, &account.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !valid {
        let mut fields = FieldErrors::new();
        fields.add("old_password", "Current password is incorrect");
        return Err(AppError::Validation(fields));
    }
    check_password(&req.new_password)?;

    let new_hash = hash_password(&req.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;
    UserRepo::set_password(&state.pool, user.user_id, &new_hash).await?;

    tracing::info!(user_id = user.user_id, "password changed");
    Ok(Json(serde_json::json!({ "changed": true })))
}

async fn load_user(state: &AppState, user: &AuthUser) -> Result<User, AppError> {
    UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user.user_id)))
}
