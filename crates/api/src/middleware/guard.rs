//! Access-control guards.
//!
//! Two orthogonal checks cover the whole permission model:
//!
//! - [`RequireSuperuser`] gates company and project mutations at extraction
//!   time, before the handler body runs.
//! - [`ensure_owner`] is a post-load check for interaction mutations, where
//!   the owning manager is only known after the row has been fetched. It binds
//!   strictly to the creating manager; the superuser flag does not bypass it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use crm_core::error::CoreError;
use crm_core::types::DbId;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the superuser flag. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn superuser_only(RequireSuperuser(user): RequireSuperuser) -> AppResult<Json<()>> {
///     // user is guaranteed to be a superuser here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireSuperuser(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperuser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_superuser {
            return Err(AppError::Core(CoreError::Forbidden(
                "Superuser access required".into(),
            )));
        }
        Ok(RequireSuperuser(user))
    }
}

/// Reject unless `user` is the manager who owns the row.
///
/// Ownership is personal: a superuser who did not create the row is rejected
/// like anyone else.
pub fn ensure_owner(user: &AuthUser, owner_id: DbId) -> Result<(), AppError> {
    if user.user_id != owner_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the manager who created this record may modify it".into(),
        )));
    }
    Ok(())
}
