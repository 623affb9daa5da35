//! Route definitions for the manager's own profile.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/my-profile", get(profile::my_profile))
        .route("/my-profile/password-change", post(profile::password_change))
        .route("/profile/update", put(profile::update_account))
}
