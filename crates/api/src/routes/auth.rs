//! Route definitions for authentication, mounted at `/auth`.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    let routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/password-reset", post(auth::password_reset))
        .route("/password-reset/confirm", post(auth::password_reset_confirm));

    Router::new().nest("/auth", routes)
}
