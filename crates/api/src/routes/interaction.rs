//! Route definitions for the interaction resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::interaction;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/project-interactions/{id}",
            get(interaction::list_for_project),
        )
        .route("/interactions/interaction/{id}", get(interaction::detail))
        .route("/interaction/{id}/create", post(interaction::create))
        .route(
            "/interaction/{id}/update",
            get(interaction::edit_form).put(interaction::update),
        )
        .route("/interaction/{id}/delete", delete(interaction::delete))
        .route("/{slug}/interactions", get(interaction::list_for_company))
        .route("/all-interactions", get(interaction::list_all))
}
