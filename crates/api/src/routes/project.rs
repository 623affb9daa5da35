//! Route definitions for the project resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{slug}/projects", get(project::list_for_company))
        .route("/{slug}/projects/create", post(project::create))
        .route("/project/{id}", get(project::detail))
        .route(
            "/projects/{id}/update",
            get(project::edit_form).put(project::update),
        )
        .route("/projects/{id}/delete", delete(project::delete))
        .route("/all-projects", get(project::list_all))
}
