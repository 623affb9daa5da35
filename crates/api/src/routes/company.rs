//! Route definitions for the company resource, mounted at the root.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::company;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(company::list))
        .route("/create", post(company::create))
        .route("/{slug}", get(company::detail))
        .route(
            "/{slug}/update",
            get(company::edit_form).put(company::update),
        )
        .route("/{slug}/delete", delete(company::delete))
}
