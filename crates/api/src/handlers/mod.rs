//! Request handlers, one module per resource.

pub mod auth;
pub mod company;
pub mod health;
pub mod interaction;
pub mod profile;
pub mod project;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::response::DataResponse;

/// 303 See Other with a `Location` header and the written entity as the body.
///
/// Mutation endpoints answer with the canonical URL of the page a client
/// should show next, so browser-style clients can follow the redirect and
/// API clients can read the payload directly.
pub(crate) fn see_other<T: Serialize>(location: String, payload: T) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, location)],
        Json(DataResponse { data: payload }),
    )
        .into_response()
}
