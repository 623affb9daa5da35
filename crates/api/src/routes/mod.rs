//! Route definitions, one module per resource.

pub mod auth;
pub mod company;
pub mod health;
pub mod interaction;
pub mod profile;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the full route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                                       company list (GET)
/// /create                                 company create (POST, superuser)
/// /{slug}                                 company detail (GET)
/// /{slug}/update                          edit data (GET) / update (PUT, superuser)
/// /{slug}/delete                          delete (DELETE, superuser)
///
/// /{slug}/projects                        company's projects (GET)
/// /{slug}/projects/create                 project create (POST, superuser)
/// /project/{id}                           project detail (GET)
/// /projects/{id}/update                   edit data (GET) / update (PUT, superuser)
/// /projects/{id}/delete                   delete (DELETE, superuser)
/// /all-projects                           global project list (GET)
///
/// /projects/project-interactions/{id}     project's interactions (GET)
/// /interactions/interaction/{id}          interaction detail (GET)
/// /interaction/{id}/create                create under project {id} (POST)
/// /interaction/{id}/update                edit data (GET) / update (PUT, owner)
/// /interaction/{id}/delete                delete (DELETE, owner)
/// /{slug}/interactions                    company's interactions (GET)
/// /all-interactions                       global interaction list (GET)
///
/// /auth/register                          register (POST, public)
/// /auth/login                             login (POST, public)
/// /auth/logout                            logout (POST)
/// /auth/password-reset                    request reset token (POST, public)
/// /auth/password-reset/confirm            redeem reset token (POST, public)
///
/// /my-profile                             own profile page (GET)
/// /my-profile/password-change             change password (POST)
/// /profile/update                         update account (PUT)
///
/// /health                                 liveness (GET, public)
/// ```
///
/// Literal segments win over `{slug}` captures, so a company whose slug
/// collides with a literal route (`create`, `project`, ...) is shadowed.
/// Slugs are transliterated lowercase ASCII, which keeps real collisions to
/// names that literally spell a route segment.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(profile::router())
        .merge(project::router())
        .merge(interaction::router())
        .merge(company::router())
}
