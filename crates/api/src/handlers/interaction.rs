//! Handlers for the interaction resource.
//!
//! Interactions belong to the manager who created them. Mutations run a
//! post-load ownership check rather than a role guard; the superuser flag
//! grants no bypass here.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use crm_core::error::CoreError;
use crm_core::pagination::{self, PAGE_SIZE};
use crm_core::types::DbId;
use crm_db::models::interaction::{
    Interaction, InteractionFilter, InteractionInput, InteractionListItem,
};
use crm_db::repositories::{CompanyRepo, InteractionRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::see_other;
use crate::middleware::auth::AuthUser;
use crate::middleware::guard::ensure_owner;
use crate::query::{InteractionListQuery, PageQuery};
use crate::response::{DataResponse, Paginated};
use crate::state::AppState;

/// GET /projects/project-interactions/{id}
pub async fn list_for_project(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Paginated<Interaction>>> {
    ensure_project_exists(&state, id).await?;

    let page = pagination::clamp_page(params.page);
    let offset = pagination::page_offset(page, PAGE_SIZE);

    let interactions =
        InteractionRepo::list_for_project(&state.pool, id, PAGE_SIZE, offset).await?;
    let total = InteractionRepo::count_for_project(&state.pool, id).await?;

    Ok(Json(Paginated::new(
        &format!("/projects/project-interactions/{id}"),
        interactions,
        page,
        total,
        PAGE_SIZE,
        |p| params.with_page(p),
    )))
}

/// GET /interactions/interaction/{id}
pub async fn detail(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Interaction>> {
    let interaction = find_by_id(&state, id).await?;
    Ok(Json(interaction))
}

/// POST /interaction/{id}/create
///
/// `{id}` is the project the interaction belongs to. The creating manager is
/// always the authenticated user; the body cannot override it.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<InteractionInput>,
) -> AppResult<Response> {
    crm_core::validation::check(&input)?;
    ensure_project_exists(&state, project_id).await?;

    let interaction =
        InteractionRepo::create(&state.pool, project_id, user.user_id, &input).await?;

    tracing::info!(
        user_id = user.user_id,
        interaction_id = interaction.id,
        project_id,
        "interaction created"
    );
    Ok(see_other(
        format!("/projects/project-interactions/{project_id}"),
        interaction,
    ))
}

/// GET /interaction/{id}/update
pub async fn edit_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Interaction>> {
    let interaction = find_by_id(&state, id).await?;
    ensure_owner(&user, interaction.manager_id)?;
    Ok(Json(interaction))
}

/// PUT /interaction/{id}/update
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<InteractionInput>,
) -> AppResult<Response> {
    crm_core::validation::check(&input)?;

    let existing = find_by_id(&state, id).await?;
    ensure_owner(&user, existing.manager_id)?;

    let interaction = InteractionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Interaction", id)))?;

    tracing::info!(user_id = user.user_id, interaction_id = id, "interaction updated");
    Ok(see_other(
        format!("/interactions/interaction/{id}"),
        interaction,
    ))
}

/// DELETE /interaction/{id}/delete
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let existing = find_by_id(&state, id).await?;
    ensure_owner(&user, existing.manager_id)?;

    let project_id = InteractionRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Interaction", id)))?;

    tracing::info!(user_id = user.user_id, interaction_id = id, "interaction deleted");
    Ok(see_other(
        format!("/projects/project-interactions/{project_id}"),
        serde_json::json!({ "deleted": id }),
    ))
}

/// GET /{slug}/interactions
pub async fn list_for_company(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<InteractionListItem>>>> {
    if CompanyRepo::find_by_slug(&state.pool, &slug).await?.is_none() {
        return Err(AppError::Core(CoreError::not_found("Company", &slug)));
    }
    let interactions = InteractionRepo::list_for_company_slug(&state.pool, &slug).await?;
    Ok(Json(DataResponse { data: interactions }))
}

/// GET /all-interactions
pub async fn list_all(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<InteractionListQuery>,
) -> AppResult<Json<Paginated<InteractionListItem>>> {
    let filter = InteractionFilter {
        channel: params.channel,
        mark: params.mark,
        manager_id: params.manager,
        project_contains: params.project.clone(),
        company_contains: params.company.clone(),
    };
    let page = pagination::clamp_page(params.page);
    let offset = pagination::page_offset(page, PAGE_SIZE);

    let interactions = InteractionRepo::query(&state.pool, &filter, PAGE_SIZE, offset).await?;
    let total = InteractionRepo::count(&state.pool, &filter).await?;

    Ok(Json(Paginated::new(
        "/all-interactions",
        interactions,
        page,
        total,
        PAGE_SIZE,
        |p| params.with_page(p),
    )))
}

async fn find_by_id(state: &AppState, id: DbId) -> Result<Interaction, AppError> {
    InteractionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Interaction", id)))
}

async fn ensure_project_exists(state: &AppState, id: DbId) -> Result<(), AppError> {
    if ProjectRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::not_found("Project", id)));
    }
    Ok(())
}
