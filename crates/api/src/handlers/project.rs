//! Handlers for the project resource.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use crm_core::error::CoreError;
use crm_core::pagination::{self, PAGE_SIZE};
use crm_core::types::DbId;
use crm_core::validation::{check, validate_project_dates, FieldErrors};
use crm_db::models::company::Company;
use crm_db::models::project::{Project, ProjectFilter, ProjectInput, ProjectListItem};
use crm_db::repositories::{CompanyRepo, ProjectRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::see_other;
use crate::middleware::auth::AuthUser;
use crate::middleware::guard::RequireSuperuser;
use crate::query::ProjectListQuery;
use crate::response::{DataResponse, Paginated};
use crate::state::AppState;

/// A company's project list with the owning company alongside, so clients
/// can render the page heading without a second request.
#[derive(Debug, Serialize)]
pub struct CompanyProjects {
    pub company: Company,
    pub projects: Vec<Project>,
}

/// GET /{slug}/projects
pub async fn list_for_company(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<CompanyProjects>>> {
    let company = company_by_slug(&state, &slug).await?;
    let projects = ProjectRepo::list_for_company(&state.pool, company.id).await?;
    Ok(Json(DataResponse {
        data: CompanyProjects { company, projects },
    }))
}

/// POST /{slug}/projects/create
pub async fn create(
    State(state): State<AppState>,
    RequireSuperuser(user): RequireSuperuser,
    Path(slug): Path<String>,
    Json(input): Json<ProjectInput>,
) -> AppResult<Response> {
    validate_input(&input)?;
    let company = company_by_slug(&state, &slug).await?;

    let project = ProjectRepo::create(&state.pool, company.id, &input).await?;

    tracing::info!(
        user_id = user.user_id,
        project_id = project.id,
        company_id = company.id,
        "project created"
    );
    Ok(see_other(format!("/project/{}", project.id), project))
}

/// GET /project/{id}
pub async fn detail(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Project", id)))?;
    Ok(Json(project))
}

/// GET /projects/{id}/update
pub async fn edit_form(
    State(state): State<AppState>,
    RequireSuperuser(_user): RequireSuperuser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Project", id)))?;
    Ok(Json(project))
}

/// PUT /projects/{id}/update
pub async fn update(
    State(state): State<AppState>,
    RequireSuperuser(user): RequireSuperuser,
    Path(id): Path<DbId>,
    Json(input): Json<ProjectInput>,
) -> AppResult<Response> {
    validate_input(&input)?;

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Project", id)))?;

    tracing::info!(user_id = user.user_id, project_id = project.id, "project updated");
    Ok(see_other(format!("/project/{}", project.id), project))
}

/// DELETE /projects/{id}/delete
///
/// Answers with the owning company's project list as the follow-up location.
pub async fn delete(
    State(state): State<AppState>,
    RequireSuperuser(user): RequireSuperuser,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let company_slug = ProjectRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Project", id)))?;

    tracing::info!(user_id = user.user_id, project_id = id, "project deleted");
    Ok(see_other(
        format!("/{company_slug}/projects"),
        serde_json::json!({ "deleted": id }),
    ))
}

/// GET /all-projects
pub async fn list_all(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ProjectListQuery>,
) -> AppResult<Json<Paginated<ProjectListItem>>> {
    let filter = ProjectFilter {
        title_contains: params.title.clone(),
        company_contains: params.company.clone(),
    };
    let page = pagination::clamp_page(params.page);
    let offset = pagination::page_offset(page, PAGE_SIZE);

    let projects = ProjectRepo::query(&state.pool, &filter, PAGE_SIZE, offset).await?;
    let total = ProjectRepo::count(&state.pool, &filter).await?;

    Ok(Json(Paginated::new(
        "/all-projects",
        projects,
        page,
        total,
        PAGE_SIZE,
        |p| params.with_page(p),
    )))
}

async fn company_by_slug(state: &AppState, slug: &str) -> Result<Company, AppError> {
    CompanyRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Company", slug)))
}

/// Derive-level checks plus the cross-field date-order rule.
fn validate_input(input: &ProjectInput) -> Result<(), FieldErrors> {
    let mut fields = FieldErrors::new();
    if let Err(e) = check(input) {
        fields.merge(e);
    }
    if let Err(e) = validate_project_dates(input.started_at, input.finished_at) {
        fields.merge(e);
    }
    if fields.is_empty() {
        Ok(())
    } else {
        Err(fields)
    }
}
