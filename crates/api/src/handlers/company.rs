//! Handlers for the company resource, including the aggregate create and
//! update workflows that write the parent row and its contact collections in
//! one submission.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use crm_core::error::CoreError;
use crm_core::pagination::{self, PAGE_SIZE};
use crm_core::slug::generate_slug;
use crm_core::validation::{check, FieldErrors};
use crm_db::models::company::{
    Company, CompanyFilter, CompanyInput, CompanyOrdering, CompanyWithContacts,
};
use crm_db::models::contact::{ContactCommand, EmailInput, PhoneInput};
use crm_db::repositories::CompanyRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::see_other;
use crate::middleware::auth::AuthUser;
use crate::middleware::guard::RequireSuperuser;
use crate::query::CompanyListQuery;
use crate::response::Paginated;
use crate::state::AppState;

/// How many phone/email rows a single create submission may carry.
const CONTACT_ROWS: usize = 2;

/// A company create submission: parent fields plus plain child-row lists.
/// Blank rows are skipped, mirroring untouched extra form rows.
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub company: CompanyInput,
    #[serde(default)]
    pub phones: Vec<PhoneInput>,
    #[serde(default)]
    pub emails: Vec<EmailInput>,
}

/// A company update submission: parent fields plus child-row command lists.
#[derive(Debug, Deserialize)]
pub struct UpdateCompanyRequest {
    pub company: CompanyInput,
    #[serde(default)]
    pub phones: Vec<ContactCommand<PhoneInput>>,
    #[serde(default)]
    pub emails: Vec<ContactCommand<EmailInput>>,
}

/// GET /
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<CompanyListQuery>,
) -> AppResult<Json<Paginated<Company>>> {
    let ordering = CompanyOrdering::from_param(params.sort_by.as_deref());
    let filter = CompanyFilter {
        name_contains: params.name.clone(),
    };
    let page = pagination::clamp_page(params.page);
    let offset = pagination::page_offset(page, PAGE_SIZE);

    let companies = CompanyRepo::list(&state.pool, &filter, ordering, PAGE_SIZE, offset).await?;
    let total = CompanyRepo::count(&state.pool, &filter).await?;

    Ok(Json(Paginated::new(
        "/",
        companies,
        page,
        total,
        PAGE_SIZE,
        |p| params.with_page(p),
    )))
}

/// GET /{slug}
pub async fn detail(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<CompanyWithContacts>> {
    let company = find_by_slug(&state, &slug).await?;
    let (phones, emails) = CompanyRepo::contacts(&state.pool, company.id).await?;
    Ok(Json(CompanyWithContacts {
        company,
        phones,
        emails,
    }))
}

/// POST /create
pub async fn create(
    State(state): State<AppState>,
    RequireSuperuser(user): RequireSuperuser,
    Json(req): Json<CreateCompanyRequest>,
) -> AppResult<Response> {
    let (phones, emails, slug) = validate_create(&req)?;

    let created =
        CompanyRepo::create_with_contacts(&state.pool, &req.company, &slug, &phones, &emails)
            .await?;

    tracing::info!(
        user_id = user.user_id,
        company_id = created.company.id,
        slug = %created.company.slug,
        "company created"
    );
    let location = format!("/{}", created.company.slug);
    Ok(see_other(location, created))
}

/// GET /{slug}/update
///
/// Returns the same aggregate as the detail endpoint, gated like the write it
/// precedes, so edit forms can prefill current values and child-row ids.
pub async fn edit_form(
    State(state): State<AppState>,
    RequireSuperuser(_user): RequireSuperuser,
    Path(slug): Path<String>,
) -> AppResult<Json<CompanyWithContacts>> {
    let company = find_by_slug(&state, &slug).await?;
    let (phones, emails) = CompanyRepo::contacts(&state.pool, company.id).await?;
    Ok(Json(CompanyWithContacts {
        company,
        phones,
        emails,
    }))
}

/// PUT /{slug}/update
pub async fn update(
    State(state): State<AppState>,
    RequireSuperuser(user): RequireSuperuser,
    Path(slug): Path<String>,
    Json(req): Json<UpdateCompanyRequest>,
) -> AppResult<Response> {
    let new_slug = validate_update(&req)?;
    let company = find_by_slug(&state, &slug).await?;

    let updated = CompanyRepo::update_with_contacts(
        &state.pool,
        company.id,
        &req.company,
        &new_slug,
        &req.phones,
        &req.emails,
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::not_found("Company", &slug)))?;

    tracing::info!(
        user_id = user.user_id,
        company_id = updated.company.id,
        slug = %updated.company.slug,
        "company updated"
    );
    let location = format!("/{}", updated.company.slug);
    Ok(see_other(location, updated))
}

/// DELETE /{slug}/delete
pub async fn delete(
    State(state): State<AppState>,
    RequireSuperuser(user): RequireSuperuser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let removed = CompanyRepo::delete_by_slug(&state.pool, &slug).await?;
    if !removed {
        return Err(AppError::Core(CoreError::not_found("Company", &slug)));
    }
    tracing::info!(user_id = user.user_id, slug = %slug, "company deleted");
    Ok(see_other("/".to_string(), serde_json::json!({ "deleted": slug })))
}

async fn find_by_slug(state: &AppState, slug: &str) -> Result<Company, AppError> {
    CompanyRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Company", slug)))
}

/// Validate a create submission and derive the slug.
///
/// Blank child rows are dropped before validation; the surviving rows are
/// validated in place so errors land on `phones[i].phone` style keys.
fn validate_create(
    req: &CreateCompanyRequest,
) -> Result<(Vec<PhoneInput>, Vec<EmailInput>, String), FieldErrors> {
    let mut fields = FieldErrors::new();
    if let Err(e) = check(&req.company) {
        fields.merge(e);
    }

    let phones: Vec<PhoneInput> = req
        .phones
        .iter()
        .filter(|p| !p.is_blank())
        .cloned()
        .collect();
    let emails: Vec<EmailInput> = req
        .emails
        .iter()
        .filter(|e| !e.is_blank())
        .cloned()
        .collect();

    if phones.len() > CONTACT_ROWS {
        fields.add(
            "phones",
            format!("At most {CONTACT_ROWS} phone rows may be submitted"),
        );
    }
    if emails.len() > CONTACT_ROWS {
        fields.add(
            "emails",
            format!("At most {CONTACT_ROWS} email rows may be submitted"),
        );
    }

    for (i, phone) in phones.iter().enumerate() {
        if let Err(e) = check(phone) {
            fields.merge(e.prefixed(&format!("phones[{i}]")));
        }
    }
    for (i, email) in emails.iter().enumerate() {
        if let Err(e) = check(email) {
            fields.merge(e.prefixed(&format!("emails[{i}]")));
        }
    }

    check_slug(&req.company.name, &mut fields);

    if fields.is_empty() {
        Ok((phones, emails, generate_slug(&req.company.name)))
    } else {
        Err(fields)
    }
}

/// Validate an update submission. Unlike create, blank values inside
/// commands are hard errors: the caller explicitly asked for a write.
fn validate_update(req: &UpdateCompanyRequest) -> Result<String, FieldErrors> {
    let mut fields = FieldErrors::new();
    if let Err(e) = check(&req.company) {
        fields.merge(e);
    }

    for (i, command) in req.phones.iter().enumerate() {
        if let Some(value) = command.value() {
            if let Err(e) = check(value) {
                fields.merge(e.prefixed(&format!("phones[{i}]")));
            }
        }
    }
    for (i, command) in req.emails.iter().enumerate() {
        if let Some(value) = command.value() {
            if let Err(e) = check(value) {
                fields.merge(e.prefixed(&format!("emails[{i}]")));
            }
        }
    }

    check_slug(&req.company.name, &mut fields);

    if fields.is_empty() {
        Ok(generate_slug(&req.company.name))
    } else {
        Err(fields)
    }
}

fn check_slug(name: &str, fields: &mut FieldErrors) {
    if generate_slug(name).is_empty() && fields.first("name").is_none() {
        fields.add("name", "Company name must contain letters or digits");
    }
}
