//! Repository for the `projects` table.

use crm_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{Project, ProjectFilter, ProjectInput, ProjectListItem};

/// Column list shared across project queries.
const COLUMNS: &str = "id, company_id, title, description, started_at, finished_at, cost";

/// Column list for the company-joined listing.
const LIST_COLUMNS: &str = "p.id, p.company_id, p.title, p.started_at, p.finished_at, p.cost, \
    c.name AS company_name, c.slug AS company_slug";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project under the given company.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &ProjectInput,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (company_id, title, description, started_at, finished_at, cost)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(company_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.started_at)
            .bind(input.finished_at)
            .bind(input.cost)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a project in place. Returns `None` if no row exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ProjectInput,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = $2,
                description = $3,
                started_at = $4,
                finished_at = $5,
                cost = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.started_at)
            .bind(input.finished_at)
            .bind(input.cost)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project, returning the slug of its owning company.
    ///
    /// The slug is read off the deleted row's join, not any request path:
    /// the delete redirect targets the company's project list and the row
    /// is gone afterwards. Returns `None` if no project matched.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "DELETE FROM projects p USING companies c
             WHERE p.id = $1 AND c.id = p.company_id
             RETURNING c.slug",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List a company's projects, most recently started first.
    pub async fn list_for_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE company_id = $1 \
             ORDER BY started_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Global project listing with title/company filters and pagination.
    pub async fn query(
        pool: &PgPool,
        filter: &ProjectFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectListItem>, sqlx::Error> {
        let (where_clause, binds, bind_idx) = build_project_filter(filter);
        let query = format!(
            "SELECT {LIST_COLUMNS} FROM projects p \
             JOIN companies c ON c.id = p.company_id \
             {where_clause} \
             ORDER BY p.started_at DESC, p.id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );
        let mut q = sqlx::query_as::<_, ProjectListItem>(&query);
        for value in &binds {
            q = q.bind(value.as_str());
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count projects matching the filter (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &ProjectFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, binds, _) = build_project_filter(filter);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM projects p \
             JOIN companies c ON c.id = p.company_id {where_clause}"
        );
        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for value in &binds {
            q = q.bind(value.as_str());
        }
        q.fetch_one(pool).await
    }
}

/// Build a WHERE clause and bind values from project filter parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// empty when no filters are active, or starts with `WHERE `.
fn build_project_filter(filter: &ProjectFilter) -> (String, Vec<String>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut binds: Vec<String> = Vec::new();

    if let Some(ref needle) = filter.title_contains {
        conditions.push(format!("p.title ILIKE ${bind_idx}"));
        bind_idx += 1;
        binds.push(super::contains_pattern(needle));
    }

    if let Some(ref needle) = filter.company_contains {
        conditions.push(format!("c.name ILIKE ${bind_idx}"));
        bind_idx += 1;
        binds.push(super::contains_pattern(needle));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, binds, bind_idx)
}
