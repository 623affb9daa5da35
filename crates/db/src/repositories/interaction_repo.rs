//! Repository for the `interactions` table.

use crm_core::types::DbId;
use sqlx::PgPool;

use crate::models::interaction::{
    Interaction, InteractionFilter, InteractionInput, InteractionListItem,
};

/// Column list shared across interaction queries.
const COLUMNS: &str =
    "id, project_id, manager_id, channel, description, mark, created_at, updated_at";

/// Column list for the joined listing (project, company, manager context).
const LIST_COLUMNS: &str = "i.id, i.project_id, i.manager_id, i.channel, i.mark, i.updated_at, \
    p.title AS project_title, c.name AS company_name, c.slug AS company_slug, \
    u.username AS manager_username";

/// FROM/JOIN body for the joined listing.
const LIST_FROM: &str = "FROM interactions i \
    JOIN projects p ON p.id = i.project_id \
    JOIN companies c ON c.id = p.company_id \
    JOIN users u ON u.id = i.manager_id";

/// Provides CRUD and listing operations for interactions.
pub struct InteractionRepo;

impl InteractionRepo {
    /// Insert a new interaction recorded by `manager_id` against a project.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        manager_id: DbId,
        input: &InteractionInput,
    ) -> Result<Interaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO interactions (project_id, manager_id, channel, description, mark)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Interaction>(&query)
            .bind(project_id)
            .bind(manager_id)
            .bind(input.channel)
            .bind(&input.description)
            .bind(input.mark)
            .fetch_one(pool)
            .await
    }

    /// Find an interaction by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Interaction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM interactions WHERE id = $1");
        sqlx::query_as::<_, Interaction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update an interaction in place, refreshing `updated_at`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &InteractionInput,
    ) -> Result<Option<Interaction>, sqlx::Error> {
        let query = format!(
            "UPDATE interactions SET
                channel = $2,
                description = $3,
                mark = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Interaction>(&query)
            .bind(id)
            .bind(input.channel)
            .bind(&input.description)
            .bind(input.mark)
            .fetch_optional(pool)
            .await
    }

    /// Delete an interaction, returning its project id for the redirect
    /// back to that project's interaction list.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "DELETE FROM interactions WHERE id = $1 RETURNING project_id",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List a project's interactions, most recently updated first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Interaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM interactions WHERE project_id = $1 \
             ORDER BY updated_at DESC, id DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Interaction>(&query)
            .bind(project_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a project's interactions.
    pub async fn count_for_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM interactions WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }

    /// List every interaction under a company's projects, via the owning
    /// relation.
    pub async fn list_for_company_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Vec<InteractionListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS} {LIST_FROM} \
             WHERE c.slug = $1 \
             ORDER BY i.updated_at DESC, i.id DESC"
        );
        sqlx::query_as::<_, InteractionListItem>(&query)
            .bind(slug)
            .fetch_all(pool)
            .await
    }

    /// List the interactions a manager has recorded, for their profile page.
    pub async fn list_for_manager(
        pool: &PgPool,
        manager_id: DbId,
    ) -> Result<Vec<InteractionListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS} {LIST_FROM} \
             WHERE i.manager_id = $1 \
             ORDER BY i.updated_at DESC, i.id DESC"
        );
        sqlx::query_as::<_, InteractionListItem>(&query)
            .bind(manager_id)
            .fetch_all(pool)
            .await
    }

    /// Global interaction listing with filters and pagination.
    pub async fn query(
        pool: &PgPool,
        filter: &InteractionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InteractionListItem>, sqlx::Error> {
        let (where_clause, binds, bind_idx) = build_interaction_filter(filter);
        let query = format!(
            "SELECT {LIST_COLUMNS} {LIST_FROM} {where_clause} \
             ORDER BY i.updated_at DESC, i.id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );
        let q = bind_values(sqlx::query_as::<_, InteractionListItem>(&query), &binds);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count interactions matching the filter (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &InteractionFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, binds, _) = build_interaction_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT {LIST_FROM} {where_clause}");
        let q = bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &binds);
        q.fetch_one(pool).await
    }
}

/// Typed bind value for dynamically-built interaction queries.
enum BindValue {
    BigInt(DbId),
    Text(String),
}

/// Build a WHERE clause and bind values from interaction filter parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// empty when no filters are active, or starts with `WHERE `.
fn build_interaction_filter(filter: &InteractionFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut binds: Vec<BindValue> = Vec::new();

    if let Some(channel) = filter.channel {
        conditions.push(format!("i.channel = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Text(channel.code().to_string()));
    }

    if let Some(mark) = filter.mark {
        conditions.push(format!("i.mark = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Text(mark.code().to_string()));
    }

    if let Some(manager_id) = filter.manager_id {
        conditions.push(format!("i.manager_id = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::BigInt(manager_id));
    }

    if let Some(ref needle) = filter.project_contains {
        conditions.push(format!("p.title ILIKE ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Text(super::contains_pattern(needle)));
    }

    if let Some(ref needle) = filter.company_contains {
        conditions.push(format!("c.name ILIKE ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Text(super::contains_pattern(needle)));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, binds, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    binds: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for value in binds {
        match value {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    binds: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for value in binds {
        match value {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}
