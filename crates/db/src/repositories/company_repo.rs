//! Repository for the `companies`, `phones`, and `emails` tables.
//!
//! The aggregate write paths (create-with-contacts, update-with-contacts)
//! run inside one transaction: the parent row and every child mutation
//! commit together or not at all.

use crm_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{
    Company, CompanyFilter, CompanyInput, CompanyOrdering, CompanyWithContacts,
};
use crate::models::contact::{ContactCommand, Email, EmailInput, Phone, PhoneInput};

/// Column list shared across company queries.
const COLUMNS: &str = "id, name, slug, responsible_person, description, published, edited";

const PHONE_COLUMNS: &str = "id, company_id, phone";
const EMAIL_COLUMNS: &str = "id, company_id, email";

/// Provides CRUD and aggregate operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a company together with its phone/email collections.
    ///
    /// Child rows are bulk-inserted, one statement per collection, with the
    /// new parent's id. Everything runs in one transaction.
    pub async fn create_with_contacts(
        pool: &PgPool,
        input: &CompanyInput,
        slug: &str,
        phones: &[PhoneInput],
        emails: &[EmailInput],
    ) -> Result<CompanyWithContacts, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO companies (name, slug, responsible_person, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let company = sqlx::query_as::<_, Company>(&insert_query)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.responsible_person)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        let phone_values: Vec<String> = phones.iter().map(|p| p.phone.clone()).collect();
        let email_values: Vec<String> = emails.iter().map(|e| e.email.clone()).collect();

        let phones = Self::bulk_insert_phones(&mut tx, company.id, &phone_values).await?;
        let emails = Self::bulk_insert_emails(&mut tx, company.id, &email_values).await?;

        tx.commit().await?;

        Ok(CompanyWithContacts {
            company,
            phones,
            emails,
        })
    }

    /// Update a company and apply its child-row command lists.
    ///
    /// The slug is recomputed by the caller from the (possibly changed)
    /// name. Deletes run first, then in-place updates, then inserts, all in
    /// one transaction. A command whose id does not belong to this company
    /// fails the whole submission with `RowNotFound` and nothing commits.
    ///
    /// Returns `None` if no company row with the given `id` exists.
    pub async fn update_with_contacts(
        pool: &PgPool,
        id: DbId,
        input: &CompanyInput,
        slug: &str,
        phone_commands: &[ContactCommand<PhoneInput>],
        email_commands: &[ContactCommand<EmailInput>],
    ) -> Result<Option<CompanyWithContacts>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE companies SET
                name = $2,
                slug = $3,
                responsible_person = $4,
                description = $5,
                edited = CURRENT_DATE
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let company = sqlx::query_as::<_, Company>(&update_query)
            .bind(id)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.responsible_person)
            .bind(&input.description)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(company) = company else {
            return Ok(None);
        };

        Self::apply_phone_commands(&mut tx, company.id, phone_commands).await?;
        Self::apply_email_commands(&mut tx, company.id, email_commands).await?;

        let phones = Self::phones_inner(&mut tx, company.id).await?;
        let emails = Self::emails_inner(&mut tx, company.id).await?;

        tx.commit().await?;

        Ok(Some(CompanyWithContacts {
            company,
            phones,
            emails,
        }))
    }

    /// Find a company by its slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE slug = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Find a company by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a company's phone and email collections.
    pub async fn contacts(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<(Vec<Phone>, Vec<Email>), sqlx::Error> {
        let phone_query = format!(
            "SELECT {PHONE_COLUMNS} FROM phones WHERE company_id = $1 ORDER BY id"
        );
        let phones = sqlx::query_as::<_, Phone>(&phone_query)
            .bind(company_id)
            .fetch_all(pool)
            .await?;

        let email_query = format!(
            "SELECT {EMAIL_COLUMNS} FROM emails WHERE company_id = $1 ORDER BY id"
        );
        let emails = sqlx::query_as::<_, Email>(&email_query)
            .bind(company_id)
            .fetch_all(pool)
            .await?;

        Ok((phones, emails))
    }

    /// List companies with optional name filter, whitelisted ordering, and
    /// offset pagination.
    pub async fn list(
        pool: &PgPool,
        filter: &CompanyFilter,
        ordering: CompanyOrdering,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Company>, sqlx::Error> {
        let order_by = ordering.sql();
        match &filter.name_contains {
            Some(needle) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM companies WHERE name ILIKE $1 \
                     ORDER BY {order_by} LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Company>(&query)
                    .bind(super::contains_pattern(needle))
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM companies ORDER BY {order_by} LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Company>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Count companies matching the filter (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &CompanyFilter) -> Result<i64, sqlx::Error> {
        match &filter.name_contains {
            Some(needle) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*)::BIGINT FROM companies WHERE name ILIKE $1",
                )
                .bind(super::contains_pattern(needle))
                .fetch_one(pool)
                .await
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM companies")
                    .fetch_one(pool)
                    .await
            }
        }
    }

    /// Delete a company by slug. Child rows cascade. Returns `true` if a
    /// row was removed.
    pub async fn delete_by_slug(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- transaction-scoped helpers -----------------------------------------

    async fn bulk_insert_phones(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        company_id: DbId,
        values: &[String],
    ) -> Result<Vec<Phone>, sqlx::Error> {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "INSERT INTO phones (company_id, phone)
             SELECT $1, value FROM UNNEST($2::text[]) AS t(value)
             RETURNING {PHONE_COLUMNS}"
        );
        sqlx::query_as::<_, Phone>(&query)
            .bind(company_id)
            .bind(values)
            .fetch_all(&mut **tx)
            .await
    }

    async fn bulk_insert_emails(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        company_id: DbId,
        values: &[String],
    ) -> Result<Vec<Email>, sqlx::Error> {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "INSERT INTO emails (company_id, email)
             SELECT $1, value FROM UNNEST($2::text[]) AS t(value)
             RETURNING {EMAIL_COLUMNS}"
        );
        sqlx::query_as::<_, Email>(&query)
            .bind(company_id)
            .bind(values)
            .fetch_all(&mut **tx)
            .await
    }

    async fn apply_phone_commands(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        company_id: DbId,
        commands: &[ContactCommand<PhoneInput>],
    ) -> Result<(), sqlx::Error> {
        // Deletes, then updates, then inserts.
        for command in commands {
            if let ContactCommand::Delete { id } = command {
                let result = sqlx::query("DELETE FROM phones WHERE id = $1 AND company_id = $2")
                    .bind(id)
                    .bind(company_id)
                    .execute(&mut **tx)
                    .await?;
                if result.rows_affected() == 0 {
                    return Err(sqlx::Error::RowNotFound);
                }
            }
        }
        for command in commands {
            if let ContactCommand::Update { id, value } = command {
                let result =
                    sqlx::query("UPDATE phones SET phone = $3 WHERE id = $1 AND company_id = $2")
                        .bind(id)
                        .bind(company_id)
                        .bind(&value.phone)
                        .execute(&mut **tx)
                        .await?;
                if result.rows_affected() == 0 {
                    return Err(sqlx::Error::RowNotFound);
                }
            }
        }
        for command in commands {
            if let ContactCommand::Insert { value } = command {
                sqlx::query("INSERT INTO phones (company_id, phone) VALUES ($1, $2)")
                    .bind(company_id)
                    .bind(&value.phone)
                    .execute(&mut **tx)
                    .await?;
            }
        }
        Ok(())
    }

    async fn apply_email_commands(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        company_id: DbId,
        commands: &[ContactCommand<EmailInput>],
    ) -> Result<(), sqlx::Error> {
        for command in commands {
            if let ContactCommand::Delete { id } = command {
                let result = sqlx::query("DELETE FROM emails WHERE id = $1 AND company_id = $2")
                    .bind(id)
                    .bind(company_id)
                    .execute(&mut **tx)
                    .await?;
                if result.rows_affected() == 0 {
                    return Err(sqlx::Error::RowNotFound);
                }
            }
        }
        for command in commands {
            if let ContactCommand::Update { id, value } = command {
                let result =
                    sqlx::query("UPDATE emails SET email = $3 WHERE id = $1 AND company_id = $2")
                        .bind(id)
                        .bind(company_id)
                        .bind(&value.email)
                        .execute(&mut **tx)
                        .await?;
                if result.rows_affected() == 0 {
                    return Err(sqlx::Error::RowNotFound);
                }
            }
        }
        for command in commands {
            if let ContactCommand::Insert { value } = command {
                sqlx::query("INSERT INTO emails (company_id, email) VALUES ($1, $2)")
                    .bind(company_id)
                    .bind(&value.email)
                    .execute(&mut **tx)
                    .await?;
            }
        }
        Ok(())
    }

    async fn phones_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        company_id: DbId,
    ) -> Result<Vec<Phone>, sqlx::Error> {
        let query = format!("SELECT {PHONE_COLUMNS} FROM phones WHERE company_id = $1 ORDER BY id");
        sqlx::query_as::<_, Phone>(&query)
            .bind(company_id)
            .fetch_all(&mut **tx)
            .await
    }

    async fn emails_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        company_id: DbId,
    ) -> Result<Vec<Email>, sqlx::Error> {
        let query = format!("SELECT {EMAIL_COLUMNS} FROM emails WHERE company_id = $1 ORDER BY id");
        sqlx::query_as::<_, Email>(&query)
            .bind(company_id)
            .fetch_all(&mut **tx)
            .await
    }
}
