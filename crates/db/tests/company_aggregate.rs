//! Integration tests for the company aggregate workflow: parent plus
//! phone/email child collections written in one transaction.

use crm_db::models::company::{CompanyFilter, CompanyInput, CompanyOrdering};
use crm_db::models::contact::{ContactCommand, EmailInput, PhoneInput};
use crm_db::repositories::CompanyRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn company_input(name: &str) -> CompanyInput {
    CompanyInput {
        name: name.to_string(),
        responsible_person: "Nikhil Estes".to_string(),
        description: "A test company".to_string(),
    }
}

fn phone(value: &str) -> PhoneInput {
    PhoneInput {
        phone: value.to_string(),
    }
}

fn email(value: &str) -> EmailInput {
    EmailInput {
        email: value.to_string(),
    }
}

async fn contact_counts(pool: &PgPool, company_id: i64) -> (i64, i64) {
    let phones: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM phones WHERE company_id = $1")
        .bind(company_id)
        .fetch_one(pool)
        .await
        .unwrap();
    let emails: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM emails WHERE company_id = $1")
        .bind(company_id)
        .fetch_one(pool)
        .await
        .unwrap();
    (phones, emails)
}

// ---------------------------------------------------------------------------
// Create path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_persists_parent_and_children(pool: PgPool) {
    let aggregate = CompanyRepo::create_with_contacts(
        &pool,
        &company_input("Acme"),
        "acme",
        &[phone("+3213482439")],
        &[email("mail1@gmail.com"), email("mail2@gmail.com")],
    )
    .await
    .unwrap();

    assert_eq!(aggregate.company.slug, "acme");
    assert_eq!(aggregate.phones.len(), 1);
    assert_eq!(aggregate.emails.len(), 2);
    assert!(aggregate.phones.iter().all(|p| p.company_id == aggregate.company.id));

    let (phones, emails) = contact_counts(&pool, aggregate.company.id).await;
    assert_eq!((phones, emails), (1, 2));
}

#[sqlx::test(migrations = "./migrations")]
async fn create_with_empty_child_collections(pool: PgPool) {
    let aggregate = CompanyRepo::create_with_contacts(&pool, &company_input("Solo"), "solo", &[], &[])
        .await
        .unwrap();
    assert!(aggregate.phones.is_empty());
    assert!(aggregate.emails.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_name_violates_unique_constraint(pool: PgPool) {
    CompanyRepo::create_with_contacts(&pool, &company_input("Acme"), "acme", &[], &[])
        .await
        .unwrap();

    let err = CompanyRepo::create_with_contacts(&pool, &company_input("Acme"), "acme-2", &[], &[])
        .await
        .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_companies_name"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Update path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn update_applies_delete_update_insert_commands(pool: PgPool) {
    let aggregate = CompanyRepo::create_with_contacts(
        &pool,
        &company_input("Acme"),
        "acme",
        &[phone("+100"), phone("+200")],
        &[email("old@test.com")],
    )
    .await
    .unwrap();

    let phone_commands = vec![
        ContactCommand::Delete {
            id: aggregate.phones[0].id,
        },
        ContactCommand::Update {
            id: aggregate.phones[1].id,
            value: phone("+999"),
        },
        ContactCommand::Insert {
            value: phone("+300"),
        },
    ];
    let email_commands = vec![ContactCommand::Update {
        id: aggregate.emails[0].id,
        value: email("new@test.com"),
    }];

    let updated = CompanyRepo::update_with_contacts(
        &pool,
        aggregate.company.id,
        &company_input("Acme Renamed"),
        "acme-renamed",
        &phone_commands,
        &email_commands,
    )
    .await
    .unwrap()
    .expect("company must exist");

    assert_eq!(updated.company.name, "Acme Renamed");
    assert_eq!(updated.company.slug, "acme-renamed");

    let phone_values: Vec<&str> = updated.phones.iter().map(|p| p.phone.as_str()).collect();
    assert_eq!(phone_values, vec!["+999", "+300"]);
    assert_eq!(updated.emails[0].email, "new@test.com");

    // Old slug no longer resolves.
    assert!(CompanyRepo::find_by_slug(&pool, "acme").await.unwrap().is_none());
    assert!(CompanyRepo::find_by_slug(&pool, "acme-renamed")
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn update_rolls_back_when_command_targets_foreign_child(pool: PgPool) {
    let ours = CompanyRepo::create_with_contacts(
        &pool,
        &company_input("Ours"),
        "ours",
        &[phone("+1")],
        &[],
    )
    .await
    .unwrap();
    let theirs = CompanyRepo::create_with_contacts(
        &pool,
        &company_input("Theirs"),
        "theirs",
        &[phone("+2")],
        &[],
    )
    .await
    .unwrap();

    // Delete command names a phone belonging to the other company; the
    // whole submission must fail and leave both companies untouched.
    let commands = vec![ContactCommand::<PhoneInput>::Delete {
        id: theirs.phones[0].id,
    }];
    let err = CompanyRepo::update_with_contacts(
        &pool,
        ours.company.id,
        &company_input("Ours Renamed"),
        "ours-renamed",
        &commands,
        &[],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, sqlx::Error::RowNotFound));

    // Parent update rolled back along with the child commands.
    let reloaded = CompanyRepo::find_by_id(&pool, ours.company.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.name, "Ours");
    assert_eq!(reloaded.slug, "ours");
    let (phones, _) = contact_counts(&pool, theirs.company.id).await;
    assert_eq!(phones, 1, "foreign child must survive");
}

#[sqlx::test(migrations = "./migrations")]
async fn update_of_missing_company_returns_none(pool: PgPool) {
    let result =
        CompanyRepo::update_with_contacts(&pool, 4242, &company_input("Ghost"), "ghost", &[], &[])
            .await
            .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Delete and cascade
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn delete_cascades_to_contacts(pool: PgPool) {
    let aggregate = CompanyRepo::create_with_contacts(
        &pool,
        &company_input("Doomed"),
        "doomed",
        &[phone("+1"), phone("+2")],
        &[email("a@b.com")],
    )
    .await
    .unwrap();

    assert!(CompanyRepo::delete_by_slug(&pool, "doomed").await.unwrap());

    let (phones, emails) = contact_counts(&pool, aggregate.company.id).await;
    assert_eq!((phones, emails), (0, 0));
    assert!(!CompanyRepo::delete_by_slug(&pool, "doomed").await.unwrap());
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn list_orders_and_filters(pool: PgPool) {
    for name in ["Beta Corp", "Alpha Corp", "Gamma Ltd"] {
        let slug = name.to_lowercase().replace(' ', "-");
        CompanyRepo::create_with_contacts(&pool, &company_input(name), &slug, &[], &[])
            .await
            .unwrap();
    }

    let by_name = CompanyRepo::list(
        &pool,
        &CompanyFilter::default(),
        CompanyOrdering::NameAsc,
        10,
        0,
    )
    .await
    .unwrap();
    let names: Vec<&str> = by_name.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha Corp", "Beta Corp", "Gamma Ltd"]);

    let filtered = CompanyRepo::list(
        &pool,
        &CompanyFilter {
            name_contains: Some("corp".to_string()),
        },
        CompanyOrdering::NameDesc,
        10,
        0,
    )
    .await
    .unwrap();
    let names: Vec<&str> = filtered.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Beta Corp", "Alpha Corp"]);

    let count = CompanyRepo::count(
        &pool,
        &CompanyFilter {
            name_contains: Some("corp".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(count, 2);

    let page_two = CompanyRepo::list(
        &pool,
        &CompanyFilter::default(),
        CompanyOrdering::NameAsc,
        2,
        2,
    )
    .await
    .unwrap();
    assert_eq!(page_two.len(), 1);
    assert_eq!(page_two[0].name, "Gamma Ltd");
}

#[sqlx::test(migrations = "./migrations")]
async fn name_filter_wildcards_match_literally(pool: PgPool) {
    for (name, slug) in [("100% Natural", "100-natural"), ("Plain Goods", "plain-goods")] {
        CompanyRepo::create_with_contacts(&pool, &company_input(name), slug, &[], &[])
            .await
            .unwrap();
    }

    let filtered = CompanyRepo::list(
        &pool,
        &CompanyFilter {
            name_contains: Some("100%".to_string()),
        },
        CompanyOrdering::NameAsc,
        10,
        0,
    )
    .await
    .unwrap();
    let names: Vec<&str> = filtered.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["100% Natural"]);

    let underscore = CompanyRepo::count(
        &pool,
        &CompanyFilter {
            name_contains: Some("_".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(underscore, 0);
}
