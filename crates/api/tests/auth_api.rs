//! HTTP-level integration tests for registration, login, the password-reset
//! flow, and the profile endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    authed_user, body_json, build_test_app, create_test_user, get_auth, login, post_json,
    post_json_auth, put_json_auth,
};
use crm_api::auth::reset::hash_reset_token;
use crm_db::repositories::PasswordResetRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns an access token and user info.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let (user, password) = create_test_user(&pool, "loginuser", false).await;
    let app = build_test_app(pool);

    let body = serde_json::json!({ "username": "loginuser", "password": password });
    let response = post_json(app, "/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["username"], "loginuser");
    assert_eq!(json["user"]["is_superuser"], false);
}

/// Login with an incorrect password returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    create_test_user(&pool, "wrongpw", false).await;
    let app = build_test_app(pool);

    let body = serde_json::json!({ "username": "wrongpw", "password": "incorrect_password" });
    let response = post_json(app, "/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login with a nonexistent username returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_nonexistent_user(pool: PgPool) {
    let app = build_test_app(pool);
    let body = serde_json::json!({ "username": "ghost", "password": "whatever" });
    let response = post_json(app, "/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login to a deactivated account returns 403.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_inactive_user(pool: PgPool) {
    let (user, password) = create_test_user(&pool, "inactive", false).await;
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let body = serde_json::json!({ "username": "inactive", "password": password });
    let response = post_json(build_test_app(pool), "/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registration creates a non-superuser account that can log in.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_and_login(pool: PgPool) {
    let body = serde_json::json!({
        "username": "newbie",
        "email": "newbie@test.com",
        "password": "long-enough-password"
    });
    let response = post_json(build_test_app(pool.clone()), "/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["username"], "newbie");
    assert_eq!(json["is_superuser"], false);

    let token = login(build_test_app(pool.clone()), "newbie", "long-enough-password").await;
    let response = get_auth(build_test_app(pool), "/my-profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// A taken username surfaces as a field error, not a 500.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_username(pool: PgPool) {
    create_test_user(&pool, "taken", false).await;

    let body = serde_json::json!({
        "username": "taken",
        "email": "other@test.com",
        "password": "long-enough-password"
    });
    let response = post_json(build_test_app(pool), "/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["fields"]["username"][0]
        .as_str()
        .unwrap()
        .contains("taken"));
}

/// Short passwords are rejected on registration.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_short_password(pool: PgPool) {
    let body = serde_json::json!({
        "username": "weak",
        "email": "weak@test.com",
        "password": "short"
    });
    let response = post_json(build_test_app(pool), "/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["fields"]["password"][0]
        .as_str()
        .unwrap()
        .contains("at least 8 characters"));
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

/// The reset request endpoint answers 200 whether or not the email exists.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reset_request_does_not_leak_accounts(pool: PgPool) {
    create_test_user(&pool, "resetme", false).await;

    let body = serde_json::json!({ "email": "resetme@test.com" });
    let response = post_json(build_test_app(pool.clone()), "/auth/password-reset", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = serde_json::json!({ "email": "nobody@test.com" });
    let response = post_json(build_test_app(pool), "/auth/password-reset", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// A valid token resets the password exactly once.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reset_confirm_is_single_use(pool: PgPool) {
    let (user, _password) = create_test_user(&pool, "resetme", false).await;

    // Issue a token with a known plaintext, as the handler would.
    let plaintext = "known-reset-token";
    let expires = chrono::Utc::now() + chrono::Duration::hours(1);
    PasswordResetRepo::create(&pool, user.id, &hash_reset_token(plaintext), expires)
        .await
        .unwrap();

    let body = serde_json::json!({ "token": plaintext, "new_password": "brand-new-password" });
    let response =
        post_json(build_test_app(pool.clone()), "/auth/password-reset/confirm", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The new password works.
    login(build_test_app(pool.clone()), "resetme", "brand-new-password").await;

    // Replaying the token fails.
    let body = serde_json::json!({ "token": plaintext, "new_password": "another-password" });
    let response = post_json(build_test_app(pool), "/auth/password-reset/confirm", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// An expired token is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reset_confirm_expired_token(pool: PgPool) {
    let (user, _password) = create_test_user(&pool, "expired", false).await;

    let plaintext = "stale-token";
    let expires = chrono::Utc::now() - chrono::Duration::minutes(1);
    PasswordResetRepo::create(&pool, user.id, &hash_reset_token(plaintext), expires)
        .await
        .unwrap();

    let body = serde_json::json!({ "token": plaintext, "new_password": "whatever-password" });
    let response = post_json(build_test_app(pool), "/auth/password-reset/confirm", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["fields"]["token"][0]
        .as_str()
        .unwrap()
        .contains("Invalid or expired"));
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The profile page returns the account and the manager's interactions.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_my_profile(pool: PgPool) {
    let (user, token) = authed_user(&pool, "profiled", false).await;

    let response = get_auth(build_test_app(pool), "/my-profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["username"], "profiled");
    assert_eq!(json["interactions"].as_array().unwrap().len(), 0);
}

/// Account update changes username/email and stores the avatar path.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_account(pool: PgPool) {
    let (_user, token) = authed_user(&pool, "renameme", false).await;

    let body = serde_json::json!({
        "username": "renamed",
        "email": "renamed@test.com",
        "avatar_path": "avatars/renamed.png"
    });
    let response = put_json_auth(build_test_app(pool.clone()), "/profile/update", &token, body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = get_auth(build_test_app(pool), "/my-profile", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["user"]["username"], "renamed");
    assert_eq!(json["profile"]["avatar_path"], "avatars/renamed.png");
}

/// Password change requires the current password and takes effect at once.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_password_change(pool: PgPool) {
    let (_user, token) = authed_user(&pool, "changer", false).await;

    let body = serde_json::json!({
        "old_password": "not-the-password",
        "new_password": "replacement-password"
    });
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/my-profile/password-change",
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = serde_json::json!({
        "old_password": "test_password_123!",
        "new_password": "replacement-password"
    });
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/my-profile/password-change",
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    login(build_test_app(pool), "changer", "replacement-password").await;
}

/// Requests without a bearer token are rejected before any handler runs.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_token_is_unauthorized(pool: PgPool) {
    let response = common::get(build_test_app(pool), "/my-profile").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}
