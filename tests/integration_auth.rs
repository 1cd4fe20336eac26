mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use waypost::modules::auth::service::AuthService;
use waypost::utils::jwt::{create_access_token, create_refresh_token};

use common::*;

fn tamper(token: &str) -> String {
    let mut tampered = token.to_string();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });
    tampered
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_login_and_access_protected_route(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();

    let session = register_and_login(&app, &email, "password123").await;
    assert_eq!(session.email, email);

    let (status, body) = send_request(
        &app,
        "GET",
        "/api/users/get-all",
        Some(&session.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["amount"].as_u64().unwrap() >= 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();

    assert_eq!(
        register_user(&app, &email, "password123").await,
        StatusCode::CREATED
    );
    assert_eq!(
        register_user(&app, &email, "password123").await,
        StatusCode::CONFLICT
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_protected_route_without_token_is_rejected(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send_request(&app, "GET", "/api/users/get-all", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_login_replaces_first_session(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let email = generate_unique_email();

    let first = register_and_login(&app, &email, "password123").await;
    let second = login_user(&app, &email, "password123").await;

    // Exactly one token pair per user, belonging to the latest login.
    assert_eq!(count_token_rows(&pool, "access_tokens", second.user_id).await, 1);
    assert_eq!(count_token_rows(&pool, "refresh_tokens", second.user_id).await, 1);

    let stored_access = AuthService::get_access_token(&pool, second.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_access.token, second.access_token);

    let stored_refresh = AuthService::get_refresh_token(&pool, second.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_refresh.token, second.refresh_token);

    // The replaced session's refresh token no longer matches the stored one.
    let (status, _) = send_request(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({ "refresh_token": first.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_revokes_still_valid_token(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let email = generate_unique_email();

    let session = register_and_login(&app, &email, "password123").await;

    let (status, _) = send_request(
        &app,
        "GET",
        "/api/users/get-all",
        Some(&session.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_request(
        &app,
        "DELETE",
        "/api/auth/logout",
        Some(&session.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(count_token_rows(&pool, "access_tokens", session.user_id).await, 0);
    assert_eq!(count_token_rows(&pool, "refresh_tokens", session.user_id).await, 0);

    // The signature is still valid, but the session is gone.
    let (status, _) = send_request(
        &app,
        "GET",
        "/api/users/get-all",
        Some(&session.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_with_partial_session_is_bad_request(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let email = generate_unique_email();

    let session = register_and_login(&app, &email, "password123").await;

    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
        .bind(session.user_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send_request(
        &app,
        "DELETE",
        "/api/auth/logout",
        Some(&session.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "This user is not logged in");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_access_token_rotates_transparently(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let email = generate_unique_email();

    let session = register_and_login(&app, &email, "password123").await;
    let expired =
        create_access_token(session.user_id, &session.email, &expired_jwt_config()).unwrap();

    let (status, _) = send_request(&app, "GET", "/api/users/get-all", Some(&expired), None).await;
    assert_eq!(status, StatusCode::OK);

    // The request succeeded on a freshly minted access token, stored in place
    // of the login-time one.
    let stored = AuthService::get_access_token(&pool, session.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.token, expired);
    assert_ne!(stored.token, session.access_token);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_access_token_without_refresh_row_is_rejected(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let email = generate_unique_email();

    let session = register_and_login(&app, &email, "password123").await;
    let expired =
        create_access_token(session.user_id, &session.email, &expired_jwt_config()).unwrap();

    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
        .bind(session.user_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = send_request(&app, "GET", "/api/users/get-all", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_mints_new_access_and_keeps_refresh(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let email = generate_unique_email();

    let session = register_and_login(&app, &email, "password123").await;

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({ "refresh_token": session.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let new_access = body["access_token"].as_str().unwrap();
    assert_ne!(new_access, session.access_token);

    let stored_access = AuthService::get_access_token(&pool, session.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_access.token, new_access);

    // The refresh token itself is not rotated.
    let stored_refresh = AuthService::get_refresh_token(&pool, session.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_refresh.token, session.refresh_token);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_with_tampered_token_is_rejected(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();

    let session = register_and_login(&app, &email, "password123").await;

    let (status, _) = send_request(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({ "refresh_token": tamper(&session.refresh_token) })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_with_wrong_subject_is_rejected(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();

    register_and_login(&app, &email, "password123").await;

    // Well-signed refresh token for a user with no stored session.
    let foreign = create_refresh_token(Uuid::new_v4(), &test_jwt_config()).unwrap();

    let (status, _) = send_request(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({ "refresh_token": foreign })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_with_empty_token_is_rejected(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) =
        send_request(&app, "POST", "/api/auth/refresh", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Refresh token is required");
}
