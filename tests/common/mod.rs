use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use waypost::config::jwt::JwtConfig;
use waypost::config::password::PasswordConfig;
use waypost::config::posts::PostsConfig;
use waypost::router::init_router;
use waypost::state::AppState;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 86400,
        refresh_token_expiry: 2_592_000,
    }
}

/// Same signing secret as the app under test, but every access token it
/// issues is already expired.
#[allow(dead_code)]
pub fn expired_jwt_config() -> JwtConfig {
    JwtConfig {
        access_token_expiry: -3600,
        ..test_jwt_config()
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    let state = AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        password_config: PasswordConfig {
            // Minimum bcrypt cost keeps the tests fast.
            salt_rounds: Some("4".to_string()),
        },
        posts_config: PostsConfig::from_env(),
        http: reqwest::Client::new(),
    };
    init_router(state)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Sends one request through the router and returns the status plus the
/// parsed JSON body (or `null` for empty bodies).
pub async fn send_request(
    app: &Router,
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, body)
}

pub struct TestSession {
    pub user_id: Uuid,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

pub async fn register_user(app: &Router, email: &str, password: &str) -> StatusCode {
    let (status, _) = send_request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    status
}

pub async fn login_user(app: &Router, email: &str, password: &str) -> TestSession {
    let (status, body) = send_request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    TestSession {
        user_id: Uuid::parse_str(body["id"].as_str().unwrap()).unwrap(),
        email: body["email"].as_str().unwrap().to_string(),
        access_token: body["access_token"].as_str().unwrap().to_string(),
        refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
    }
}

pub async fn register_and_login(app: &Router, email: &str, password: &str) -> TestSession {
    assert_eq!(register_user(app, email, password).await, StatusCode::CREATED);
    login_user(app, email, password).await
}

#[allow(dead_code)]
pub async fn count_token_rows(pool: &PgPool, table: &str, user_id: Uuid) -> i64 {
    let query = format!("SELECT COUNT(*) FROM {table} WHERE user_id = $1");
    sqlx::query_scalar::<_, i64>(&query)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
