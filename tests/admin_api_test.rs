//! HTTP integration tests for the profile and admin console endpoints,
//! focused on the auth and role guards.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::Value as JsonValue;
use tower::ServiceExt;
use uuid::Uuid;

use dreampsyche_server::app;
use dreampsyche_server::config::AppConfig;
use dreampsyche_server::domain::ai::client::AiClientTrait;
use dreampsyche_server::domain::user::entity::user::{self, Gender, UserRole};
use dreampsyche_server::state::AppState;
use dreampsyche_server::utils::error::AppError;
use dreampsyche_server::utils::jwt::encode_access_token;

const JWT_SECRET: &str = "integration-test-secret";

struct NoopAiClient;

#[async_trait::async_trait]
impl AiClientTrait for NoopAiClient {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, AppError> {
        Ok(vec![])
    }

    async fn complete_json(
        &self,
        _system_prompt: &str,
        _user_text: &str,
    ) -> Result<String, AppError> {
        Ok("{}".to_string())
    }

    async fn check_connectivity(&self) -> Result<(), AppError> {
        Ok(())
    }
}

fn test_state(db: DatabaseConnection) -> AppState {
    AppState {
        db: Arc::new(db),
        config: AppConfig {
            server_port: 0,
            database_url: "postgres://localhost/test".to_string(),
            jwt_secret: JWT_SECRET.to_string(),
            openai_api_key: "test-key".to_string(),
        },
        ai: Arc::new(NoopAiClient),
    }
}

fn user_row(id: Uuid, role: UserRole, deleted: bool) -> user::Model {
    user::Model {
        id,
        email: "somebody@example.com".to_string(),
        role,
        birth_date: None,
        gender: Some(Gender::PreferNotToSay),
        location: None,
        created_at: Utc::now().naive_utc(),
        deleted_at: deleted.then(|| Utc::now().naive_utc()),
    }
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> JsonValue {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn profile_without_token_is_401() {
    // Arrange
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = app(test_state(db));

    // Act
    let response = app
        .oneshot(get_request("/api/users/me", None))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "กรุณาเข้าสู่ระบบ");
}

#[tokio::test]
async fn profile_of_banned_account_is_403() {
    // Arrange
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_row(user_id, UserRole::User, true)]])
        .into_connection();
    let app = app(test_state(db));
    let token = encode_access_token(user_id.to_string(), JWT_SECRET, 3600).unwrap();

    // Act
    let response = app
        .oneshot(get_request("/api/users/me", Some(&token)))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn active_profile_is_returned() {
    // Arrange
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_row(user_id, UserRole::User, false)]])
        .into_connection();
    let app = app(test_state(db));
    let token = encode_access_token(user_id.to_string(), JWT_SECRET, 3600).unwrap();

    // Act
    let response = app
        .oneshot(get_request("/api/users/me", Some(&token)))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["email"], "somebody@example.com");
    assert_eq!(body["lifecycle"], "active");
}

#[tokio::test]
async fn admin_routes_reject_regular_users() {
    // Arrange: valid token, but the role column says `user`.
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_row(user_id, UserRole::User, false)]])
        .into_connection();
    let app = app(test_state(db));
    let token = encode_access_token(user_id.to_string(), JWT_SECRET, 3600).unwrap();

    // Act
    let response = app
        .oneshot(get_request("/api/admin/logs", Some(&token)))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"], "ต้องเป็นผู้ดูแลระบบเท่านั้น");
}

#[tokio::test]
async fn admin_routes_reject_anonymous_callers() {
    // Arrange
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = app(test_state(db));

    // Act
    let response = app
        .oneshot(get_request("/api/admin/overview", None))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_can_list_audit_logs() {
    // Arrange: guard lookup, then an empty log listing.
    let admin_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_row(admin_id, UserRole::Admin, false)]])
        .append_query_results([Vec::<
            dreampsyche_server::domain::audit::entity::audit_log::Model,
        >::new()])
        .into_connection();
    let app = app(test_state(db));
    let token = encode_access_token(admin_id.to_string(), JWT_SECRET, 3600).unwrap();

    // Act
    let response = app
        .oneshot(get_request("/api/admin/logs", Some(&token)))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn rating_outside_bounds_is_400() {
    // Arrange
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = app(test_state(db));
    let token = encode_access_token(user_id.to_string(), JWT_SECRET, 3600).unwrap();

    // Act
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/api/dreams/{}/rating", Uuid::new_v4()))
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(r#"{ "rating": 9 }"#.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
