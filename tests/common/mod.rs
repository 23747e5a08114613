//! Shared helpers for the REST API tests.

#![allow(dead_code)]

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use sooon::config::WebConfig;
use sooon::web::handlers::AppState;
use sooon::web::middleware::JwtState;
use sooon::web::router::create_router;
use sooon::Database;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";
pub const TEST_PASSWORD: &str = "password123";

/// Create a test configuration.
pub fn create_test_config() -> WebConfig {
    WebConfig {
        cors_origins: vec![],
        jwt_secret: TEST_SECRET.to_string(),
        jwt_access_token_expiry_secs: 900,
        jwt_refresh_token_expiry_days: 7,
        default_page_size: 10,
        max_page_size: 100,
    }
}

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> (TestServer, Database) {
    let config = create_test_config();
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let jwt_state = Arc::new(JwtState::new(&config.jwt_secret));
    let app_state = Arc::new(AppState::new(db.clone(), jwt_state.clone(), &config));
    let router = create_router(app_state, jwt_state, &config.cors_origins, "Asia/Seoul");

    let server = TestServer::new(router).expect("Failed to create test server");
    (server, db)
}

/// A signed-up test account.
pub struct TestAccount {
    pub id: i64,
    pub access_token: String,
    pub refresh_token: String,
}

impl TestAccount {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Sign up an account and return its id and tokens.
pub async fn signup(server: &TestServer, email: &str, nickname: &str) -> TestAccount {
    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "email": email,
            "password": TEST_PASSWORD,
            "nickname": nickname
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    TestAccount {
        id: body["data"]["account"]["id"].as_i64().unwrap(),
        access_token: body["data"]["access_token"].as_str().unwrap().to_string(),
        refresh_token: body["data"]["refresh_token"].as_str().unwrap().to_string(),
    }
}

/// Create a post and return its id.
pub async fn create_post(
    server: &TestServer,
    account: &TestAccount,
    title: &str,
    content: &str,
    is_anonymous: bool,
) -> i64 {
    let response = server
        .post("/api/v1/posts")
        .add_header(AUTHORIZATION, account.bearer())
        .json(&json!({
            "title": title,
            "content": content,
            "is_anonymous": is_anonymous
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["data"]["id"].as_i64().unwrap()
}
