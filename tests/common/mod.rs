//! Shared integration test harness: a full router over an in-memory database.

#![allow(dead_code)]

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use aqualux_spa::auth::TokenService;
use aqualux_spa::storage::{AccountStore, SqliteStorage};
use aqualux_spa::{create_router, AppConfig, AppState};

pub const TEST_SECRET: &str = "aqualux_integration_secret_0123456789!";
pub const PASSWORD: &str = "Serenity2024";

pub struct TestApp {
    pub server: TestServer,
    pub storage: SqliteStorage,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = "sqlite::memory:".to_string();
    config.database.max_connections = 1;
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.auth.password.bcrypt_cost = 4;
    config
}

pub async fn spawn_app() -> TestApp {
    let config = test_config();
    let storage = SqliteStorage::connect(&config.database.url, 1).await.unwrap();
    let state = AppState::new(config, storage.clone()).unwrap();
    let server = TestServer::new(create_router(state)).unwrap();
    TestApp { server, storage }
}

/// A token signer sharing the app's secret, for crafting expired tokens.
pub fn token_service() -> TokenService {
    TokenService::new(TEST_SECRET, 7 * 24 * 60 * 60).unwrap()
}

pub fn auth_header() -> HeaderName {
    header::AUTHORIZATION
}

pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

pub fn register_body(email: &str) -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": email,
        "phone": "555-0100",
        "password": PASSWORD,
        "birthDate": "1990-04-02"
    })
}

impl TestApp {
    /// Register and return `(account id, token)`.
    pub async fn register(&self, email: &str) -> (i64, String) {
        let response = self
            .server
            .post("/api/auth/register")
            .json(&register_body(email))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        let body = response.json::<Value>();
        let id = body["user"]["id"].as_i64().unwrap();
        let token = body["token"].as_str().unwrap().to_string();
        (id, token)
    }

    /// Register an account and grant it admin rights out of band.
    pub async fn register_admin(&self, email: &str) -> (i64, String) {
        let (id, token) = self.register(email).await;
        self.promote(email).await;
        (id, token)
    }

    pub async fn promote(&self, email: &str) {
        self.storage
            .set_flags(email, Some(true), None)
            .await
            .unwrap()
            .unwrap();
    }

    pub async fn deactivate(&self, email: &str) {
        self.storage
            .set_flags(email, None, Some(false))
            .await
            .unwrap()
            .unwrap();
    }

    /// Create a catalog entry and return its id.
    pub async fn create_service(&self, admin_token: &str, title: &str, price: f64, sort_order: i64) -> i64 {
        let response = self
            .server
            .post("/api/services")
            .add_header(auth_header(), bearer(admin_token))
            .json(&json!({
                "title": title,
                "description": format!("{title} treatment"),
                "price": price,
                "duration": 60,
                "features": ["Aromatherapy oils"],
                "category": "Massage",
                "sortOrder": sort_order
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Value>()["data"]["id"].as_i64().unwrap()
    }

    /// Book `service_id` and return the booking body.
    pub async fn create_booking(&self, token: &str, service_id: i64) -> Value {
        let response = self
            .server
            .post("/api/bookings")
            .add_header(auth_header(), bearer(token))
            .json(&booking_body(service_id))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Value>()["data"].clone()
    }
}

pub fn booking_body(service_id: i64) -> Value {
    json!({
        "serviceId": service_id,
        "appointmentDate": "2099-06-01",
        "appointmentTime": "10:30",
        "customerName": "Jane Doe",
        "customerEmail": "jane@example.com",
        "customerPhone": "555-0100",
        "specialRequests": "Extra pillow"
    })
}
