#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use delivery_logistics::config::EnvironmentConfig;
use delivery_logistics::controllers::account_controller::AccountController;
use delivery_logistics::create_app;
use delivery_logistics::repositories::Repositories;
use delivery_logistics::state::AppState;

pub const STAFF_USERNAME: &str = "dispatch";
pub const STAFF_PASSWORD: &str = "dispatch-pass-1";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn test_config() -> EnvironmentConfig {
    EnvironmentConfig {
        jwt_secret: "integration-test-secret".to_string(),
        bcrypt_cost: 4,
        ..Default::default()
    }
}

impl TestApp {
    /// API over a fresh in-memory store with one staff account
    pub async fn spawn() -> Self {
        let state = AppState::new(test_config(), Repositories::memory()).unwrap();
        AccountController::new(&state)
            .ensure_staff_account(STAFF_USERNAME, STAFF_PASSWORD)
            .await
            .unwrap();

        Self {
            router: create_app(state.clone()),
            state,
        }
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/register",
            None,
            Some(json!({
                "username": username,
                "password": password,
                "email": format!("{}@example.com", username),
                "first_name": "Test",
                "location": "Nairobi"
            })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Registers a client and returns its access token
    pub async fn client_token(&self, username: &str) -> String {
        let password = format!("{}-password", username);
        let (status, _) = self.register(username, &password).await;
        assert_eq!(status, StatusCode::CREATED);
        self.access_token(username, &password).await
    }

    pub async fn staff_token(&self) -> String {
        self.access_token(STAFF_USERNAME, STAFF_PASSWORD).await
    }

    pub async fn access_token(&self, username: &str, password: &str) -> String {
        let (status, body) = self.login(username, password).await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["authentication"]["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    pub async fn submit_quote(&self, token: &str, item_name: &str) -> i64 {
        let (status, body) = self
            .post(
                "/quotes",
                token,
                json!({
                    "item_name": item_name,
                    "item_description": "Handle with care",
                    "location_from": "Nairobi",
                    "location_to": "Mombasa"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "quote failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    pub async fn create_rider(&self, staff: &str, phone: &str) -> i64 {
        let (status, body) = self
            .post(
                "/riders",
                staff,
                json!({ "rider_name": "Kip", "rider_motor": "KMCA 123X", "rider_phone": phone }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "rider failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    pub async fn create_order(&self, staff: &str, quote_id: i64, rider_id: Option<i64>) -> (StatusCode, Value) {
        self.post(
            "/orders",
            staff,
            json!({ "quote_id": quote_id, "rider_id": rider_id, "payment_ref": "MPESA-001" }),
        )
        .await
    }
}
