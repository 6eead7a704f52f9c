//! HTTP client for the delivery API

use axum::body::Bytes;
use axum::http::{HeaderValue, Method, StatusCode};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};
use crate::utils::errors::{AppError, AppResult};

/// Raw upstream answer handed back to the browser unchanged
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

fn upstream(e: reqwest::Error) -> AppError {
    AppError::Upstream(e.to_string())
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(format!("Error building HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Forwards a registration; the caller only needs the status
    pub async fn register<T: Serialize + ?Sized>(&self, form: &T) -> AppResult<StatusCode> {
        let response = self
            .client
            .post(self.url("register"))
            .json(form)
            .send()
            .await
            .map_err(upstream)?;
        Ok(response.status())
    }

    /// `None` when the API rejects the credentials
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Option<LoginResponse>> {
        let response = self
            .client
            .post(self.url("login"))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(upstream)?;

        if !response.status().is_success() {
            log::info!("🔒 API refused login for '{}' ({})", username, response.status());
            return Ok(None);
        }
        let body = response.json::<LoginResponse>().await.map_err(upstream)?;
        Ok(Some(body))
    }

    /// Exchanges a refresh token for a new access token, `None` when refused
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<Option<String>> {
        let response = self
            .client
            .post(self.url("token/refresh"))
            .json(&RefreshRequest {
                refresh: refresh_token.to_string(),
            })
            .send()
            .await
            .map_err(upstream)?;

        if !response.status().is_success() {
            return Ok(None);
        }
        let body = response.json::<RefreshResponse>().await.map_err(upstream)?;
        Ok(Some(body.access))
    }

    pub async fn get_json(&self, path: &str, access_token: &str) -> AppResult<Value> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(upstream)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("GET {} answered {}", path, status)));
        }
        response.json::<Value>().await.map_err(upstream)
    }

    /// Sends an arbitrary call on behalf of a session
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        access_token: &str,
        body: Bytes,
    ) -> AppResult<UpstreamResponse> {
        let mut request = self
            .client
            .request(method, self.url(path_and_query))
            .bearer_auth(access_token);
        if !body.is_empty() {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request.send().await.map_err(upstream)?;
        let status = response.status();
        let content_type = response.headers().get(reqwest::header::CONTENT_TYPE).cloned();
        let body = response.bytes().await.map_err(upstream)?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
