use axum::{
    body::{Body, Bytes},
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{any, get, post},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::relay::session::{session_id_from_cookie, Session, SESSION_COOKIE};
use crate::relay::RelayState;
use crate::utils::errors::{AppError, AppResult};

const SIGNUP_OK: &str = "User successfully registered, Login!";
const SIGNUP_TAKEN: &str = "Username is already taken!";
const SIGNIN_INVALID: &str = "Username or Password is invalid!";

pub fn relay_routes() -> Router<RelayState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/logout", post(logout))
        .route("/dashboard", get(dashboard))
        .route("/api/*path", any(proxy))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninForm {
    pub username: String,
    pub password: String,
}

fn session_cookie(id: &str, max_age: i64, secure: bool) -> AppResult<HeaderValue> {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, id, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("Invalid session cookie: {}", e)))
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(session_id_from_cookie)
        .map(str::to_owned)
}

/// Loads the caller's session and swaps in a fresh access token. A refused
/// refresh ends the session.
async fn refreshed_session(state: &RelayState, headers: &HeaderMap) -> AppResult<Session> {
    let id = session_id(headers)
        .ok_or_else(|| AppError::Unauthorized("Not signed in".to_string()))?;
    let mut session = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| AppError::Unauthorized("Session expired, sign in again".to_string()))?;

    match state.client.refresh(&session.refresh_token).await? {
        Some(access) => {
            state.sessions.set_access_token(&id, access.clone()).await;
            session.access_token = access;
            Ok(session)
        }
        None => {
            state.sessions.remove(&id).await;
            log::info!("🔒 Refresh refused, session of '{}' dropped", session.username);
            Err(AppError::Unauthorized("Session expired, sign in again".to_string()))
        }
    }
}

async fn signup(
    State(state): State<RelayState>,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    let status = state.client.register(&form).await?;

    if status == StatusCode::CREATED {
        log::info!("👤 Relay signup for '{}'", form.username);
        Ok((status, Json(json!({ "success": true, "message": SIGNUP_OK }))).into_response())
    } else {
        let status = if status.is_client_error() { status } else { StatusCode::BAD_GATEWAY };
        Ok((status, Json(json!({ "success": false, "message": SIGNUP_TAKEN }))).into_response())
    }
}

async fn signin(
    State(state): State<RelayState>,
    Form(form): Form<SigninForm>,
) -> AppResult<Response> {
    let Some(login) = state.client.login(&form.username, &form.password).await? else {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": SIGNIN_INVALID })),
        )
            .into_response());
    };

    let id = state
        .sessions
        .create(
            login.user.id,
            login.user.username.clone(),
            login.authentication.access_token,
            login.authentication.refresh_token,
        )
        .await;
    let cookie = session_cookie(&id, state.sessions.ttl_secs(), state.config.secure_cookies)?;

    log::info!("🔑 Relay session opened for '{}'", login.user.username);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "success": true, "user": login.user })),
    )
        .into_response())
}

async fn logout(State(state): State<RelayState>, headers: HeaderMap) -> AppResult<Response> {
    if let Some(id) = session_id(&headers) {
        state.sessions.remove(&id).await;
    }
    let cookie = session_cookie("", 0, state.config.secure_cookies)?;
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "success": true, "message": "Logged out" })),
    )
        .into_response())
}

async fn dashboard(State(state): State<RelayState>, headers: HeaderMap) -> AppResult<Response> {
    let session = refreshed_session(&state, &headers).await?;
    let access = session.access_token.as_str();

    let quotes = state.client.get_json("quotes", access).await?;
    let orders = state.client.get_json("orders", access).await?;
    let invoices = state.client.get_json("invoices", access).await?;

    Ok(Json(json!({
        "user": { "id": session.account_id, "username": session.username },
        "quotes": quotes,
        "orders": orders,
        "invoices": invoices,
    }))
    .into_response())
}

async fn proxy(
    State(state): State<RelayState>,
    method: Method,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    let session = refreshed_session(&state, &headers).await?;

    let target = match query {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    };
    let upstream = state
        .client
        .forward(method, &target, &session.access_token, body)
        .await?;

    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    if let Some(content_type) = upstream.content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    Ok(response)
}
