use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::controllers::account_controller::AccountController;
use crate::dto::auth_dto::{
    AccountResponse, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::access::{Capability, Requester};
use crate::routes::guarded;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::ValidatedJson;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/token/refresh", post(refresh))
        .route("/me", guarded(Capability::AuthenticatedClient, get(me)))
}

async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), AppError> {
    let account = AccountController::new(&state).register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            account,
            "User successfully registered, Login!",
        )),
    ))
}

async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AccountController::new(&state).login(request).await?;
    Ok(Json(response))
}

async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let response = AccountController::new(&state).refresh(request).await?;
    Ok(Json(response))
}

async fn me(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<AccountResponse>, AppError> {
    let response = AccountController::new(&state).me(&requester).await?;
    Ok(Json(response))
}
