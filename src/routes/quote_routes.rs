use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::controllers::quote_controller::QuoteController;
use crate::dto::quote_dto::{CreateQuoteRequest, QuoteResponse, UpdateQuoteRequest};
use crate::dto::MessageResponse;
use crate::middleware::access::{Capability, Requester};
use crate::routes::{guarded, IdPath};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::ValidatedJson;

pub fn quote_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/quotes",
            guarded(Capability::AuthenticatedClient, get(list_quotes).post(submit_quote)),
        )
        .route(
            "/quote/:id",
            guarded(
                Capability::AuthenticatedClientOrStaff,
                get(get_quote).put(update_quote).delete(delete_quote),
            ),
        )
        .route(
            "/staff/quotes",
            guarded(Capability::AuthenticatedStaff, get(list_all_quotes)),
        )
}

async fn submit_quote(
    State(state): State<AppState>,
    requester: Requester,
    ValidatedJson(request): ValidatedJson<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<QuoteResponse>), AppError> {
    let quote = QuoteController::new(&state).submit(&requester, request).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

async fn list_quotes(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<Vec<QuoteResponse>>, AppError> {
    Ok(Json(QuoteController::new(&state).list(&requester).await?))
}

async fn list_all_quotes(State(state): State<AppState>) -> Result<Json<Vec<QuoteResponse>>, AppError> {
    Ok(Json(QuoteController::new(&state).list_all().await?))
}

async fn get_quote(
    State(state): State<AppState>,
    requester: Requester,
    IdPath(id): IdPath,
) -> Result<Json<QuoteResponse>, AppError> {
    Ok(Json(QuoteController::new(&state).get(id, &requester).await?))
}

async fn update_quote(
    State(state): State<AppState>,
    requester: Requester,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateQuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    Ok(Json(QuoteController::new(&state).update(id, &requester, request).await?))
}

async fn delete_quote(
    State(state): State<AppState>,
    requester: Requester,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    QuoteController::new(&state).delete(id, &requester).await?;
    Ok(Json(MessageResponse::ok(format!("Quote {} deleted", id))))
}
