use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};

use crate::controllers::rider_controller::RiderController;
use crate::dto::rider_dto::{CreateRiderRequest, RiderResponse, UpdateRiderRequest};
use crate::dto::MessageResponse;
use crate::middleware::access::Capability;
use crate::routes::{guarded, IdPath};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::ValidatedJson;

pub fn rider_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/riders",
            guarded(Capability::AuthenticatedStaff, get(list_riders).post(create_rider)),
        )
        .route(
            "/rider/:id",
            guarded(
                Capability::AuthenticatedStaff,
                get(get_rider).put(update_rider).delete(delete_rider),
            ),
        )
}

async fn create_rider(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateRiderRequest>,
) -> Result<(StatusCode, Json<RiderResponse>), AppError> {
    let rider = RiderController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(rider)))
}

async fn list_riders(State(state): State<AppState>) -> Result<Json<Vec<RiderResponse>>, AppError> {
    Ok(Json(RiderController::new(&state).list().await?))
}

async fn get_rider(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<RiderResponse>, AppError> {
    Ok(Json(RiderController::new(&state).get(id).await?))
}

async fn update_rider(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateRiderRequest>,
) -> Result<Json<RiderResponse>, AppError> {
    Ok(Json(RiderController::new(&state).update(id, request).await?))
}

async fn delete_rider(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    RiderController::new(&state).delete(id).await?;
    Ok(Json(MessageResponse::ok(format!("Rider {} deleted", id))))
}
