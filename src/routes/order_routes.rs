use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};

use crate::controllers::order_controller::OrderController;
use crate::dto::order_dto::{
    AttachRiderRequest, CreateOrderRequest, OrderResponse, UpdateOrderRequest, UpdateStatusRequest,
};
use crate::dto::MessageResponse;
use crate::middleware::access::{Capability, Requester};
use crate::routes::{guarded, IdPath};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::ValidatedJson;

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/orders",
            guarded(Capability::AuthenticatedClient, get(list_orders))
                .merge(guarded(Capability::AuthenticatedStaff, post(create_order))),
        )
        .route(
            "/orders/track/:tracking_number",
            guarded(Capability::AuthenticatedClientOrStaff, get(track_order)),
        )
        .route(
            "/order/:id",
            guarded(Capability::AuthenticatedClientOrStaff, get(get_order)).merge(guarded(
                Capability::AuthenticatedStaff,
                put(update_order).delete(delete_order),
            )),
        )
        .route(
            "/order/:id/status",
            guarded(Capability::AuthenticatedStaff, put(update_order_status)),
        )
        .route(
            "/order/:id/rider",
            guarded(Capability::AuthenticatedStaff, put(attach_rider)),
        )
        .route(
            "/staff/orders",
            guarded(Capability::AuthenticatedStaff, get(list_all_orders)),
        )
}

async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let order = OrderController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn list_orders(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    Ok(Json(OrderController::new(&state).list(&requester).await?))
}

async fn list_all_orders(State(state): State<AppState>) -> Result<Json<Vec<OrderResponse>>, AppError> {
    Ok(Json(OrderController::new(&state).list_all().await?))
}

async fn get_order(
    State(state): State<AppState>,
    requester: Requester,
    IdPath(id): IdPath,
) -> Result<Json<OrderResponse>, AppError> {
    Ok(Json(OrderController::new(&state).get(id, &requester).await?))
}

async fn track_order(
    State(state): State<AppState>,
    requester: Requester,
    Path(tracking_number): Path<String>,
) -> Result<Json<OrderResponse>, AppError> {
    Ok(Json(
        OrderController::new(&state)
            .track(&tracking_number, &requester)
            .await?,
    ))
}

async fn update_order(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    Ok(Json(OrderController::new(&state).update(id, request).await?))
}

async fn update_order_status(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let status = request.order_status.parse()?;
    Ok(Json(OrderController::new(&state).update_status(id, status).await?))
}

async fn attach_rider(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<AttachRiderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    Ok(Json(
        OrderController::new(&state)
            .attach_rider(id, request.rider_id)
            .await?,
    ))
}

async fn delete_order(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    OrderController::new(&state).delete(id).await?;
    Ok(Json(MessageResponse::ok(format!("Order {} deleted", id))))
}
