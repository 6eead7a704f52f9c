use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};

use crate::controllers::invoice_controller::InvoiceController;
use crate::dto::invoice_dto::{CreateInvoiceRequest, InvoiceResponse, UpdateInvoiceRequest};
use crate::dto::MessageResponse;
use crate::middleware::access::{Capability, Requester};
use crate::routes::{guarded, IdPath};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::ValidatedJson;

pub fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/invoices",
            guarded(Capability::AuthenticatedClient, get(list_invoices))
                .merge(guarded(Capability::AuthenticatedStaff, post(create_invoice))),
        )
        .route(
            "/invoice/:id",
            guarded(Capability::AuthenticatedClientOrStaff, get(get_invoice)).merge(guarded(
                Capability::AuthenticatedStaff,
                put(update_invoice).delete(delete_invoice),
            )),
        )
        .route(
            "/staff/invoices",
            guarded(Capability::AuthenticatedStaff, get(list_all_invoices)),
        )
}

async fn create_invoice(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    let invoice = InvoiceController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

async fn list_invoices(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    Ok(Json(InvoiceController::new(&state).list(&requester).await?))
}

async fn list_all_invoices(
    State(state): State<AppState>,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    Ok(Json(InvoiceController::new(&state).list_all().await?))
}

async fn get_invoice(
    State(state): State<AppState>,
    requester: Requester,
    IdPath(id): IdPath,
) -> Result<Json<InvoiceResponse>, AppError> {
    Ok(Json(InvoiceController::new(&state).get(id, &requester).await?))
}

async fn update_invoice(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, AppError> {
    Ok(Json(InvoiceController::new(&state).update(id, request).await?))
}

async fn delete_invoice(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    InvoiceController::new(&state).delete(id).await?;
    Ok(Json(MessageResponse::ok(format!("Invoice {} deleted", id))))
}
