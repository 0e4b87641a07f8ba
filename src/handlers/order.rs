use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, info, warn};

use crate::{
    error::{Operation, OrderError},
    models::{ErrorResponse, Identity, OrderCreateRequest, OrderId},
    services::formatter::{render_order, render_orders, OrderResponse},
    AppState,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Order routes, all scoped by the identity path segment.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/identity/{iden}/order",
            get(list_orders).post(create_order),
        )
        .route("/identity/{iden}/order/", get(missing_order_id))
        .route("/identity/{iden}/order/{id}", get(get_order))
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

/// Maps a failed order operation to its response. Validation failures log at warn.
fn order_error(op: Operation, identity: &Identity, err: OrderError) -> ApiError {
    let status = err.status_code();
    match &err {
        OrderError::Validation(_) => {
            warn!(identity = %identity, status = %status, "Rejected {}: {}", op, err)
        }
        _ => error!(identity = %identity, status = %status, "Failed to {}: {}", op, err),
    }
    (status, Json(ErrorResponse::new(op.wrap(&err))))
}

/// Create order
///
/// POST /identity/{iden}/order
///
/// Takes the given data and tries to create a new payment order upstream.
///
/// # Request
///
/// ```json
/// {
///   "price_amount": 1,
///   "price_currency": "EUR",
///   "receive_currency": "MYST",
///   "lightning_network": false
/// }
/// ```
///
/// # Responses
///
/// * 200 - order object
/// * 400 - malformed or invalid body
/// * 500 - upstream failure
pub async fn create_order(
    State(state): State<AppState>,
    Path(iden): Path<String>,
    body: Result<Json<OrderCreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(request) = body.map_err(|rejection| {
        bad_request(format!("failed to parse order req: {}", rejection.body_text()))
    })?;

    let identity = Identity::new(iden);
    info!(identity = %identity, "Create order request");

    let order = state
        .orders
        .create_order(&identity, request)
        .await
        .map_err(|e| order_error(Operation::Create, &identity, e))?;

    Ok((StatusCode::OK, Json(render_order(&order))))
}

/// Get order
///
/// GET /identity/{iden}/order/{id}
///
/// Gets an order for a given identity and order id combo.
///
/// # Responses
///
/// * 200 - order object
/// * 400 - `id` missing, not an unsigned integer, or zero
/// * 500 - upstream failure (including "not found")
pub async fn get_order(
    State(state): State<AppState>,
    Path((iden, id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order_id: OrderId = id.parse().map_err(|e| bad_request(format!("{}", e)))?;

    let identity = Identity::new(iden);
    info!(identity = %identity, order_id = %order_id, "Get order request");

    let order = state
        .orders
        .get_order(&identity, order_id)
        .await
        .map_err(|e| order_error(Operation::Get, &identity, e))?;

    Ok((StatusCode::OK, Json(render_order(&order))))
}

async fn missing_order_id(Path(_iden): Path<String>) -> ApiError {
    bad_request("missing ID param")
}

/// Get all orders for identity
///
/// GET /identity/{iden}/order
///
/// # Responses
///
/// * 200 - array of order objects, `[]` when the identity has none
/// * 500 - upstream failure
pub async fn list_orders(
    State(state): State<AppState>,
    Path(iden): Path<String>,
) -> Result<(StatusCode, Json<Vec<OrderResponse>>), ApiError> {
    let identity = Identity::new(iden);

    let orders = state
        .orders
        .list_orders(&identity)
        .await
        .map_err(|e| order_error(Operation::List, &identity, e))?;

    info!(identity = %identity, count = orders.len(), "Listed orders");
    Ok((StatusCode::OK, Json(render_orders(&orders))))
}
