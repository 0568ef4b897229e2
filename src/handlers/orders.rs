//! Order handlers: create, read with products, and linking a product to an order.

use super::parse_id;
use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::{LinkOutcome, OrderDetail};
use crate::response::{created, message, ok};
use crate::schema::{dump_order_detail, OrderSchema, Schema};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

pub(crate) const INVALID_CUSTOMER_ID: &str = "Invalid customer id";
pub(crate) const INVALID_ORDER_OR_PRODUCT_ID: &str = "Invalid order id or product id.";
pub(crate) const ALREADY_INCLUDED: &str = "Item is already included in this order.";
pub(crate) const ORDER_NOT_FOUND: &str = "Order not found";

#[utoipa::path(
    post,
    path = "/orders",
    request_body = crate::model::NewOrder,
    responses(
        (status = 201, description = "Order placed"),
        (status = 400, description = "Body failed validation or the customer does not exist")
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let input = OrderSchema::load(&body)?;
    let customer_id = input.customer_id;
    let order = state
        .store
        .create_order(input)
        .await?
        .ok_or_else(|| AppError::InvalidReference(INVALID_CUSTOMER_ID.into()))?;
    tracing::info!(order_id = order.id, customer_id, "order placed");
    // A new order has no products yet.
    let detail = OrderDetail { order, products: Vec::new() };
    Ok(created("New Order Placed!", "order", dump_order_detail(&detail)))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "The order with its products"),
        (status = 404, description = "No such order")
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let order = state
        .store
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound(ORDER_NOT_FOUND.into()))?;
    let products = state.store.products_for_order(order.id).await?;
    Ok(ok(dump_order_detail(&OrderDetail { order, products })))
}

#[utoipa::path(
    put,
    path = "/orders/{order_id}/add_product/{product_id}",
    params(
        ("order_id" = i64, Path, description = "Order id"),
        ("product_id" = i64, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product linked to the order"),
        (status = 400, description = "Unknown order or product, or the product is already on the order")
    ),
    tag = "orders"
)]
pub async fn add_product_to_order(
    State(state): State<AppState>,
    Path((order_str, product_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let order_id = parse_id(&order_str)?;
    let product_id = parse_id(&product_str)?;
    match state.store.add_product_to_order(order_id, product_id).await? {
        LinkOutcome::Linked => {
            tracing::info!(order_id, product_id, "product added to order");
            Ok(message(StatusCode::OK, "Successfully added item to order."))
        }
        LinkOutcome::AlreadyLinked => Err(AppError::AlreadyLinked(ALREADY_INCLUDED.into())),
        LinkOutcome::MissingEntity => Err(AppError::InvalidReference(INVALID_ORDER_OR_PRODUCT_ID.into())),
    }
}
