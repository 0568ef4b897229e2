//! Customer handlers: create, list, read, and the customer's orders.

use super::parse_id;
use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::response::{created, ok};
use crate::schema::{CustomerSchema, OrderSchema, Schema};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

pub(crate) const CUSTOMER_NOT_FOUND: &str = "Customer not found";

#[utoipa::path(
    post,
    path = "/customers",
    request_body = crate::model::NewCustomer,
    responses(
        (status = 201, description = "Customer created"),
        (status = 400, description = "Body failed validation")
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let input = CustomerSchema::load(&body)?;
    let customer = state.store.create_customer(input).await?;
    tracing::info!(customer_id = customer.id, "customer created");
    Ok(created(
        "New Customer added successfully!",
        "customer",
        CustomerSchema::dump(&customer),
    ))
}

#[utoipa::path(
    get,
    path = "/customers",
    responses((status = 200, description = "All customers", body = [crate::model::Customer])),
    tag = "customers"
)]
pub async fn list_customers(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let customers = state.store.list_customers().await?;
    Ok(ok(CustomerSchema::dump_many(&customers)))
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "The customer", body = crate::model::Customer),
        (status = 404, description = "No such customer")
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let customer = state
        .store
        .get_customer(id)
        .await?
        .ok_or_else(|| AppError::NotFound(CUSTOMER_NOT_FOUND.into()))?;
    Ok(ok(CustomerSchema::dump(&customer)))
}

#[utoipa::path(
    get,
    path = "/customers/{id}/orders",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Orders placed by the customer", body = [crate::model::Order]),
        (status = 404, description = "No such customer")
    ),
    tag = "customers"
)]
pub async fn list_customer_orders(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if state.store.get_customer(id).await?.is_none() {
        return Err(AppError::NotFound(CUSTOMER_NOT_FOUND.into()));
    }
    let orders = state.store.orders_for_customer(id).await?;
    Ok(ok(OrderSchema::dump_many(&orders)))
}
