//! Product handlers.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::response::{created, ok};
use crate::schema::{ProductSchema, Schema};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

#[utoipa::path(
    post,
    path = "/products",
    request_body = crate::model::NewProduct,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Body failed validation")
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let input = ProductSchema::load(&body)?;
    let product = state.store.create_product(input).await?;
    tracing::info!(product_id = product.id, "product created");
    Ok(created("New Product added!", "product", ProductSchema::dump(&product)))
}

#[utoipa::path(
    get,
    path = "/products",
    responses((status = 200, description = "All products", body = [crate::model::Product])),
    tag = "products"
)]
pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = state.store.list_products().await?;
    Ok(ok(ProductSchema::dump_many(&products)))
}
