//! Customer, product, and order routes.

use crate::handlers::{
    add_product_to_order, create_customer, create_order, create_product, get_customer, get_order, home,
    list_customer_orders, list_customers, list_products,
};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/:id", get(get_customer))
        .route("/customers/:id/orders", get(list_customer_orders))
        .route("/products", get(list_products).post(create_product))
        .route("/orders", post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:order_id/add_product/:product_id", put(add_product_to_order))
        .with_state(state)
}
