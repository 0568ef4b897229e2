//! HTTP handlers for customers, products, and orders.

pub mod customers;
pub mod orders;
pub mod products;

pub use customers::{create_customer, get_customer, list_customer_orders, list_customers};
pub use orders::{add_product_to_order, create_order, get_order};
pub use products::{create_product, list_products};

use crate::error::AppError;

pub async fn home() -> &'static str {
    "Home"
}

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}
