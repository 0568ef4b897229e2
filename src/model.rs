//! Persisted entities and the validated inputs used to create them.

use chrono::NaiveDate;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, ToSchema, sqlx::FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, ToSchema, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub product_name: String,
    pub price: f64,
}

/// An order row. `customer_id` never changes after creation.
#[derive(Clone, Debug, PartialEq, ToSchema, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub order_date: NaiveDate,
    pub customer_id: i64,
}

/// An order together with the products linked to it.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderDetail {
    pub order: Order,
    pub products: Vec<Product>,
}

#[derive(Clone, Debug, PartialEq, ToSchema)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, ToSchema)]
pub struct NewProduct {
    pub product_name: String,
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq, ToSchema)]
pub struct NewOrder {
    pub order_date: NaiveDate,
    pub customer_id: i64,
}

/// Result of linking a product to an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    AlreadyLinked,
    /// The order or the product does not exist.
    MissingEntity,
}
