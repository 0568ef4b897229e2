//! Storage seam: handlers talk to a `Store`, never to a pool directly.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};
pub(crate) use postgres::{qualified_table, quoted};

use crate::error::AppError;
use crate::model::{Customer, LinkOutcome, NewCustomer, NewOrder, NewProduct, Order, Product};
use async_trait::async_trait;

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;

    async fn create_customer(&self, input: NewCustomer) -> Result<Customer, AppError>;
    async fn list_customers(&self) -> Result<Vec<Customer>, AppError>;
    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, AppError>;

    async fn create_product(&self, input: NewProduct) -> Result<Product, AppError>;
    async fn list_products(&self) -> Result<Vec<Product>, AppError>;

    /// Insert an order for an existing customer. Returns `None` (and writes nothing)
    /// when `input.customer_id` does not reference a customer.
    async fn create_order(&self, input: NewOrder) -> Result<Option<Order>, AppError>;
    async fn get_order(&self, id: i64) -> Result<Option<Order>, AppError>;
    async fn orders_for_customer(&self, customer_id: i64) -> Result<Vec<Order>, AppError>;
    async fn products_for_order(&self, order_id: i64) -> Result<Vec<Product>, AppError>;

    /// Link a product to an order at most once. Concurrent calls for the same
    /// pair produce exactly one `Linked`.
    async fn add_product_to_order(&self, order_id: i64, product_id: i64) -> Result<LinkOutcome, AppError>;
}
