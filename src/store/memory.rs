//! In-process store with the same semantics as `PgStore`. Used by tests and local runs.

use super::Store;
use crate::error::AppError;
use crate::model::{Customer, LinkOutcome, NewCustomer, NewOrder, NewProduct, Order, Product};
use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    customers: Vec<Customer>,
    products: Vec<Product>,
    orders: Vec<Order>,
    /// (order_id, product_id)
    order_products: BTreeSet<(i64, i64)>,
}

/// Ids are assigned sequentially from 1, like a fresh `BIGSERIAL`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(len: usize) -> i64 {
    len as i64 + 1
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_customer(&self, input: NewCustomer) -> Result<Customer, AppError> {
        let mut t = self.tables.write().await;
        let customer = Customer {
            id: next_id(t.customers.len()),
            name: input.name,
            email: input.email,
            address: input.address,
        };
        t.customers.push(customer.clone());
        Ok(customer)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.tables.read().await.customers.clone())
    }

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, AppError> {
        Ok(self.tables.read().await.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product, AppError> {
        let mut t = self.tables.write().await;
        let product = Product {
            id: next_id(t.products.len()),
            product_name: input.product_name,
            price: input.price,
        };
        t.products.push(product.clone());
        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.tables.read().await.products.clone())
    }

    async fn create_order(&self, input: NewOrder) -> Result<Option<Order>, AppError> {
        let mut t = self.tables.write().await;
        if !t.customers.iter().any(|c| c.id == input.customer_id) {
            return Ok(None);
        }
        let order = Order {
            id: next_id(t.orders.len()),
            order_date: input.order_date,
            customer_id: input.customer_id,
        };
        t.orders.push(order.clone());
        Ok(Some(order))
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, AppError> {
        Ok(self.tables.read().await.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn orders_for_customer(&self, customer_id: i64) -> Result<Vec<Order>, AppError> {
        let t = self.tables.read().await;
        Ok(t.orders.iter().filter(|o| o.customer_id == customer_id).cloned().collect())
    }

    async fn products_for_order(&self, order_id: i64) -> Result<Vec<Product>, AppError> {
        let t = self.tables.read().await;
        let products = t
            .order_products
            .range((order_id, i64::MIN)..=(order_id, i64::MAX))
            .filter_map(|(_, product_id)| t.products.iter().find(|p| p.id == *product_id).cloned())
            .collect();
        Ok(products)
    }

    async fn add_product_to_order(&self, order_id: i64, product_id: i64) -> Result<LinkOutcome, AppError> {
        let mut t = self.tables.write().await;
        let order_exists = t.orders.iter().any(|o| o.id == order_id);
        let product_exists = t.products.iter().any(|p| p.id == product_id);
        if !order_exists || !product_exists {
            return Ok(LinkOutcome::MissingEntity);
        }
        if t.order_products.insert((order_id, product_id)) {
            Ok(LinkOutcome::Linked)
        } else {
            Ok(LinkOutcome::AlreadyLinked)
        }
    }
}
