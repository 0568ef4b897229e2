//! PostgreSQL-backed store. All tables live in one schema chosen at startup.

use super::Store;
use crate::error::{AppError, ConfigError};
use crate::model::{Customer, LinkOutcome, NewCustomer, NewOrder, NewProduct, Order, Product};
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Quote identifier for PostgreSQL.
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub(crate) fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    customers: String,
    orders: String,
    products: String,
    order_products: String,
}

impl PgStore {
    /// Tables are expected to exist already (see `apply_migrations`).
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgStore {
            pool,
            customers: qualified_table(schema, "customers"),
            orders: qualified_table(schema, "orders"),
            products: qualified_table(schema, "products"),
            order_products: qualified_table(schema, "order_products"),
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_customer(&self, input: NewCustomer) -> Result<Customer, AppError> {
        let sql = format!(
            "INSERT INTO {} (name, email, address) VALUES ($1, $2, $3) RETURNING id, name, email, address",
            self.customers
        );
        tracing::debug!(sql = %sql, "query");
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.address)
            .fetch_one(&self.pool)
            .await?;
        Ok(customer)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        let sql = format!("SELECT id, name, email, address FROM {} ORDER BY id", self.customers);
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Customer>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, AppError> {
        let sql = format!("SELECT id, name, email, address FROM {} WHERE id = $1", self.customers);
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, Customer>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product, AppError> {
        let sql = format!(
            "INSERT INTO {} (product_name, price) VALUES ($1, $2) RETURNING id, product_name, price",
            self.products
        );
        tracing::debug!(sql = %sql, "query");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&input.product_name)
            .bind(input.price)
            .fetch_one(&self.pool)
            .await?;
        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let sql = format!("SELECT id, product_name, price FROM {} ORDER BY id", self.products);
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool).await?)
    }

    async fn create_order(&self, input: NewOrder) -> Result<Option<Order>, AppError> {
        // Existence check and insert in one statement: no row is written for an unknown customer.
        let sql = format!(
            "INSERT INTO {} (order_date, customer_id) SELECT $1, c.id FROM {} c WHERE c.id = $2 \
             RETURNING id, order_date, customer_id",
            self.orders, self.customers
        );
        tracing::debug!(sql = %sql, customer_id = input.customer_id, "query");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(input.order_date)
            .bind(input.customer_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, AppError> {
        let sql = format!("SELECT id, order_date, customer_id FROM {} WHERE id = $1", self.orders);
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, Order>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn orders_for_customer(&self, customer_id: i64) -> Result<Vec<Order>, AppError> {
        let sql = format!(
            "SELECT id, order_date, customer_id FROM {} WHERE customer_id = $1 ORDER BY id",
            self.orders
        );
        tracing::debug!(sql = %sql, customer_id, "query");
        Ok(sqlx::query_as::<_, Order>(&sql).bind(customer_id).fetch_all(&self.pool).await?)
    }

    async fn products_for_order(&self, order_id: i64) -> Result<Vec<Product>, AppError> {
        let sql = format!(
            "SELECT p.id, p.product_name, p.price FROM {} p \
             JOIN {} op ON op.product_id = p.id WHERE op.order_id = $1 ORDER BY p.id",
            self.products, self.order_products
        );
        tracing::debug!(sql = %sql, order_id, "query");
        Ok(sqlx::query_as::<_, Product>(&sql).bind(order_id).fetch_all(&self.pool).await?)
    }

    async fn add_product_to_order(&self, order_id: i64, product_id: i64) -> Result<LinkOutcome, AppError> {
        let mut tx = self.pool.begin().await?;
        let exists_sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1), EXISTS(SELECT 1 FROM {} WHERE id = $2)",
            self.orders, self.products
        );
        tracing::debug!(sql = %exists_sql, order_id, product_id, "query (tx)");
        let (order_exists, product_exists): (bool, bool) = sqlx::query_as(&exists_sql)
            .bind(order_id)
            .bind(product_id)
            .fetch_one(&mut *tx)
            .await?;
        if !order_exists || !product_exists {
            tx.rollback().await?;
            return Ok(LinkOutcome::MissingEntity);
        }
        // The composite primary key turns a concurrent duplicate into a no-op.
        let insert_sql = format!(
            "INSERT INTO {} (order_id, product_id) VALUES ($1, $2) ON CONFLICT (order_id, product_id) DO NOTHING",
            self.order_products
        );
        tracing::debug!(sql = %insert_sql, order_id, product_id, "query (tx)");
        let inserted = sqlx::query(&insert_sql)
            .bind(order_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;
        Ok(if inserted == 0 {
            LinkOutcome::AlreadyLinked
        } else {
            LinkOutcome::Linked
        })
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database (same host, credentials and TLS options) to run
/// CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, db_name) = admin_options(database_url)?;
    let db_name = match db_name {
        Some(name) if !name.is_empty() && name != "postgres" => name,
        _ => return Ok(()),
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Options for the `postgres` admin database plus the target database name, if the URL names one.
fn admin_options(url: &str) -> Result<(PgConnectOptions, Option<String>), AppError> {
    let opts = PgConnectOptions::from_str(url).map_err(|e| ConfigError::InvalidValue {
        key: "DATABASE_URL",
        message: e.to_string(),
    })?;
    let db_name = opts.get_database().map(str::to_string);
    Ok((opts.database("postgres"), db_name))
}
