//! Storefront: customers, products, and orders over a small REST API.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod schema;
pub mod state;
pub mod store;

pub use config::{AppConfig, StorageBackend};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::{api_routes, app, common_routes};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, Store};
