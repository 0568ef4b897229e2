//! OpenAPI document served at `/openapi.json`.

use crate::handlers;
use crate::model::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "storefront", description = "Customers, products, and orders"),
    paths(
        handlers::customers::create_customer,
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::list_customer_orders,
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::add_product_to_order,
    ),
    components(schemas(Customer, Product, Order, NewCustomer, NewProduct, NewOrder)),
    tags(
        (name = "customers"),
        (name = "products"),
        (name = "orders")
    )
)]
pub struct ApiDoc;
