use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use storefront::{app, AppState, MemoryStore};
use tower::ServiceExt;

fn test_app() -> Router {
    app(AppState::new(MemoryStore::new()), 64 * 1024)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

async fn create_customer(app: &Router, name: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/customers",
        Some(json!({"name": name, "email": format!("{}@example.com", name), "address": "1 Main St"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["customer"]["id"].as_i64().unwrap()
}

async fn create_product(app: &Router, name: &str, price: f64) -> i64 {
    let (status, body) = send(app, "POST", "/products", Some(json!({"product_name": name, "price": price}))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["product"]["id"].as_i64().unwrap()
}

async fn create_order(app: &Router, customer_id: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/orders",
        Some(json!({"order_date": "2024-06-01", "customer_id": customer_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["order"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn home_returns_plain_text() {
    let (status, body) = send(&test_app(), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Home"));
}

#[tokio::test]
async fn created_customer_can_be_fetched_by_id() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({"name": "Ada", "email": "ada@example.com", "address": "12 Analytical Way"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "New Customer added successfully!");
    let created = body["customer"].clone();
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, "GET", &format!("/customers/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["name"], "Ada");
}

#[tokio::test]
async fn customer_without_name_is_rejected() {
    let app = test_app();
    let (status, body) = send(&app, "POST", "/customers", Some(json!({"email": "x@example.com"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"]["name"], json!(["Missing data for required field."]));

    let (_, list) = send(&app, "GET", "/customers", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn unknown_customer_is_not_found() {
    let (status, body) = send(&test_app(), "GET", "/customers/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Customer not found");
}

#[tokio::test]
async fn non_numeric_id_is_a_bad_request() {
    let (status, body) = send(&test_app(), "GET", "/customers/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn product_requires_name_and_price() {
    let app = test_app();
    let (status, body) = send(&app, "POST", "/products", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = &body["error"]["details"];
    assert!(details.get("product_name").is_some());
    assert!(details.get("price").is_some());

    let (status, body) = send(&app, "POST", "/products", Some(json!({"product_name": "Lamp", "price": 24.5}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "New Product added!");
    assert_eq!(body["product"], json!({"id": 1, "product_name": "Lamp", "price": 24.5}));
}

#[tokio::test]
async fn order_for_unknown_customer_is_rejected_and_not_stored() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({"order_date": "2024-06-01", "customer_id": 41})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_reference");
    assert_eq!(body["error"]["message"], "Invalid customer id");

    let (status, _) = send(&app, "GET", "/orders/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_body_is_validated() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({"order_date": "June 1st", "customer_id": "one"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["order_date"], json!(["Not a valid date."]));
    assert_eq!(body["error"]["details"]["customer_id"], json!(["Not a valid integer."]));
}

#[tokio::test]
async fn order_is_created_for_existing_customer() {
    let app = test_app();
    let customer_id = create_customer(&app, "grace").await;
    let (status, body) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({"order_date": "2024-06-01", "customer_id": customer_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "New Order Placed!");
    assert_eq!(
        body["order"],
        json!({"id": 1, "order_date": "2024-06-01", "customer_id": customer_id, "products": []})
    );

    let (status, orders) = send(&app, "GET", &format!("/customers/{}/orders", customer_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn adding_a_product_twice_links_it_once() {
    let app = test_app();
    let customer_id = create_customer(&app, "linus").await;
    let order_id = create_order(&app, customer_id).await;
    let product_id = create_product(&app, "Keyboard", 49.0).await;
    let uri = format!("/orders/{}/add_product/{}", order_id, product_id);

    let (status, body) = send(&app, "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully added item to order.");

    let (status, body) = send(&app, "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Item is already included in this order.");

    let (status, order) = send(&app, "GET", &format!("/orders/{}", order_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        order["products"],
        json!([{"id": product_id, "product_name": "Keyboard", "price": 49.0}])
    );
}

#[tokio::test]
async fn linking_with_unknown_ids_is_rejected() {
    let app = test_app();
    let customer_id = create_customer(&app, "ken").await;
    let order_id = create_order(&app, customer_id).await;
    let product_id = create_product(&app, "Mouse", 15.0).await;

    for uri in [
        format!("/orders/{}/add_product/{}", order_id + 10, product_id),
        format!("/orders/{}/add_product/{}", order_id, product_id + 10),
    ] {
        let (status, body) = send(&app, "PUT", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Invalid order id or product id.");
    }
}

#[tokio::test]
async fn listings_count_every_created_entity() {
    let app = test_app();
    for name in ["a", "b", "c"] {
        create_customer(&app, name).await;
    }
    for (name, price) in [("x", 1.0), ("y", 2.5)] {
        create_product(&app, name, price).await;
    }
    let (_, customers) = send(&app, "GET", "/customers", None).await;
    let (_, products) = send(&app, "GET", "/products", None).await;
    assert_eq!(customers.as_array().unwrap().len(), 3);
    assert_eq!(products.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn serialized_customer_revalidates_to_same_fields() {
    let app = test_app();
    let (_, first) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({"name": "Barbara", "email": null, "address": "Cambridge"})),
    )
    .await;
    let dumped = first["customer"].clone();

    let (status, second) = send(&app, "POST", "/customers", Some(dumped.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let copy = &second["customer"];
    assert_ne!(copy["id"], dumped["id"]);
    for field in ["name", "email", "address"] {
        assert_eq!(copy[field], dumped[field], "field {}", field);
    }
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/customers")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_and_ready_report_ok() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    let (status, body) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}
