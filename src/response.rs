//! Success response helpers. Errors go through `AppError`.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// 201 with `{"message": ..., "<key>": entity}`.
pub fn created(message: &str, key: &str, entity: Value) -> (StatusCode, Json<Value>) {
    let mut body = Map::new();
    body.insert("message".to_string(), Value::from(message));
    body.insert(key.to_string(), entity);
    (StatusCode::CREATED, Json(Value::Object(body)))
}

pub fn ok(data: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(data))
}

pub fn message(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<MessageBody>) {
    (status, Json(MessageBody { message: message.into() }))
}
