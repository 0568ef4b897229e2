//! Explicit per-entity field contracts used both to validate request bodies and to
//! serialize entities into responses.

mod entities;
mod fields;

pub use entities::{dump_order_detail, CustomerSchema, OrderSchema, ProductSchema};
pub use fields::{validate, FieldKind, FieldSpec, Loaded, DATE_FORMAT};

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field name -> messages. Serializes as `{"name": ["Missing data for required field."]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Key used for errors about the body as a whole.
    pub const SCHEMA_KEY: &'static str = "_schema";

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

pub trait Schema {
    type Entity;
    type Input;

    const FIELDS: &'static [FieldSpec];

    /// Build the input record from already-validated fields.
    fn build(fields: &Loaded) -> Result<Self::Input, FieldErrors>;

    /// JSON value of one declared field.
    fn field_value(entity: &Self::Entity, field: &str) -> Value;

    fn load(body: &Value) -> Result<Self::Input, FieldErrors> {
        let loaded = validate(body, Self::FIELDS)?;
        Self::build(&loaded)
    }

    fn dump(entity: &Self::Entity) -> Value {
        let mut map = Map::with_capacity(Self::FIELDS.len());
        for field in Self::FIELDS {
            map.insert(field.name.to_string(), Self::field_value(entity, field.name));
        }
        Value::Object(map)
    }

    fn dump_many(entities: &[Self::Entity]) -> Value {
        Value::Array(entities.iter().map(Self::dump).collect())
    }
}
