//! Field-level contracts and request validation against them.

use super::FieldErrors;
use chrono::NaiveDate;
use serde_json::{Map, Value};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const MISSING: &str = "Missing data for required field.";
pub const NULL_NOT_ALLOWED: &str = "Field may not be null.";
pub const INVALID_INPUT: &str = "Invalid input type.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
    Text { max_length: Option<usize> },
    /// ISO calendar date, `YYYY-MM-DD`.
    Date,
}

/// One field of an entity contract. Shared by load (validation) and dump (serialization).
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Emitted in responses, ignored in request bodies (server-generated ids).
    pub dump_only: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec { name, kind, required: true, dump_only: false }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec { name, kind, required: false, dump_only: false }
    }

    pub const fn dump_only(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec { name, kind, required: false, dump_only: true }
    }
}

/// Validate a request body against field specs. Unknown and dump-only fields are dropped.
/// All errors are collected before returning.
pub fn validate(body: &Value, fields: &[FieldSpec]) -> Result<Loaded, FieldErrors> {
    let obj = match body {
        Value::Object(m) => m,
        _ => return Err(FieldErrors::single(FieldErrors::SCHEMA_KEY, INVALID_INPUT)),
    };
    let mut errors = FieldErrors::default();
    let mut out = Map::new();
    for field in fields.iter().filter(|f| !f.dump_only) {
        match obj.get(field.name) {
            None => {
                if field.required {
                    errors.push(field.name, MISSING);
                }
            }
            Some(Value::Null) => {
                if field.required {
                    errors.push(field.name, NULL_NOT_ALLOWED);
                } else {
                    out.insert(field.name.to_string(), Value::Null);
                }
            }
            Some(v) => match check_kind(v, field.kind) {
                Ok(normalized) => {
                    out.insert(field.name.to_string(), normalized);
                }
                Err(message) => errors.push(field.name, message),
            },
        }
    }
    if errors.is_empty() {
        Ok(Loaded(out))
    } else {
        Err(errors)
    }
}

fn check_kind(v: &Value, kind: FieldKind) -> Result<Value, String> {
    match kind {
        FieldKind::Integer => match v {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::from(i))
                } else {
                    match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Value::from(f as i64)),
                        _ => Err("Not a valid integer.".into()),
                    }
                }
            }
            _ => Err("Not a valid integer.".into()),
        },
        FieldKind::Float => match v.as_f64() {
            Some(f) if v.is_number() => Ok(Value::from(f)),
            _ => Err("Not a valid number.".into()),
        },
        FieldKind::Text { max_length } => {
            let s = v.as_str().ok_or_else(|| "Not a valid string.".to_string())?;
            if let Some(max) = max_length {
                if s.chars().count() > max {
                    return Err(format!("Longer than maximum length {}.", max));
                }
            }
            Ok(Value::String(s.to_string()))
        }
        FieldKind::Date => {
            let s = v.as_str().ok_or_else(|| "Not a valid date.".to_string())?;
            let date = NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| "Not a valid date.".to_string())?;
            Ok(Value::String(date.format(DATE_FORMAT).to_string()))
        }
    }
}

/// Validated field values, ready to build an input record.
#[derive(Debug, Clone, Default)]
pub struct Loaded(Map<String, Value>);

impl Loaded {
    fn required(&self, name: &'static str) -> Result<&Value, FieldErrors> {
        match self.0.get(name) {
            Some(Value::Null) | None => Err(FieldErrors::single(name, MISSING)),
            Some(v) => Ok(v),
        }
    }

    pub fn text(&self, name: &'static str) -> Result<String, FieldErrors> {
        self.required(name)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| FieldErrors::single(name, "Not a valid string."))
    }

    pub fn opt_text(&self, name: &str) -> Option<String> {
        self.0.get(name).and_then(Value::as_str).map(str::to_string)
    }

    pub fn integer(&self, name: &'static str) -> Result<i64, FieldErrors> {
        self.required(name)?
            .as_i64()
            .ok_or_else(|| FieldErrors::single(name, "Not a valid integer."))
    }

    pub fn float(&self, name: &'static str) -> Result<f64, FieldErrors> {
        self.required(name)?
            .as_f64()
            .ok_or_else(|| FieldErrors::single(name, "Not a valid number."))
    }

    pub fn date(&self, name: &'static str) -> Result<NaiveDate, FieldErrors> {
        self.required(name)?
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
            .ok_or_else(|| FieldErrors::single(name, "Not a valid date."))
    }
}
