use super::{FieldErrors, FieldKind, FieldSpec, Loaded, Schema, DATE_FORMAT};
use crate::model::{Customer, NewCustomer, NewOrder, NewProduct, Order, OrderDetail, Product};
use serde_json::Value;

/// Column widths of the backing tables.
const CUSTOMER_TEXT_MAX: usize = 225;
const PRODUCT_NAME_MAX: usize = 255;

pub struct CustomerSchema;

impl Schema for CustomerSchema {
    type Entity = Customer;
    type Input = NewCustomer;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::dump_only("id", FieldKind::Integer),
        FieldSpec::required("name", FieldKind::Text { max_length: Some(CUSTOMER_TEXT_MAX) }),
        FieldSpec::optional("email", FieldKind::Text { max_length: Some(CUSTOMER_TEXT_MAX) }),
        FieldSpec::optional("address", FieldKind::Text { max_length: Some(CUSTOMER_TEXT_MAX) }),
    ];

    fn build(fields: &Loaded) -> Result<NewCustomer, FieldErrors> {
        Ok(NewCustomer {
            name: fields.text("name")?,
            email: fields.opt_text("email"),
            address: fields.opt_text("address"),
        })
    }

    fn field_value(c: &Customer, field: &str) -> Value {
        match field {
            "id" => Value::from(c.id),
            "name" => Value::from(c.name.as_str()),
            "email" => c.email.as_deref().map_or(Value::Null, Value::from),
            "address" => c.address.as_deref().map_or(Value::Null, Value::from),
            _ => Value::Null,
        }
    }
}

pub struct ProductSchema;

impl Schema for ProductSchema {
    type Entity = Product;
    type Input = NewProduct;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::dump_only("id", FieldKind::Integer),
        FieldSpec::required("product_name", FieldKind::Text { max_length: Some(PRODUCT_NAME_MAX) }),
        FieldSpec::required("price", FieldKind::Float),
    ];

    fn build(fields: &Loaded) -> Result<NewProduct, FieldErrors> {
        Ok(NewProduct {
            product_name: fields.text("product_name")?,
            price: fields.float("price")?,
        })
    }

    fn field_value(p: &Product, field: &str) -> Value {
        match field {
            "id" => Value::from(p.id),
            "product_name" => Value::from(p.product_name.as_str()),
            "price" => Value::from(p.price),
            _ => Value::Null,
        }
    }
}

/// Orders expose the `customer_id` foreign key for both input and output.
pub struct OrderSchema;

impl Schema for OrderSchema {
    type Entity = Order;
    type Input = NewOrder;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::dump_only("id", FieldKind::Integer),
        FieldSpec::required("order_date", FieldKind::Date),
        FieldSpec::required("customer_id", FieldKind::Integer),
    ];

    fn build(fields: &Loaded) -> Result<NewOrder, FieldErrors> {
        Ok(NewOrder {
            order_date: fields.date("order_date")?,
            customer_id: fields.integer("customer_id")?,
        })
    }

    fn field_value(o: &Order, field: &str) -> Value {
        match field {
            "id" => Value::from(o.id),
            "order_date" => Value::from(o.order_date.format(DATE_FORMAT).to_string()),
            "customer_id" => Value::from(o.customer_id),
            _ => Value::Null,
        }
    }
}

/// Order fields plus a nested `products` array.
pub fn dump_order_detail(detail: &OrderDetail) -> Value {
    let mut value = OrderSchema::dump(&detail.order);
    if let Value::Object(map) = &mut value {
        map.insert("products".to_string(), ProductSchema::dump_many(&detail.products));
    }
    value
}
