//! Create the schema and tables on startup. Every statement is idempotent
//! (`IF NOT EXISTS`), so running against an existing database is a no-op.

use crate::error::AppError;
use crate::store::{qualified_table, quoted};
use sqlx::PgPool;

struct ColumnDef {
    name: &'static str,
    ty: &'static str,
    nullable: bool,
    /// Referenced table (same schema), column `id`.
    references: Option<&'static str>,
}

struct TableDef {
    name: &'static str,
    columns: &'static [ColumnDef],
    primary_key: &'static [&'static str],
}

const fn col(name: &'static str, ty: &'static str, nullable: bool) -> ColumnDef {
    ColumnDef { name, ty, nullable, references: None }
}

const fn fk(name: &'static str, table: &'static str) -> ColumnDef {
    ColumnDef { name, ty: "BIGINT", nullable: false, references: Some(table) }
}

/// Listed in dependency order.
const TABLES: &[TableDef] = &[
    TableDef {
        name: "customers",
        columns: &[
            col("id", "BIGSERIAL", false),
            col("name", "VARCHAR(225)", false),
            col("email", "VARCHAR(225)", true),
            col("address", "VARCHAR(225)", true),
        ],
        primary_key: &["id"],
    },
    TableDef {
        name: "orders",
        columns: &[
            col("id", "BIGSERIAL", false),
            col("order_date", "DATE", false),
            fk("customer_id", "customers"),
        ],
        primary_key: &["id"],
    },
    TableDef {
        name: "products",
        columns: &[
            col("id", "BIGSERIAL", false),
            col("product_name", "VARCHAR(255)", false),
            col("price", "DOUBLE PRECISION", false),
        ],
        primary_key: &["id"],
    },
    // The composite key is what keeps an order/product pair unique.
    TableDef {
        name: "order_products",
        columns: &[fk("order_id", "orders"), fk("product_id", "products")],
        primary_key: &["order_id", "product_id"],
    },
];

fn create_table_sql(schema: &str, table: &TableDef) -> String {
    let mut defs: Vec<String> = table
        .columns
        .iter()
        .map(|c| {
            let mut def = format!("{} {}", quoted(c.name), c.ty);
            if !c.nullable {
                def.push_str(" NOT NULL");
            }
            if let Some(target) = c.references {
                def.push_str(&format!(" REFERENCES {} ({})", qualified_table(schema, target), quoted("id")));
            }
            def
        })
        .collect();
    let pk: Vec<String> = table.primary_key.iter().map(|c| quoted(c)).collect();
    defs.push(format!("PRIMARY KEY ({})", pk.join(", ")));
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        qualified_table(schema, table.name),
        defs.join(",\n  ")
    )
}

/// The full list of statements, in execution order.
pub fn migration_statements(schema: &str) -> Vec<String> {
    let mut out = vec![format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema))];
    out.extend(TABLES.iter().map(|t| create_table_sql(schema, t)));
    out.push(format!(
        "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
        quoted("orders_customer_id_idx"),
        qualified_table(schema, "orders"),
        quoted("customer_id")
    ));
    out
}

pub async fn apply_migrations(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    for sql in migration_statements(schema) {
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(&sql).execute(pool).await?;
    }
    tracing::info!(schema, tables = TABLES.len(), "schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn association_table_has_composite_primary_key() {
        let stmts = migration_statements("shop");
        let link = stmts.iter().find(|s| s.contains("\"shop\".\"order_products\" (")).unwrap();
        assert!(link.contains("PRIMARY KEY (\"order_id\", \"product_id\")"));
        assert!(link.contains("\"order_id\" BIGINT NOT NULL REFERENCES \"shop\".\"orders\" (\"id\")"));
    }

    #[test]
    fn schema_is_created_before_tables() {
        let stmts = migration_statements("shop");
        assert_eq!(stmts[0], "CREATE SCHEMA IF NOT EXISTS \"shop\"");
        let pos = |name: &str| stmts.iter().position(|s| s.contains(&format!("TABLE IF NOT EXISTS \"shop\".\"{}\"", name)));
        assert!(pos("customers") < pos("orders"));
        assert!(pos("orders") < pos("order_products"));
        assert!(pos("products") < pos("order_products"));
    }

    #[test]
    fn optional_columns_are_nullable() {
        let stmts = migration_statements("shop");
        let customers = &stmts[1];
        assert!(customers.contains("\"name\" VARCHAR(225) NOT NULL"));
        assert!(customers.contains("\"email\" VARCHAR(225),"));
    }
}
