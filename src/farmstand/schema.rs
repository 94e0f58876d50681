//! Storage bootstrap: create the two catalog tables when they do not exist.

use sqlx::PgPool;

const CREATE_FARMS: &str = r"
    CREATE TABLE IF NOT EXISTS farms (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        city TEXT,
        email TEXT NOT NULL,
        product_ids UUID[] NOT NULL DEFAULT '{}'
    )
";

const CREATE_PRODUCTS: &str = r"
    CREATE TABLE IF NOT EXISTS products (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        price DOUBLE PRECISION NOT NULL,
        category TEXT,
        on_sale BOOLEAN NOT NULL DEFAULT FALSE,
        qty BIGINT NOT NULL DEFAULT 1
    )
";

/// Create the catalog tables.
///
/// # Errors
///
/// Returns the underlying `sqlx` error if a statement fails.
pub async fn init(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_FARMS).execute(pool).await?;
    sqlx::query(CREATE_PRODUCTS).execute(pool).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keep the bootstrap statements aligned with the record constraints
    // without requiring a live database.
    fn canonicalize_sql(sql: &str) -> String {
        sql.chars()
            .filter(|ch| !ch.is_whitespace())
            .map(|ch| ch.to_ascii_lowercase())
            .collect()
    }

    #[test]
    fn test_products_defaults() {
        let canonical = canonicalize_sql(CREATE_PRODUCTS);
        assert!(canonical.contains("on_salebooleannotnulldefaultfalse"));
        assert!(canonical.contains("qtybigintnotnulldefault1"));
    }

    #[test]
    fn test_farms_reference_column() {
        let canonical = canonicalize_sql(CREATE_FARMS);
        assert!(canonical.contains("product_idsuuid[]notnulldefault'{}'"));
        assert!(canonical.contains("emailtextnotnull"));
    }
}
