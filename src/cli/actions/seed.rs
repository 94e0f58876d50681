use crate::cli::actions::Action;
use crate::farmstand::{
    models::product::{Category, NewProduct},
    schema,
};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use uuid::Uuid;

/// Handle the seed action: bootstrap the schema and load the sample catalog.
pub async fn handle(action: Action) -> Result<()> {
    if let Action::Seed { dsn } = action {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&dsn)
            .await
            .context("Failed to connect to database")?;

        schema::init(&pool)
            .await
            .context("Failed to bootstrap schema")?;

        for product in sample_products() {
            sqlx::query(
                r"
                INSERT INTO products (id, name, price, category, on_sale, qty)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(Uuid::new_v4())
            .bind(&product.name)
            .bind(product.price)
            .bind(product.category.map(|c| c.as_str()))
            .bind(product.on_sale)
            .bind(product.qty)
            .execute(&pool)
            .await
            .with_context(|| format!("Failed to seed product {}", product.name))?;
        }

        info!("Seeded {} sample products", sample_products().len());
    }

    Ok(())
}

fn sample_products() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "beef".to_string(),
            price: 2000.0,
            category: Some(Category::Meat),
            on_sale: false,
            qty: 2,
        },
        NewProduct {
            name: "milk".to_string(),
            price: 500.0,
            category: Some(Category::Drink),
            on_sale: true,
            qty: 5,
        },
        NewProduct {
            name: "apple".to_string(),
            price: 1200.0,
            category: Some(Category::Fruit),
            on_sale: false,
            qty: 7,
        },
        NewProduct {
            name: "chocolate".to_string(),
            price: 700.0,
            category: Some(Category::Snack),
            on_sale: true,
            qty: 3,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_products_are_valid() {
        let products = sample_products();
        assert_eq!(products.len(), 4);

        for product in products {
            assert!(!product.name.is_empty());
            assert!(product.price >= 0.0);
            assert!(product.qty >= 0);
            assert!(product.category.is_some());
        }
    }
}
