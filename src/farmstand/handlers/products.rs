//! Product routes.
//!
//! Each handler performs a single storage operation and then renders a page or
//! redirects; every failure funnels through [`AppError`] via `?`.

use axum::{
    extract::{Extension, Form, Path, Query},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use super::parse_id;
use crate::farmstand::{
    error::{AppError, AppResult, NOT_ITEM},
    models::{
        product::{Category, NewProduct, Product, ProductForm, ProductPatch},
        FormOptions,
    },
    views,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// `GET /products` lists all products, or one category when `?category=` is given.
pub async fn list_products(
    Query(params): Query<ListQuery>,
    pool: Extension<PgPool>,
) -> AppResult<Response> {
    match params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|category| !category.is_empty())
    {
        Some(category) => {
            // Stored categories are lowercase; normalize the filter the same way.
            let category = category.to_lowercase();
            let products = fetch_products_by_category(&pool, &category).await?;
            Ok(views::products_index(&products, &category).into_response())
        }
        None => {
            let products = fetch_products(&pool).await?;
            Ok(views::products_index(&products, "All").into_response())
        }
    }
}

/// `GET /products/new`
pub async fn new_product(options: Extension<FormOptions>) -> Response {
    views::product_new(*options).into_response()
}

/// `GET /products/:id`
pub async fn show_product(Path(id): Path<String>, pool: Extension<PgPool>) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let product = fetch_product(&pool, id)
        .await?
        .ok_or(AppError::NotFound(NOT_ITEM))?;

    Ok(views::product_detail(&product).into_response())
}

/// `GET /products/:id/edit`
pub async fn edit_product(
    Path(id): Path<String>,
    options: Extension<FormOptions>,
    pool: Extension<PgPool>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let product = fetch_product(&pool, id)
        .await?
        .ok_or(AppError::NotFound(NOT_ITEM))?;

    Ok(views::product_edit(&product, *options).into_response())
}

/// `POST /products` validates, persists, then redirects to the new detail page.
pub async fn create_product(
    pool: Extension<PgPool>,
    Form(form): Form<ProductForm>,
) -> AppResult<Response> {
    let product = form.validate()?;
    let id = insert_product(&pool, &product).await?;

    debug!(%id, name = %product.name, "product created");

    Ok(Redirect::to(&format!("/products/{id}")).into_response())
}

/// `PUT|PATCH /products/:id` applies a partial update, validated like an insert.
/// A well-formed id that matches no row is a 404, never a silent no-op.
pub async fn update_product(
    Path(id): Path<String>,
    pool: Extension<PgPool>,
    Form(form): Form<ProductForm>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let patch = form.validate_patch()?;

    if !update_product_record(&pool, id, &patch).await? {
        return Err(AppError::NotFound(NOT_ITEM));
    }

    Ok(Redirect::to(&format!("/products/{id}")).into_response())
}

/// `DELETE /products/:id`
pub async fn delete_product(
    Path(id): Path<String>,
    pool: Extension<PgPool>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;

    if !delete_product_record(&pool, id).await? {
        return Err(AppError::NotFound(NOT_ITEM));
    }

    Ok(Redirect::to("/products").into_response())
}

fn product_from_row(row: &PgRow) -> Product {
    Product {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        category: row
            .get::<Option<String>, _>("category")
            .and_then(|category| category.parse::<Category>().ok()),
        on_sale: row.get("on_sale"),
        qty: row.get("qty"),
    }
}

async fn fetch_products(pool: &PgPool) -> Result<Vec<Product>, AppError> {
    let rows = sqlx::query("SELECT id, name, price, category, on_sale, qty FROM products ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(product_from_row).collect())
}

async fn fetch_products_by_category(
    pool: &PgPool,
    category: &str,
) -> Result<Vec<Product>, AppError> {
    let rows = sqlx::query(
        "SELECT id, name, price, category, on_sale, qty FROM products WHERE category = $1 ORDER BY name",
    )
    .bind(category)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(product_from_row).collect())
}

pub(crate) async fn fetch_product(pool: &PgPool, id: Uuid) -> Result<Option<Product>, AppError> {
    let row = sqlx::query("SELECT id, name, price, category, on_sale, qty FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(product_from_row))
}

pub(crate) async fn fetch_products_by_ids(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<Vec<Product>, AppError> {
    let rows = sqlx::query(
        "SELECT id, name, price, category, on_sale, qty FROM products WHERE id = ANY($1) ORDER BY name",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(product_from_row).collect())
}

pub(crate) async fn insert_product(pool: &PgPool, product: &NewProduct) -> Result<Uuid, AppError> {
    let row = sqlx::query(
        r"
        INSERT INTO products (id, name, price, category, on_sale, qty)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        ",
    )
    .bind(Uuid::new_v4())
    .bind(&product.name)
    .bind(product.price)
    .bind(product.category.map(Category::as_str))
    .bind(product.on_sale)
    .bind(product.qty)
    .fetch_one(pool)
    .await?;

    Ok(row.get("id"))
}

// COALESCE cannot write NULL, so the category column takes an explicit
// "was the field submitted" flag and the submitted value, which may be NULL.
async fn update_product_record(
    pool: &PgPool,
    id: Uuid,
    patch: &ProductPatch,
) -> Result<bool, AppError> {
    let row = sqlx::query(
        r"
        UPDATE products
        SET
            name = COALESCE($1, name),
            price = COALESCE($2, price),
            category = CASE WHEN $3 THEN $4 ELSE category END,
            on_sale = COALESCE($5, on_sale),
            qty = COALESCE($6, qty)
        WHERE id = $7
        RETURNING id
        ",
    )
    .bind(patch.name.as_deref())
    .bind(patch.price)
    .bind(patch.category.is_some())
    .bind(patch.category.flatten().map(Category::as_str))
    .bind(patch.on_sale)
    .bind(patch.qty)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

async fn delete_product_record(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
