//! Farm routes, including the delete cascade over owned products.

use axum::{
    extract::{Extension, Form, Path},
    response::{IntoResponse, Redirect, Response},
};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::{debug, error};
use uuid::Uuid;

use super::{parse_id, products};
use crate::farmstand::{
    error::{AppError, AppResult, NOT_ITEM},
    models::{
        farm::{Farm, FarmForm, NewFarm},
        product::ProductForm,
        FormOptions,
    },
    views,
};

/// `GET /farms`
pub async fn list_farms(pool: Extension<PgPool>) -> AppResult<Response> {
    let farms = fetch_farms(&pool).await?;

    Ok(views::farms_index(&farms).into_response())
}

/// `GET /farms/new`
pub async fn new_farm() -> Response {
    views::farm_new().into_response()
}

/// `GET /farms/:id`, the detail page listing the farm's products.
pub async fn show_farm(Path(id): Path<String>, pool: Extension<PgPool>) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let farm = fetch_farm(&pool, id)
        .await?
        .ok_or(AppError::NotFound(NOT_ITEM))?;
    let owned = products::fetch_products_by_ids(&pool, &farm.product_ids).await?;

    Ok(views::farm_detail(&farm, &owned).into_response())
}

/// `POST /farms`
pub async fn create_farm(pool: Extension<PgPool>, Form(form): Form<FarmForm>) -> AppResult<Response> {
    let farm = form.validate()?;
    let id = insert_farm(&pool, &farm).await?;

    debug!(%id, name = %farm.name, "farm created");

    Ok(Redirect::to("/farms").into_response())
}

/// `DELETE /farms/:id` removes the farm, then bulk-deletes its products.
pub async fn delete_farm(Path(id): Path<String>, pool: Extension<PgPool>) -> AppResult<Response> {
    let id = parse_id(&id)?;

    delete_farm_cascade(&pool, id).await?;

    Ok(Redirect::to("/farms").into_response())
}

/// `GET /farms/:id/products/new`
pub async fn new_farm_product(
    Path(id): Path<String>,
    options: Extension<FormOptions>,
    pool: Extension<PgPool>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let farm = fetch_farm(&pool, id)
        .await?
        .ok_or(AppError::NotFound(NOT_ITEM))?;

    Ok(views::farm_product_new(&farm, *options).into_response())
}

/// `POST /farms/:id/products` creates a product and attaches it to the farm.
pub async fn create_farm_product(
    Path(id): Path<String>,
    pool: Extension<PgPool>,
    Form(form): Form<ProductForm>,
) -> AppResult<Response> {
    let farm_id = parse_id(&id)?;
    let product = form.validate()?;

    if fetch_farm(&pool, farm_id).await?.is_none() {
        return Err(AppError::NotFound(NOT_ITEM));
    }

    let product_id = products::insert_product(&pool, &product).await?;
    attach_product(&pool, farm_id, product_id).await?;

    Ok(Redirect::to(&format!("/farms/{farm_id}")).into_response())
}

fn farm_from_row(row: &PgRow) -> Farm {
    Farm {
        id: row.get("id"),
        name: row.get("name"),
        city: row.get("city"),
        email: row.get("email"),
        product_ids: row.get("product_ids"),
    }
}

async fn fetch_farms(pool: &PgPool) -> Result<Vec<Farm>, AppError> {
    let rows = sqlx::query("SELECT id, name, city, email, product_ids FROM farms ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(farm_from_row).collect())
}

async fn fetch_farm(pool: &PgPool, id: Uuid) -> Result<Option<Farm>, AppError> {
    let row = sqlx::query("SELECT id, name, city, email, product_ids FROM farms WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(farm_from_row))
}

async fn insert_farm(pool: &PgPool, farm: &NewFarm) -> Result<Uuid, AppError> {
    let row = sqlx::query(
        r"
        INSERT INTO farms (id, name, city, email, product_ids)
        VALUES ($1, $2, $3, $4, '{}')
        RETURNING id
        ",
    )
    .bind(Uuid::new_v4())
    .bind(&farm.name)
    .bind(farm.city.as_deref())
    .bind(&farm.email)
    .fetch_one(pool)
    .await?;

    Ok(row.get("id"))
}

async fn attach_product(pool: &PgPool, farm_id: Uuid, product_id: Uuid) -> Result<(), AppError> {
    let result =
        sqlx::query("UPDATE farms SET product_ids = array_append(product_ids, $1) WHERE id = $2")
            .bind(product_id)
            .bind(farm_id)
            .execute(pool)
            .await?;

    // The farm may be deleted between the existence check and the attach.
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(NOT_ITEM));
    }

    Ok(())
}

/// Delete a farm, then bulk-delete the products it referenced.
///
/// The cascade fires only after a successful single-row delete and issues one
/// `DELETE ... WHERE id = ANY($1)` for the whole list; a farm without products
/// issues no product delete at all. The two steps share no transaction: if the
/// bulk delete fails, the error is logged and the farm deletion stands.
async fn delete_farm_cascade(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let row = sqlx::query("DELETE FROM farms WHERE id = $1 RETURNING product_ids")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound(NOT_ITEM))?;

    let product_ids: Vec<Uuid> = row.get("product_ids");
    let Some(targets) = cascade_targets(&product_ids) else {
        return Ok(());
    };

    match sqlx::query("DELETE FROM products WHERE id = ANY($1)")
        .bind(targets)
        .execute(pool)
        .await
    {
        Ok(result) => {
            debug!(farm = %id, products = result.rows_affected(), "cascade delete");
        }
        Err(err) => {
            // Orphaned products are accepted over rolling back the farm delete.
            error!(farm = %id, "Cascade delete of products failed: {err}");
        }
    }

    Ok(())
}

/// Owned product ids to bulk-delete, or `None` when the farm owned nothing
/// and no product delete should be issued.
fn cascade_targets(product_ids: &[Uuid]) -> Option<&[Uuid]> {
    if product_ids.is_empty() {
        None
    } else {
        Some(product_ids)
    }
}
