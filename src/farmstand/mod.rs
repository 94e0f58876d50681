//! Router assembly and server startup.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Extension, Router,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use uuid::Uuid;

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod schema;
pub mod views;

use handlers::{farms, health, products};
use models::FormOptions;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "",
};

/// Build the application router.
///
/// The method-override middleware is the outermost layer so HTML-form
/// `?_method=` rewrites happen before routing; the `FormOptions` extension is
/// the one piece of process-wide configuration handlers read.
#[must_use]
pub fn app(pool: PgPool, options: FormOptions) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/farms", get(farms::list_farms).post(farms::create_farm))
        .route("/farms/new", get(farms::new_farm))
        .route(
            "/farms/:id",
            get(farms::show_farm).delete(farms::delete_farm),
        )
        .route("/farms/:id/products/new", get(farms::new_farm_product))
        .route("/farms/:id/products", post(farms::create_farm_product))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/new", get(products::new_product))
        .route(
            "/products/:id",
            get(products::show_product)
                .put(products::update_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route("/products/:id/edit", get(products::edit_product))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::method_override))
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &Request<Body>| {
                        HeaderValue::from_str(Uuid::new_v4().to_string().as_str()).ok()
                    },
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(options))
                .layer(Extension(pool)),
        )
}

/// Connect to storage, bootstrap the schema, and serve.
///
/// A failed initial connection is fatal rather than served degraded.
///
/// # Errors
///
/// Returns an error if the pool cannot connect, the schema bootstrap fails,
/// or the listener cannot bind.
pub async fn new(port: u16, dsn: String) -> Result<()> {
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    schema::init(&pool)
        .await
        .context("Failed to bootstrap schema")?;

    let app = app(pool, FormOptions::new());

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, request_id)
}
