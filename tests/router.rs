//! Router tests for the validation / cast / not-found / fallback pipeline.
//!
//! These tests never reach a live database: a lazy pool backs the router, and
//! every request either resolves before storage (forms that fail validation,
//! malformed identifiers) or proves that a storage failure is normalized into
//! the generic 500 response.

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use farmstand::farmstand::{app, models::FormOptions};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";

fn router() -> Router {
    // Nothing listens on port 1; any pool acquire fails fast.
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://postgres@127.0.0.1:1/farmstand")
        .expect("lazy pool");

    app(pool, FormOptions::new())
}

async fn body_string(body: Body) -> String {
    let bytes = to_bytes(body, usize::MAX).await.expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, FORM)
        .body(Body::from(form.to_string()))
        .expect("request")
}

#[tokio::test]
async fn health_reports_package_name() {
    let response = router().oneshot(get("/health")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    assert!(body.contains(env!("CARGO_PKG_NAME")));
}

#[tokio::test]
async fn new_product_form_lists_categories() {
    let response = router()
        .oneshot(get("/products/new"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    for category in ["fruit", "snack", "drink", "meat"] {
        assert!(body.contains(&format!("<option value=\"{category}\"")));
    }
}

#[tokio::test]
async fn new_farm_form_renders() {
    let response = router().oneshot(get("/farms/new")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    assert!(body.contains("action=\"/farms\""));
}

#[tokio::test]
async fn malformed_product_id_is_a_cast_failure() {
    let response = router()
        .oneshot(get("/products/not-a-uuid"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response.into_body()).await;
    assert!(body.starts_with("Cast Failed... "));
}

#[tokio::test]
async fn malformed_farm_id_is_a_cast_failure() {
    let response = router()
        .oneshot(get("/farms/not-a-uuid"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response.into_body()).await;
    assert!(body.starts_with("Cast Failed... "));
}

#[tokio::test]
async fn negative_price_is_a_validation_failure() {
    let response = router()
        .oneshot(post("/products", "name=milk&price=-1"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response.into_body()).await;
    assert_eq!(
        body,
        "Validation Failed... price must be greater than or equal to 0"
    );
}

#[tokio::test]
async fn unknown_category_is_a_validation_failure() {
    let response = router()
        .oneshot(post("/products", "name=milk&price=500&category=vegetable"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response.into_body()).await;
    assert!(body.starts_with("Validation Failed... "));
    assert!(body.contains("category"));
}

#[tokio::test]
async fn farm_without_email_is_a_validation_failure() {
    let response = router()
        .oneshot(post("/farms", "name=Green+Acres"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response.into_body()).await;
    assert_eq!(body, "Validation Failed... Email required");
}

#[tokio::test]
async fn method_override_routes_to_delete() {
    // Without the override a POST to /products/:id has no route; the cast
    // failure proves the request reached the delete handler.
    let response = router()
        .oneshot(post("/products/not-a-uuid?_method=DELETE", ""))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response.into_body()).await;
    assert!(body.starts_with("Cast Failed... "));
}

#[tokio::test]
async fn plain_post_to_product_detail_is_not_routed() {
    let response = router()
        .oneshot(post("/products/not-a-uuid", ""))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn update_validates_before_storage() {
    let response = router()
        .oneshot(post(
            "/products/00000000-0000-0000-0000-000000000000?_method=PUT",
            "price=abc",
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response.into_body()).await;
    assert_eq!(body, "Validation Failed... price `abc` is not a number");
}

#[tokio::test]
async fn storage_failure_is_normalized_to_500() {
    let response = router().oneshot(get("/products")).await.expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response.into_body()).await;
    assert_eq!(body, "Something is wrong");
}
