//! Uniform error pipeline for every route handler.
//!
//! Handlers never format their own failure responses: every fallible path
//! returns [`AppError`] through `?`, and the `IntoResponse` impl below is the
//! terminal responder that writes exactly one status code and message body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use tracing::error;

/// Message sent for entities that do not exist.
pub const NOT_ITEM: &str = "Not Item";

/// Fallback body for anything the pipeline does not recognize.
pub const SOMETHING_IS_WRONG: &str = "Something is wrong";

#[derive(Debug)]
pub enum AppError {
    /// A record violated one or more declared field constraints.
    Validation(Vec<String>),
    /// A path identifier could not be parsed into a record id.
    Cast(String),
    /// Explicit not-found raised by a handler, with its declared message.
    NotFound(&'static str),
    /// Storage-layer failure; logged server-side, never leaked to the client.
    Database(sqlx::Error),
}

/// Handler result funneled into the shared error responder.
pub type AppResult<T> = Result<T, AppError>;

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(messages) => {
                write!(f, "Validation Failed... {}", messages.join(", "))
            }
            Self::Cast(detail) => write!(f, "Cast Failed... {detail}"),
            Self::NotFound(message) => write!(f, "{message}"),
            Self::Database(err) => write!(f, "database error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    /// Normalizes every failure into a `(status, message)` pair.
    /// Database detail stays in the server log; the client gets the generic body.
    fn into_response(self) -> Response {
        match self {
            Self::Validation(messages) => (
                StatusCode::BAD_REQUEST,
                format!("Validation Failed... {}", messages.join(", ")),
            )
                .into_response(),
            Self::Cast(detail) => {
                (StatusCode::BAD_REQUEST, format!("Cast Failed... {detail}")).into_response()
            }
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            Self::Database(err) => {
                error!("Database error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, SOMETHING_IS_WRONG).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_validation_response() {
        let err = AppError::Validation(vec![
            "price must be a number greater than or equal to 0".to_string(),
            "name is required".to_string(),
        ]);
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_string(response).await,
            "Validation Failed... price must be a number greater than or equal to 0, name is required"
        );
    }

    #[tokio::test]
    async fn test_cast_response() {
        let err = AppError::Cast("invalid length".to_string());
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, "Cast Failed... invalid length");
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let response = AppError::NotFound(NOT_ITEM).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "Not Item");
    }

    #[tokio::test]
    async fn test_database_response_is_generic() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, SOMETHING_IS_WRONG);
    }

    #[test]
    fn test_from_sqlx_error() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(_)));
    }
}
