pub mod farms;
pub mod health;
pub mod products;

// common functions for the handlers
use crate::farmstand::error::AppError;
use uuid::Uuid;

/// Parse a path identifier, mapping malformed input to a cast failure.
///
/// # Errors
///
/// Returns `AppError::Cast` with the parser detail when `id` is not a UUID.
pub fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|err| AppError::Cast(err.to_string()))
}
