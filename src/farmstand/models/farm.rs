//! Farm records and their form-level validation.

use crate::farmstand::error::AppError;
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

/// A persisted farm; `product_ids` references the products it owns.
#[derive(Debug, Clone)]
pub struct Farm {
    pub id: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub email: String,
    pub product_ids: Vec<Uuid>,
}

/// A validated farm ready to insert.
#[derive(Debug, Clone)]
pub struct NewFarm {
    pub name: String,
    pub city: Option<String>,
    pub email: String,
}

/// Raw form payload for farm creation.
#[derive(Debug, Default, Deserialize)]
pub struct FarmForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
}

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

impl FarmForm {
    /// Validate all fields for insert.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` carrying one message per violated field.
    pub fn validate(&self) -> Result<NewFarm, AppError> {
        let mut messages = Vec::new();

        let name = match self.name.as_deref().map(str::trim) {
            None | Some("") => {
                messages.push("Farm must have a name!".to_string());
                String::new()
            }
            Some(name) => name.to_string(),
        };

        let email = match self.email.as_deref().map(str::trim) {
            None | Some("") => {
                messages.push("Email required".to_string());
                String::new()
            }
            Some(email) if !valid_email(email) => {
                messages.push(format!("`{email}` is not a valid email address"));
                String::new()
            }
            Some(email) => email.to_string(),
        };

        let city = match self.city.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(city) => Some(city.to_string()),
        };

        if messages.is_empty() {
            Ok(NewFarm { name, city, email })
        } else {
            Err(AppError::Validation(messages))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(valid_email("farmer@example.com"));
        assert!(!valid_email("farmer"));
        assert!(!valid_email("farmer@example"));
        assert!(!valid_email("far mer@example.com"));
    }

    #[test]
    fn test_validate_accepts_optional_city() {
        let farm = FarmForm {
            name: Some("Green Acres".to_string()),
            city: Some("".to_string()),
            email: Some("green@acres.farm".to_string()),
        }
        .validate()
        .unwrap();

        assert_eq!(farm.name, "Green Acres");
        assert_eq!(farm.city, None);
        assert_eq!(farm.email, "green@acres.farm");
    }

    #[test]
    fn test_validate_requires_name_and_email() {
        let err = FarmForm::default().validate().unwrap_err();

        match err {
            AppError::Validation(messages) => {
                assert_eq!(
                    messages,
                    vec!["Farm must have a name!".to_string(), "Email required".to_string()]
                );
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let err = FarmForm {
            name: Some("Green Acres".to_string()),
            city: None,
            email: Some("not-an-address".to_string()),
        }
        .validate()
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
