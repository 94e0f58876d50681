//! Product records and their form-level validation.
//!
//! HTML forms deliver every field as a raw string, so the form type keeps
//! string fields and `validate`/`validate_patch` own all parsing. Violations
//! are collected per field and surfaced as one `Validation Failed...`
//! response, for updates exactly as for inserts.

use crate::farmstand::error::AppError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fixed category set; values are stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Fruit,
    Snack,
    Drink,
    Meat,
}

impl Category {
    pub const ALL: [Self; 4] = [Self::Fruit, Self::Snack, Self::Drink, Self::Meat];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fruit => "fruit",
            Self::Snack => "snack",
            Self::Drink => "drink",
            Self::Meat => "meat",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "fruit" => Ok(Self::Fruit),
            "snack" => Ok(Self::Snack),
            "drink" => Ok(Self::Drink),
            "meat" => Ok(Self::Meat),
            other => Err(format!("`{other}` is not a valid category")),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted product.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub category: Option<Category>,
    pub on_sale: bool,
    pub qty: i64,
}

/// A validated product ready to insert, defaults applied.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub category: Option<Category>,
    pub on_sale: bool,
    pub qty: i64,
}

/// A validated partial update; `None` leaves the column unchanged.
///
/// `category` is doubly optional: the outer `None` means the field was not
/// submitted, while `Some(None)` means an empty value was submitted and the
/// stored category must be cleared.
#[derive(Debug, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<Option<Category>>,
    pub on_sale: Option<bool>,
    pub qty: Option<i64>,
}

/// Raw form payload for product create and update.
#[derive(Debug, Default, Deserialize)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub on_sale: Option<String>,
    pub qty: Option<String>,
}

impl ProductForm {
    /// Validate all fields for insert, applying defaults for absent ones.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` carrying one message per violated field.
    pub fn validate(&self) -> Result<NewProduct, AppError> {
        let mut messages = Vec::new();

        let name = match required_name(self.name.as_deref()) {
            Ok(name) => name,
            Err(message) => {
                messages.push(message);
                String::new()
            }
        };

        let price = match self.price.as_deref().map(str::trim) {
            None | Some("") => {
                messages.push("price is required".to_string());
                0.0
            }
            Some(raw) => parse_price(raw).unwrap_or_else(|message| {
                messages.push(message);
                0.0
            }),
        };

        let category = parse_category(self.category.as_deref()).unwrap_or_else(|message| {
            messages.push(message);
            None
        });

        let on_sale = match self.on_sale.as_deref() {
            None => false,
            Some(raw) => parse_on_sale(raw).unwrap_or_else(|message| {
                messages.push(message);
                false
            }),
        };

        let qty = match self.qty.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => parse_qty(raw).unwrap_or_else(|message| {
                messages.push(message);
                1
            }),
        };

        if messages.is_empty() {
            Ok(NewProduct {
                name,
                price,
                category,
                on_sale,
                qty,
            })
        } else {
            Err(AppError::Validation(messages))
        }
    }

    /// Validate only the fields that were submitted; absent fields stay unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` carrying one message per violated field.
    pub fn validate_patch(&self) -> Result<ProductPatch, AppError> {
        let mut messages = Vec::new();
        let mut patch = ProductPatch::default();

        if let Some(raw) = self.name.as_deref() {
            match required_name(Some(raw)) {
                Ok(name) => patch.name = Some(name),
                Err(message) => messages.push(message),
            }
        }

        if let Some(raw) = self.price.as_deref().map(str::trim) {
            if !raw.is_empty() {
                match parse_price(raw) {
                    Ok(price) => patch.price = Some(price),
                    Err(message) => messages.push(message),
                }
            }
        }

        // An empty submitted category clears the stored one; an absent field
        // leaves it alone.
        if let Some(raw) = self.category.as_deref() {
            match parse_category(Some(raw)) {
                Ok(category) => patch.category = Some(category),
                Err(message) => messages.push(message),
            }
        }

        if let Some(raw) = self.on_sale.as_deref() {
            match parse_on_sale(raw) {
                Ok(on_sale) => patch.on_sale = Some(on_sale),
                Err(message) => messages.push(message),
            }
        }

        if let Some(raw) = self.qty.as_deref().map(str::trim) {
            if !raw.is_empty() {
                match parse_qty(raw) {
                    Ok(qty) => patch.qty = Some(qty),
                    Err(message) => messages.push(message),
                }
            }
        }

        if messages.is_empty() {
            Ok(patch)
        } else {
            Err(AppError::Validation(messages))
        }
    }
}

fn required_name(raw: Option<&str>) -> Result<String, String> {
    match raw.map(str::trim) {
        None | Some("") => Err("name is required".to_string()),
        Some(name) => Ok(name.to_string()),
    }
}

fn parse_price(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(price) if price >= 0.0 => Ok(price),
        Ok(_) => Err("price must be greater than or equal to 0".to_string()),
        Err(_) => Err(format!("price `{raw}` is not a number")),
    }
}

fn parse_category(raw: Option<&str>) -> Result<Option<Category>, String> {
    match raw.map(str::trim) {
        // An empty select option means "no category".
        None | Some("") => Ok(None),
        Some(value) => Category::from_str(value).map(Some),
    }
}

fn parse_on_sale(raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "on" => Ok(true),
        "false" | "" => Ok(false),
        other => Err(format!("`{other}` is not a valid onSale value")),
    }
}

fn parse_qty(raw: &str) -> Result<i64, String> {
    match raw.parse::<i64>() {
        Ok(qty) if qty >= 0 => Ok(qty),
        Ok(_) => Err("qty must be greater than or equal to 0".to_string()),
        Err(_) => Err(format!("qty `{raw}` is not a number")),
    }
}
