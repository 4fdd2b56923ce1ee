//! Explicit input validation, run before anything is persisted.

use serde::Serialize;
use uuid::Uuid;

use super::shop_service::ShopInput;
use super::ServiceError;
use crate::database::models::{NewShop, ShopChanges};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn required(field: &'static str) -> Self {
        Self { field, message: "This field is required".to_string() }
    }

    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Boolean-ish form value. `None` when the text is not recognised.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Trimmed value, or `None` when absent or blank.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Build an insertable shop. The owner always comes from `owner_id`, never the payload.
pub fn new_shop(owner_id: Uuid, input: &ShopInput) -> Result<NewShop, ServiceError> {
    let mut violations = Vec::new();
    let mut required = |field: &'static str, value: &Option<String>| match non_blank(value) {
        Some(v) => v.to_string(),
        None => {
            violations.push(FieldViolation::required(field));
            String::new()
        }
    };

    let owner_name = required("ownerName", &input.owner_name);
    let shop_name = required("shopName", &input.shop_name);
    let location = required("location", &input.location);
    let phone_number = required("phoneNumber", &input.phone_number);

    if !violations.is_empty() {
        return Err(ServiceError::invalid_fields("Shop", violations));
    }

    Ok(NewShop {
        owner_id,
        owner_name,
        shop_name,
        location,
        phone_number,
        is_open: input.is_open.as_deref().and_then(parse_flag).unwrap_or(true),
        image_url: None,
    })
}

/// Changeset for fields present in the payload. Present-but-blank text is rejected.
pub fn shop_changes(input: &ShopInput) -> Result<ShopChanges, ServiceError> {
    let mut violations = Vec::new();
    let mut optional = |field: &'static str, value: &Option<String>| match value {
        None => None,
        Some(_) => match non_blank(value) {
            Some(v) => Some(v.to_string()),
            None => {
                violations.push(FieldViolation::invalid(field, "This field cannot be empty"));
                None
            }
        },
    };

    let owner_name = optional("ownerName", &input.owner_name);
    let shop_name = optional("shopName", &input.shop_name);
    let location = optional("location", &input.location);
    let phone_number = optional("phoneNumber", &input.phone_number);

    let is_open = match input.is_open.as_deref() {
        None => None,
        Some(raw) => {
            let parsed = parse_flag(raw);
            if parsed.is_none() {
                violations.push(FieldViolation::invalid("isOpen", format!("'{}' is not a boolean", raw)));
            }
            parsed
        }
    };

    if !violations.is_empty() {
        return Err(ServiceError::invalid_fields("Shop", violations));
    }

    Ok(ShopChanges {
        owner_name,
        shop_name,
        location,
        phone_number,
        is_open,
        image_url: None,
    })
}
