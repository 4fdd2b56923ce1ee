//! Ownership-gated mutation of shops and users.

pub mod shop_service;
pub mod user_service;
pub mod validation;

use thiserror::Error;

use crate::auth::PasswordError;
use crate::database::{RecordKind, StoreError};
use crate::storage::AttachmentError;

pub use shop_service::{ShopInput, ShopService};
pub use user_service::{UserService, UserUpdate};
pub use validation::FieldViolation;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation { message: String, fields: Vec<FieldViolation> },

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(RecordKind),

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("attachment error: {0}")]
    Attachment(#[from] AttachmentError),

    #[error("password error: {0}")]
    Password(#[from] PasswordError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation { message: message.into(), fields: Vec::new() }
    }

    pub fn invalid_fields(subject: &str, fields: Vec<FieldViolation>) -> Self {
        let names: Vec<&str> = fields.iter().map(|f| f.field).collect();
        ServiceError::Validation {
            message: format!("{} validation failed: {}", subject, names.join(", ")),
            fields,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, .. } => ServiceError::NotFound(kind),
            other => ServiceError::Store(other),
        }
    }
}
