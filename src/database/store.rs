use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::models::{NewShop, NewUser, Shop, ShopChanges, User, UserChanges};

/// Record kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Shop,
    User,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Shop => write!(f, "Shop"),
            RecordKind::User => write!(f, "User"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: Uuid },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn not_found(kind: RecordKind, id: Uuid) -> Self {
        StoreError::NotFound { kind, id }
    }
}

/// Durable storage for shops and users.
///
/// Lookups by id return `StoreError::NotFound` rather than `Option` so callers
/// can propagate with `?`. Partial updates only overwrite fields present in the
/// changeset. There is no locking across a load and a later update.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// All shops, newest `created_at` first. Full scan, no pagination.
    async fn list_shops(&self) -> Result<Vec<Shop>, StoreError>;
    async fn get_shop(&self, id: Uuid) -> Result<Shop, StoreError>;
    async fn insert_shop(&self, shop: NewShop) -> Result<Shop, StoreError>;
    async fn update_shop(&self, id: Uuid, changes: ShopChanges) -> Result<Shop, StoreError>;
    async fn delete_shop(&self, id: Uuid) -> Result<(), StoreError>;
    /// Removes every shop; returns how many were removed.
    async fn delete_all_shops(&self) -> Result<u64, StoreError>;

    async fn get_user(&self, id: Uuid) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
