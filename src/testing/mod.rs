use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use crate::database::models::{NewShop, NewUser, Shop, ShopChanges, User, UserChanges};
use crate::database::{MemoryStore, ResourceStore, StoreError};

/// Memory store whose shop writes and health check can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    fail_writes: AtomicBool,
    fail_health: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    pub fn fail_health(&self, on: bool) {
        self.fail_health.store(on, Ordering::SeqCst);
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceStore for FlakyStore {
    async fn list_shops(&self) -> Result<Vec<Shop>, StoreError> {
        self.inner.list_shops().await
    }

    async fn get_shop(&self, id: Uuid) -> Result<Shop, StoreError> {
        self.inner.get_shop(id).await
    }

    async fn insert_shop(&self, shop: NewShop) -> Result<Shop, StoreError> {
        self.check(&self.fail_writes)?;
        self.inner.insert_shop(shop).await
    }

    async fn update_shop(&self, id: Uuid, changes: ShopChanges) -> Result<Shop, StoreError> {
        self.check(&self.fail_writes)?;
        self.inner.update_shop(id, changes).await
    }

    async fn delete_shop(&self, id: Uuid) -> Result<(), StoreError> {
        self.check(&self.fail_writes)?;
        self.inner.delete_shop(id).await
    }

    async fn delete_all_shops(&self) -> Result<u64, StoreError> {
        self.check(&self.fail_writes)?;
        self.inner.delete_all_shops().await
    }

    async fn get_user(&self, id: Uuid) -> Result<User, StoreError> {
        self.inner.get_user(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.inner.find_user_by_email(email).await
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.inner.insert_user(user).await
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, StoreError> {
        self.inner.update_user(id, changes).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check(&self.fail_health)
    }
}
