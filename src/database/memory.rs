use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{NewShop, NewUser, Shop, ShopChanges, User, UserChanges};
use super::store::{RecordKind, ResourceStore, StoreError};

/// In-process store with the same semantics as the Postgres one.
///
/// Each shop carries an insertion sequence so listings stay newest-first
/// even when two inserts land on the same timestamp.
#[derive(Default)]
pub struct MemoryStore {
    shops: RwLock<HashMap<Uuid, (u64, Shop)>>,
    users: RwLock<HashMap<Uuid, User>>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn list_shops(&self) -> Result<Vec<Shop>, StoreError> {
        let shops = self.shops.read().await;
        let mut rows: Vec<&(u64, Shop)> = shops.values().collect();
        rows.sort_by(|(sa, a), (sb, b)| b.created_at.cmp(&a.created_at).then(sb.cmp(sa)));
        Ok(rows.into_iter().map(|(_, shop)| shop.clone()).collect())
    }

    async fn get_shop(&self, id: Uuid) -> Result<Shop, StoreError> {
        let shops = self.shops.read().await;
        shops
            .get(&id)
            .map(|(_, shop)| shop.clone())
            .ok_or_else(|| StoreError::not_found(RecordKind::Shop, id))
    }

    async fn insert_shop(&self, new: NewShop) -> Result<Shop, StoreError> {
        let shop = Shop {
            id: Uuid::new_v4(),
            owner_id: new.owner_id,
            owner_name: new.owner_name,
            shop_name: new.shop_name,
            location: new.location,
            phone_number: new.phone_number,
            is_open: new.is_open,
            image_url: new.image_url,
            created_at: Utc::now(),
        };
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        self.shops.write().await.insert(shop.id, (seq, shop.clone()));
        Ok(shop)
    }

    async fn update_shop(&self, id: Uuid, changes: ShopChanges) -> Result<Shop, StoreError> {
        let mut shops = self.shops.write().await;
        let (_, shop) = shops
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Shop, id))?;
        changes.apply_to(shop);
        Ok(shop.clone())
    }

    async fn delete_shop(&self, id: Uuid) -> Result<(), StoreError> {
        match self.shops.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(RecordKind::Shop, id)),
        }
    }

    async fn delete_all_shops(&self) -> Result<u64, StoreError> {
        let mut shops = self.shops.write().await;
        let removed = shops.len() as u64;
        shops.clear();
        Ok(removed)
    }

    async fn get_user(&self, id: Uuid) -> Result<User, StoreError> {
        let users = self.users.read().await;
        users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(RecordKind::User, id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, StoreError> {
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            password_hash: new.password_hash,
            created_at: Utc::now(),
        };
        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::User, id))?;
        changes.apply_to(user);
        Ok(user.clone())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
