use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{NewShop, NewUser, Shop, ShopChanges, User, UserChanges};
use super::store::{RecordKind, ResourceStore, StoreError};

const SHOP_COLUMNS: &str =
    "id, owner_id, owner_name, shop_name, location, phone_number, is_open, image_url, created_at";
const USER_COLUMNS: &str = "id, name, email, phone, password_hash, created_at";

/// sqlx-backed store over the `shops` and `users` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceStore for PgStore {
    async fn list_shops(&self) -> Result<Vec<Shop>, StoreError> {
        let sql = format!("SELECT {} FROM shops ORDER BY created_at DESC, seq DESC", SHOP_COLUMNS);
        let shops = sqlx::query_as::<_, Shop>(&sql).fetch_all(&self.pool).await?;
        Ok(shops)
    }

    async fn get_shop(&self, id: Uuid) -> Result<Shop, StoreError> {
        let sql = format!("SELECT {} FROM shops WHERE id = $1", SHOP_COLUMNS);
        sqlx::query_as::<_, Shop>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(RecordKind::Shop, id))
    }

    async fn insert_shop(&self, new: NewShop) -> Result<Shop, StoreError> {
        let sql = format!(
            "INSERT INTO shops (id, owner_id, owner_name, shop_name, location, phone_number, is_open, image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            SHOP_COLUMNS
        );
        let shop = sqlx::query_as::<_, Shop>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.owner_id)
            .bind(new.owner_name)
            .bind(new.shop_name)
            .bind(new.location)
            .bind(new.phone_number)
            .bind(new.is_open)
            .bind(new.image_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(shop)
    }

    async fn update_shop(&self, id: Uuid, changes: ShopChanges) -> Result<Shop, StoreError> {
        // NULL parameters leave the column untouched
        let sql = format!(
            "UPDATE shops SET
                owner_name = COALESCE($2, owner_name),
                shop_name = COALESCE($3, shop_name),
                location = COALESCE($4, location),
                phone_number = COALESCE($5, phone_number),
                is_open = COALESCE($6, is_open),
                image_url = COALESCE($7, image_url)
             WHERE id = $1
             RETURNING {}",
            SHOP_COLUMNS
        );
        sqlx::query_as::<_, Shop>(&sql)
            .bind(id)
            .bind(changes.owner_name)
            .bind(changes.shop_name)
            .bind(changes.location)
            .bind(changes.phone_number)
            .bind(changes.is_open)
            .bind(changes.image_url)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(RecordKind::Shop, id))
    }

    async fn delete_shop(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM shops WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(RecordKind::Shop, id));
        }
        Ok(())
    }

    async fn delete_all_shops(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM shops").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn get_user(&self, id: Uuid) -> Result<User, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(RecordKind::User, id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, phone, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.name)
            .bind(new.email)
            .bind(new.phone)
            .bind(new.password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, StoreError> {
        let sql = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                password_hash = COALESCE($5, password_hash)
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.email)
            .bind(changes.phone)
            .bind(changes.password_hash)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(RecordKind::User, id))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
