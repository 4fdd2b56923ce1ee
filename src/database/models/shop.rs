use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One storefront listing. `owner_id` and `created_at` are fixed at insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub shop_name: String,
    pub location: String,
    pub phone_number: String,
    pub is_open: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewShop {
    pub owner_id: Uuid,
    pub owner_name: String,
    pub shop_name: String,
    pub location: String,
    pub phone_number: String,
    pub is_open: bool,
    pub image_url: Option<String>,
}

/// Fieldset for a partial update. `None` keeps the stored value.
/// Ownership cannot be changed through it.
#[derive(Debug, Clone, Default)]
pub struct ShopChanges {
    pub owner_name: Option<String>,
    pub shop_name: Option<String>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
    pub is_open: Option<bool>,
    pub image_url: Option<String>,
}

impl ShopChanges {
    /// Merge into an existing record, field by field.
    pub fn apply_to(self, shop: &mut Shop) {
        if let Some(v) = self.owner_name {
            shop.owner_name = v;
        }
        if let Some(v) = self.shop_name {
            shop.shop_name = v;
        }
        if let Some(v) = self.location {
            shop.location = v;
        }
        if let Some(v) = self.phone_number {
            shop.phone_number = v;
        }
        if let Some(v) = self.is_open {
            shop.is_open = v;
        }
        if let Some(v) = self.image_url {
            shop.image_url = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Shop {
        Shop {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            owner_name: "A".into(),
            shop_name: "B".into(),
            location: "C".into(),
            phone_number: "D".into(),
            is_open: true,
            image_url: Some("/uploads/a.png".into()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut shop = sample();
        let before = shop.clone();
        ShopChanges { shop_name: Some("X".into()), ..Default::default() }.apply_to(&mut shop);

        assert_eq!(shop.shop_name, "X");
        assert_eq!(shop.location, before.location);
        assert_eq!(shop.phone_number, before.phone_number);
        assert_eq!(shop.is_open, before.is_open);
        assert_eq!(shop.image_url, before.image_url);
        assert_eq!(shop.owner_id, before.owner_id);
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("shopName").is_some());
        assert!(value.get("ownerId").is_some());
        assert!(value.get("isOpen").is_some());
        assert!(value.get("imageUrl").is_some());
        assert!(value.get("createdAt").is_some());
    }
}
