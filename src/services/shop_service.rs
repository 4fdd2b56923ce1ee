use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::validation;
use super::ServiceError;
use crate::database::models::{Shop, ShopChanges};
use crate::database::ResourceStore;
use crate::storage::{AttachmentStore, Upload};

/// Raw shop fields as submitted by a client, before validation.
///
/// Any owner id the client sends is not represented here and never reaches the store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopInput {
    pub owner_name: Option<String>,
    pub shop_name: Option<String>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
    pub is_open: Option<String>,
}

/// Shop operations. Every mutation loads the shop, checks the caller owns it,
/// then writes, keeping the attached image in step with the record.
#[derive(Clone)]
pub struct ShopService {
    store: Arc<dyn ResourceStore>,
    attachments: Arc<dyn AttachmentStore>,
}

impl ShopService {
    pub fn new(store: Arc<dyn ResourceStore>, attachments: Arc<dyn AttachmentStore>) -> Self {
        Self { store, attachments }
    }

    pub async fn list(&self) -> Result<Vec<Shop>, ServiceError> {
        Ok(self.store.list_shops().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Shop, ServiceError> {
        Ok(self.store.get_shop(id).await?)
    }

    #[instrument(skip(self, input, upload), fields(caller = %caller))]
    pub async fn create(&self, caller: Uuid, input: ShopInput, upload: Option<Upload>) -> Result<Shop, ServiceError> {
        let mut new = validation::new_shop(caller, &input)?;

        if let Some(upload) = &upload {
            new.image_url = Some(self.attachments.store(upload).await?);
        }
        let stored_image = new.image_url.clone();

        match self.store.insert_shop(new).await {
            Ok(shop) => {
                info!(shop_id = %shop.id, "Shop created");
                Ok(shop)
            }
            Err(e) => {
                if let Some(reference) = stored_image {
                    self.release(&reference).await;
                }
                Err(e.into())
            }
        }
    }

    /// Partial update. A new upload replaces the image; the previous file is
    /// only removed once the record update has gone through.
    #[instrument(skip(self, input, upload), fields(caller = %caller, shop_id = %id))]
    pub async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        input: ShopInput,
        upload: Option<Upload>,
    ) -> Result<Shop, ServiceError> {
        let current = self.load_owned(caller, id, "update").await?;
        let mut changes = validation::shop_changes(&input)?;

        let new_image = match &upload {
            Some(upload) => Some(self.attachments.store(upload).await?),
            None => None,
        };
        changes.image_url = new_image.clone();

        let updated = match self.store.update_shop(id, changes).await {
            Ok(shop) => shop,
            Err(e) => {
                if let Some(reference) = &new_image {
                    self.release(reference).await;
                }
                return Err(e.into());
            }
        };

        if new_image.is_some() {
            if let Some(old) = current.image_url.as_deref() {
                self.release(old).await;
            }
        }

        info!("Shop updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(caller = %caller, shop_id = %id))]
    pub async fn toggle_status(&self, caller: Uuid, id: Uuid) -> Result<Shop, ServiceError> {
        let current = self.load_owned(caller, id, "update").await?;

        // Read-modify-write without a lock; concurrent toggles can lose an update.
        let changes = ShopChanges { is_open: Some(!current.is_open), ..Default::default() };
        let updated = self.store.update_shop(id, changes).await?;

        info!(is_open = updated.is_open, "Shop status toggled");
        Ok(updated)
    }

    #[instrument(skip(self), fields(caller = %caller, shop_id = %id))]
    pub async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let current = self.load_owned(caller, id, "delete").await?;

        if let Some(reference) = current.image_url.as_deref() {
            self.release(reference).await;
        }
        self.store.delete_shop(id).await?;

        info!("Shop deleted");
        Ok(())
    }

    async fn load_owned(&self, caller: Uuid, id: Uuid, action: &str) -> Result<Shop, ServiceError> {
        let shop = self.store.get_shop(id).await?;
        if shop.owner_id != caller {
            warn!(owner = %shop.owner_id, "Rejected {} of shop by non-owner", action);
            return Err(ServiceError::Forbidden(format!("Not authorized to {} this shop", action)));
        }
        Ok(shop)
    }

    /// Best-effort attachment removal; failures are logged, never returned.
    async fn release(&self, reference: &str) {
        match self.attachments.delete(reference).await {
            Ok(()) => debug!(reference, "Released attachment"),
            Err(e) => warn!(reference, error = %e, "Failed to delete attachment"),
        }
    }
}
