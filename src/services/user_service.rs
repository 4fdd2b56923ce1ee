use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::validation::non_blank;
use super::ServiceError;
use crate::auth::{PasswordError, PasswordHasher};
use crate::database::models::{UserChanges, UserProfile};
use crate::database::ResourceStore;

/// Profile update payload. Blank values count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn ResourceStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(store: Arc<dyn ResourceStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    pub async fn profile(&self, id: Uuid) -> Result<UserProfile, ServiceError> {
        Ok(self.store.get_user(id).await?.into())
    }

    /// Update a user's own profile, optionally changing the password.
    ///
    /// A password change needs `current_password` to verify against the stored
    /// digest before `new_password` is hashed and saved.
    #[instrument(skip(self, input), fields(caller = %caller, user_id = %id))]
    pub async fn update(&self, caller: Uuid, id: Uuid, input: UserUpdate) -> Result<(), ServiceError> {
        let user = self.store.get_user(id).await?;
        if user.id != caller {
            warn!("Rejected profile update by another user");
            return Err(ServiceError::Forbidden("Not authorized to update this user".to_string()));
        }

        let mut changes = UserChanges {
            name: non_blank(&input.name).map(str::to_string),
            email: non_blank(&input.email).map(str::to_string),
            phone: non_blank(&input.phone).map(str::to_string),
            password_hash: None,
        };

        if let Some(new_password) = input.new_password.filter(|p| !p.is_empty()) {
            let current = input
                .current_password
                .filter(|p| !p.is_empty())
                .ok_or_else(|| ServiceError::validation("Current password is required to change password"))?;

            if !self.verify(current, user.password_hash).await? {
                warn!("Password change rejected: current password mismatch");
                return Err(ServiceError::validation("Current password is incorrect"));
            }
            changes.password_hash = Some(self.hash(new_password).await?);
        }

        let password_changed = changes.password_hash.is_some();
        self.store.update_user(id, changes).await?;

        info!(password_changed, "User details updated");
        Ok(())
    }

    // Argon2 runs on the blocking pool.
    async fn verify(&self, plaintext: String, digest: String) -> Result<bool, ServiceError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest))
            .await
            .map_err(|e| PasswordError::Hash(e.to_string()))?
            .map_err(ServiceError::from)
    }

    async fn hash(&self, plaintext: String) -> Result<String, ServiceError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| PasswordError::Hash(e.to_string()))?
            .map_err(ServiceError::from)
    }
}
