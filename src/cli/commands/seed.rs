use anyhow::Context;
use clap::Args;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use super::connect;
use crate::auth::{Argon2Hasher, PasswordHasher};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::models::{NewShop, NewUser, User, UserChanges};
use crate::config::config;
use crate::database::{PgStore, ResourceStore};
use crate::storage::{AttachmentStore, DiskAttachmentStore};

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[arg(long, default_value = "owner@example.com", help = "Email of the demo owner account")]
    pub owner_email: String,

    #[arg(long, default_value = "password123", help = "Password for the demo owner account")]
    pub owner_password: String,
}

struct DemoShop {
    owner_name: &'static str,
    shop_name: &'static str,
    location: &'static str,
    phone_number: &'static str,
    is_open: bool,
    image_url: &'static str,
}

const DEMO_SHOPS: &[DemoShop] = &[
    DemoShop {
        owner_name: "John Smith",
        shop_name: "Fresh Groceries",
        location: "123 Main Street, Downtown",
        phone_number: "+1 234-567-8901",
        is_open: true,
        image_url: "https://images.pexels.com/photos/1367242/pexels-photo-1367242.jpeg",
    },
    DemoShop {
        owner_name: "Sarah Johnson",
        shop_name: "Tech Gadgets",
        location: "456 Electronics Avenue",
        phone_number: "+1 234-567-8902",
        is_open: false,
        image_url: "https://images.pexels.com/photos/1029757/pexels-photo-1029757.jpeg",
    },
    DemoShop {
        owner_name: "Mike Wilson",
        shop_name: "Coffee Corner",
        location: "789 Brew Street",
        phone_number: "+1 234-567-8903",
        is_open: true,
        image_url: "https://images.pexels.com/photos/1855214/pexels-photo-1855214.jpeg",
    },
    DemoShop {
        owner_name: "Emma Davis",
        shop_name: "Fashion Boutique",
        location: "321 Style Street",
        phone_number: "+1 234-567-8904",
        is_open: true,
        image_url: "https://images.pexels.com/photos/1884584/pexels-photo-1884584.jpeg",
    },
    DemoShop {
        owner_name: "David Brown",
        shop_name: "Book Haven",
        location: "654 Reading Road",
        phone_number: "+1 234-567-8905",
        is_open: true,
        image_url: "https://images.pexels.com/photos/1370295/pexels-photo-1370295.jpeg",
    },
];

#[derive(Debug)]
pub struct SeedReport {
    pub owner: User,
    pub removed: u64,
    pub inserted: usize,
}

pub async fn handle(args: SeedArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = PgStore::new(connect().await?);
    let storage = &config().storage;
    let attachments = DiskAttachmentStore::new(&storage.uploads_dir, storage.public_prefix.as_str());
    let report = seed_demo(&store, &attachments, Arc::new(Argon2Hasher), &args).await?;

    output_success(
        output_format,
        &format!("Seeded {} shops for {}", report.inserted, report.owner.email),
        Some(json!({
            "owner_id": report.owner.id,
            "removed": report.removed,
            "inserted": report.inserted
        })),
    )
}

/// Clear every shop along with its uploaded image, upsert the demo owner and
/// insert the demo shops under it.
pub async fn seed_demo(
    store: &dyn ResourceStore,
    attachments: &dyn AttachmentStore,
    hasher: Arc<dyn PasswordHasher>,
    args: &SeedArgs,
) -> anyhow::Result<SeedReport> {
    let password = args.owner_password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .context("password hashing task failed")??;

    let owner = match store.find_user_by_email(&args.owner_email).await? {
        Some(existing) => {
            let changes = UserChanges {
                password_hash: Some(password_hash),
                ..Default::default()
            };
            store.update_user(existing.id, changes).await?
        }
        None => {
            store
                .insert_user(NewUser {
                    name: "Demo Owner".to_string(),
                    email: args.owner_email.clone(),
                    phone: None,
                    password_hash,
                })
                .await?
        }
    };

    for shop in store.list_shops().await? {
        if let Some(reference) = shop.image_url.as_deref() {
            if let Err(e) = attachments.delete(reference).await {
                warn!(reference, error = %e, "Failed to delete attachment");
            }
        }
    }
    let removed = store.delete_all_shops().await?;
    info!(removed, "Cleared existing shops");

    for demo in DEMO_SHOPS {
        store
            .insert_shop(NewShop {
                owner_id: owner.id,
                owner_name: demo.owner_name.to_string(),
                shop_name: demo.shop_name.to_string(),
                location: demo.location.to_string(),
                phone_number: demo.phone_number.to_string(),
                is_open: demo.is_open,
                image_url: Some(demo.image_url.to_string()),
            })
            .await?;
    }
    info!(inserted = DEMO_SHOPS.len(), owner_id = %owner.id, "Inserted demo shops");

    Ok(SeedReport {
        owner,
        removed,
        inserted: DEMO_SHOPS.len(),
    })
}
