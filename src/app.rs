use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::auth::PasswordHasher;
use crate::config::{SecurityConfig, StorageConfig};
use crate::database::ResourceStore;
use crate::handlers::{shops, system, users};
use crate::middleware::jwt_auth_middleware;
use crate::services::{ShopService, UserService};
use crate::storage::AttachmentStore;

/// Headroom for multipart framing and text fields on top of the file ceiling.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Shared per-request state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub shops: ShopService,
    pub users: UserService,
    pub store: Arc<dyn ResourceStore>,
    pub jwt_secret: Arc<str>,
    pub storage: StorageConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ResourceStore>,
        attachments: Arc<dyn AttachmentStore>,
        hasher: Arc<dyn PasswordHasher>,
        jwt_secret: impl Into<Arc<str>>,
        storage: StorageConfig,
    ) -> Self {
        Self {
            shops: ShopService::new(store.clone(), attachments),
            users: UserService::new(store.clone(), hasher),
            store,
            jwt_secret: jwt_secret.into(),
            storage,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let auth = middleware::from_fn_with_state(state.clone(), jwt_auth_middleware);

    let public = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/shops", get(shops::list))
        .route("/shops/:id", get(shops::show));

    let protected = Router::new()
        .route("/shops", post(shops::create))
        .route("/shops/:id", put(shops::update).delete(shops::delete))
        .route("/shops/:id/toggle-status", patch(shops::toggle_status))
        .route("/users/:id", get(users::show).put(users::update))
        .route_layer(auth);

    let body_limit = state.storage.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .merge(public)
        .merge(protected)
        .nest_service(&state.storage.public_prefix, ServeDir::new(&state.storage.uploads_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS per the security config; permissive when no origins are listed.
pub fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    if origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
