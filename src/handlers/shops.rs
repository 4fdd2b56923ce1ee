use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use super::form::ShopForm;
use super::parse_id;
use crate::app::AppState;
use crate::database::models::Shop;
use crate::database::RecordKind;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /shops - every shop, newest first
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Shop>>, ApiError> {
    Ok(Json(state.shops.list().await?))
}

/// GET /shops/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Shop>, ApiError> {
    let id = parse_id(&id, RecordKind::Shop)?;
    Ok(Json(state.shops.get(id).await?))
}

/// POST /shops - the caller becomes the owner, whatever the body says
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    form: ShopForm,
) -> Result<(StatusCode, Json<Shop>), ApiError> {
    let shop = state.shops.create(caller.user_id, form.input, form.image).await?;
    Ok((StatusCode::CREATED, Json(shop)))
}

/// PUT /shops/:id - partial update, optionally replacing the image
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    form: ShopForm,
) -> Result<Json<Shop>, ApiError> {
    let id = parse_id(&id, RecordKind::Shop)?;
    let shop = state.shops.update(caller.user_id, id, form.input, form.image).await?;
    Ok(Json(shop))
}

/// DELETE /shops/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, RecordKind::Shop)?;
    state.shops.delete(caller.user_id, id).await?;
    Ok(Json(json!({ "message": "Shop deleted successfully" })))
}

/// PATCH /shops/:id/toggle-status
pub async fn toggle_status(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Shop>, ApiError> {
    let id = parse_id(&id, RecordKind::Shop)?;
    Ok(Json(state.shops.toggle_status(caller.user_id, id).await?))
}
