use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use super::parse_id;
use crate::app::AppState;
use crate::database::models::UserProfile;
use crate::database::RecordKind;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::UserUpdate;

/// GET /users/:id - any authenticated caller may read a profile
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<UserProfile>, ApiError> {
    let id = parse_id(&id, RecordKind::User)?;
    Ok(Json(state.users.profile(id).await?))
}

/// PUT /users/:id - self-service profile and password update
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, RecordKind::User)?;
    let Json(input) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    state.users.update(caller.user_id, id, input).await?;
    Ok(Json(json!({ "message": "User details updated successfully" })))
}
