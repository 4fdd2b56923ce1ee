use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::ShopInput;
use crate::storage::Upload;

/// Multipart part that carries the shop image.
pub const IMAGE_FIELD: &str = "image";

/// Shop fields plus an optional image, from a JSON, urlencoded or multipart body.
///
/// The image is checked against the upload rules here, so a rejected file
/// never reaches the shop service.
#[derive(Debug, Default)]
pub struct ShopForm {
    pub input: ShopInput,
    pub image: Option<Upload>,
}

#[derive(Clone, Copy, PartialEq)]
enum BodyKind {
    Multipart,
    UrlEncoded,
    Json,
}

fn body_kind(request: &Request) -> BodyKind {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        BodyKind::Multipart
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        BodyKind::UrlEncoded
    } else {
        BodyKind::Json
    }
}

#[async_trait]
impl FromRequest<AppState> for ShopForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        match body_kind(&req) {
            BodyKind::Multipart => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                from_multipart(multipart, state.storage.max_upload_bytes).await
            }
            BodyKind::UrlEncoded => {
                let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                Ok(Self {
                    input: input_from(|name| fields.get(name).cloned()),
                    image: None,
                })
            }
            BodyKind::Json => {
                let body = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                if body.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Self::default());
                }
                let fields: Map<String, Value> = serde_json::from_slice(&body)
                    .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))?;
                Ok(Self {
                    input: input_from(|name| fields.get(name).and_then(json_text)),
                    image: None,
                })
            }
        }
    }
}

async fn from_multipart(mut multipart: Multipart, max_upload_bytes: usize) -> Result<ShopForm, ApiError> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let file_name = field.file_name().filter(|n| !n.is_empty()).map(str::to_string);
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;

            // An empty file input submits a nameless, empty part.
            if bytes.is_empty() && file_name.is_none() {
                continue;
            }

            let upload = Upload {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            };
            upload.validate(max_upload_bytes)?;
            image = Some(upload);
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            fields.insert(name, text);
        }
    }

    Ok(ShopForm {
        input: input_from(|name| fields.get(name).cloned()),
        image,
    })
}

/// Pick the shop fields by their wire names. Anything else, `ownerId` included, is dropped.
fn input_from(mut field: impl FnMut(&str) -> Option<String>) -> ShopInput {
    ShopInput {
        owner_name: field("ownerName"),
        shop_name: field("shopName"),
        location: field("location"),
        phone_number: field("phoneNumber"),
        is_open: field("isOpen"),
    }
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
