#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use shop_api_rust::app::{router, AppState};
use shop_api_rust::auth::{generate_jwt, Argon2Hasher, Claims, PasswordHasher};
use shop_api_rust::config::{StorageConfig, MAX_UPLOAD_BYTES};
use shop_api_rust::database::models::{NewUser, User};
use shop_api_rust::database::{MemoryStore, ResourceStore};
use shop_api_rust::storage::DiskAttachmentStore;

pub const SECRET: &str = "integration-test-secret";
const BOUNDARY: &str = "----shop-api-test-boundary";

/// In-process app over the memory store and a scratch upload directory.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    uploads: TempDir,
}

/// A file part for multipart requests.
pub struct FilePart<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

impl TestApp {
    pub fn new() -> Result<Self> {
        let uploads = tempfile::tempdir().context("failed to create upload dir")?;
        let store = Arc::new(MemoryStore::new());

        let storage = StorageConfig {
            uploads_dir: uploads.path().to_path_buf(),
            public_prefix: "/uploads".to_string(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
        };
        let attachments = DiskAttachmentStore::new(uploads.path(), "/uploads");

        let state = AppState::new(
            store.clone(),
            Arc::new(attachments),
            Arc::new(Argon2Hasher),
            SECRET,
            storage,
        );

        Ok(Self {
            router: router(state),
            store,
            uploads,
        })
    }

    /// Insert a user. Without a password the stored digest is a placeholder.
    pub async fn seed_user(&self, email: &str, password: Option<&str>) -> Result<User> {
        let password_hash = match password {
            Some(p) => Argon2Hasher.hash(p)?,
            None => "unused".to_string(),
        };
        let user = self
            .store
            .insert_user(NewUser {
                name: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                phone: None,
                password_hash,
            })
            .await?;
        Ok(user)
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        generate_jwt(&Claims::new(user_id, 1), SECRET).expect("token")
    }

    pub async fn send_raw(&self, request: Request<Body>) -> Result<(StatusCode, Bytes)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, body))
    }

    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let (status, body) = self.send_raw(request).await?;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        Ok((status, json))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(builder(Method::GET, path, token).body(Body::empty())?).await
    }

    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> Result<(StatusCode, Value)> {
        let request = builder(method, path, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?;
        self.send(request).await
    }

    pub async fn send_empty(&self, method: Method, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(builder(method, path, token).body(Body::empty())?).await
    }

    pub async fn send_multipart(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        fields: &[(&str, &str)],
        file: Option<FilePart<'_>>,
    ) -> Result<(StatusCode, Value)> {
        let request = builder(method, path, token)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
            .body(Body::from(multipart_body(fields, file)))?;
        self.send(request).await
    }

    /// Files currently present in the upload directory.
    pub fn stored_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.uploads.path())
            .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
            .unwrap_or_default()
    }

    /// Local path behind a `/uploads/...` reference.
    pub fn path_of(&self, reference: &str) -> PathBuf {
        let name = reference.trim_start_matches("/uploads/");
        self.uploads.path().join(name)
    }
}

fn builder(method: Method, path: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(path);
    match token {
        Some(t) => builder.header(header::AUTHORIZATION, format!("Bearer {}", t)),
        None => builder,
    }
}

pub fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes());
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some(file) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Minimal valid shop payload.
pub fn shop_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("ownerName", "A"),
        ("shopName", "B"),
        ("location", "C"),
        ("phoneNumber", "D"),
    ]
}
