mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;
use shop_api_rust::auth::{Argon2Hasher, PasswordHasher};
use shop_api_rust::database::ResourceStore;

use common::TestApp;

#[tokio::test]
async fn profile_excludes_password() -> Result<()> {
    let app = TestApp::new()?;
    let user = app.seed_user("ana@example.com", None).await?;
    let viewer = app.seed_user("viewer@example.com", None).await?;

    let (status, body) = app
        .get(&format!("/users/{}", user.id), Some(&app.token_for(viewer.id)))
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ana@example.com");
    assert_eq!(body["id"], user.id.to_string());
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
    Ok(())
}

#[tokio::test]
async fn missing_user_is_not_found() -> Result<()> {
    let app = TestApp::new()?;
    let viewer = app.seed_user("viewer@example.com", None).await?;

    let (status, body) = app
        .get(&format!("/users/{}", uuid::Uuid::new_v4()), Some(&app.token_for(viewer.id)))
        .await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
    Ok(())
}

#[tokio::test]
async fn update_applies_only_present_fields() -> Result<()> {
    let app = TestApp::new()?;
    let user = app.seed_user("ana@example.com", None).await?;
    let token = app.token_for(user.id);
    let path = format!("/users/{}", user.id);

    let (status, body) = app
        .send_json(Method::PUT, &path, Some(&token), json!({ "phone": "555-0100" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User details updated successfully");
    assert!(body.get("password").is_none());

    let (_, profile) = app.get(&path, Some(&token)).await?;
    assert_eq!(profile["phone"], "555-0100");
    assert_eq!(profile["name"], user.name);
    assert_eq!(profile["email"], user.email);
    Ok(())
}

#[tokio::test]
async fn other_users_cannot_update() -> Result<()> {
    let app = TestApp::new()?;
    let user = app.seed_user("ana@example.com", None).await?;
    let intruder = app.seed_user("intruder@example.com", None).await?;

    let (status, body) = app
        .send_json(
            Method::PUT,
            &format!("/users/{}", user.id),
            Some(&app.token_for(intruder.id)),
            json!({ "name": "Hijacked" }),
        )
        .await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized to update this user");
    assert_eq!(app.store.get_user(user.id).await?.name, user.name);
    Ok(())
}

#[tokio::test]
async fn new_password_requires_current_password() -> Result<()> {
    let app = TestApp::new()?;
    let user = app.seed_user("ana@example.com", Some("old-password")).await?;
    let token = app.token_for(user.id);

    let (status, body) = app
        .send_json(
            Method::PUT,
            &format!("/users/{}", user.id),
            Some(&token),
            json!({ "newPassword": "new-password" }),
        )
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Current password is required to change password");
    assert_eq!(app.store.get_user(user.id).await?.password_hash, user.password_hash);
    Ok(())
}

#[tokio::test]
async fn wrong_current_password_is_rejected() -> Result<()> {
    let app = TestApp::new()?;
    let user = app.seed_user("ana@example.com", Some("old-password")).await?;
    let token = app.token_for(user.id);

    let (status, body) = app
        .send_json(
            Method::PUT,
            &format!("/users/{}", user.id),
            Some(&token),
            json!({ "currentPassword": "guess", "newPassword": "new-password" }),
        )
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Current password is incorrect");
    assert_eq!(app.store.get_user(user.id).await?.password_hash, user.password_hash);
    Ok(())
}

#[tokio::test]
async fn password_change_rehashes() -> Result<()> {
    let app = TestApp::new()?;
    let user = app.seed_user("ana@example.com", Some("old-password")).await?;
    let token = app.token_for(user.id);

    let (status, _) = app
        .send_json(
            Method::PUT,
            &format!("/users/{}", user.id),
            Some(&token),
            json!({ "currentPassword": "old-password", "newPassword": "new-password" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let stored = app.store.get_user(user.id).await?;
    assert_ne!(stored.password_hash, user.password_hash);
    assert!(Argon2Hasher.verify("new-password", &stored.password_hash)?);
    assert!(!Argon2Hasher.verify("old-password", &stored.password_hash)?);
    Ok(())
}
