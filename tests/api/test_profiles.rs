//! Profile self-service endpoints.

use actix_web::http::Method;
use serde_json::json;
use uuid::Uuid;

use super::test_helpers::*;

/// A caller with no profile row gets an empty object, not a 404.
#[actix_rt::test]
async fn test_missing_profile_is_empty_object() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let token = token_for(Uuid::new_v4());
    let (status, body) = get_json(&app, "/api/profile", Some(&token)).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({}));
}

#[actix_rt::test]
async fn test_profile_upsert_roundtrip() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let user_id = Uuid::new_v4();
    let token = token_for(user_id);
    let username = unique_name("casey");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/profile",
        Some(&token),
        json!({ "username": username, "fullName": "Casey Teller" }),
    )
    .await;

    assert_eq!(status, 200, "Unexpected response: {body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["profile"]["id"], user_id.to_string());
    assert_eq!(body["profile"]["username"], username);
    assert_eq!(body["profile"]["full_name"], "Casey Teller");
    // New profiles always start as plain users
    assert_eq!(body["profile"]["role"], "user");

    let (status, body) = get_json(&app, "/api/profile", Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["username"], username);

    // Omitted fields keep their stored values on re-upsert
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/profile",
        Some(&token),
        json!({ "fullName": "Casey A. Teller" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["profile"]["username"], username);
    assert_eq!(body["profile"]["full_name"], "Casey A. Teller");
}

/// The profile endpoint cannot be used to grant yourself a role.
#[actix_rt::test]
async fn test_profile_upsert_ignores_role_field() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let token = token_for(Uuid::new_v4());
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/profile",
        Some(&token),
        json!({ "username": unique_name("sneaky"), "role": "admin" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["profile"]["role"], "user");
}
