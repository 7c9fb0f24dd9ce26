//! Incident reporting, listing, editing, and deletion over HTTP.

use actix_web::http::Method;
use serde_json::json;
use uuid::Uuid;

use safetysync_lib::models::Role;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_report_incident_defaults() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let reporter = Uuid::new_v4();
    let token = token_for(reporter);
    let marker = unique_name("report");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/incidents",
        Some(&token),
        incident_body(&marker),
    )
    .await;

    assert_eq!(status, 200, "Unexpected response: {body}");
    assert_eq!(body["success"], true);

    let incident = &body["incident"];
    assert_eq!(incident["status"], "open");
    assert_eq!(incident["category"], "safety");
    assert_eq!(incident["severity"], "medium");
    assert_eq!(incident["department"], marker);
    assert_eq!(incident["user_id"], reporter.to_string());
    // Omitted fields fall back: reporter defaults to the caller, the
    // immediate action to an empty string.
    assert_eq!(incident["reported_by"], reporter.to_string());
    assert_eq!(incident["immediate_action"], "");
}

#[actix_rt::test]
async fn test_report_incident_explicit_reporter() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let token = token_for(Uuid::new_v4());
    let on_behalf_of = seed_user(&pool, Role::User).await;

    let mut body = incident_body(&unique_name("behalf"));
    body["reportedBy"] = json!(on_behalf_of.to_string());
    body["immediateAction"] = json!("Cordoned off the area");

    let (status, resp) =
        send_json(&app, Method::POST, "/api/incidents", Some(&token), body).await;

    assert_eq!(status, 200);
    assert_eq!(resp["incident"]["reported_by"], on_behalf_of.to_string());
    assert_eq!(resp["incident"]["immediate_action"], "Cordoned off the area");
}

#[actix_rt::test]
async fn test_report_incident_rejects_bad_enums() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;
    let token = token_for(Uuid::new_v4());

    let mut body = incident_body(&unique_name("bad-cat"));
    body["category"] = json!("gossip");
    let (status, resp) =
        send_json(&app, Method::POST, "/api/incidents", Some(&token), body).await;
    assert_eq!(status, 400);
    assert_eq!(resp["error"], "Invalid category");

    let mut body = incident_body(&unique_name("bad-sev"));
    body["severity"] = json!("catastrophic");
    let (status, resp) =
        send_json(&app, Method::POST, "/api/incidents", Some(&token), body).await;
    assert_eq!(status, 400);
    assert_eq!(resp["error"], "Invalid severity");
}

/// The plain list endpoint only ever returns the caller's own incidents.
#[actix_rt::test]
async fn test_list_is_owner_scoped() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let alice_token = token_for(alice);
    let bob_token = token_for(bob);
    let marker = unique_name("scoped");

    report_incident(&app, &alice_token, incident_body(&marker)).await;
    report_incident(&app, &alice_token, incident_body(&marker)).await;
    report_incident(&app, &bob_token, incident_body(&marker)).await;

    let (status, body) = get_json(&app, "/api/incidents", Some(&alice_token)).await;

    assert_eq!(status, 200);
    let rows = body.as_array().expect("Expected a bare array");
    assert!(
        rows.iter()
            .all(|row| row["user_id"] == alice.to_string())
    );
    let mine = rows
        .iter()
        .filter(|row| row["department"] == marker)
        .count();
    assert_eq!(mine, 2);
}

#[actix_rt::test]
async fn test_update_own_incident() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let token = token_for(Uuid::new_v4());
    let id = report_incident(&app, &token, incident_body(&unique_name("edit"))).await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/incidents/{id}"),
        Some(&token),
        json!({ "status": "resolved", "description": "Ramp resurfaced" }),
    )
    .await;

    assert_eq!(status, 200, "Unexpected response: {body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["incident"]["status"], "resolved");
    assert_eq!(body["incident"]["description"], "Ramp resurfaced");
    // Untouched fields survive the edit
    assert_eq!(body["incident"]["category"], "safety");

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/incidents/{id}"),
        Some(&token),
        json!({ "status": "paused" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid status");
}

/// Edits are owner-only, so someone else's incident looks like a missing one.
#[actix_rt::test]
async fn test_update_other_users_incident_not_found() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let owner_token = token_for(Uuid::new_v4());
    let id = report_incident(&app, &owner_token, incident_body(&unique_name("steal"))).await;

    let stranger_token = token_for(Uuid::new_v4());
    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/incidents/{id}"),
        Some(&stranger_token),
        json!({ "description": "hijacked" }),
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], format!("Incident {id} not found"));
}

/// Detail visibility follows the caller's role: plain users only see their
/// own incidents, every other role sees everything.
#[actix_rt::test]
async fn test_get_incident_visibility() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let owner_token = token_for(Uuid::new_v4());
    let id = report_incident(&app, &owner_token, incident_body(&unique_name("detail"))).await;

    let (status, body) = get_json(&app, &format!("/api/incidents/{id}"), Some(&owner_token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["reported_by_name"], "Unknown");
    assert_eq!(body["assigned_to"], json!(null));
    assert_eq!(body["overdue"], false);

    let restricted = seed_user(&pool, Role::User).await;
    let (status, _) = get_json(
        &app,
        &format!("/api/incidents/{id}"),
        Some(&token_for(restricted)),
    )
    .await;
    assert_eq!(status, 404);

    let viewer = seed_user(&pool, Role::Viewer).await;
    let (status, body) = get_json(
        &app,
        &format!("/api/incidents/{id}"),
        Some(&token_for(viewer)),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["id"], id.to_string());
}

#[actix_rt::test]
async fn test_delete_requires_manager_or_admin() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let reporter = seed_user(&pool, Role::User).await;
    let reporter_token = token_for(reporter);
    let id = report_incident(&app, &reporter_token, incident_body(&unique_name("del"))).await;

    let (status, body) = send_empty(
        &app,
        Method::DELETE,
        &format!("/api/incidents/{id}"),
        Some(&reporter_token),
    )
    .await;
    assert_eq!(status, 403);
    assert_eq!(body["error"], "Access denied: Insufficient permissions");

    let manager = seed_user(&pool, Role::Manager).await;
    let manager_token = token_for(manager);
    let (status, body) = send_empty(
        &app,
        Method::DELETE,
        &format!("/api/incidents/{id}"),
        Some(&manager_token),
    )
    .await;
    assert_eq!(status, 200, "Unexpected response: {body}");
    assert_eq!(body["success"], true);

    let (status, _) = get_json(&app, &format!("/api/incidents/{id}"), Some(&manager_token)).await;
    assert_eq!(status, 404);

    let (status, body) = send_empty(
        &app,
        Method::DELETE,
        &format!("/api/incidents/{}", Uuid::new_v4()),
        Some(&manager_token),
    )
    .await;
    assert_eq!(status, 404);
    assert!(body["error"].as_str().is_some_and(|e| e.ends_with("not found")));
}

#[actix_rt::test]
async fn test_list_all_filters_and_pagination() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let reporter_token = token_for(Uuid::new_v4());
    let marker = unique_name("filter");

    report_incident(&app, &reporter_token, incident_body(&marker)).await;
    report_incident(&app, &reporter_token, incident_body(&marker)).await;
    let resolved = report_incident(&app, &reporter_token, incident_body(&marker)).await;
    let (status, _) = send_json(
        &app,
        Method::PUT,
        &format!("/api/incidents/{resolved}"),
        Some(&reporter_token),
        json!({ "status": "resolved" }),
    )
    .await;
    assert_eq!(status, 200);

    let manager = seed_user(&pool, Role::Manager).await;
    let manager_token = token_for(manager);

    let (status, body) = get_json(
        &app,
        "/api/incidents/all?status=resolved&limit=200",
        Some(&manager_token),
    )
    .await;
    assert_eq!(status, 200);
    // Requested limit is clamped to the 100-row ceiling
    assert_eq!(body["pagination"]["limit"], 100);
    assert_eq!(body["pagination"]["page"], 1);
    let rows = body["incidents"].as_array().expect("Expected incidents");
    let mine: Vec<_> = rows
        .iter()
        .filter(|row| row["department"] == marker)
        .collect();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["id"], resolved.to_string());
    assert_eq!(mine[0]["status"], "resolved");

    let today = chrono::Utc::now().date_naive().to_string();
    let (status, body) = get_json(
        &app,
        &format!("/api/incidents/all?date={today}"),
        Some(&manager_token),
    )
    .await;
    assert_eq!(status, 200);
    let todays = body["incidents"]
        .as_array()
        .expect("Expected incidents")
        .iter()
        .filter(|row| row["department"] == marker)
        .count();
    assert_eq!(todays, 3);
}

#[actix_rt::test]
async fn test_list_all_rejects_bad_filters() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;
    let token = token_for(Uuid::new_v4());

    let (status, body) = get_json(&app, "/api/incidents/all?status=paused", Some(&token)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid status");

    let (status, body) = get_json(&app, "/api/incidents/all?date=31-12-2026", Some(&token)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid date, expected YYYY-MM-DD");
}

/// Plain users see only their own incidents on the full list endpoint too.
#[actix_rt::test]
async fn test_list_all_scopes_plain_users() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let marker = unique_name("allscope");
    report_incident(&app, &token_for(Uuid::new_v4()), incident_body(&marker)).await;

    let outsider = seed_user(&pool, Role::User).await;
    let (status, body) = get_json(&app, "/api/incidents/all", Some(&token_for(outsider))).await;

    assert_eq!(status, 200);
    let visible = body["incidents"]
        .as_array()
        .expect("Expected incidents")
        .iter()
        .filter(|row| row["department"] == marker)
        .count();
    assert_eq!(visible, 0);
}
