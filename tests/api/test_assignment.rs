//! Assignment lifecycle: status transitions and corrective actions.

use actix_web::http::Method;
use serde_json::{Value, json};
use uuid::Uuid;

use safetysync_lib::models::Role;

use super::test_helpers::*;

/// Pull the caller-visible corrective action for one incident, if any.
async fn action_for_incident<S>(app: &S, token: &str, incident_id: Uuid) -> Option<Value>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = get_json(app, "/api/corrective-actions", Some(token)).await;
    assert_eq!(status, 200, "Unexpected response: {body}");

    body.as_array()
        .expect("Expected a bare array")
        .iter()
        .find(|action| action["incident_id"] == incident_id.to_string())
        .cloned()
}

/// Reporting with an assignee creates a pending action but leaves the
/// incident open.
#[actix_rt::test]
async fn test_report_with_assignee_stays_open() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let token = token_for(Uuid::new_v4());
    let assignee = seed_user(&pool, Role::User).await;

    let body = json!({
        "category": "safety",
        "severity": "critical",
        "department": "Production",
        "location": "Loading Dock",
        "description": "Forklift near-miss",
        "assignedTo": assignee.to_string(),
    });

    let (status, resp) =
        send_json(&app, Method::POST, "/api/incidents", Some(&token), body).await;
    assert_eq!(status, 200, "Unexpected response: {resp}");
    assert_eq!(resp["incident"]["status"], "open");
    assert_eq!(resp["incident"]["severity"], "critical");

    let id = Uuid::parse_str(resp["incident"]["id"].as_str().unwrap()).unwrap();

    let (status, detail) = get_json(&app, &format!("/api/incidents/{id}"), Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(detail["assigned_to"], assignee.to_string());
    assert!(detail["action_id"].is_string());

    let action = action_for_incident(&app, &token, id)
        .await
        .expect("Expected a corrective action");
    assert_eq!(action["status"], "pending");
    assert_eq!(action["assigned_to"], assignee.to_string());
    assert_eq!(action["overdue"], false);
}

#[actix_rt::test]
async fn test_assign_moves_open_to_in_progress() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let token = token_for(Uuid::new_v4());
    let assignee = seed_user(&pool, Role::User).await;
    let id = report_incident(&app, &token, incident_body(&unique_name("assign"))).await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/incidents/{id}/assignment"),
        Some(&token),
        json!({ "assignedTo": assignee.to_string() }),
    )
    .await;

    assert_eq!(status, 200, "Unexpected response: {body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["incident"]["status"], "in-progress");
    assert_eq!(body["action"]["status"], "pending");
    assert_eq!(body["action"]["incident_id"], id.to_string());
    assert_eq!(body["action"]["assigned_to"], assignee.to_string());
}

/// Assignment never reopens settled incidents.
#[actix_rt::test]
async fn test_assign_keeps_resolved_status() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let token = token_for(Uuid::new_v4());
    let assignee = seed_user(&pool, Role::User).await;
    let id = report_incident(&app, &token, incident_body(&unique_name("settled"))).await;

    let (status, _) = send_json(
        &app,
        Method::PUT,
        &format!("/api/incidents/{id}"),
        Some(&token),
        json!({ "status": "resolved" }),
    )
    .await;
    assert_eq!(status, 200);

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/incidents/{id}/assignment"),
        Some(&token),
        json!({ "assignedTo": assignee.to_string() }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["incident"]["status"], "resolved");
    assert_eq!(body["action"]["status"], "pending");
}

/// Clearing the assignee deletes the action and reopens the incident.
#[actix_rt::test]
async fn test_unassign_resets_to_open() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let token = token_for(Uuid::new_v4());
    let assignee = seed_user(&pool, Role::User).await;
    let id = report_incident(&app, &token, incident_body(&unique_name("unassign"))).await;

    let (status, _) = send_json(
        &app,
        Method::PUT,
        &format!("/api/incidents/{id}/assignment"),
        Some(&token),
        json!({ "assignedTo": assignee.to_string() }),
    )
    .await;
    assert_eq!(status, 200);

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/incidents/{id}/assignment"),
        Some(&token),
        json!({ "assignedTo": "" }),
    )
    .await;

    assert_eq!(status, 200, "Unexpected response: {body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["incident"]["status"], "open");
    assert!(body.get("action").is_none());

    let (status, detail) = get_json(&app, &format!("/api/incidents/{id}"), Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(detail["assigned_to"], json!(null));
    assert_eq!(detail["action_id"], json!(null));

    assert!(action_for_incident(&app, &token, id).await.is_none());
}

/// Reassignment reuses the existing action row and merges in the provided
/// detail fields.
#[actix_rt::test]
async fn test_reassign_updates_existing_action() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let token = token_for(Uuid::new_v4());
    let first = seed_user(&pool, Role::User).await;
    let second = seed_user(&pool, Role::User).await;
    let id = report_incident(&app, &token, incident_body(&unique_name("reassign"))).await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/incidents/{id}/assignment"),
        Some(&token),
        json!({ "assignedTo": first.to_string() }),
    )
    .await;
    assert_eq!(status, 200);
    let action_id = body["action"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/incidents/{id}/assignment"),
        Some(&token),
        json!({
            "assignedTo": second.to_string(),
            "actionDescription": "Replace the guard rail",
            "dueDate": "2020-01-01",
        }),
    )
    .await;

    assert_eq!(status, 200, "Unexpected response: {body}");
    assert_eq!(body["action"]["id"], action_id);
    assert_eq!(body["action"]["assigned_to"], second.to_string());
    assert_eq!(body["action"]["action_description"], "Replace the guard rail");
    assert_eq!(body["action"]["due_date"], "2020-01-01");
    assert_eq!(body["action"]["overdue"], true);
}

#[actix_rt::test]
async fn test_assign_rejects_bad_assignee() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let token = token_for(Uuid::new_v4());
    let id = report_incident(&app, &token, incident_body(&unique_name("badid"))).await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/incidents/{id}/assignment"),
        Some(&token),
        json!({ "assignedTo": "not-a-uuid" }),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid assignedTo, expected a user id");
}

/// Plain users cannot assign incidents they do not own.
#[actix_rt::test]
async fn test_assign_respects_visibility() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let app = create_test_app(&pool).await;

    let owner_token = token_for(Uuid::new_v4());
    let id = report_incident(&app, &owner_token, incident_body(&unique_name("vis"))).await;

    let stranger = seed_user(&pool, Role::User).await;
    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/incidents/{id}/assignment"),
        Some(&token_for(stranger)),
        json!({ "assignedTo": stranger.to_string() }),
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], format!("Incident {id} not found"));
}
