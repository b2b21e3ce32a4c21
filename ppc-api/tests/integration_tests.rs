//! Integration tests for the People Center API
//!
//! Every test runs the full router against an in-memory database.

use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestRequest, TestServer};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

use ppc_api::{create_app, ApiConfig, AppState, AuthClaims, JwtConfig};
use ppc_core::credentials::{CredentialHasher, HashingCost};
use ppc_db::PpcDatabase;

const SECRET: &str = "integration-test-secret-that-is-long-enough";

struct TestApp {
    server: TestServer,
    state: AppState,
    _uploads: TempDir,
}

fn create_test_app_with(config: ApiConfig) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let state = AppState::new(
        Arc::new(PpcDatabase::in_memory()),
        CredentialHasher::new(HashingCost::for_testing()).unwrap(),
        JwtConfig::try_new(SECRET, 24).unwrap(),
        uploads.path(),
    );
    let app = create_app(state.clone(), &config).unwrap();

    TestApp {
        server: TestServer::new(app).unwrap(),
        state,
        _uploads: uploads,
    }
}

fn create_test_app() -> TestApp {
    create_test_app_with(ApiConfig {
        rate_limit_per_minute: 0,
        ..ApiConfig::default()
    })
}

fn bearer(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

/// Register an account, returning `(citizen id, token)`
async fn register(app: &TestApp, name: &str, email: &str) -> (String, String) {
    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": name,
            "email": email,
            "password": "password123",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    (
        body["data"]["citizen"]["id"].as_str().unwrap().to_string(),
        body["data"]["token"].as_str().unwrap().to_string(),
    )
}

/// Register an account and promote it, returning `(citizen id, admin token)`
async fn register_admin(app: &TestApp) -> (String, String) {
    let (id, _) = register(app, "Ada Admin", "admin@example.com").await;
    app.state.citizens.grant_admin("admin@example.com").await.unwrap();

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "admin@example.com", "password": "password123" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["citizen"]["role"], "admin");
    (id, body["data"]["token"].as_str().unwrap().to_string())
}

/// Issue form with every required text field filled in
fn issue_form(description: &str, location: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", "Pothole on Elm")
        .add_text("description", description)
        .add_text("category", "infrastructure")
        .add_text("location", location)
}

fn png_part() -> Part {
    Part::bytes(b"\x89PNG\r\n\x1a\nfake".to_vec())
        .file_name("pothole.png")
        .mime_type("image/png")
}

/// Files currently stored under the issue image directory
fn stored_images(app: &TestApp) -> usize {
    std::fs::read_dir(app.state.uploads.root().join("issues"))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

// ============ Health and Fallback ============

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app();

    let response = app.server.get("/api/nowhere").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(error_code(&body), "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Route not found");
}

#[tokio::test]
async fn test_malformed_body_is_invalid_json() {
    let app = create_test_app();

    let response = app.server.post("/api/auth/login").text("not json").await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "INVALID_JSON");
}

// ============ Auth ============

#[tokio::test]
async fn test_register_and_me() {
    let app = create_test_app();
    let (id, token) = register(&app, "Jane Citizen", "Jane@Example.com").await;

    let response = bearer(app.server.get("/api/auth/me"), &token).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["citizen"]["id"], id.as_str());
    assert_eq!(body["data"]["citizen"]["email"], "jane@example.com");
    assert_eq!(body["data"]["citizen"]["role"], "citizen");
    assert!(body["data"]["citizen"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = create_test_app();
    register(&app, "Jane Citizen", "jane@example.com").await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Other Jane",
            "email": "JANE@example.com",
            "password": "password123",
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn test_register_short_password() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Jane Citizen",
            "email": "jane@example.com",
            "password": "short",
        }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "INVALID_PASSWORD");
}

#[tokio::test]
async fn test_login_failures_look_alike() {
    let app = create_test_app();
    register(&app, "Jane Citizen", "jane@example.com").await;

    let wrong_password = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "jane@example.com", "password": "wrong-password" }))
        .await;
    let unknown_email = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "password123" }))
        .await;

    wrong_password.assert_status_unauthorized();
    unknown_email.assert_status_unauthorized();
    let a: Value = wrong_password.json();
    let b: Value = unknown_email.json();
    assert_eq!(error_code(&a), "INVALID_CREDENTIALS");
    assert_eq!(a["error"], b["error"]);
}

#[tokio::test]
async fn test_missing_and_bad_tokens() {
    let app = create_test_app();

    let response = app.server.get("/api/auth/me").await;
    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "NO_TOKEN");

    let response = bearer(app.server.get("/api/auth/me"), "not-a-jwt").await;
    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "INVALID_TOKEN");
}

#[tokio::test]
async fn test_expired_token() {
    let app = create_test_app();
    let now = Utc::now().timestamp() as u64;
    let token = app
        .state
        .jwt
        .sign(&AuthClaims {
            sub: "someone".to_string(),
            email: "someone@example.com".to_string(),
            role: "citizen".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        })
        .unwrap();

    let response = bearer(app.server.get("/api/auth/me"), &token).await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "TOKEN_EXPIRED");
}

// ============ Citizens ============

#[tokio::test]
async fn test_profile_changes_are_owner_only() {
    let app = create_test_app();
    let (jane, jane_token) = register(&app, "Jane Citizen", "jane@example.com").await;
    let (_, john_token) = register(&app, "John Citizen", "john@example.com").await;

    let response = bearer(
        app.server.put(&format!("/api/citizens/{}/interests", jane)),
        &john_token,
    )
    .json(&json!({ "interests": ["education"] }))
    .await;
    response.assert_status_forbidden();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "FORBIDDEN");

    let response = bearer(
        app.server.put(&format!("/api/citizens/{}/interests", jane)),
        &jane_token,
    )
    .json(&json!({ "interests": ["education", "healthcare"] }))
    .await;
    response.assert_status_ok();

    let response = app.server.get(&format!("/api/citizens/{}", jane)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["citizen"]["interests"], json!(["education", "healthcare"]));
}

#[tokio::test]
async fn test_password_change_then_login() {
    let app = create_test_app();
    let (jane, token) = register(&app, "Jane Citizen", "jane@example.com").await;

    let response = bearer(
        app.server.put(&format!("/api/citizens/{}/password", jane)),
        &token,
    )
    .json(&json!({ "currentPassword": "password123", "newPassword": "better-password" }))
    .await;
    response.assert_status_ok();

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "jane@example.com", "password": "better-password" }))
        .await;
    response.assert_status_ok();
}

// ============ Issues ============

#[tokio::test]
async fn test_issue_lifecycle() {
    let app = create_test_app();
    let (jane, citizen_token) = register(&app, "Jane Citizen", "jane@example.com").await;
    let (_, admin_token) = register_admin(&app).await;

    let response = bearer(app.server.post("/api/issues"), &citizen_token)
        .json(&json!({
            "title": "Broken streetlight",
            "description": "The streetlight on Main St has been out for a week",
            "category": "infrastructure",
            "location": { "address": "12 Main St", "city": "Springfield" },
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["issue"]["status"], "open");
    assert_eq!(body["data"]["issue"]["submittedBy"], jane.as_str());
    let issue_id = body["data"]["issue"]["id"].as_str().unwrap().to_string();
    let status_path = format!("/api/issues/{}/status", issue_id);

    // Citizens cannot move issues
    let response = bearer(app.server.put(&status_path), &citizen_token)
        .json(&json!({ "status": "resolved", "comment": "done" }))
        .await;
    response.assert_status_forbidden();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "ADMIN_ONLY");

    // Resolving needs a comment
    let response = bearer(app.server.put(&status_path), &admin_token)
        .json(&json!({ "status": "resolved" }))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "COMMENT_REQUIRED");

    let response = bearer(app.server.put(&status_path), &admin_token)
        .json(&json!({ "status": "resolved", "comment": "Bulb replaced" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["issue"]["status"], "resolved");
    assert_eq!(body["data"]["issue"]["statusHistory"].as_array().unwrap().len(), 2);

    let response = app.server.get("/api/issues?status=resolved").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["issues"][0]["id"], issue_id.as_str());

    let response = app.server.get(&format!("/api/citizens/{}/issues", jane)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["count"], 1);
}

#[tokio::test]
async fn test_issue_submission_requires_auth_and_fields() {
    let app = create_test_app();
    let (_, token) = register(&app, "Jane Citizen", "jane@example.com").await;

    let response = app
        .server
        .post("/api/issues")
        .json(&json!({ "title": "Pothole" }))
        .await;
    response.assert_status_unauthorized();

    let response = bearer(app.server.post("/api/issues"), &token)
        .json(&json!({ "title": "Pothole on Elm" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_issue_filter_rejects_unknown_status() {
    let app = create_test_app();

    let response = app.server.get("/api/issues?status=fixed").await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_multipart_issue_with_image() {
    let app = create_test_app();
    let (_, token) = register(&app, "Jane Citizen", "jane@example.com").await;

    let form = issue_form(
        "Deep pothole outside number 4",
        r#"{"address": "4 Elm St", "city": "Springfield"}"#,
    )
    .add_part("image", png_part());
    let response = bearer(app.server.post("/api/issues"), &token)
        .multipart(form)
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let issue = &body["data"]["issue"];
    assert_eq!(issue["location"]["address"], "4 Elm St");
    assert_eq!(issue["location"]["city"], "Springfield");
    let image_url = issue["imageUrl"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/uploads/issues/"));
    assert!(image_url.ends_with(".png"));
    assert_eq!(stored_images(&app), 1);

    let response = app.server.get(&image_url).await;
    response.assert_status_ok();
    assert!(response.as_bytes().starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn test_multipart_issue_rejects_non_image() {
    let app = create_test_app();
    let (_, token) = register(&app, "Jane Citizen", "jane@example.com").await;

    let form = issue_form("Deep pothole outside number 4", r#"{"address": "4 Elm St"}"#)
        .add_part(
            "image",
            Part::bytes(b"%PDF-1.4".to_vec())
                .file_name("report.pdf")
                .mime_type("application/pdf"),
        );
    let response = bearer(app.server.post("/api/issues"), &token)
        .multipart(form)
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "INVALID_FILE");
    assert_eq!(stored_images(&app), 0);

    let response = app.server.get("/api/issues").await;
    let body: Value = response.json();
    assert_eq!(body["data"]["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_multipart_issue_rejects_bad_location() {
    let app = create_test_app();
    let (_, token) = register(&app, "Jane Citizen", "jane@example.com").await;

    let response = bearer(app.server.post("/api/issues"), &token)
        .multipart(issue_form("Deep pothole outside number 4", "4 Elm St"))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "INVALID_LOCATION");
}

#[tokio::test]
async fn test_multipart_issue_discards_image_on_rejection() {
    let app = create_test_app();
    let (_, token) = register(&app, "Jane Citizen", "jane@example.com").await;

    // Description below the minimum length fails after the image is stored
    let form = issue_form("short", r#"{"address": "4 Elm St"}"#).add_part("image", png_part());
    let response = bearer(app.server.post("/api/issues"), &token)
        .multipart(form)
        .await;

    response.assert_status_bad_request();
    assert_eq!(stored_images(&app), 0);

    let response = app.server.get("/api/issues").await;
    let body: Value = response.json();
    assert_eq!(body["data"]["pagination"]["total"], 0);
}

// ============ Events ============

#[tokio::test]
async fn test_event_registration() {
    let app = create_test_app();
    let (_, admin_token) = register_admin(&app).await;
    let (_, jane_token) = register(&app, "Jane Citizen", "jane@example.com").await;
    let (_, john_token) = register(&app, "John Citizen", "john@example.com").await;

    let event = json!({
        "title": "Quarterly town hall",
        "description": "Open discussion with the council",
        "eventType": "town-hall",
        "date": (Utc::now() + Duration::days(7)).to_rfc3339(),
        "time": "18:00",
        "location": { "venue": "City Hall" },
        "capacity": 1,
    });

    let response = bearer(app.server.post("/api/events"), &jane_token)
        .json(&event)
        .await;
    response.assert_status_forbidden();

    let response = bearer(app.server.post("/api/events"), &admin_token)
        .json(&event)
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let event_id = body["data"]["event"]["id"].as_str().unwrap().to_string();
    let register_path = format!("/api/events/{}/register", event_id);

    let response = bearer(app.server.post(&register_path), &jane_token).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Successfully registered for event");
    assert_eq!(body["data"]["event"]["registeredCitizens"].as_array().unwrap().len(), 1);

    let response = bearer(app.server.post(&register_path), &jane_token).await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "ALREADY_REGISTERED");

    let response = bearer(app.server.post(&register_path), &john_token).await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "EVENT_FULL");

    let response = bearer(app.server.delete(&register_path), &jane_token).await;
    response.assert_status_ok();

    let response = bearer(app.server.post(&register_path), &john_token).await;
    response.assert_status_ok();

    let response = app.server.get("/api/events").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["count"], 1);
}

#[tokio::test]
async fn test_unknown_event() {
    let app = create_test_app();

    let response = app.server.get("/api/events/missing").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Event not found");
}

// ============ Surveys ============

#[tokio::test]
async fn test_survey_responses() {
    let app = create_test_app();
    let (_, admin_token) = register_admin(&app).await;
    let (_, jane_token) = register(&app, "Jane Citizen", "jane@example.com").await;
    let (_, john_token) = register(&app, "John Citizen", "john@example.com").await;

    let response = bearer(app.server.post("/api/surveys"), &admin_token)
        .json(&json!({
            "title": "Park improvements",
            "description": "Tell us about the city parks",
            "questions": [
                { "questionText": "Rate the parks", "questionType": "rating" },
                { "questionText": "Anything else?", "questionType": "text", "required": false },
            ],
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let survey_id = body["data"]["survey"]["id"].as_str().unwrap().to_string();
    let rating_id = body["data"]["survey"]["questions"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let responses_path = format!("/api/surveys/{}/responses", survey_id);

    let answers = json!({ "answers": [{ "questionId": rating_id, "answer": 4 }] });

    let response = bearer(app.server.post(&responses_path), &jane_token)
        .json(&answers)
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = bearer(app.server.post(&responses_path), &jane_token)
        .json(&answers)
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "DUPLICATE_RESPONSE");

    let response = bearer(app.server.post(&responses_path), &john_token)
        .json(&json!({ "answers": [] }))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "MISSING_REQUIRED_ANSWERS");

    let results_path = format!("/api/surveys/{}/results", survey_id);
    let response = bearer(app.server.get(&results_path), &jane_token).await;
    response.assert_status_forbidden();

    let response = bearer(app.server.get(&results_path), &admin_token).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["totalResponses"], 1);

    let response = bearer(
        app.server.put(&format!("/api/surveys/{}/close", survey_id)),
        &admin_token,
    )
    .await;
    response.assert_status_ok();

    let response = bearer(app.server.post(&responses_path), &john_token)
        .json(&answers)
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "SURVEY_CLOSED");

    let response = app.server.get("/api/surveys").await;
    let body: Value = response.json();
    assert_eq!(body["data"]["count"], 0);
}

// ============ Governance ============

#[tokio::test]
async fn test_decision_votes_and_metrics() {
    let app = create_test_app();
    let (_, admin_token) = register_admin(&app).await;

    let response = bearer(app.server.post("/api/governance/admin/decisions"), &admin_token)
        .json(&json!({
            "title": "Extend library hours",
            "description": "Open the central library until 9pm",
            "proposedBy": "Youth Council",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["decision"]["status"], "Proposed");
    let decision_id = body["data"]["decision"]["id"].as_str().unwrap().to_string();

    let response = bearer(
        app.server
            .put(&format!("/api/governance/admin/decisions/{}", decision_id)),
        &admin_token,
    )
    .json(&json!({ "votesFor": 7, "votesAgainst": 3 }))
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["decision"]["status"], "Approved");
    assert_eq!(body["data"]["decision"]["consensusRate"], 70);
    assert_eq!(body["data"]["decision"]["totalVotes"], 10);

    // Counts whose sum overflows are rejected and the stored tally is kept
    let response = bearer(
        app.server
            .put(&format!("/api/governance/admin/decisions/{}", decision_id)),
        &admin_token,
    )
    .json(&json!({ "votesFor": u32::MAX, "votesAgainst": 1 }))
    .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "VALIDATION_ERROR");

    let response = app.server.get("/api/governance/decisions").await;
    let body: Value = response.json();
    assert_eq!(body["data"]["decisions"][0]["votesFor"], 7);
    assert_eq!(body["data"]["decisions"][0]["totalVotes"], 10);

    let response = app.server.get("/api/governance/decisions?status=Approved").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["decisions"].as_array().unwrap().len(), 1);

    let response = app.server.get("/api/governance/decisions?status=Bogus").await;
    response.assert_status_bad_request();

    let response = app.server.get("/api/governance/metrics").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["metrics"]["totalDecisions"], 1);
    assert_eq!(body["data"]["metrics"]["approvedDecisions"], 1);
    assert_eq!(body["data"]["metrics"]["avgConsensusRate"], "70%");
}

#[tokio::test]
async fn test_council_membership() {
    let app = create_test_app();
    let (_, admin_token) = register_admin(&app).await;

    let response = bearer(app.server.post("/api/governance/admin/council"), &admin_token)
        .json(&json!({ "name": "Grace Hopper", "role": "PPC Coordinator" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["member"]["isActive"], true);
    let member_id = body["data"]["member"]["id"].as_str().unwrap().to_string();

    let response = app.server.get("/api/governance/council").await;
    let body: Value = response.json();
    assert_eq!(body["data"]["members"].as_array().unwrap().len(), 1);

    let response = bearer(
        app.server
            .delete(&format!("/api/governance/admin/council/{}", member_id)),
        &admin_token,
    )
    .await;
    response.assert_status_ok();

    let response = app.server.get("/api/governance/council").await;
    let body: Value = response.json();
    assert!(body["data"]["members"].as_array().unwrap().is_empty());

    let response = bearer(app.server.get("/api/governance/admin/council"), &admin_token).await;
    let body: Value = response.json();
    assert_eq!(body["data"]["members"][0]["isActive"], false);
}

// ============ Admin ============

#[tokio::test]
async fn test_admin_dashboard_and_directory() {
    let app = create_test_app();
    let (admin_id, admin_token) = register_admin(&app).await;
    let (jane, jane_token) = register(&app, "Jane Citizen", "jane@example.com").await;

    let response = bearer(app.server.get("/api/admin/dashboard"), &jane_token).await;
    response.assert_status_forbidden();

    let response = bearer(app.server.get("/api/admin/dashboard"), &admin_token).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["totalCitizens"], 2);

    let response = bearer(app.server.get("/api/admin/recent-activity"), &admin_token).await;
    response.assert_status_ok();

    let response = bearer(app.server.get("/api/admin/citizens?limit=1"), &admin_token).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["pagination"]["total"], 2);
    assert_eq!(body["data"]["pagination"]["pages"], 2);
    assert_eq!(body["data"]["citizens"].as_array().unwrap().len(), 1);
    assert!(body["data"]["citizens"][0].get("passwordHash").is_none());

    let response = bearer(
        app.server.put(&format!("/api/admin/citizens/{}/role", admin_id)),
        &admin_token,
    )
    .json(&json!({ "role": "citizen" }))
    .await;
    response.assert_status_forbidden();

    let response = bearer(
        app.server.put(&format!("/api/admin/citizens/{}/role", jane)),
        &admin_token,
    )
    .json(&json!({ "role": "mayor" }))
    .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(error_code(&body), "INVALID_ROLE");

    let response = bearer(
        app.server.put(&format!("/api/admin/citizens/{}/role", jane)),
        &admin_token,
    )
    .json(&json!({ "role": "admin" }))
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["citizen"]["role"], "admin");
}

// ============ Rate Limiting ============

#[tokio::test]
async fn test_rate_limit() {
    let app = create_test_app_with(ApiConfig {
        rate_limit_per_minute: 3,
        ..ApiConfig::default()
    });

    for _ in 0..3 {
        app.server.get("/health").await.assert_status_ok();
    }

    let response = app.server.get("/health").await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "RATE_LIMITED");
}
