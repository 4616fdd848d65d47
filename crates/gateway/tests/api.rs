//! Router-level tests over the in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use sarthi_common::{
    auth::hash_password,
    config::AppConfig,
    db::{
        models::{Role, User},
        MemoryStore, Store,
    },
};
use sarthi_gateway::{create_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const PASSWORD: &str = "password123";

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let state = AppState::new(AppConfig::for_tests(), store).unwrap();
        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    /// Insert an account and mint a token for it
    async fn seed(&self, email: &str, role: Role) -> (User, String) {
        let mut user = User::new_account(email, "Test User", role, "Computer Engineering");
        user.password_hash = hash_password(PASSWORD).unwrap();
        let user = self.state.store.insert_user(user).await.unwrap();
        let token = self
            .state
            .jwt
            .generate_token(user.id, role, &user.email)
            .unwrap();
        (user, token)
    }

    async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn json(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.send(method, uri, token, body).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_appraisal(&self, token: &str, year: &str) -> Value {
        let (status, body) = self
            .json("POST", "/api/appraisals", Some(token), Some(json!({ "academic_year": year })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["appraisal"].clone()
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.json("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_with_memory_store() {
    let app = TestApp::new();
    let (status, body) = app.json("GET", "/ready", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "up");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new();

    let (status, body) = app.json("GET", "/api/appraisals", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app.json("GET", "/api/appraisals", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_then_login() {
    let app = TestApp::new();

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({
                "email": "New.Faculty@College.edu",
                "name": "New Faculty",
                "password": "longenough",
                "department": "Physics"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "new.faculty@college.edu");
    assert_eq!(body["user"]["role"], "faculty");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "new.faculty@college.edu", "password": "longenough" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "New Faculty");

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "new.faculty@college.edu", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let app = TestApp::new();
    let (status, _) = app
        .json(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({ "email": "a@college.edu", "name": "A", "password": "short" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.state.store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_user_with_invalid_role_changes_nothing() {
    let app = TestApp::new();
    let (_, admin) = app.seed("admin@college.edu", Role::Admin).await;
    let before = app.state.store.count_users().await.unwrap();

    let (status, body) = app
        .json(
            "POST",
            "/api/admin/users",
            Some(&admin),
            Some(json!({
                "email": "someone@college.edu",
                "name": "Someone",
                "role": "principal",
                "department": "Physics"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid role");
    assert_eq!(app.state.store.count_users().await.unwrap(), before);
}

#[tokio::test]
async fn test_create_user_missing_fields() {
    let app = TestApp::new();
    let (_, admin) = app.seed("admin@college.edu", Role::Admin).await;

    let (status, body) = app
        .json(
            "POST",
            "/api/admin/users",
            Some(&admin),
            Some(json!({ "email": "someone@college.edu", "role": "hod" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(body["code"], "MISSING_FIELD");

    let (status, body) = app
        .json("PATCH", "/api/admin/users", Some(&admin), Some(json!({ "role": "hod" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_FIELD");
}

#[tokio::test]
async fn test_create_hod_returns_temporary_password() {
    let app = TestApp::new();
    let (_, admin) = app.seed("admin@college.edu", Role::MisAdmin).await;

    let (status, body) = app
        .json(
            "POST",
            "/api/admin/users",
            Some(&admin),
            Some(json!({
                "email": "hod@college.edu",
                "name": "Head",
                "role": "hod",
                "department": "Physics"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "HOD account created successfully");
    let temporary = body["temporaryPassword"].as_str().unwrap().to_string();
    assert_eq!(temporary.len(), 12);

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "hod@college.edu", "password": temporary })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "hod");
}

#[tokio::test]
async fn test_update_user_role() {
    let app = TestApp::new();
    let (_, admin) = app.seed("admin@college.edu", Role::Admin).await;
    let (faculty, _) = app.seed("faculty@college.edu", Role::Faculty).await;

    let (status, body) = app
        .json(
            "PATCH",
            "/api/admin/users",
            Some(&admin),
            Some(json!({ "userId": faculty.id.to_string(), "role": "superuser" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ROLE");
    let stored = app.state.store.find_user(faculty.id).await.unwrap().unwrap();
    assert_eq!(stored.role, "faculty");

    let (status, _) = app
        .json(
            "PATCH",
            "/api/admin/users",
            Some(&admin),
            Some(json!({ "userId": faculty.id.to_string(), "role": "hod" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let stored = app.state.store.find_user(faculty.id).await.unwrap().unwrap();
    assert_eq!(stored.role, "hod");
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new();
    let (_, admin) = app.seed("admin@college.edu", Role::Admin).await;
    let (faculty, _) = app.seed("faculty@college.edu", Role::Faculty).await;

    let uri = format!("/api/admin/users?userId={}", faculty.id);
    let (status, _) = app.json("DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.state.store.find_user(faculty.id).await.unwrap().is_none());

    let (status, _) = app.json("DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.json("DELETE", "/api/admin/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing userId parameter");
}

#[tokio::test]
async fn test_faculty_cannot_administer_users() {
    let app = TestApp::new();
    let (_, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;

    let (status, body) = app.json("GET", "/api/admin/users", Some(&faculty), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_appraisal_submit_and_review() {
    let app = TestApp::new();
    let (_, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;
    let (_, hod) = app.seed("hod@college.edu", Role::Hod).await;

    let appraisal = app.create_appraisal(&faculty, "2024-25").await;
    assert_eq!(appraisal["status"], "draft");
    assert_eq!(appraisal["title"], "Faculty Appraisal 2024-25");
    let id = appraisal["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .json("POST", &format!("/api/appraisals/{}/submit", id), Some(&faculty), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appraisal"]["status"], "submitted");
    assert!(!body["appraisal"]["submitted_at"].is_null());
    assert_eq!(body["emailSent"], false);

    let (status, body) = app
        .json("POST", &format!("/api/appraisals/{}/submit", id), Some(&faculty), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    let status_uri = format!("/api/appraisals/{}/status", id);

    let (status, _) = app
        .json("PATCH", &status_uri, Some(&faculty), Some(json!({ "status": "approved" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .json("PATCH", &status_uri, Some(&hod), Some(json!({ "status": "finished" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STATUS");
    let (_, body) = app
        .json("GET", &format!("/api/appraisals/{}", id), Some(&hod), None)
        .await;
    assert_eq!(body["appraisal"]["status"], "submitted");

    let (status, body) = app
        .json("PATCH", &status_uri, Some(&hod), Some(json!({ "status": "approved" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appraisal"]["status"], "approved");
    assert!(!body["appraisal"]["approved_at"].is_null());
}

#[tokio::test]
async fn test_rejected_appraisal_can_be_resubmitted() {
    let app = TestApp::new();
    let (_, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;
    let (_, hod) = app.seed("hod@college.edu", Role::Hod).await;

    let id = app.create_appraisal(&faculty, "2023-24").await["id"]
        .as_str()
        .unwrap()
        .to_string();

    app.json("POST", &format!("/api/appraisals/{}/submit", id), Some(&faculty), None)
        .await;
    let (status, _) = app
        .json(
            "PATCH",
            &format!("/api/appraisals/{}/status", id),
            Some(&hod),
            Some(json!({ "status": "rejected" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .json("POST", &format!("/api/appraisals/{}/submit", id), Some(&faculty), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appraisal"]["status"], "submitted");
}

#[tokio::test]
async fn test_appraisal_visibility() {
    let app = TestApp::new();
    let (_, alice) = app.seed("alice@college.edu", Role::Faculty).await;
    let (_, bob) = app.seed("bob@college.edu", Role::Faculty).await;
    let (_, hod) = app.seed("hod@college.edu", Role::Hod).await;

    let alice_appraisal = app.create_appraisal(&alice, "2024-25").await;
    app.create_appraisal(&bob, "2024-25").await;

    let (_, body) = app.json("GET", "/api/appraisals", Some(&alice), None).await;
    assert_eq!(body["appraisals"].as_array().unwrap().len(), 1);

    let (_, body) = app.json("GET", "/api/appraisals", Some(&hod), None).await;
    assert_eq!(body["appraisals"].as_array().unwrap().len(), 2);

    let uri = format!("/api/appraisals/{}", alice_appraisal["id"].as_str().unwrap());
    let (status, _) = app.json("GET", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.json("GET", &uri, Some(&hod), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reviewer_comments() {
    let app = TestApp::new();
    let (_, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;
    let (_, hod) = app.seed("hod@college.edu", Role::Hod).await;

    let id = app.create_appraisal(&faculty, "2024-25").await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/appraisals/{}/comments", id);

    let (status, _) = app
        .json("POST", &uri, Some(&faculty), Some(json!({ "comment": "self praise" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .json("POST", &uri, Some(&hod), Some(json!({ "comment": "Add FDP certificates" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["comment"]["comment_type"], "general");

    let (status, body) = app.json("GET", &uri, Some(&faculty), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_map_fields() {
    let app = TestApp::new();
    let (_, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;

    let (status, body) = app
        .json("POST", "/api/map-fields", Some(&faculty), Some(json!({ "message": "hello there" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "mappings": [] }));

    let (status, body) = app
        .json("POST", "/api/map-fields", Some(&faculty), Some(json!({ "message": "   " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required.");
}

#[tokio::test]
async fn test_profile_section_and_reconcile() {
    let app = TestApp::new();
    let (user, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;
    let section = json!({ "name": "Asha", "email": "asha@college.edu" });

    let (status, _) = app
        .json("PUT", "/api/profile/part_a/personal_in", Some(&faculty), Some(section.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .json("GET", "/api/profile/part_a/personal_in", Some(&faculty), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], section);

    let reconcile_uri = "/api/profile/part_a/personal_in/reconcile";
    let (status, body) = app
        .json("POST", reconcile_uri, Some(&faculty), Some(json!({ "cache": section })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestion_count"], 0);
    assert_eq!(body["applied"], false);

    let (status, body) = app
        .json(
            "POST",
            reconcile_uri,
            Some(&faculty),
            Some(json!({
                "cache": { "name": "Asha K", "telephone": "98200", "role": "admin" },
                "apply": true
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestion_count"], 1);

    let stored = app.state.store.find_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.part_a["personal_in"]["name"], "Asha K");
    assert_eq!(stored.part_a["personal_in"]["telephone"], "98200");
    assert!(stored.part_a["personal_in"].get("role").is_none());
    assert_eq!(stored.role, "faculty");
}

#[tokio::test]
async fn test_reconcile_keeps_cache_to_section_fields() {
    let app = TestApp::new();
    let (user, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;

    let (status, _) = app
        .json(
            "PUT",
            "/api/profile/part_a/academic_qualifications",
            Some(&faculty),
            Some(json!([{ "examination": "", "subject": "CS" }])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .json(
            "POST",
            "/api/profile/part_a/academic_qualifications/reconcile",
            Some(&faculty),
            Some(json!({
                "cache": { "examination": "PhD", "email": "other@college.edu", "address": "Mumbai" },
                "apply": true
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestion_count"], 0);
    assert_eq!(body["reconciliation"]["rows"][0]["filled"], json!(["examination"]));

    let stored = app.state.store.find_user(user.id).await.unwrap().unwrap();
    assert_eq!(
        stored.part_a["academic_qualifications"],
        json!([{ "examination": "PhD", "subject": "CS" }])
    );
    assert!(stored.part_a.get("personal_in").is_none());
}

#[tokio::test]
async fn test_unknown_section_rejected() {
    let app = TestApp::new();
    let (_, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;

    let (status, _) = app
        .json("GET", "/api/profile/part_c/personal_in", Some(&faculty), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .json("PUT", "/api/profile/part_b/salary", Some(&faculty), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analysis_is_stored() {
    let app = TestApp::new();
    let (_, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;
    let id = app.create_appraisal(&faculty, "2024-25").await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, _) = app
        .json("POST", "/api/llm/analyze", Some(&faculty), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .json("POST", "/api/llm/analyze", Some(&faculty), Some(json!({ "appraisalId": id })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let score = body["analysis"]["overall_score"].as_u64().unwrap();
    assert!(score <= 100);

    let (_, body) = app
        .json("GET", &format!("/api/appraisals/{}", id), Some(&faculty), None)
        .await;
    assert_eq!(body["appraisal"]["llm_analysis"]["overall_score"].as_u64(), Some(score));
}

#[tokio::test]
async fn test_scrape_stores_publications() {
    let app = TestApp::new();
    let (user, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;

    let (status, body) = app
        .json("POST", "/api/scrape/ieee", Some(&faculty), Some(json!({ "query": "graph" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query and facultyId are required");

    let (status, body) = app
        .json(
            "POST",
            "/api/scrape/google-scholar",
            Some(&faculty),
            Some(json!({ "query": "graph neural networks", "facultyId": user.id.to_string() })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let found = body["publications"].as_array().unwrap().len();
    assert!((5..=14).contains(&found));
    assert_eq!(
        body["message"],
        format!("Found {} publications from Google Scholar", found)
    );

    let uri = format!("/api/publications?facultyId={}&source=google_scholar", user.id);
    let (_, body) = app.json("GET", &uri, Some(&faculty), None).await;
    assert_eq!(body["publications"].as_array().unwrap().len(), found);
}

#[tokio::test]
async fn test_scrape_for_someone_else_forbidden() {
    let app = TestApp::new();
    let (_, alice) = app.seed("alice@college.edu", Role::Faculty).await;
    let (bob, _) = app.seed("bob@college.edu", Role::Faculty).await;

    let (status, _) = app
        .json(
            "POST",
            "/api/scrape/ieee",
            Some(&alice),
            Some(json!({ "query": "graph", "facultyId": bob.id.to_string() })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_manual_publication() {
    let app = TestApp::new();
    let (_, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;

    let (status, body) = app
        .json(
            "POST",
            "/api/publications",
            Some(&faculty),
            Some(json!({ "title": "On Sparse Graphs", "authors": ["A. Rao"], "year": 2022 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["publication"]["source"], "manual");

    let (status, _) = app
        .json("POST", "/api/publications", Some(&faculty), Some(json!({ "title": "" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pbas_insights_from_profile_data() {
    let app = TestApp::new();
    let (_, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;

    let (status, body) = app
        .json(
            "POST",
            "/api/ai/pbas-insights",
            Some(&faculty),
            Some(json!({ "profileData": { "part_a": {}, "part_b": {} }, "analysisType": "full" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["analysisType"], "full");
    assert!(body["data"]["estimated_api_score"].is_u64());
}

#[tokio::test]
async fn test_password_reset_requires_email() {
    let app = TestApp::new();

    let (status, body) = app
        .json("POST", "/api/email/password-reset", None, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email is required");

    let (status, body) = app
        .json(
            "POST",
            "/api/email/password-reset",
            None,
            Some(json!({ "email": "nobody@college.edu" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emailSent"], false);
}

#[tokio::test]
async fn test_notification_without_mail_service() {
    let app = TestApp::new();
    let (_, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;
    let (_, hod) = app.seed("hod@college.edu", Role::Hod).await;
    let notification = json!({
        "recipientEmail": "anyone@example.com",
        "recipientName": "Anyone",
        "type": "form_approved"
    });

    let (status, body) = app
        .json("POST", "/api/email/send-notification", Some(&faculty), Some(notification))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, body) = app
        .json(
            "POST",
            "/api/email/send-notification",
            Some(&hod),
            Some(json!({
                "recipientEmail": "hod@college.edu",
                "recipientName": "Head",
                "type": "form_submitted"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["emailSent"], false);

    let (status, body) = app
        .json(
            "POST",
            "/api/email/send-notification",
            Some(&hod),
            Some(json!({ "recipientEmail": "hod@college.edu" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_FIELD");
}

#[tokio::test]
async fn test_appraisal_report_is_html() {
    let app = TestApp::new();
    let (_, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;
    let id = app.create_appraisal(&faculty, "2024-25").await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .send("GET", &format!("/api/reports/appraisals/{}", id), Some(&faculty), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("2024-25"));
    assert!(html.contains("Test User"));
}

#[tokio::test]
async fn test_summary_report_requires_reviewer() {
    let app = TestApp::new();
    let (_, faculty) = app.seed("faculty@college.edu", Role::Faculty).await;
    let (_, admin) = app.seed("admin@college.edu", Role::Admin).await;

    let response = app.send("GET", "/api/reports/summary", Some(&faculty), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.send("GET", "/api/reports/summary", Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_pbas_form_export() {
    let app = TestApp::new();
    let (faculty, faculty_token) = app.seed("faculty@college.edu", Role::Faculty).await;
    let (other, other_token) = app.seed("other@college.edu", Role::Faculty).await;
    let (_, hod) = app.seed("hod@college.edu", Role::Hod).await;

    let (status, _) = app
        .json(
            "PUT",
            "/api/profile/part_b/invited_lectures",
            Some(&faculty_token),
            Some(json!([{ "type": "Invited Lecture", "title": "Rust & Safety", "level": "National" }])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let response = app.send("GET", "/api/reports/pbas", Some(&faculty_token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("PBAS"));
    assert!(html.contains("<h3>Invited lectures</h3>"));
    assert!(html.contains("Rust &amp; Safety"));

    let uri = format!("/api/reports/pbas?userId={}", faculty.id);
    let response = app.send("GET", &uri, Some(&other_token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.send("GET", &uri, Some(&hod), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!("/api/reports/pbas?userId={}", other.id);
    app.state.store.delete_user(other.id).await.unwrap();
    let response = app.send("GET", &uri, Some(&hod), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_account_token_rejected() {
    let app = TestApp::new();
    let (faculty, token) = app.seed("faculty@college.edu", Role::Faculty).await;
    app.state.store.delete_user(faculty.id).await.unwrap();

    let (status, body) = app
        .json("POST", "/api/appraisals", Some(&token), Some(json!({ "academic_year": "2024-25" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let appraisals = app
        .state
        .store
        .list_appraisals(&Default::default())
        .await
        .unwrap();
    assert!(appraisals.is_empty());
}

#[tokio::test]
async fn test_role_change_applies_to_existing_token() {
    let app = TestApp::new();
    let (admin, admin_token) = app.seed("admin@college.edu", Role::Admin).await;
    let (_, other_admin) = app.seed("admin2@college.edu", Role::Admin).await;

    let (status, _) = app
        .json(
            "PATCH",
            "/api/admin/users",
            Some(&other_admin),
            Some(json!({ "userId": admin.id.to_string(), "role": "faculty" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.json("GET", "/api/admin/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_disabled_account_token_rejected() {
    let app = TestApp::new();
    let (mut faculty, token) = app.seed("faculty@college.edu", Role::Faculty).await;
    faculty.is_active = false;
    app.state.store.update_user(faculty).await.unwrap();

    let (status, body) = app.json("GET", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden: account is disabled");
}

#[tokio::test]
async fn test_malformed_input_returns_error_body() {
    let app = TestApp::new();
    let (_, admin) = app.seed("admin@college.edu", Role::Admin).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/admin/users")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .json("GET", "/api/appraisals/not-a-uuid", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    let (status, body) = app
        .json("POST", "/api/appraisals", Some(&admin), Some(json!({ "academic_year": 2024 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
