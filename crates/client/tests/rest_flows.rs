//! The REST store and identity provider driving the flows against a stub API.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use rocketlab_client::{ApiClient, ClientConfig, RestAuthProvider, RestLeadStore};
use rocketlab_core::auth_gate::{AuthProvider, AuthSnapshot, LOGIN_PATH};
use rocketlab_core::context::{FlowContext, NoticeKind, RecordingNotifier};
use rocketlab_core::lead::{ContactMethod, Lead, LeadStatus};
use rocketlab_core::store::LeadStore;
use rocketlab_core::submission::SubmissionFlow;
use rocketlab_core::triage::{MountOutcome, TriageBoard};

const ADMIN_TOKEN: &str = "token-admin";
const VIEWER_TOKEN: &str = "token-viewer";
const PASSWORD: &str = "right-password";

// ---------------------------------------------------------------------------
// Stub API
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct Stub {
    leads: Arc<Mutex<Vec<Lead>>>,
    inserted: Arc<Mutex<Vec<Value>>>,
    me_calls: Arc<AtomicUsize>,
    list_calls: Arc<AtomicUsize>,
    signed_out: Arc<AtomicBool>,
    fail_lists: Arc<AtomicBool>,
}

fn error(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "error": message, "code": code }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

impl Stub {
    /// Role of a live token, `None` when missing, unknown or signed out.
    fn role(&self, headers: &HeaderMap) -> Option<&'static str> {
        if self.signed_out.load(Ordering::SeqCst) {
            return None;
        }
        match bearer(headers) {
            Some(ADMIN_TOKEN) => Some("admin"),
            Some(VIEWER_TOKEN) => Some("viewer"),
            _ => None,
        }
    }
}

async fn submit(State(stub): State<Stub>, Json(body): Json<Value>) -> Response {
    stub.inserted.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(json!({ "data": body }))).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Invalid username or password");
    }
    let (token, role) = if body["username"] == "boss" {
        (ADMIN_TOKEN, "admin")
    } else {
        (VIEWER_TOKEN, "viewer")
    };
    Json(json!({
        "data": {
            "access_token": token,
            "expires_at": "2026-03-01T20:00:00Z",
            "user": { "id": 7, "username": body["username"], "role": role },
            "is_admin": role == "admin",
        }
    }))
    .into_response()
}

async fn me(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    stub.me_calls.fetch_add(1, Ordering::SeqCst);
    match stub.role(&headers) {
        Some(role) => Json(json!({
            "data": {
                "user": { "id": 7, "username": "someone", "role": role },
                "is_admin": role == "admin",
            }
        }))
        .into_response(),
        None => error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Session has ended"),
    }
}

async fn logout(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    if stub.role(&headers).is_none() {
        return error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Session has ended");
    }
    stub.signed_out.store(true, Ordering::SeqCst);
    StatusCode::NO_CONTENT.into_response()
}

async fn list(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    stub.list_calls.fetch_add(1, Ordering::SeqCst);
    match stub.role(&headers) {
        Some("admin") => {}
        Some(_) => return error(StatusCode::FORBIDDEN, "FORBIDDEN", "Lead triage is limited to admins"),
        None => return error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Missing Authorization header"),
    }
    if stub.fail_lists.load(Ordering::SeqCst) {
        return (StatusCode::BAD_GATEWAY, "upstream exploded").into_response();
    }
    let leads = stub.leads.lock().unwrap().clone();
    Json(json!({ "data": leads })).into_response()
}

async fn update_status(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Response {
    if stub.role(&headers) != Some("admin") {
        return error(StatusCode::FORBIDDEN, "FORBIDDEN", "Lead triage is limited to admins");
    }
    let Some(status) = body["status"].as_str().and_then(|s| LeadStatus::parse(s).ok()) else {
        return error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "bad status");
    };
    let mut leads = stub.leads.lock().unwrap();
    match leads.iter_mut().find(|l| l.id == id) {
        Some(lead) => {
            lead.status = status;
            Json(json!({ "data": lead })).into_response()
        }
        None => error(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            &format!("Lead with id {id} not found"),
        ),
    }
}

async fn spawn(stub: Stub) -> ApiClient {
    let app = Router::new()
        .route("/api/v1/leads", post(submit))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/admin/leads", get(list))
        .route("/api/v1/admin/leads/{id}/status", patch(update_status))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ApiClient::new(&ClientConfig::new(format!("http://{addr}"))).unwrap()
}

fn lead(n: u128, name: &str, status: LeadStatus, hours_ago: i64) -> Lead {
    let created = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() - Duration::hours(hours_ago);
    Lead {
        id: Uuid::from_u128(n),
        name: name.to_string(),
        contact: "@contact".to_string(),
        contact_method: ContactMethod::Telegram,
        budget: None,
        project: "project".to_string(),
        status,
        created_at: created,
        updated_at: created,
    }
}

fn seeded() -> Stub {
    let stub = Stub::default();
    *stub.leads.lock().unwrap() = vec![
        lead(1, "newest", LeadStatus::New, 1),
        lead(2, "middle", LeadStatus::Completed, 2),
        lead(3, "oldest", LeadStatus::New, 3),
    ];
    stub
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submission_posts_trimmed_payload_without_status() {
    let stub = Stub::default();
    let client = spawn(stub.clone()).await;
    let flow = SubmissionFlow::new(RestLeadStore::new(client));
    let notifier = RecordingNotifier::new();
    let auth = AuthSnapshot::anonymous();
    let ctx = FlowContext::new(&auth, &notifier);

    flow.update_form(|form| {
        form.name = " Иван ".to_string();
        form.contact_method = ContactMethod::Telegram;
        form.contact_value = "@ivan".to_string();
        form.budget_slider = 0;
        form.project = "Сайт-визитка".to_string();
    });
    flow.submit(&ctx).await.unwrap();

    let inserted = stub.inserted.lock().unwrap().clone();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0]["name"], "Иван");
    assert_eq!(inserted[0]["contact"], "@ivan");
    assert_eq!(inserted[0]["contact_method"], "telegram");
    assert_eq!(inserted[0]["budget"], "5 000 ₽");
    assert!(inserted[0].get("status").is_none());

    assert_eq!(notifier.last().unwrap().kind, NoticeKind::Success);
    assert!(flow.form().name.is_empty());
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn snapshot_without_token_skips_the_network() {
    let stub = Stub::default();
    let auth = RestAuthProvider::new(spawn(stub.clone()).await);

    assert_eq!(auth.snapshot().await.unwrap(), AuthSnapshot::anonymous());
    assert_eq!(stub.me_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wrong_password_surfaces_server_message() {
    let auth = RestAuthProvider::new(spawn(Stub::default()).await);

    let err = auth.login("boss", "nope").await.unwrap_err();
    assert_eq!(err.message, "Invalid username or password");
}

#[tokio::test]
async fn sign_out_revokes_and_forgets_token() {
    let stub = Stub::default();
    let client = spawn(stub.clone()).await;
    let auth = RestAuthProvider::new(client.clone());

    let snapshot = auth.login("boss", PASSWORD).await.unwrap();
    assert!(snapshot.is_admin);
    assert!(client.has_token());

    auth.sign_out().await.unwrap();
    assert!(stub.signed_out.load(Ordering::SeqCst));
    assert!(!client.has_token());
    assert_eq!(auth.snapshot().await.unwrap(), AuthSnapshot::anonymous());
}

#[tokio::test]
async fn ended_session_reads_as_anonymous() {
    let stub = Stub::default();
    let client = spawn(stub.clone()).await;
    let auth = RestAuthProvider::new(client.clone());
    auth.login("boss", PASSWORD).await.unwrap();

    // Revoked elsewhere, e.g. from another device.
    stub.signed_out.store(true, Ordering::SeqCst);

    assert_eq!(auth.snapshot().await.unwrap(), AuthSnapshot::anonymous());
    assert!(!client.has_token());
}

// ---------------------------------------------------------------------------
// Triage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_board_loads_and_updates_through_api() {
    let stub = seeded();
    let client = spawn(stub.clone()).await;
    let auth = RestAuthProvider::new(client.clone());
    auth.login("boss", PASSWORD).await.unwrap();

    let snapshot = auth.snapshot().await.unwrap();
    assert!(snapshot.is_admin);
    let notifier = RecordingNotifier::new();
    let ctx = FlowContext::new(&snapshot, &notifier);

    let mut board = TriageBoard::new(RestLeadStore::new(client));
    assert_eq!(board.mount(&ctx).await, MountOutcome::Loaded { count: 3 });
    let names: Vec<&str> = board.leads().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["newest", "middle", "oldest"]);

    board
        .set_status(&ctx, Uuid::from_u128(3), LeadStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(board.leads()[2].status, LeadStatus::Rejected);
    assert_eq!(stub.leads.lock().unwrap()[2].status, LeadStatus::Rejected);
    assert_eq!(stub.list_calls.load(Ordering::SeqCst), 1);

    let path = board.sign_out(&auth).await.unwrap();
    assert_eq!(path, LOGIN_PATH);
    assert!(board.leads().is_empty());
}

#[tokio::test]
async fn viewer_is_redirected_without_fetching() {
    let stub = seeded();
    let client = spawn(stub.clone()).await;
    let auth = RestAuthProvider::new(client.clone());
    auth.login("looker", PASSWORD).await.unwrap();

    let snapshot = auth.snapshot().await.unwrap();
    assert!(snapshot.current_user.is_some());
    assert!(!snapshot.is_admin);

    let notifier = RecordingNotifier::new();
    let ctx = FlowContext::new(&snapshot, &notifier);
    let mut board = TriageBoard::new(RestLeadStore::new(client));

    assert_eq!(board.mount(&ctx).await, MountOutcome::Redirect(LOGIN_PATH));
    assert_eq!(stub.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_lead_update_fails_and_keeps_board() {
    let stub = seeded();
    let client = spawn(stub.clone()).await;
    let auth = RestAuthProvider::new(client.clone());
    let snapshot = auth.login("boss", PASSWORD).await.unwrap();
    let notifier = RecordingNotifier::new();
    let ctx = FlowContext::new(&snapshot, &notifier);

    let mut board = TriageBoard::new(RestLeadStore::new(client));
    board.mount(&ctx).await;
    let before = board.leads().to_vec();

    let missing = Uuid::from_u128(99);
    let err = board
        .set_status(&ctx, missing, LeadStatus::Completed)
        .await
        .unwrap_err();
    assert!(err.0.message.contains("not found"));
    assert_eq!(board.leads(), before.as_slice());
    assert_eq!(notifier.last().unwrap().kind, NoticeKind::Error);
}

#[tokio::test]
async fn non_json_failure_becomes_fetch_failure() {
    let stub = seeded();
    stub.fail_lists.store(true, Ordering::SeqCst);
    let client = spawn(stub.clone()).await;
    let auth = RestAuthProvider::new(client.clone());
    let snapshot = auth.login("boss", PASSWORD).await.unwrap();

    let store = RestLeadStore::new(client);
    let err = store.list_newest_first().await.unwrap_err();
    assert_eq!(err.message, "upstream exploded");

    let notifier = RecordingNotifier::new();
    let ctx = FlowContext::new(&snapshot, &notifier);
    let mut board = TriageBoard::new(store);
    assert_matches!(board.mount(&ctx).await, MountOutcome::FetchFailed);
    assert!(board.leads().is_empty());
}
