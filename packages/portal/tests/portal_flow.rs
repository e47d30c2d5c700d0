//! Integration tests for the portal flows.
//!
//! Each test runs the real client against a local axum stub speaking the
//! backend's wire format, exercising the full pipeline: login, guard check,
//! authenticated fetch, 401 recovery, logout.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use medichain_client::{ApiClient, DoctorRegistration, Registration, Role};
use portal::{
    testing, AccessDecision, DenyReason, FileBackend, MemoryBackend, Portal, SessionState,
    SessionStore,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const PATIENT_ID: &str = "7b9f3f1e-8a8c-4f30-9f6f-3d2a9c1e5b10";
const DOCTOR_ID: &str = "0c6f2b14-5a4e-4d7b-8e21-9f0d3c5a7e42";

/// Helper to serve a router on an ephemeral port and return the API base URL.
async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

/// Helper to read the bearer token off a stubbed protected route.
fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Helper to build a memory-backed portal against a stub backend.
fn portal_over(base_url: String) -> Portal<MemoryBackend> {
    Portal::new(
        ApiClient::new().with_base_url(base_url),
        SessionStore::new(MemoryBackend::new()),
    )
}

fn patient_auth_body(access_token: &str) -> Json<Value> {
    Json(json!({
        "patient": {
            "id": PATIENT_ID,
            "full_name": "Pat Smith",
            "email": "pat@example.com",
            "created_at": "2025-01-05T10:00:00"
        },
        "access_token": access_token,
        "refresh_token": "refresh-1",
        "token_type": "bearer"
    }))
}

fn appointment_body(patient_id: &str) -> Value {
    json!({
        "id": "3f7c5a1b-2d4e-4f60-8a9b-1c2d3e4f5a6b",
        "patient_id": patient_id,
        "doctor_id": DOCTOR_ID,
        "appointment_date": "2025-03-01T09:30:00",
        "reason": "checkup",
        "notes": null,
        "status": "scheduled",
        "created_at": "2025-02-20T18:00:00"
    })
}

#[tokio::test]
async fn test_login_guard_fetch_logout_round_trip() {
    let app = Router::new()
        .route(
            "/api/patients/login",
            post(|| async { patient_auth_body("access-1") }),
        )
        .route(
            "/api/appointments/patient/:id",
            get(|Path(id): Path<String>, headers: HeaderMap| async move {
                if bearer(&headers) != Some("access-1") {
                    return (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"detail": "Not authenticated"})),
                    );
                }
                (StatusCode::OK, Json(json!([appointment_body(&id)])))
            }),
        );

    let portal = portal_over(spawn_backend(app).await);

    // Before login the guard denies.
    assert!(matches!(
        portal.authorize(Role::Patient).unwrap(),
        AccessDecision::Deny(DenyReason::NotAuthenticated)
    ));

    let session = portal
        .login(Role::Patient, "pat@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(session.access_token, "access-1");
    assert_eq!(session.profile.id, PATIENT_ID);

    assert!(matches!(
        portal.authorize(Role::Patient).unwrap(),
        AccessDecision::Allow(_)
    ));

    let appointments = portal.appointments(Role::Patient).await.unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].patient_id.to_string(), PATIENT_ID);
    assert_eq!(appointments[0].status, "scheduled");

    portal.logout(Role::Patient).unwrap();
    assert!(matches!(
        portal.authorize(Role::Patient).unwrap(),
        AccessDecision::Deny(DenyReason::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_expired_token_triggers_single_refresh_and_retry() {
    let refresh_calls = Arc::new(AtomicUsize::new(0));
    let list_calls = Arc::new(AtomicUsize::new(0));

    let rc = refresh_calls.clone();
    let lc = list_calls.clone();

    let app = Router::new()
        .route(
            "/api/patients/login",
            post(|| async { patient_auth_body("access-stale") }),
        )
        .route(
            "/api/patients/refresh-token",
            get(move |headers: HeaderMap| {
                let rc = rc.clone();
                async move {
                    rc.fetch_add(1, Ordering::SeqCst);
                    if bearer(&headers) == Some("refresh-1") {
                        (
                            StatusCode::OK,
                            Json(json!({"new_access_token": "access-good"})),
                        )
                    } else {
                        (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({"detail": "Invalid refresh token"})),
                        )
                    }
                }
            }),
        )
        .route(
            "/api/appointments/patient/:id",
            get(move |Path(id): Path<String>, headers: HeaderMap| {
                let lc = lc.clone();
                async move {
                    lc.fetch_add(1, Ordering::SeqCst);
                    if bearer(&headers) != Some("access-good") {
                        return (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({"detail": "Not authenticated"})),
                        );
                    }
                    (StatusCode::OK, Json(json!([appointment_body(&id)])))
                }
            }),
        );

    let portal = portal_over(spawn_backend(app).await);
    portal
        .login(Role::Patient, "pat@example.com", "secret1")
        .await
        .unwrap();

    let appointments = portal.appointments(Role::Patient).await.unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(list_calls.load(Ordering::SeqCst), 2);

    // The refreshed token was persisted for later operations.
    match portal.sessions().read(Role::Patient).unwrap() {
        SessionState::Present(session) => assert_eq!(session.access_token, "access-good"),
        other => panic!("expected Present, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_refresh_surfaces_refresh_error() {
    let app = Router::new()
        .route(
            "/api/doctors/refresh-token",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"detail": "Invalid refresh token"})),
                )
            }),
        )
        .route(
            "/api/appointments/doctor/:id",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"detail": "Not authenticated"})),
                )
            }),
        );

    let portal = portal_over(spawn_backend(app).await);
    portal
        .sessions()
        .write(Role::Doctor, &testing::sample_session(Role::Doctor))
        .unwrap();

    let err = portal.appointments(Role::Doctor).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid refresh token");
}

#[tokio::test]
async fn test_non_401_error_does_not_refresh() {
    let refresh_calls = Arc::new(AtomicUsize::new(0));
    let rc = refresh_calls.clone();

    let app = Router::new()
        .route(
            "/api/patients/refresh-token",
            get(move || {
                let rc = rc.clone();
                async move {
                    rc.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"new_access_token": "access-good"}))
                }
            }),
        )
        .route(
            "/api/prescriptions/patient/:id",
            get(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"detail": "Unknown patient"})),
                )
            }),
        );

    let portal = portal_over(spawn_backend(app).await);
    portal
        .sessions()
        .write(Role::Patient, &testing::sample_session(Role::Patient))
        .unwrap();

    let err = portal.prescriptions(Role::Patient).await.unwrap_err();
    assert_eq!(err.to_string(), "Unknown patient");
    assert_eq!(refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_delete_account_clears_session() {
    let app = Router::new().route(
        "/api/patients/delete-account",
        delete(|headers: HeaderMap| async move {
            if bearer(&headers) != Some("access-patient") {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"detail": "Not authenticated"})),
                );
            }
            (
                StatusCode::OK,
                Json(json!({"message": "Account deleted successfully"})),
            )
        }),
    );

    let portal = portal_over(spawn_backend(app).await);
    portal
        .sessions()
        .write(Role::Patient, &testing::sample_session(Role::Patient))
        .unwrap();

    portal.delete_account(Role::Patient).await.unwrap();

    assert!(matches!(
        portal.authorize(Role::Patient).unwrap(),
        AccessDecision::Deny(DenyReason::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_signup_creates_session_for_its_role_only() {
    let app = Router::new().route(
        "/api/doctors/signup",
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "doctor": {
                    "id": DOCTOR_ID,
                    "full_name": body["full_name"],
                    "email": body["email"],
                    "specialization": body["specialization"],
                    "hospital_name": body["hospital_name"],
                    "created_at": "2025-01-05T10:00:00"
                },
                "access_token": "access-2",
                "refresh_token": "refresh-2",
                "token_type": "bearer"
            }))
        }),
    );

    let portal = portal_over(spawn_backend(app).await);
    let session = portal
        .signup(&Registration::Doctor(DoctorRegistration {
            full_name: "Dr. Chen".into(),
            email: "chen@example.com".into(),
            password: "secret1".into(),
            specialization: "Cardiology".into(),
            hospital_name: "General Hospital".into(),
            phone: None,
        }))
        .await
        .unwrap();
    assert_eq!(session.profile.id, DOCTOR_ID);
    assert_eq!(session.profile.field("specialization"), Some("Cardiology"));

    assert!(matches!(
        portal.authorize(Role::Doctor).unwrap(),
        AccessDecision::Allow(_)
    ));
    assert!(matches!(
        portal.authorize(Role::Patient).unwrap(),
        AccessDecision::Deny(DenyReason::NotAuthenticated)
    ));
}

#[test]
fn test_file_backed_session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = SessionStore::new(FileBackend::open(dir.path()).unwrap());
        store
            .write(Role::Patient, &testing::sample_session(Role::Patient))
            .unwrap();
    }

    let store = SessionStore::new(FileBackend::open(dir.path()).unwrap());
    match store.authorize(Role::Patient).unwrap() {
        AccessDecision::Allow(session) => {
            assert_eq!(session.access_token, "access-patient");
            assert_eq!(session.profile.field("full_name"), Some("Pat Smith"));
        }
        AccessDecision::Deny(reason) => panic!("expected allow, got {:?}", reason),
    }
}
