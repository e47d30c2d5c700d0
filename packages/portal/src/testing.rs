//! Test fixtures for session and flow tests.
//!
//! Useful for testing applications that embed the portal without a real
//! backend or persistent storage.

use medichain_client::{Role, UserProfile};
use serde_json::json;

use crate::session::{Session, SessionStore};
use crate::storage::{MemoryBackend, StorageBackend};

/// A parsed profile in the backend's shape for the given role.
pub fn sample_profile(role: Role) -> UserProfile {
    let value = match role {
        Role::Patient => json!({
            "id": "7b9f3f1e-8a8c-4f30-9f6f-3d2a9c1e5b10",
            "full_name": "Pat Smith",
            "email": "pat@example.com",
            "created_at": "2025-01-05T10:00:00"
        }),
        Role::Doctor => json!({
            "id": "0c6f2b14-5a4e-4d7b-8e21-9f0d3c5a7e42",
            "full_name": "Dr. Chen",
            "email": "chen@example.com",
            "specialization": "Cardiology",
            "hospital_name": "General Hospital",
            "created_at": "2025-01-05T10:00:00"
        }),
    };
    serde_json::from_value(value).unwrap()
}

/// A full session with `access-{role}` / `refresh-{role}` tokens.
pub fn sample_session(role: Role) -> Session {
    Session {
        access_token: format!("access-{}", role),
        refresh_token: format!("refresh-{}", role),
        profile: sample_profile(role),
    }
}

/// An in-memory store already holding a valid session for `role`.
pub fn logged_in_store(role: Role) -> SessionStore<MemoryBackend> {
    let store = SessionStore::new(MemoryBackend::new());
    store.write(role, &sample_session(role)).unwrap();
    store
}

/// An in-memory store holding tokens plus an arbitrary raw profile entry,
/// for exercising the corrupt-session paths.
pub fn corrupted_store(role: Role, raw_profile: &str) -> SessionStore<MemoryBackend> {
    let backend = MemoryBackend::new();
    backend
        .set(&format!("{}_access_token", role), "access-stale")
        .unwrap();
    backend
        .set(&format!("{}_refresh_token", role), "refresh-stale")
        .unwrap();
    backend.set(&format!("{}_data", role), raw_profile).unwrap();
    SessionStore::new(backend)
}
