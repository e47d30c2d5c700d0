//! Role-scoped session persistence.
//!
//! The store owns the three-entry key layout, profile serialization and
//! corruption detection; the storage backend underneath only moves strings.
//! Patient and doctor sessions live side by side under disjoint keys and
//! never touch each other.

use medichain_client::{Role, UserProfile};
use tracing::debug;

use crate::error::StorageResult;
use crate::storage::StorageBackend;

const ACCESS_TOKEN: &str = "access_token";
const REFRESH_TOKEN: &str = "refresh_token";
const DATA: &str = "data";

/// An authenticated session for one role.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub profile: UserProfile,
}

/// Outcome of reading a role's stored session.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// All three entries present, profile parsed and carrying an id.
    Present(Session),
    /// At least one entry missing. Nothing to clean up.
    Absent,
    /// All entries present but the profile does not parse to a record with an
    /// id. The stored state is unusable and worth clearing.
    Corrupt,
}

/// Role-scoped session store over an injected backend.
pub struct SessionStore<B> {
    backend: B,
}

impl<B: StorageBackend> SessionStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Borrow the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn key(role: Role, suffix: &str) -> String {
        format!("{}_{}", role.as_str(), suffix)
    }

    /// Persist a full session for `role`.
    ///
    /// No validation happens here; reading validates.
    pub fn write(&self, role: Role, session: &Session) -> StorageResult<()> {
        let data = serde_json::to_string(&session.profile)?;
        self.backend
            .set(&Self::key(role, ACCESS_TOKEN), &session.access_token)?;
        self.backend
            .set(&Self::key(role, REFRESH_TOKEN), &session.refresh_token)?;
        self.backend.set(&Self::key(role, DATA), &data)?;
        Ok(())
    }

    /// Replace only the access token, as the refresh flow does. Refresh token
    /// and profile entries stay untouched.
    pub fn set_access_token(&self, role: Role, token: &str) -> StorageResult<()> {
        self.backend.set(&Self::key(role, ACCESS_TOKEN), token)
    }

    /// Read the stored state for `role`. Never mutates storage.
    pub fn read(&self, role: Role) -> StorageResult<SessionState> {
        let Some(access_token) = self.backend.get(&Self::key(role, ACCESS_TOKEN))? else {
            return Ok(SessionState::Absent);
        };
        let Some(refresh_token) = self.backend.get(&Self::key(role, REFRESH_TOKEN))? else {
            return Ok(SessionState::Absent);
        };
        let Some(data) = self.backend.get(&Self::key(role, DATA))? else {
            return Ok(SessionState::Absent);
        };

        let profile: UserProfile = match serde_json::from_str(&data) {
            Ok(profile) => profile,
            Err(err) => {
                debug!(%role, error = %err, "stored profile does not parse");
                return Ok(SessionState::Corrupt);
            }
        };
        if profile.id.is_empty() {
            debug!(%role, "stored profile has no id");
            return Ok(SessionState::Corrupt);
        }

        Ok(SessionState::Present(Session {
            access_token,
            refresh_token,
            profile,
        }))
    }

    /// Remove exactly this role's three entries.
    pub fn clear(&self, role: Role) -> StorageResult<()> {
        self.backend.remove(&Self::key(role, ACCESS_TOKEN))?;
        self.backend.remove(&Self::key(role, REFRESH_TOKEN))?;
        self.backend.remove(&Self::key(role, DATA))?;
        Ok(())
    }
}
