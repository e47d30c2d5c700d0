//! Pre-view authorization check.
//!
//! The guard turns a stored-session read into a pure decision. Notification
//! and navigation stay with the caller; the only storage side effect is
//! clearing a corrupt session so the next check starts clean.

use medichain_client::Role;
use tracing::debug;

use crate::error::StorageResult;
use crate::session::{Session, SessionState, SessionStore};
use crate::storage::StorageBackend;

/// Outcome of a guard check for one role.
#[derive(Debug, Clone)]
pub enum AccessDecision {
    /// The stored session is usable; carry it into the protected operation.
    Allow(Session),
    /// Entry refused; the caller should send the user to [`login_route`].
    Deny(DenyReason),
}

/// Why entry was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No stored session for the role.
    NotAuthenticated,
    /// A stored session was present but unusable; it has been cleared.
    InvalidSession,
}

/// Login route a denied caller should redirect to.
pub fn login_route(role: Role) -> String {
    format!("/{}/login", role)
}

impl<B: StorageBackend> SessionStore<B> {
    /// Check whether `role` may enter a protected operation.
    ///
    /// Absent sessions are denied without touching storage. Corrupt sessions
    /// are cleared before denial, so a repeat check with unchanged storage
    /// returns the same class of decision and never re-clears.
    pub fn authorize(&self, role: Role) -> StorageResult<AccessDecision> {
        match self.read(role)? {
            SessionState::Present(session) => Ok(AccessDecision::Allow(session)),
            SessionState::Absent => {
                debug!(%role, "no stored session");
                Ok(AccessDecision::Deny(DenyReason::NotAuthenticated))
            }
            SessionState::Corrupt => {
                debug!(%role, "clearing corrupt session");
                self.clear(role)?;
                Ok(AccessDecision::Deny(DenyReason::InvalidSession))
            }
        }
    }
}
