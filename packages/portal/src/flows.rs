//! Portal flows: auth plus the authenticated dashboard operations.
//!
//! Each operation is an authorize, token, client-call pipeline. When the
//! backend rejects an access token with 401 the flow refreshes once and
//! retries once; the pure client underneath stays one call, one attempt.

use std::future::Future;

use medichain_client::{
    ApiClient, Appointment, AuditLog, CareLink, Credentials, LabReport, NewAppointment,
    NewPrescription, Prescription, Registration, Role,
};
use tracing::{debug, info};

use crate::error::{PortalError, Result};
use crate::guard::AccessDecision;
use crate::session::{Session, SessionStore};
use crate::storage::StorageBackend;

/// The portal: an API client plus a session store for one storage backend.
pub struct Portal<B> {
    client: ApiClient,
    sessions: SessionStore<B>,
}

impl<B: StorageBackend> Portal<B> {
    /// Build a portal over an API client and a session store.
    pub fn new(client: ApiClient, sessions: SessionStore<B>) -> Self {
        Self { client, sessions }
    }

    /// The session store, for guard checks and direct reads.
    pub fn sessions(&self) -> &SessionStore<B> {
        &self.sessions
    }

    /// The underlying API client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Guard check for `role`; see [`SessionStore::authorize`].
    pub fn authorize(&self, role: Role) -> Result<AccessDecision> {
        Ok(self.sessions.authorize(role)?)
    }

    /// Log `role` in and persist the session.
    ///
    /// Empty input is rejected before any network call. On success the
    /// session is stored, so a following `authorize(role)` allows.
    pub async fn login(&self, role: Role, email: &str, password: &str) -> Result<Session> {
        if email.is_empty() || password.is_empty() {
            return Err(PortalError::Validation("Please fill in all fields".into()));
        }

        let auth = self
            .client
            .login(
                role,
                &Credentials {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        let session = Session {
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            profile: auth.user,
        };
        self.sessions.write(role, &session)?;
        info!(%role, user = %session.profile.id, "logged in");
        Ok(session)
    }

    /// Register a new account and persist the resulting session.
    pub async fn signup(&self, registration: &Registration) -> Result<Session> {
        let role = registration.role();
        let auth = self.client.signup(registration).await?;
        let session = Session {
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            profile: auth.user,
        };
        self.sessions.write(role, &session)?;
        info!(%role, user = %session.profile.id, "registered");
        Ok(session)
    }

    /// Exchange the stored refresh token for a fresh access token.
    ///
    /// The backend does not rotate refresh tokens; only the access token
    /// entry changes. Errors when no usable session is stored.
    pub async fn refresh(&self, role: Role) -> Result<Session> {
        let mut session = self.require_session(role)?;
        let refreshed = self
            .client
            .refresh_token(role, &session.refresh_token)
            .await?;
        self.sessions
            .set_access_token(role, &refreshed.new_access_token)?;
        session.access_token = refreshed.new_access_token;
        debug!(%role, "access token refreshed");
        Ok(session)
    }

    /// Drop the stored session. No backend call is made.
    pub fn logout(&self, role: Role) -> Result<()> {
        self.sessions.clear(role)?;
        info!(%role, "logged out");
        Ok(())
    }

    /// Appointments for the logged-in user.
    pub async fn appointments(&self, role: Role) -> Result<Vec<Appointment>> {
        self.with_session(role, |s| async move {
            self.client
                .appointments(&s.access_token, role, &s.profile.id)
                .await
        })
        .await
    }

    /// Book an appointment.
    pub async fn book_appointment(
        &self,
        role: Role,
        appointment: &NewAppointment,
    ) -> Result<Appointment> {
        self.with_session(role, |s| async move {
            self.client
                .create_appointment(&s.access_token, appointment)
                .await
        })
        .await
    }

    /// Prescriptions issued to a patient, or by a doctor.
    pub async fn prescriptions(&self, role: Role) -> Result<Vec<Prescription>> {
        self.with_session(role, |s| async move {
            self.client
                .prescriptions(&s.access_token, role, &s.profile.id)
                .await
        })
        .await
    }

    /// Write a prescription.
    pub async fn write_prescription(
        &self,
        role: Role,
        prescription: &NewPrescription,
    ) -> Result<Prescription> {
        self.with_session(role, |s| async move {
            self.client
                .create_prescription(&s.access_token, prescription)
                .await
        })
        .await
    }

    /// Lab reports uploaded for the logged-in user.
    pub async fn medical_history(&self, role: Role) -> Result<Vec<LabReport>> {
        self.with_session(role, |s| async move {
            self.client.lab_reports(&s.access_token, &s.profile.id).await
        })
        .await
    }

    /// Audit trail entries recorded for the logged-in user.
    pub async fn audit_logs(&self, role: Role) -> Result<Vec<AuditLog>> {
        self.with_session(role, |s| async move {
            self.client.audit_logs(&s.access_token, &s.profile.id).await
        })
        .await
    }

    /// Care assignments for the logged-in user.
    pub async fn care_team(&self, role: Role) -> Result<Vec<CareLink>> {
        self.with_session(role, |s| async move {
            self.client
                .care_links(&s.access_token, role, &s.profile.id)
                .await
        })
        .await
    }

    /// Permanently delete the logged-in account, then drop the local session.
    pub async fn delete_account(&self, role: Role) -> Result<()> {
        self.with_session(role, |s| async move {
            self.client.delete_account(&s.access_token, role).await
        })
        .await?;
        self.sessions.clear(role)?;
        info!(%role, "account deleted");
        Ok(())
    }

    fn require_session(&self, role: Role) -> Result<Session> {
        match self.sessions.authorize(role)? {
            AccessDecision::Allow(session) => Ok(session),
            AccessDecision::Deny(_) => Err(PortalError::SessionRequired { role }),
        }
    }

    /// Run one authenticated call with single-refresh 401 recovery.
    ///
    /// The first 401 triggers one refresh and one retry. A second 401
    /// surfaces the original error; any other failure surfaces as is.
    async fn with_session<T, F, Fut>(&self, role: Role, call: F) -> Result<T>
    where
        F: Fn(Session) -> Fut,
        Fut: Future<Output = medichain_client::Result<T>>,
    {
        let session = self.require_session(role)?;
        match call(session).await {
            Err(err) if err.is_unauthorized() => {
                debug!(%role, "access token rejected, refreshing once");
                let refreshed = self.refresh(role).await?;
                match call(refreshed).await {
                    Err(retry) if retry.is_unauthorized() => Err(err.into()),
                    other => other.map_err(Into::into),
                }
            }
            other => other.map_err(Into::into),
        }
    }
}
