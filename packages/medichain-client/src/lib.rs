//! Pure MediChain REST API client
//!
//! A clean, minimal client for the MediChain backend with no session logic.
//! Covers both portal roles: signup, login, token refresh, appointments,
//! prescriptions, lab reports, audit logs and care assignments.
//!
//! # Example
//!
//! ```rust,ignore
//! use medichain_client::{ApiClient, Credentials, Role};
//!
//! let client = ApiClient::from_env();
//!
//! let auth = client
//!     .login(Role::Patient, &Credentials {
//!         email: "pat@example.com".into(),
//!         password: "secret1".into(),
//!     })
//!     .await?;
//!
//! let appointments = client
//!     .appointments(&auth.access_token, Role::Patient, &auth.user.id)
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{ApiError, Result};
pub use types::*;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::resolve_error_message;

/// Default backend address, matching a locally run MediChain server.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Environment variable overriding the backend address.
pub const API_URL_ENV: &str = "MEDICHAIN_API_URL";

/// Pure MediChain API client.
#[derive(Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    /// Create a client pointed at [`DEFAULT_API_URL`].
    pub fn new() -> Self {
        Self {
            http_client: Client::new(),
            base_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Create from the `MEDICHAIN_API_URL` environment variable, falling back
    /// to [`DEFAULT_API_URL`] when unset.
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.is_empty() => Self::new().with_base_url(url),
            _ => Self::new(),
        }
    }

    /// Set a custom base URL (tests, staging deployments).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Turn a non-2xx response into [`ApiError::Http`] with a resolved message.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = resolve_error_message(status, &body);
        warn!(status = %status, message = %message, "MediChain API error");
        Err(ApiError::Http { status, message })
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "MediChain request failed");
            ApiError::Network(e)
        })?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn execute_empty(&self, request: RequestBuilder) -> Result<()> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "MediChain request failed");
            ApiError::Network(e)
        })?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Register a new account. The payload variant picks the role.
    pub async fn signup(&self, registration: &Registration) -> Result<AuthResponse> {
        let role = registration.role();
        let raw: AuthResponseRaw = self
            .execute(
                self.request(Method::POST, &format!("/{}/signup", role.collection()))
                    .json(registration),
            )
            .await?;
        raw.into_response(role)
            .ok_or_else(|| ApiError::Parse(format!("signup response missing {} profile", role)))
    }

    /// Log in with email and password.
    pub async fn login(&self, role: Role, credentials: &Credentials) -> Result<AuthResponse> {
        let raw: AuthResponseRaw = self
            .execute(
                self.request(Method::POST, &format!("/{}/login", role.collection()))
                    .json(credentials),
            )
            .await?;
        raw.into_response(role)
            .ok_or_else(|| ApiError::Parse(format!("login response missing {} profile", role)))
    }

    /// Exchange a refresh token for a fresh access token. The refresh token
    /// itself rides in the bearer header.
    pub async fn refresh_token(&self, role: Role, refresh_token: &str) -> Result<RefreshResponse> {
        self.execute(
            self.request(Method::GET, &format!("/{}/refresh-token", role.collection()))
                .bearer_auth(refresh_token),
        )
        .await
    }

    /// Appointments for one side of the schedule.
    pub async fn appointments(
        &self,
        token: &str,
        role: Role,
        user_id: &str,
    ) -> Result<Vec<Appointment>> {
        self.execute(
            self.request(Method::GET, &format!("/appointments/{}/{}", role, user_id))
                .bearer_auth(token),
        )
        .await
    }

    /// Book an appointment.
    pub async fn create_appointment(
        &self,
        token: &str,
        appointment: &NewAppointment,
    ) -> Result<Appointment> {
        self.execute(
            self.request(Method::POST, "/appointments/")
                .bearer_auth(token)
                .json(appointment),
        )
        .await
    }

    /// Prescriptions issued to a patient, or by a doctor.
    pub async fn prescriptions(
        &self,
        token: &str,
        role: Role,
        user_id: &str,
    ) -> Result<Vec<Prescription>> {
        self.execute(
            self.request(Method::GET, &format!("/prescriptions/{}/{}", role, user_id))
                .bearer_auth(token),
        )
        .await
    }

    /// Write a prescription.
    pub async fn create_prescription(
        &self,
        token: &str,
        prescription: &NewPrescription,
    ) -> Result<Prescription> {
        self.execute(
            self.request(Method::POST, "/prescriptions/")
                .bearer_auth(token)
                .json(prescription),
        )
        .await
    }

    /// Lab reports uploaded for a patient.
    pub async fn lab_reports(&self, token: &str, patient_id: &str) -> Result<Vec<LabReport>> {
        self.execute(
            self.request(Method::GET, &format!("/lab-reports/patient/{}", patient_id))
                .bearer_auth(token),
        )
        .await
    }

    /// Audit trail entries recorded for an actor.
    pub async fn audit_logs(&self, token: &str, actor_id: &str) -> Result<Vec<AuditLog>> {
        self.execute(
            self.request(Method::GET, &format!("/audit-logs/actor/{}", actor_id))
                .bearer_auth(token),
        )
        .await
    }

    /// Care assignments seen from either side of the doctor-patient link.
    pub async fn care_links(&self, token: &str, role: Role, user_id: &str) -> Result<Vec<CareLink>> {
        self.execute(
            self.request(Method::GET, &format!("/doctor-patient/{}/{}", role, user_id))
                .bearer_auth(token),
        )
        .await
    }

    /// Permanently delete the authenticated account.
    pub async fn delete_account(&self, token: &str, role: Role) -> Result<()> {
        self.execute_empty(
            self.request(Method::DELETE, &format!("/{}/delete-account", role.collection()))
                .bearer_auth(token),
        )
        .await
    }
}
