use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Portal role. The backend keeps a separate account table per role, so the
/// role travels with every session and selects the URL collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
}

impl Role {
    /// Singular lowercase name, used in storage keys and login routes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
        }
    }

    /// Plural URL segment for role-scoped endpoints.
    pub fn collection(&self) -> &'static str {
        match self {
            Role::Patient => "patients",
            Role::Doctor => "doctors",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated account profile as returned by the backend.
///
/// Only `id` is interpreted by the session layer. The remaining fields differ
/// per role (patients carry `date_of_birth`, doctors `specialization`) and are
/// kept as raw JSON for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl UserProfile {
    /// Looks up a role-specific field as a string, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.rest.get(name).and_then(Value::as_str)
    }
}

/// Login payload, identical for both roles.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Patient signup payload.
#[derive(Debug, Clone, Serialize)]
pub struct PatientRegistration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Doctor signup payload.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorRegistration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub specialization: String,
    pub hospital_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Role-discriminated signup payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Registration {
    Patient(PatientRegistration),
    Doctor(DoctorRegistration),
}

impl Registration {
    pub fn role(&self) -> Role {
        match self {
            Registration::Patient(_) => Role::Patient,
            Registration::Doctor(_) => Role::Doctor,
        }
    }
}

/// Wire shape of the signup and login responses. The profile arrives under a
/// role-named key (`patient` or `doctor`).
#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponseRaw {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub patient: Option<UserProfile>,
    #[serde(default)]
    pub doctor: Option<UserProfile>,
}

impl AuthResponseRaw {
    /// Folds the role-keyed wire shape into a uniform response. `None` when
    /// the expected profile key is missing.
    pub(crate) fn into_response(self, role: Role) -> Option<AuthResponse> {
        let user = match role {
            Role::Patient => self.patient,
            Role::Doctor => self.doctor,
        }?;
        Some(AuthResponse {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            user,
        })
    }
}

/// Tokens plus profile from a successful signup or login.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

/// Body of the refresh endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub new_access_token: String,
}

/// A scheduled appointment between a patient and a doctor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDateTime,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// Payload for booking an appointment.
#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// An issued prescription. `medication` is a JSON-encoded list of drug names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub medication: String,
    pub dosage: String,
    #[serde(default)]
    pub instructions: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Payload for writing a prescription.
#[derive(Debug, Clone, Serialize)]
pub struct NewPrescription {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub medication: String,
    pub dosage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// An uploaded lab report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabReport {
    pub id: Uuid,
    pub patient_id: Uuid,
    #[serde(default)]
    pub doctor_id: Option<Uuid>,
    pub file_url: String,
    pub report_type: String,
    pub uploaded_at: NaiveDateTime,
}

/// One entry from the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub action: String,
    pub target_type: String,
    #[serde(default)]
    pub target_id: Option<Uuid>,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// A doctor-patient care assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareLink {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub assigned_at: NaiveDateTime,
    pub relationship_type: String,
    pub is_active: bool,
}
