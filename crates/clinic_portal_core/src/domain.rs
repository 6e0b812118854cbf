//! crates/clinic_portal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the portal client.
//! These structs are independent of any wire or storage format.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

/// The role an authenticated identity plays in the clinic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Patient,
    Doctor,
    Unknown,
}

impl Role {
    /// Maps the backend's `user_type` value onto a role. Anything that is
    /// not exactly a patient or a doctor is `Unknown`.
    pub fn from_user_type(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "patient" => Role::Patient,
            "doctor" => Role::Doctor,
            _ => Role::Unknown,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Patient => write!(f, "patient"),
            Role::Doctor => write!(f, "doctor"),
            Role::Unknown => write!(f, "unknown"),
        }
    }
}

/// The access/refresh pair issued by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// What survives between runs in the session store. The role is never
/// persisted; it is resolved again on every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    pub tokens: TokenPair,
    pub username: Option<String>,
}

/// The authenticated client's token pair plus resolved role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub tokens: TokenPair,
    pub username: Option<String>,
    pub role: Role,
}

impl Session {
    pub fn access_token(&self) -> &str {
        &self.tokens.access
    }

    /// Doctors are greeted with their title.
    pub fn display_name(&self) -> String {
        let name = self.username.as_deref().unwrap_or("");
        match self.role {
            Role::Doctor => format!("Dr. {}", name),
            _ => name.to_string(),
        }
    }
}

/// A free-text annotation a doctor attached to one health record.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorNote {
    pub id: Option<i64>,
    pub note: String,
    pub doctor_name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// A transient copy of a backend-owned health record.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub patient: Option<i64>,
    pub doctor_notes: Vec<DoctorNote>,
}

/// The editable part of a health record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub title: String,
    pub description: String,
}

impl RecordDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

impl From<&HealthRecord> for RecordDraft {
    fn from(record: &HealthRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
        }
    }
}

/// A patient as seen from a doctor's patient list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: String,
    pub address: String,
}

impl PatientProfile {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// A doctor a new patient can register under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableDoctor {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Which kind of account a registration creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Patient,
    Doctor,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Patient => "patient",
            AccountKind::Doctor => "doctor",
        }
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(AccountKind::Patient),
            "doctor" => Ok(AccountKind::Doctor),
            other => Err(format!("'{}' is not an account type", other)),
        }
    }
}

/// A validated registration, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub kind: AccountKind,
    pub doctor_id: Option<i64>,
}

/// What the backend reported about a successful registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub message: Option<String>,
    /// Username of the doctor the new patient was assigned to, if any.
    pub doctor: Option<String>,
}
