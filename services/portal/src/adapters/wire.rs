//! services/portal/src/adapters/wire.rs
//!
//! The JSON shapes the backend speaks, and their conversion to the core's
//! domain types. Nothing outside the adapters sees these structs.

use chrono::{DateTime, NaiveDate, Utc};
use clinic_portal_core::domain::{
    AccountKind, AvailableDoctor, DoctorNote, HealthRecord, PatientProfile, Registration,
    RegistrationReceipt, TokenPair,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Request Payloads
//=========================================================================================

#[derive(Serialize)]
pub struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct RecordPayload<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

#[derive(Serialize)]
pub struct NotePayload<'a> {
    pub note: &'a str,
}

//=========================================================================================
// Registration Builders
//=========================================================================================

/// The two registration contracts seen in the wild. They are kept apart
/// because it is not known which one the backend honours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationShape {
    /// `POST /register/` with flat fields and `user_type`.
    Flat,
    /// `POST /patients/` or `/doctors/` with a nested `user` object and
    /// role-specific profile defaults.
    Nested,
}

impl FromStr for RegistrationShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(RegistrationShape::Flat),
            "nested" => Ok(RegistrationShape::Nested),
            other => Err(format!("'{}' is not a registration shape (flat|nested)", other)),
        }
    }
}

impl fmt::Display for RegistrationShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationShape::Flat => write!(f, "flat"),
            RegistrationShape::Nested => write!(f, "nested"),
        }
    }
}

/// Where a registration goes and what it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationRequest {
    pub path: String,
    pub body: Value,
}

impl RegistrationShape {
    pub fn build(&self, registration: &Registration) -> RegistrationRequest {
        self.build_on(registration, Utc::now().date_naive())
    }

    /// `today` fills the nested patient profile's date of birth.
    pub fn build_on(&self, registration: &Registration, today: NaiveDate) -> RegistrationRequest {
        match self {
            RegistrationShape::Flat => flat_registration(registration),
            RegistrationShape::Nested => nested_registration(registration, today),
        }
    }
}

fn flat_registration(registration: &Registration) -> RegistrationRequest {
    RegistrationRequest {
        path: "/register/".to_string(),
        body: json!({
            "username": registration.username,
            "email": registration.email,
            "password": registration.password,
            "user_type": registration.kind.as_str(),
            "doctor_id": registration.doctor_id,
        }),
    }
}

fn nested_registration(registration: &Registration, today: NaiveDate) -> RegistrationRequest {
    let user = json!({
        "username": registration.username,
        "email": registration.email,
        "password": registration.password,
    });
    let body = match registration.kind {
        AccountKind::Doctor => json!({
            "user": user,
            "specialization": "General",
            "license_number": "TBD",
            "contact_number": "",
        }),
        AccountKind::Patient => json!({
            "user": user,
            "date_of_birth": today.format("%Y-%m-%d").to_string(),
            "blood_group": "A+",
            "contact_number": "",
            "address": "",
        }),
    };
    RegistrationRequest {
        path: format!("/{}s/", registration.kind.as_str()),
        body,
    }
}

/// Reads whatever the registration endpoint answered with. Both contracts
/// are accepted; fields that are absent stay `None`.
pub fn registration_receipt(body: &Value) -> RegistrationReceipt {
    let text = |key: &str| {
        body.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    RegistrationReceipt {
        message: text("message"),
        doctor: text("doctor"),
    }
}

//=========================================================================================
// "Impure" Response Structs
//=========================================================================================

#[derive(Deserialize)]
pub struct TokenResponse {
    access: String,
    refresh: String,
}
impl TokenResponse {
    pub fn to_domain(self) -> TokenPair {
        TokenPair {
            access: self.access,
            refresh: self.refresh,
        }
    }
}

#[derive(Deserialize)]
pub struct UserTypeResponse {
    pub user_type: String,
}

#[derive(Deserialize)]
pub struct DoctorNoteJson {
    #[serde(default)]
    id: Option<i64>,
    note: String,
    #[serde(default)]
    doctor_name: Option<String>,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}
impl DoctorNoteJson {
    pub fn to_domain(self) -> DoctorNote {
        DoctorNote {
            id: self.id,
            note: self.note,
            doctor_name: self.doctor_name,
            date: self.date,
        }
    }
}

#[derive(Deserialize)]
pub struct HealthRecordJson {
    id: i64,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
    #[serde(default)]
    patient: Option<i64>,
    #[serde(default)]
    doctor_notes: Vec<DoctorNoteJson>,
}
impl HealthRecordJson {
    pub fn to_domain(self) -> HealthRecord {
        HealthRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            date: self.date,
            patient: self.patient,
            doctor_notes: self
                .doctor_notes
                .into_iter()
                .map(DoctorNoteJson::to_domain)
                .collect(),
        }
    }
}

#[derive(Deserialize, Default)]
struct UserJson {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

#[derive(Deserialize)]
pub struct PatientJson {
    id: i64,
    #[serde(default)]
    user: UserJson,
    #[serde(default)]
    date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    address: Option<String>,
}
impl PatientJson {
    pub fn to_domain(self) -> PatientProfile {
        PatientProfile {
            id: self.id,
            username: self.user.username,
            email: self.user.email,
            first_name: self.user.first_name,
            last_name: self.user.last_name,
            date_of_birth: self.date_of_birth,
            phone_number: self.phone_number.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
pub struct AvailableDoctorJson {
    id: i64,
    username: String,
    #[serde(default)]
    email: String,
}
impl AvailableDoctorJson {
    pub fn to_domain(self) -> AvailableDoctor {
        AvailableDoctor {
            id: self.id,
            username: self.username,
            email: self.email,
        }
    }
}

//=========================================================================================
// Error Bodies
//=========================================================================================

/// Pulls a human-readable message out of an error body: `error`, then
/// `message`, then `detail`, then every field error joined by newlines.
pub fn server_message(body: &Value) -> Option<String> {
    let message = match body {
        Value::Object(map) => ["error", "message", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str).map(str::to_string))
            .or_else(|| join_messages(map.values())),
        Value::Array(items) => join_messages(items.iter()),
        Value::String(text) => Some(text.clone()),
        _ => None,
    };
    message.filter(|m| !m.trim().is_empty())
}

fn join_messages<'a>(values: impl Iterator<Item = &'a Value>) -> Option<String> {
    let mut parts = Vec::new();
    for value in values {
        match value {
            Value::String(text) => parts.push(text.clone()),
            Value::Array(items) => parts.extend(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string),
            ),
            _ => {}
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}
