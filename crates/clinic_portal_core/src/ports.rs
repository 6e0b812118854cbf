//! crates/clinic_portal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the portal's controller logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the HTTP client, the storage medium and the front-end.

use async_trait::async_trait;
use crate::domain::{
    AvailableDoctor, DoctorNote, HealthRecord, PatientProfile, PersistedSession, RecordDraft,
    Registration, RegistrationReceipt, Role, TokenPair,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., HTTP, filesystem).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The backend answered 404. The message is whatever the body carried.
    #[error("Item not found: {}", detail(.0))]
    NotFound(Option<String>),
    /// The backend answered 401.
    #[error("Unauthorized")]
    Unauthorized,
    /// Any other non-success answer.
    #[error("Request rejected with status {status}: {}", detail(.message))]
    Rejected { status: u16, message: Option<String> },
    /// The request never got an answer.
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

fn detail(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("no detail")
}

impl PortError {
    /// The message the server supplied with its answer, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            PortError::NotFound(message) => message.as_deref(),
            PortError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The clinic's REST backend. Every method after `obtain_token` that takes
/// an `access` token sends it as a bearer credential.
#[async_trait]
pub trait PortalBackend: Send + Sync {
    // --- Authentication ---
    async fn obtain_token(&self, username: &str, password: &str) -> PortResult<TokenPair>;

    async fn register(&self, registration: &Registration) -> PortResult<RegistrationReceipt>;

    async fn available_doctors(&self) -> PortResult<Vec<AvailableDoctor>>;

    // --- Role Resolution ---
    /// Reads the explicit `user_type` field.
    async fn fetch_user_type(&self, access: &str) -> PortResult<Role>;

    /// Succeeds only if the identity may read the patient endpoint.
    async fn probe_patient(&self, access: &str) -> PortResult<()>;

    /// Succeeds only if the identity may read the doctor endpoint.
    async fn probe_doctor(&self, access: &str) -> PortResult<()>;

    // --- Health Records ---
    async fn list_records(&self, access: &str) -> PortResult<Vec<HealthRecord>>;

    async fn get_record(&self, access: &str, record_id: i64) -> PortResult<HealthRecord>;

    async fn create_record(&self, access: &str, draft: &RecordDraft) -> PortResult<HealthRecord>;

    async fn update_record(
        &self,
        access: &str,
        record_id: i64,
        draft: &RecordDraft,
    ) -> PortResult<HealthRecord>;

    async fn delete_record(&self, access: &str, record_id: i64) -> PortResult<()>;

    // --- Doctor Notes ---
    async fn list_notes(&self, access: &str, record_id: i64) -> PortResult<Vec<DoctorNote>>;

    async fn add_note(&self, access: &str, record_id: i64, note: &str) -> PortResult<DoctorNote>;

    // --- Doctor's Patients ---
    async fn doctor_patients(&self, access: &str) -> PortResult<Vec<PatientProfile>>;

    async fn patient_records(&self, access: &str, patient_id: i64)
        -> PortResult<Vec<HealthRecord>>;
}

/// Durable client-side storage for the token pair.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> PortResult<Option<PersistedSession>>;

    fn save(&self, session: &PersistedSession) -> PortResult<()>;

    /// Removes whatever is stored. Clearing an empty store succeeds.
    fn clear(&self) -> PortResult<()>;
}

/// Asks the user to affirm a destructive action.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, question: &str) -> bool;
}
