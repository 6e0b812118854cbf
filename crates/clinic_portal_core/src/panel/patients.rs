//! crates/clinic_portal_core/src/panel/patients.rs
//!
//! The doctor's side: assigned patients, one patient's records at a time,
//! and the notes on a record.

use crate::domain::{DoctorNote, HealthRecord, PatientProfile, Session};
use crate::error::ActionError;
use crate::listing::Listing;
use crate::panel::Applied;
use crate::ports::PortalBackend;
use std::sync::Arc;
use tracing::{error, info};

const PATIENTS_FAILED: &str = "Failed to load patients";
const PATIENT_RECORDS_FAILED: &str = "Failed to load patient records. Please try again.";
const NOTES_FAILED: &str = "Failed to load doctor notes. Please try again.";
const ADD_NOTE_FAILED: &str = "Failed to add note. Please try again.";

/// The records of the patient the doctor opened.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecords {
    pub patient_id: i64,
    pub records: Listing<HealthRecord>,
}

pub struct PatientsPanel {
    backend: Arc<dyn PortalBackend>,
    patients: Listing<PatientProfile>,
    selected: Option<PatientRecords>,
}

impl PatientsPanel {
    pub fn new(backend: Arc<dyn PortalBackend>) -> Self {
        Self {
            backend,
            patients: Listing::NotLoaded,
            selected: None,
        }
    }

    pub fn patients(&self) -> &Listing<PatientProfile> {
        &self.patients
    }

    pub fn selected(&self) -> Option<&PatientRecords> {
        self.selected.as_ref()
    }

    pub fn reset(&mut self) {
        self.patients = Listing::NotLoaded;
        self.selected = None;
    }

    /// Fetches the doctor's patient list and returns to it.
    pub async fn refresh(
        &mut self,
        session: &Session,
    ) -> Result<&Listing<PatientProfile>, ActionError> {
        let fetched = self.backend.doctor_patients(session.access_token()).await;
        let listing = Listing::from_fetch(fetched).map_err(|e| {
            error!("Failed to load patients: {:?}", e);
            ActionError::with_fallback(&e, PATIENTS_FAILED)
        })?;
        self.patients = listing;
        self.selected = None;
        Ok(&self.patients)
    }

    pub async fn open_patient(
        &mut self,
        session: &Session,
        patient_id: i64,
    ) -> Result<&PatientRecords, ActionError> {
        let fetched = self
            .backend
            .patient_records(session.access_token(), patient_id)
            .await;
        let records = Listing::from_fetch(fetched).map_err(|e| {
            error!("Failed to load records of patient {}: {:?}", patient_id, e);
            ActionError::with_fallback(&e, PATIENT_RECORDS_FAILED)
        })?;
        Ok(self.selected.insert(PatientRecords {
            patient_id,
            records,
        }))
    }

    /// Back to the patient list as it was last fetched.
    pub fn back(&mut self) -> &Listing<PatientProfile> {
        self.selected = None;
        &self.patients
    }

    /// Notes are fetched every time; nothing is cached.
    pub async fn notes(
        &self,
        session: &Session,
        record_id: i64,
    ) -> Result<Listing<DoctorNote>, ActionError> {
        let fetched = self.backend.list_notes(session.access_token(), record_id).await;
        fetched.map(Listing::from_items).map_err(|e| {
            error!("Failed to load notes of record {}: {:?}", record_id, e);
            ActionError::with_fallback(&e, NOTES_FAILED)
        })
    }

    /// Adds a note, then fetches the record's notes again for display. The
    /// notes stay `NotLoaded` when that second fetch fails.
    pub async fn add_note(
        &self,
        session: &Session,
        record_id: i64,
        text: &str,
    ) -> Result<Applied<Listing<DoctorNote>>, ActionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ActionError::Invalid("Note cannot be empty.".to_string()));
        }
        self.backend
            .add_note(session.access_token(), record_id, text)
            .await
            .map_err(|e| {
                error!("Failed to add note to record {}: {:?}", record_id, e);
                ActionError::with_fallback(&e, ADD_NOTE_FAILED)
            })?;
        info!(record_id, "doctor note added");
        Ok(match self.notes(session, record_id).await {
            Ok(notes) => Applied::clean(notes),
            Err(e) => Applied {
                outcome: Listing::NotLoaded,
                reload_error: Some(e),
            },
        })
    }
}
