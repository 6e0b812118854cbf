//! services/portal/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, which is the concrete implementation
//! of the `PortalBackend` port from the `core` crate. It talks to the clinic's
//! REST API using `reqwest` and maps every non-success answer onto `PortError`.

use crate::adapters::wire::{
    registration_receipt, server_message, AvailableDoctorJson, DoctorNoteJson, HealthRecordJson,
    NotePayload, PatientJson, RecordPayload, RegistrationShape, TokenRequest, TokenResponse,
    UserTypeResponse,
};
use async_trait::async_trait;
use clinic_portal_core::domain::{
    AvailableDoctor, DoctorNote, HealthRecord, PatientProfile, RecordDraft, Registration,
    RegistrationReceipt, Role, TokenPair,
};
use clinic_portal_core::ports::{PortError, PortResult, PortalBackend};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An HTTP adapter that implements the `PortalBackend` port.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    registration: RegistrationShape,
    doctor_patients_path: String,
}

impl HttpBackend {
    /// Creates a new `HttpBackend`. `base_url` is everything before the
    /// endpoint paths, e.g. `http://localhost:8000/api`.
    pub fn new(
        client: Client,
        base_url: &str,
        registration: RegistrationShape,
        doctor_patients_path: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            registration,
            doctor_patients_path: doctor_patients_path.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str, access: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(access)
    }

    /// Sends the request and turns any non-success status into a `PortError`
    /// carrying the server's message.
    async fn send(&self, request: RequestBuilder) -> PortResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "backend answered");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .as_ref()
            .and_then(server_message);
        Err(match status {
            StatusCode::UNAUTHORIZED => PortError::Unauthorized,
            StatusCode::NOT_FOUND => PortError::NotFound(message),
            _ => PortError::Rejected {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> PortResult<T> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| PortError::Unexpected(format!("Malformed response: {}", e)))
    }
}

//=========================================================================================
// Port Implementation
//=========================================================================================

#[async_trait]
impl PortalBackend for HttpBackend {
    async fn obtain_token(&self, username: &str, password: &str) -> PortResult<TokenPair> {
        let request = self
            .client
            .post(self.url("/token/"))
            .json(&TokenRequest { username, password });
        let tokens: TokenResponse = self.fetch(request).await?;
        Ok(tokens.to_domain())
    }

    async fn register(&self, registration: &Registration) -> PortResult<RegistrationReceipt> {
        let built = self.registration.build(registration);
        let request = self.client.post(self.url(&built.path)).json(&built.body);
        let body = self
            .send(request)
            .await?
            .json::<Value>()
            .await
            .unwrap_or_default();
        Ok(registration_receipt(&body))
    }

    async fn available_doctors(&self) -> PortResult<Vec<AvailableDoctor>> {
        let request = self.client.get(self.url("/available-doctors/"));
        let doctors: Vec<AvailableDoctorJson> = self.fetch(request).await?;
        Ok(doctors.into_iter().map(AvailableDoctorJson::to_domain).collect())
    }

    async fn fetch_user_type(&self, access: &str) -> PortResult<Role> {
        let answer: UserTypeResponse = self.fetch(self.get("/user-type/", access)).await?;
        Ok(Role::from_user_type(&answer.user_type))
    }

    async fn probe_patient(&self, access: &str) -> PortResult<()> {
        self.send(self.get("/patients/", access)).await.map(|_| ())
    }

    async fn probe_doctor(&self, access: &str) -> PortResult<()> {
        self.send(self.get("/doctors/", access)).await.map(|_| ())
    }

    async fn list_records(&self, access: &str) -> PortResult<Vec<HealthRecord>> {
        let records: Vec<HealthRecordJson> =
            self.fetch(self.get("/health-records/", access)).await?;
        Ok(records.into_iter().map(HealthRecordJson::to_domain).collect())
    }

    async fn get_record(&self, access: &str, record_id: i64) -> PortResult<HealthRecord> {
        let path = format!("/health-records/{}/", record_id);
        let record: HealthRecordJson = self.fetch(self.get(&path, access)).await?;
        Ok(record.to_domain())
    }

    async fn create_record(&self, access: &str, draft: &RecordDraft) -> PortResult<HealthRecord> {
        let request = self
            .client
            .post(self.url("/health-records/"))
            .bearer_auth(access)
            .json(&RecordPayload {
                title: &draft.title,
                description: &draft.description,
            });
        let record: HealthRecordJson = self.fetch(request).await?;
        Ok(record.to_domain())
    }

    async fn update_record(
        &self,
        access: &str,
        record_id: i64,
        draft: &RecordDraft,
    ) -> PortResult<HealthRecord> {
        let request = self
            .client
            .put(self.url(&format!("/health-records/{}/", record_id)))
            .bearer_auth(access)
            .json(&RecordPayload {
                title: &draft.title,
                description: &draft.description,
            });
        let record: HealthRecordJson = self.fetch(request).await?;
        Ok(record.to_domain())
    }

    async fn delete_record(&self, access: &str, record_id: i64) -> PortResult<()> {
        let request = self
            .client
            .delete(self.url(&format!("/health-records/{}/", record_id)))
            .bearer_auth(access);
        self.send(request).await.map(|_| ())
    }

    async fn list_notes(&self, access: &str, record_id: i64) -> PortResult<Vec<DoctorNote>> {
        let path = format!("/health-records/{}/notes/", record_id);
        let notes: Vec<DoctorNoteJson> = self.fetch(self.get(&path, access)).await?;
        Ok(notes.into_iter().map(DoctorNoteJson::to_domain).collect())
    }

    async fn add_note(&self, access: &str, record_id: i64, note: &str) -> PortResult<DoctorNote> {
        let request = self
            .client
            .post(self.url(&format!("/health-records/{}/notes/", record_id)))
            .bearer_auth(access)
            .json(&NotePayload { note });
        let created: DoctorNoteJson = self.fetch(request).await?;
        Ok(created.to_domain())
    }

    async fn doctor_patients(&self, access: &str) -> PortResult<Vec<PatientProfile>> {
        let patients: Vec<PatientJson> = self
            .fetch(self.get(&self.doctor_patients_path, access))
            .await?;
        Ok(patients.into_iter().map(PatientJson::to_domain).collect())
    }

    async fn patient_records(
        &self,
        access: &str,
        patient_id: i64,
    ) -> PortResult<Vec<HealthRecord>> {
        let path = format!("/patient-records/{}/", patient_id);
        let records: Vec<HealthRecordJson> = self.fetch(self.get(&path, access)).await?;
        Ok(records.into_iter().map(HealthRecordJson::to_domain).collect())
    }
}
