//! In-memory stand-ins for the ports, used by the unit tests.

use crate::domain::{
    AvailableDoctor, DoctorNote, HealthRecord, PatientProfile, PersistedSession, RecordDraft,
    Registration, RegistrationReceipt, Role, TokenPair,
};
use crate::ports::{Confirmation, PortError, PortResult, PortalBackend, SessionStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

pub fn tokens() -> TokenPair {
    TokenPair {
        access: "access-1".into(),
        refresh: "refresh-1".into(),
    }
}

pub fn record(id: i64, title: &str) -> HealthRecord {
    HealthRecord {
        id,
        title: title.into(),
        description: format!("{} details", title),
        date: None,
        patient: Some(1),
        doctor_notes: Vec::new(),
    }
}

pub fn patient(id: i64, username: &str) -> PatientProfile {
    PatientProfile {
        id,
        username: username.into(),
        email: format!("{}@example.com", username),
        first_name: String::new(),
        last_name: String::new(),
        date_of_birth: None,
        phone_number: String::new(),
        address: String::new(),
    }
}

struct MockState {
    calls: Vec<String>,
    token: PortResult<TokenPair>,
    user_type: PortResult<Role>,
    patient_probe: PortResult<()>,
    doctor_probe: PortResult<()>,
    register: PortResult<RegistrationReceipt>,
    registrations: Vec<Registration>,
    doctors: PortResult<Vec<AvailableDoctor>>,
    records: Vec<HealthRecord>,
    list_error: Option<PortError>,
    mutation_error: Option<PortError>,
    notes: HashMap<i64, Vec<DoctorNote>>,
    patients: PortResult<Vec<PatientProfile>>,
    patient_records: HashMap<i64, Vec<HealthRecord>>,
    next_id: i64,
}

/// A backend that keeps records in memory and logs every request as
/// `"<METHOD> <path>"`.
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                calls: Vec::new(),
                token: Ok(tokens()),
                user_type: Ok(Role::Patient),
                patient_probe: Ok(()),
                doctor_probe: Err(PortError::Rejected {
                    status: 403,
                    message: None,
                }),
                register: Ok(RegistrationReceipt::default()),
                registrations: Vec::new(),
                doctors: Ok(Vec::new()),
                records: Vec::new(),
                list_error: None,
                mutation_error: None,
                notes: HashMap::new(),
                patients: Ok(Vec::new()),
                patient_records: HashMap::new(),
                next_id: 100,
            }),
        }
    }

    pub fn with_token(self, token: PortResult<TokenPair>) -> Self {
        self.state.lock().unwrap().token = token;
        self
    }

    pub fn with_user_type(self, user_type: PortResult<Role>) -> Self {
        self.state.lock().unwrap().user_type = user_type;
        self
    }

    pub fn with_patient_probe(self, probe: PortResult<()>) -> Self {
        self.state.lock().unwrap().patient_probe = probe;
        self
    }

    pub fn with_doctor_probe(self, probe: PortResult<()>) -> Self {
        self.state.lock().unwrap().doctor_probe = probe;
        self
    }

    pub fn with_register(self, register: PortResult<RegistrationReceipt>) -> Self {
        self.state.lock().unwrap().register = register;
        self
    }

    pub fn with_doctors(self, doctors: PortResult<Vec<AvailableDoctor>>) -> Self {
        self.state.lock().unwrap().doctors = doctors;
        self
    }

    pub fn with_records(self, records: Vec<HealthRecord>) -> Self {
        self.state.lock().unwrap().records = records;
        self
    }

    pub fn with_notes(self, record_id: i64, notes: Vec<DoctorNote>) -> Self {
        self.state.lock().unwrap().notes.insert(record_id, notes);
        self
    }

    pub fn with_patients(self, patients: PortResult<Vec<PatientProfile>>) -> Self {
        self.state.lock().unwrap().patients = patients;
        self
    }

    pub fn with_patient_records(self, patient_id: i64, records: Vec<HealthRecord>) -> Self {
        self.state
            .lock()
            .unwrap()
            .patient_records
            .insert(patient_id, records);
        self
    }

    pub fn fail_lists(&self, error: Option<PortError>) {
        self.state.lock().unwrap().list_error = error;
    }

    pub fn fail_mutations(&self, error: Option<PortError>) {
        self.state.lock().unwrap().mutation_error = error;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn registrations(&self) -> Vec<Registration> {
        self.state.lock().unwrap().registrations.clone()
    }

    fn log(&self, call: String) -> std::sync::MutexGuard<'_, MockState> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state
    }
}

#[async_trait]
impl PortalBackend for MockBackend {
    async fn obtain_token(&self, _username: &str, _password: &str) -> PortResult<TokenPair> {
        self.log("POST /token/".into()).token.clone()
    }

    async fn register(&self, registration: &Registration) -> PortResult<RegistrationReceipt> {
        let mut state = self.log("POST /register/".into());
        state.registrations.push(registration.clone());
        state.register.clone()
    }

    async fn available_doctors(&self) -> PortResult<Vec<AvailableDoctor>> {
        self.log("GET /available-doctors/".into()).doctors.clone()
    }

    async fn fetch_user_type(&self, _access: &str) -> PortResult<Role> {
        self.log("GET /user-type/".into()).user_type.clone()
    }

    async fn probe_patient(&self, _access: &str) -> PortResult<()> {
        self.log("GET /patients/".into()).patient_probe.clone()
    }

    async fn probe_doctor(&self, _access: &str) -> PortResult<()> {
        self.log("GET /doctors/".into()).doctor_probe.clone()
    }

    async fn list_records(&self, _access: &str) -> PortResult<Vec<HealthRecord>> {
        let state = self.log("GET /health-records/".into());
        match &state.list_error {
            Some(e) => Err(e.clone()),
            None => Ok(state.records.clone()),
        }
    }

    async fn get_record(&self, _access: &str, record_id: i64) -> PortResult<HealthRecord> {
        let state = self.log(format!("GET /health-records/{}/", record_id));
        state
            .records
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
            .ok_or(PortError::NotFound(None))
    }

    async fn create_record(&self, _access: &str, draft: &RecordDraft) -> PortResult<HealthRecord> {
        let mut state = self.log("POST /health-records/".into());
        if let Some(e) = &state.mutation_error {
            return Err(e.clone());
        }
        state.next_id += 1;
        let mut created = record(state.next_id, &draft.title);
        created.description = draft.description.clone();
        state.records.push(created.clone());
        Ok(created)
    }

    async fn update_record(
        &self,
        _access: &str,
        record_id: i64,
        draft: &RecordDraft,
    ) -> PortResult<HealthRecord> {
        let mut state = self.log(format!("PUT /health-records/{}/", record_id));
        if let Some(e) = &state.mutation_error {
            return Err(e.clone());
        }
        let found = state
            .records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or(PortError::NotFound(None))?;
        found.title = draft.title.clone();
        found.description = draft.description.clone();
        Ok(found.clone())
    }

    async fn delete_record(&self, _access: &str, record_id: i64) -> PortResult<()> {
        let mut state = self.log(format!("DELETE /health-records/{}/", record_id));
        if let Some(e) = &state.mutation_error {
            return Err(e.clone());
        }
        state.records.retain(|r| r.id != record_id);
        Ok(())
    }

    async fn list_notes(&self, _access: &str, record_id: i64) -> PortResult<Vec<DoctorNote>> {
        let state = self.log(format!("GET /health-records/{}/notes/", record_id));
        match &state.list_error {
            Some(e) => Err(e.clone()),
            None => Ok(state.notes.get(&record_id).cloned().unwrap_or_default()),
        }
    }

    async fn add_note(&self, _access: &str, record_id: i64, note: &str) -> PortResult<DoctorNote> {
        let mut state = self.log(format!("POST /health-records/{}/notes/", record_id));
        if let Some(e) = &state.mutation_error {
            return Err(e.clone());
        }
        let created = DoctorNote {
            id: None,
            note: note.to_string(),
            doctor_name: Some("house".into()),
            date: None,
        };
        state.notes.entry(record_id).or_default().push(created.clone());
        Ok(created)
    }

    async fn doctor_patients(&self, _access: &str) -> PortResult<Vec<PatientProfile>> {
        self.log("GET /doctors/patients/".into()).patients.clone()
    }

    async fn patient_records(
        &self,
        _access: &str,
        patient_id: i64,
    ) -> PortResult<Vec<HealthRecord>> {
        let state = self.log(format!("GET /patient-records/{}/", patient_id));
        state
            .patient_records
            .get(&patient_id)
            .cloned()
            .ok_or(PortError::NotFound(Some(
                "Patient not found or not assigned to you".into(),
            )))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<PersistedSession>>,
}

impl MemoryStore {
    pub fn holding(session: PersistedSession) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }

    pub fn current(&self) -> Option<PersistedSession> {
        self.slot.lock().unwrap().clone()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> PortResult<Option<PersistedSession>> {
        Ok(self.current())
    }

    fn save(&self, session: &PersistedSession) -> PortResult<()> {
        *self.slot.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

/// Answers every question the same way and remembers what was asked.
pub struct ScriptedConfirmation {
    answer: bool,
    asked: Mutex<Vec<String>>,
}

impl ScriptedConfirmation {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirmation for ScriptedConfirmation {
    async fn confirm(&self, question: &str) -> bool {
        self.asked.lock().unwrap().push(question.to_string());
        self.answer
    }
}
