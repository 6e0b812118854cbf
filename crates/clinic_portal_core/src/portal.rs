//! crates/clinic_portal_core/src/portal.rs
//!
//! The session & dashboard controller. It owns the session, the view router
//! and both panels, and refuses any operation the current view does not offer.

use crate::auth::AuthGateway;
use crate::domain::{DoctorNote, HealthRecord, RecordDraft, Session};
use crate::error::ActionError;
use crate::listing::Listing;
use crate::panel::{
    Applied, DeleteOutcome, EditTarget, PatientRecords, PatientsPanel, RecordEditor, RecordsPanel,
};
use crate::ports::{Confirmation, PortalBackend, SessionStore};
use crate::registration::{DoctorChoices, RegistrationForm};
use crate::role::{RoleResolver, RoleStrategy};
use crate::view::{View, ViewRouter};
use std::sync::Arc;
use tracing::warn;

/// The outcome of reaching a dashboard. The dashboard is current even when
/// its first load failed; `load_error` carries that failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    pub view: View,
    pub display_name: String,
    pub load_error: Option<ActionError>,
}

pub struct Portal {
    gateway: AuthGateway,
    router: ViewRouter,
    session: Option<Session>,
    records: RecordsPanel,
    patients: PatientsPanel,
}

impl Portal {
    pub fn new(
        backend: Arc<dyn PortalBackend>,
        store: Arc<dyn SessionStore>,
        confirmation: Arc<dyn Confirmation>,
        strategy: RoleStrategy,
    ) -> Self {
        let resolver = RoleResolver::new(backend.clone(), strategy);
        Self {
            gateway: AuthGateway::new(backend.clone(), store, resolver),
            router: ViewRouter::new(),
            session: None,
            records: RecordsPanel::new(backend.clone(), confirmation),
            patients: PatientsPanel::new(backend),
        }
    }

    //=====================================================================================
    // Accessors
    //=====================================================================================

    pub fn view(&self) -> View {
        self.router.current()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn records(&self) -> &Listing<HealthRecord> {
        self.records.records()
    }

    pub fn editor(&self) -> Option<&RecordEditor> {
        self.records.editor()
    }

    pub fn patients(&self) -> &PatientsPanel {
        &self.patients
    }

    //=====================================================================================
    // Auth & Navigation
    //=====================================================================================

    /// Resumes a saved session on start-up. Returns `None`, with Login
    /// current, when there is nothing usable to resume.
    pub async fn restore_session(&mut self) -> Option<Arrival> {
        if self.view() != View::Login {
            return None;
        }
        let session = self.gateway.restore().await?;
        Some(self.arrive(session).await)
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<Arrival, ActionError> {
        self.require(View::Login)?;
        let session = self.gateway.login(username, password).await?;
        Ok(self.arrive(session).await)
    }

    /// Drops the session and everything displayed. Calling it while logged
    /// out only resets the view.
    pub fn logout(&mut self) -> Result<(), ActionError> {
        self.gateway.logout()?;
        self.session = None;
        self.records.reset();
        self.patients.reset();
        self.router.reset();
        Ok(())
    }

    pub fn show_register(&mut self) -> Result<View, ActionError> {
        self.router
            .show_register()
            .map_err(|_| ActionError::WrongView(self.router.current()))
    }

    pub fn show_login(&mut self) -> Result<View, ActionError> {
        self.router
            .show_login()
            .map_err(|_| ActionError::WrongView(self.router.current()))
    }

    pub async fn doctor_choices(&self) -> Result<DoctorChoices, ActionError> {
        self.require(View::Register)?;
        Ok(self.gateway.available_doctors().await)
    }

    /// Registers an account and returns to Login with the success message.
    pub async fn register(&mut self, form: RegistrationForm) -> Result<String, ActionError> {
        self.require(View::Register)?;
        let message = self.gateway.register(form).await?;
        self.show_login()?;
        Ok(message)
    }

    //=====================================================================================
    // Patient Dashboard
    //=====================================================================================

    pub async fn refresh_records(&mut self) -> Result<&Listing<HealthRecord>, ActionError> {
        let session = self.session_for(View::PatientDashboard)?;
        self.records.refresh(&session).await
    }

    pub async fn view_record(&self, record_id: i64) -> Result<HealthRecord, ActionError> {
        let session = self.session_for(View::PatientDashboard)?;
        self.records.view(&session, record_id).await
    }

    pub fn open_new_record(&mut self) -> Result<&RecordEditor, ActionError> {
        self.require(View::PatientDashboard)?;
        Ok(self.records.open_new())
    }

    pub async fn open_edit_record(&mut self, record_id: i64) -> Result<&RecordEditor, ActionError> {
        let session = self.session_for(View::PatientDashboard)?;
        self.records.open_edit(&session, record_id).await
    }

    pub fn close_editor(&mut self) {
        self.records.close_editor();
    }

    pub async fn submit_record(
        &mut self,
        draft: RecordDraft,
    ) -> Result<Applied<EditTarget>, ActionError> {
        let session = self.session_for(View::PatientDashboard)?;
        self.records.submit(&session, draft).await
    }

    pub async fn delete_record(
        &mut self,
        record_id: i64,
    ) -> Result<Applied<DeleteOutcome>, ActionError> {
        let session = self.session_for(View::PatientDashboard)?;
        self.records.delete(&session, record_id).await
    }

    //=====================================================================================
    // Doctor Dashboard
    //=====================================================================================

    pub async fn refresh_patients(&mut self) -> Result<(), ActionError> {
        let session = self.session_for(View::DoctorDashboard)?;
        self.patients.refresh(&session).await.map(|_| ())
    }

    pub async fn open_patient(&mut self, patient_id: i64) -> Result<&PatientRecords, ActionError> {
        let session = self.session_for(View::DoctorDashboard)?;
        self.patients.open_patient(&session, patient_id).await
    }

    pub fn back_to_patients(&mut self) -> Result<(), ActionError> {
        self.require(View::DoctorDashboard)?;
        self.patients.back();
        Ok(())
    }

    pub async fn notes(&self, record_id: i64) -> Result<Listing<DoctorNote>, ActionError> {
        let session = self.session_for(View::DoctorDashboard)?;
        self.patients.notes(&session, record_id).await
    }

    pub async fn add_note(
        &self,
        record_id: i64,
        text: &str,
    ) -> Result<Applied<Listing<DoctorNote>>, ActionError> {
        let session = self.session_for(View::DoctorDashboard)?;
        self.patients.add_note(&session, record_id, text).await
    }

    //=====================================================================================
    // Helpers
    //=====================================================================================

    /// Moves from Login into the session's dashboard and runs its first load.
    async fn arrive(&mut self, session: Session) -> Arrival {
        let view = match self.router.enter_dashboard(session.role) {
            Ok(view) => view,
            Err(e) => {
                warn!("Refusing dashboard transition: {}", e);
                return Arrival {
                    view: self.router.current(),
                    display_name: session.display_name(),
                    load_error: Some(ActionError::RoleUnresolved),
                };
            }
        };
        let load_error = match view {
            View::PatientDashboard => self.records.refresh(&session).await.err(),
            View::DoctorDashboard => self.patients.refresh(&session).await.err(),
            _ => None,
        };
        let display_name = session.display_name();
        self.session = Some(session);
        Arrival {
            view,
            display_name,
            load_error,
        }
    }

    fn require(&self, view: View) -> Result<(), ActionError> {
        let current = self.router.current();
        if current == view {
            Ok(())
        } else if view.is_logged_in() && !current.is_logged_in() {
            Err(ActionError::NotLoggedIn)
        } else {
            Err(ActionError::WrongView(current))
        }
    }

    /// A copy of the session, provided `view` is current. Cloned so the
    /// panels can be borrowed mutably alongside it.
    fn session_for(&self, view: View) -> Result<Session, ActionError> {
        self.require(view)?;
        self.session.clone().ok_or(ActionError::NotLoggedIn)
    }
}
