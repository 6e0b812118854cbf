//! services/portal/src/cli/shell.rs
//!
//! The interactive loop. Each input line becomes one command, runs as at most
//! one portal operation, and its outcome is rendered back to the console.
//! Failed operations are printed as alerts; only console I/O errors end the
//! loop.

use crate::cli::command::{Command, HELP};
use crate::cli::console::Console;
use crate::cli::render;
use crate::error::PortalError;
use clinic_portal_core::panel::{DeleteOutcome, EditTarget};
use clinic_portal_core::{ActionError, Arrival, Portal, RecordDraft, RegistrationForm, View};
use std::sync::Arc;
use tracing::{error, info};

pub struct Shell {
    portal: Portal,
    console: Arc<Console>,
}

impl Shell {
    pub fn new(portal: Portal, console: Arc<Console>) -> Self {
        Self { portal, console }
    }

    pub fn portal(&self) -> &Portal {
        &self.portal
    }

    /// Resumes any saved session, then reads commands until `quit` or the
    /// end of input.
    pub async fn run(&mut self) -> Result<(), PortalError> {
        let opening = match self.portal.restore_session().await {
            Some(arrival) => self.arrival_text(&arrival),
            None => render::header(View::Login, None),
        };
        self.console.write_line(&opening).await?;
        self.console
            .write_line("Type 'help' for the list of commands.")
            .await?;

        loop {
            self.console.prompt("> ").await?;
            let Some(line) = self.console.read_line().await? else {
                break;
            };
            let command = match Command::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    self.console.write_line(&e.to_string()).await?;
                    continue;
                }
            };

            match self.execute(command).await {
                Ok(text) => self.console.write_line(&text).await?,
                Err(PortalError::Action(e)) => {
                    self.console.write_line(&format!("Error: {}", e)).await?
                }
                Err(e) => {
                    error!("Failed to run command: {:?}", e);
                    return Err(e);
                }
            }
        }

        info!("Portal shell closed");
        Ok(())
    }

    /// Runs one command and returns what to print.
    async fn execute(&mut self, command: Command) -> Result<String, PortalError> {
        let text = match command {
            //-----------------------------------------------------------------------------
            // Auth & Navigation
            //-----------------------------------------------------------------------------
            Command::Login { username, password } => {
                let arrival = self.portal.login(&username, &password).await?;
                self.arrival_text(&arrival)
            }
            Command::Logout => {
                self.portal.logout()?;
                format!("Logged out.\n{}", render::header(View::Login, None))
            }
            Command::ShowLogin => render::header(self.portal.show_login()?, None),
            Command::ShowRegister => {
                let view = self.portal.show_register()?;
                format!("{}\n{}", render::header(view, None), self.doctor_text().await?)
            }
            Command::Doctors => self.doctor_text().await?,
            Command::Register {
                kind,
                username,
                email,
                password,
                doctor_id,
            } => {
                if self.portal.view() == View::Login {
                    self.portal.show_register()?;
                }
                let form = RegistrationForm {
                    username,
                    email,
                    password,
                    kind,
                    doctor_id,
                };
                let message = self.portal.register(form).await?;
                format!("{}\n{}", message, render::header(self.portal.view(), None))
            }
            Command::WhoAmI => match self.portal.session() {
                Some(session) => format!("{} ({})", session.display_name(), session.role),
                None => "Not logged in.".to_string(),
            },

            //-----------------------------------------------------------------------------
            // Patient Dashboard
            //-----------------------------------------------------------------------------
            Command::Records => render::records(self.portal.refresh_records().await?),
            Command::Record(id) => render::record_detail(&self.portal.view_record(id).await?),
            Command::New => {
                let resuming = matches!(
                    self.portal.editor(),
                    Some(editor) if editor.target == EditTarget::New
                );
                if !resuming {
                    self.portal.open_new_record()?;
                }
                self.fill_editor().await?
            }
            Command::Edit(id) => {
                self.portal.open_edit_record(id).await?;
                self.fill_editor().await?
            }
            Command::Delete(id) => {
                let deleted = self.portal.delete_record(id).await?;
                match deleted.outcome {
                    DeleteOutcome::Deleted => self.with_records(
                        "Health record deleted successfully!",
                        deleted.reload_error,
                    ),
                    DeleteOutcome::Cancelled => "Deletion cancelled.".to_string(),
                }
            }

            //-----------------------------------------------------------------------------
            // Doctor Dashboard
            //-----------------------------------------------------------------------------
            Command::Patients => {
                self.portal.refresh_patients().await?;
                render::patients(self.portal.patients().patients())
            }
            Command::Open(id) => render::patient_records(self.portal.open_patient(id).await?),
            Command::Back => {
                self.portal.back_to_patients()?;
                render::patients(self.portal.patients().patients())
            }
            Command::Notes(id) => render::notes(&self.portal.notes(id).await?),
            Command::Note { record_id, text } => {
                let added = self.portal.add_note(record_id, &text).await?;
                match added.reload_error {
                    Some(e) => format!("Note added successfully!\nError: {}", e),
                    None => format!("Note added successfully!\n{}", render::notes(&added.outcome)),
                }
            }

            Command::Help => HELP.to_string(),
            // Handled by the loop.
            Command::Quit => String::new(),
        };
        Ok(text)
    }

    fn arrival_text(&self, arrival: &Arrival) -> String {
        let header = render::header(arrival.view, Some(&arrival.display_name));
        let body = match (&arrival.load_error, arrival.view) {
            (Some(e), _) => format!("Error: {}", e),
            (None, View::PatientDashboard) => render::records(self.portal.records()),
            (None, View::DoctorDashboard) => render::patients(self.portal.patients().patients()),
            (None, _) => return header,
        };
        format!("{}\n{}", header, body)
    }

    async fn doctor_text(&self) -> Result<String, PortalError> {
        let choices = self.portal.doctor_choices().await?;
        let mut text = render::doctor_choices(&choices);
        if let Some(notice) = &choices.notice {
            text.push_str(&format!("\nNotice: {}", notice));
        }
        Ok(text)
    }

    /// Prompts for the open editor's fields and submits them. An empty answer
    /// keeps the current value; `cancel` closes the editor.
    async fn fill_editor(&mut self) -> Result<String, PortalError> {
        let Some(editor) = self.portal.editor().cloned() else {
            return Ok("No record is being edited.".to_string());
        };

        let Some(title) = self.field("Title", &editor.draft.title).await? else {
            self.portal.close_editor();
            return Ok("Cancelled.".to_string());
        };
        let Some(description) = self.field("Description", &editor.draft.description).await?
        else {
            self.portal.close_editor();
            return Ok("Cancelled.".to_string());
        };

        let saved = self
            .portal
            .submit_record(RecordDraft::new(title, description))
            .await?;
        let done = match saved.outcome {
            EditTarget::New => "Health record added successfully!",
            EditTarget::Existing(_) => "Health record updated successfully!",
        };
        Ok(self.with_records(done, saved.reload_error))
    }

    /// A success line followed by the refreshed list, or by the reason the
    /// list could not be fetched again.
    fn with_records(&self, done: &str, reload_error: Option<ActionError>) -> String {
        match reload_error {
            Some(e) => format!("{}\nError: {}", done, e),
            None => format!("{}\n{}", done, render::records(self.portal.records())),
        }
    }

    /// Reads one field. `None` means the user cancelled.
    async fn field(&self, label: &str, current: &str) -> Result<Option<String>, PortalError> {
        let question = if current.is_empty() {
            format!("{}: ", label)
        } else {
            format!("{} [{}]: ", label, current)
        };
        let answer = match self.console.ask(&question).await? {
            Some(answer) => answer,
            None => return Ok(None),
        };
        let answer = answer.trim();
        if answer.eq_ignore_ascii_case("cancel") {
            return Ok(None);
        }
        if answer.is_empty() {
            Ok(Some(current.to_string()))
        } else {
            Ok(Some(answer.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::console::scripted::{console, Transcript};
    use async_trait::async_trait;
    use chrono::Utc;
    use clinic_portal_core::domain::{
        AvailableDoctor, DoctorNote, HealthRecord, PatientProfile, PersistedSession, Registration,
        RegistrationReceipt, Role, TokenPair,
    };
    use clinic_portal_core::ports::{PortError, PortResult, PortalBackend, SessionStore};
    use clinic_portal_core::RoleStrategy;
    use std::sync::Mutex;

    /// A patient-only backend keeping its records in memory.
    #[derive(Default)]
    struct PatientBackend {
        records: Mutex<Vec<HealthRecord>>,
        deletes: Mutex<usize>,
        lists_down: Mutex<bool>,
    }

    #[async_trait]
    impl PortalBackend for PatientBackend {
        async fn obtain_token(&self, username: &str, password: &str) -> PortResult<TokenPair> {
            if username == "alice" && password == "pw1" {
                Ok(TokenPair {
                    access: "access".to_string(),
                    refresh: "refresh".to_string(),
                })
            } else {
                Err(PortError::Unauthorized)
            }
        }
        async fn register(&self, _registration: &Registration) -> PortResult<RegistrationReceipt> {
            Ok(RegistrationReceipt::default())
        }
        async fn available_doctors(&self) -> PortResult<Vec<AvailableDoctor>> {
            Err(PortError::NotFound(None))
        }
        async fn fetch_user_type(&self, _access: &str) -> PortResult<Role> {
            Ok(Role::Patient)
        }
        async fn probe_patient(&self, _access: &str) -> PortResult<()> {
            Ok(())
        }
        async fn probe_doctor(&self, _access: &str) -> PortResult<()> {
            Err(PortError::Rejected {
                status: 403,
                message: None,
            })
        }
        async fn list_records(&self, _access: &str) -> PortResult<Vec<HealthRecord>> {
            if *self.lists_down.lock().unwrap() {
                return Err(PortError::Rejected {
                    status: 500,
                    message: None,
                });
            }
            Ok(self.records.lock().unwrap().clone())
        }
        async fn get_record(&self, _access: &str, record_id: i64) -> PortResult<HealthRecord> {
            self.records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == record_id)
                .cloned()
                .ok_or(PortError::NotFound(None))
        }
        async fn create_record(
            &self,
            _access: &str,
            draft: &RecordDraft,
        ) -> PortResult<HealthRecord> {
            let mut records = self.records.lock().unwrap();
            let record = HealthRecord {
                id: records.len() as i64 + 1,
                title: draft.title.clone(),
                description: draft.description.clone(),
                date: Some(Utc::now()),
                patient: Some(1),
                doctor_notes: Vec::new(),
            };
            records.push(record.clone());
            Ok(record)
        }
        async fn update_record(
            &self,
            _access: &str,
            record_id: i64,
            draft: &RecordDraft,
        ) -> PortResult<HealthRecord> {
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|r| r.id == record_id)
                .ok_or(PortError::NotFound(None))?;
            record.title = draft.title.clone();
            record.description = draft.description.clone();
            Ok(record.clone())
        }
        async fn delete_record(&self, _access: &str, record_id: i64) -> PortResult<()> {
            *self.deletes.lock().unwrap() += 1;
            self.records.lock().unwrap().retain(|r| r.id != record_id);
            Ok(())
        }
        async fn list_notes(&self, _access: &str, _record_id: i64) -> PortResult<Vec<DoctorNote>> {
            Ok(Vec::new())
        }
        async fn add_note(
            &self,
            _access: &str,
            _record_id: i64,
            _note: &str,
        ) -> PortResult<DoctorNote> {
            Err(PortError::Rejected {
                status: 403,
                message: None,
            })
        }
        async fn doctor_patients(&self, _access: &str) -> PortResult<Vec<PatientProfile>> {
            Err(PortError::Rejected {
                status: 403,
                message: None,
            })
        }
        async fn patient_records(
            &self,
            _access: &str,
            _patient_id: i64,
        ) -> PortResult<Vec<HealthRecord>> {
            Err(PortError::NotFound(None))
        }
    }

    #[derive(Default)]
    struct NoStore;

    impl SessionStore for NoStore {
        fn load(&self) -> PortResult<Option<PersistedSession>> {
            Ok(None)
        }
        fn save(&self, _session: &PersistedSession) -> PortResult<()> {
            Ok(())
        }
        fn clear(&self) -> PortResult<()> {
            Ok(())
        }
    }

    async fn run(script: &str) -> (Transcript, Arc<PatientBackend>, Shell) {
        run_against(Arc::new(PatientBackend::default()), script).await
    }

    async fn run_against(
        backend: Arc<PatientBackend>,
        script: &str,
    ) -> (Transcript, Arc<PatientBackend>, Shell) {
        let (console, transcript) = console(script);
        let console = Arc::new(console);
        let portal = Portal::new(
            backend.clone(),
            Arc::new(NoStore),
            console.clone(),
            RoleStrategy::Explicit,
        );
        let mut shell = Shell::new(portal, console);
        shell.run().await.unwrap();
        (transcript, backend, shell)
    }

    #[tokio::test]
    async fn login_shows_empty_dashboard() {
        let (out, _, shell) = run("login alice pw1\nquit\n").await;
        let out = out.text();
        assert!(out.contains("== patient dashboard == Welcome, alice"));
        assert!(out.contains("No health records found."));
        assert_eq!(shell.portal().view(), View::PatientDashboard);
    }

    #[tokio::test]
    async fn bad_password_is_an_alert_not_a_crash() {
        let (out, _, shell) = run("login alice nope\nwhoami\n").await;
        let out = out.text();
        assert!(out.contains("Error: Invalid credentials"));
        assert!(out.contains("Not logged in."));
        assert_eq!(shell.portal().view(), View::Login);
    }

    #[tokio::test]
    async fn new_record_prompts_then_lists() {
        let (out, backend, _) = run("login alice pw1\nnew\nCheckup\nAll clear\n").await;
        let out = out.text();
        assert!(out.contains("Health record added successfully!"));
        assert!(out.contains("Checkup"));
        assert_eq!(backend.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn edit_keeps_blank_fields() {
        let script = "login alice pw1\nnew\nCheckup\nAll clear\nedit 1\n\nNeeds follow up\n";
        let (out, backend, _) = run(script).await;
        assert!(out.text().contains("Title [Checkup]: "));
        let records = backend.records.lock().unwrap();
        assert_eq!(records[0].title, "Checkup");
        assert_eq!(records[0].description, "Needs follow up");
    }

    #[tokio::test]
    async fn cancel_closes_the_editor() {
        let (out, backend, shell) = run("login alice pw1\nnew\ncancel\n").await;
        assert!(out.text().contains("Cancelled."));
        assert!(backend.records.lock().unwrap().is_empty());
        assert!(shell.portal().editor().is_none());
    }

    #[tokio::test]
    async fn added_record_is_reported_even_if_relist_fails() {
        let backend = Arc::new(PatientBackend::default());
        *backend.lists_down.lock().unwrap() = true;

        let (out, backend, shell) =
            run_against(backend, "login alice pw1\nnew\nCheckup\nAll clear\n").await;

        let out = out.text();
        assert!(out.contains(
            "Health record added successfully!\nError: Failed to load health records"
        ));
        assert_eq!(backend.records.lock().unwrap().len(), 1);
        assert!(shell.portal().editor().is_none());
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let script = "login alice pw1\nnew\nCheckup\nAll clear\ndelete 1\nn\n";
        let (out, backend, _) = run(script).await;
        assert!(out.text().contains("Deletion cancelled."));
        assert_eq!(*backend.deletes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn confirmed_delete_relists() {
        let script = "login alice pw1\nnew\nCheckup\nAll clear\ndelete 1\ny\n";
        let (out, backend, _) = run(script).await;
        let out = out.text();
        assert!(out.contains("Health record deleted successfully!"));
        assert!(out.ends_with("No health records found.\n> "));
        assert_eq!(*backend.deletes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn register_view_reports_missing_doctors() {
        let (out, _, _) = run("show register\n").await;
        let out = out.text();
        assert!(out.contains("No doctors available"));
        assert!(out.contains("Notice: There are no registered doctors in the system."));
    }

    #[tokio::test]
    async fn patient_registration_needs_a_doctor() {
        let (out, _, shell) = run("register patient carol c@x.org pw\n").await;
        assert!(out
            .text()
            .contains("Error: Please select a doctor to proceed with registration."));
        assert_eq!(shell.portal().view(), View::Register);
    }

    #[tokio::test]
    async fn doctor_commands_are_refused_for_patients() {
        let (out, _, _) = run("login alice pw1\npatients\n").await;
        assert!(out
            .text()
            .contains("Error: That action is not available from the patient dashboard view"));
    }
}
