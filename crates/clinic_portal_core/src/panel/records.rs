//! crates/clinic_portal_core/src/panel/records.rs
//!
//! The patient's own health records: list, view, create, edit, delete.

use crate::domain::{HealthRecord, RecordDraft, Session};
use crate::error::ActionError;
use crate::listing::Listing;
use crate::panel::Applied;
use crate::ports::{Confirmation, PortalBackend};
use std::sync::Arc;
use tracing::{error, info};

const LOAD_FAILED: &str = "Failed to load health records";
const VIEW_FAILED: &str = "Failed to view record. Please try again.";
const EDIT_FAILED: &str = "Failed to edit record. Please try again.";
const ADD_FAILED: &str = "Failed to add health record";
const ADD_ERROR: &str = "An error occurred while adding the health record";
const UPDATE_FAILED: &str = "Failed to update record. Please try again.";
const DELETE_FAILED: &str = "Failed to delete record. Please try again.";
pub const DELETE_QUESTION: &str = "Are you sure you want to delete this record?";

/// Whether the input surface creates a record or rewrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    New,
    Existing(i64),
}

/// The open record input surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEditor {
    pub target: EditTarget,
    pub draft: RecordDraft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

pub struct RecordsPanel {
    backend: Arc<dyn PortalBackend>,
    confirmation: Arc<dyn Confirmation>,
    records: Listing<HealthRecord>,
    editor: Option<RecordEditor>,
}

impl RecordsPanel {
    pub fn new(backend: Arc<dyn PortalBackend>, confirmation: Arc<dyn Confirmation>) -> Self {
        Self {
            backend,
            confirmation,
            records: Listing::NotLoaded,
            editor: None,
        }
    }

    pub fn records(&self) -> &Listing<HealthRecord> {
        &self.records
    }

    pub fn editor(&self) -> Option<&RecordEditor> {
        self.editor.as_ref()
    }

    /// Forgets everything displayed.
    pub fn reset(&mut self) {
        self.records = Listing::NotLoaded;
        self.editor = None;
    }

    /// Replaces the displayed list with a fresh fetch.
    pub async fn refresh(
        &mut self,
        session: &Session,
    ) -> Result<&Listing<HealthRecord>, ActionError> {
        let fetched = self.backend.list_records(session.access_token()).await;
        let listing = Listing::from_fetch(fetched).map_err(|e| {
            error!("Failed to load health records: {:?}", e);
            ActionError::with_fallback(&e, LOAD_FAILED)
        })?;
        self.records = listing;
        Ok(&self.records)
    }

    /// Fetches one record with its notes for display. Nothing is kept.
    pub async fn view(
        &self,
        session: &Session,
        record_id: i64,
    ) -> Result<HealthRecord, ActionError> {
        self.backend
            .get_record(session.access_token(), record_id)
            .await
            .map_err(|e| {
                error!("Failed to view record {}: {:?}", record_id, e);
                ActionError::with_fallback(&e, VIEW_FAILED)
            })
    }

    /// Opens the input surface with blank fields.
    pub fn open_new(&mut self) -> &RecordEditor {
        self.editor.insert(RecordEditor {
            target: EditTarget::New,
            draft: RecordDraft::default(),
        })
    }

    /// Opens the input surface pre-filled from the backend's copy.
    pub async fn open_edit(
        &mut self,
        session: &Session,
        record_id: i64,
    ) -> Result<&RecordEditor, ActionError> {
        let record = self
            .backend
            .get_record(session.access_token(), record_id)
            .await
            .map_err(|e| {
                error!("Failed to fetch record {} for editing: {:?}", record_id, e);
                ActionError::with_fallback(&e, EDIT_FAILED)
            })?;
        Ok(self.editor.insert(RecordEditor {
            target: EditTarget::Existing(record.id),
            draft: RecordDraft::from(&record),
        }))
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Sends the open surface's content. On success the surface closes and
    /// the list is fetched again; on failure the surface keeps `draft`.
    pub async fn submit(
        &mut self,
        session: &Session,
        draft: RecordDraft,
    ) -> Result<Applied<EditTarget>, ActionError> {
        let target = self
            .editor
            .as_ref()
            .map(|editor| editor.target)
            .ok_or_else(|| ActionError::Invalid("No record form is open.".to_string()))?;

        if let Some(editor) = self.editor.as_mut() {
            editor.draft = draft.clone();
        }
        if draft.title.trim().is_empty() || draft.description.trim().is_empty() {
            return Err(ActionError::Invalid(
                "Title and description are required.".to_string(),
            ));
        }

        let access = session.access_token();
        match target {
            EditTarget::New => {
                let created = self
                    .backend
                    .create_record(access, &draft)
                    .await
                    .map_err(|e| {
                        error!("Failed to add health record: {:?}", e);
                        ActionError::from_port(&e, ADD_FAILED, ADD_ERROR)
                    })?;
                info!(record_id = created.id, "health record added");
            }
            EditTarget::Existing(record_id) => {
                self.backend
                    .update_record(access, record_id, &draft)
                    .await
                    .map_err(|e| {
                        error!("Failed to update record {}: {:?}", record_id, e);
                        ActionError::with_fallback(&e, UPDATE_FAILED)
                    })?;
                info!(record_id, "health record updated");
            }
        }

        self.editor = None;
        Ok(Applied {
            outcome: target,
            reload_error: self.refresh(session).await.err(),
        })
    }

    /// Deletes after the user confirms. Without an affirmative answer no
    /// request is made.
    pub async fn delete(
        &mut self,
        session: &Session,
        record_id: i64,
    ) -> Result<Applied<DeleteOutcome>, ActionError> {
        if !self.confirmation.confirm(DELETE_QUESTION).await {
            return Ok(Applied::clean(DeleteOutcome::Cancelled));
        }
        self.backend
            .delete_record(session.access_token(), record_id)
            .await
            .map_err(|e| {
                error!("Failed to delete record {}: {:?}", record_id, e);
                ActionError::with_fallback(&e, DELETE_FAILED)
            })?;
        info!(record_id, "health record deleted");
        Ok(Applied {
            outcome: DeleteOutcome::Deleted,
            reload_error: self.refresh(session).await.err(),
        })
    }
}
