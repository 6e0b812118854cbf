//! crates/clinic_portal_core/src/panel/mod.rs
//!
//! The dashboard panels. Each one owns what its dashboard displays and
//! replaces it only after a request succeeds.

use crate::error::ActionError;

pub mod patients;
pub mod records;

pub use patients::{PatientRecords, PatientsPanel};
pub use records::{DeleteOutcome, EditTarget, RecordEditor, RecordsPanel};

/// A change the backend accepted. The displayed data is fetched again
/// afterwards; if that fetch fails the change still stands and
/// `reload_error` says what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied<T> {
    pub outcome: T,
    pub reload_error: Option<ActionError>,
}

impl<T> Applied<T> {
    pub fn clean(outcome: T) -> Self {
        Self {
            outcome,
            reload_error: None,
        }
    }
}
