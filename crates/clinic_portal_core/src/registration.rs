//! crates/clinic_portal_core/src/registration.rs
//!
//! Local checks on the registration form and the doctor picker that goes
//! with it.

use crate::domain::{AccountKind, AvailableDoctor, Registration, RegistrationReceipt};
use crate::error::{ActionError, CONNECTION_FAILED};
use crate::listing::Listing;
use crate::ports::PortError;

pub const SELECT_DOCTOR: &str = "Please select a doctor to proceed with registration.";
const NO_DOCTORS: &str =
    "There are no registered doctors in the system. Please try again later.";
const DOCTORS_FAILED: &str = "Failed to load available doctors. Please try again.";

/// The registration form as the user filled it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub kind: AccountKind,
    pub doctor_id: Option<i64>,
}

impl RegistrationForm {
    /// Produces a sendable registration, or the message explaining why the
    /// form cannot be sent yet.
    pub fn validate(self) -> Result<Registration, ActionError> {
        let username = self.username.trim().to_string();
        if username.is_empty() || self.password.is_empty() {
            return Err(ActionError::Invalid(
                "Username and password are required.".to_string(),
            ));
        }
        let doctor_id = match self.kind {
            AccountKind::Patient => Some(
                self.doctor_id
                    .ok_or_else(|| ActionError::Invalid(SELECT_DOCTOR.to_string()))?,
            ),
            AccountKind::Doctor => None,
        };
        Ok(Registration {
            username,
            email: self.email.trim().to_string(),
            password: self.password,
            kind: self.kind,
            doctor_id,
        })
    }
}

/// The message shown after a successful registration.
pub fn success_message(kind: AccountKind, receipt: &RegistrationReceipt) -> String {
    let mut message = String::from("Registration successful!");
    if let (AccountKind::Patient, Some(doctor)) = (kind, receipt.doctor.as_deref()) {
        message.push_str(&format!(" You have been registered under Dr. {}.", doctor));
    }
    message
}

/// What the doctor picker shows: the options (or why there are none) plus
/// an optional notice to alert the user with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorChoices {
    pub doctors: Listing<AvailableDoctor>,
    /// Text to show in place of options when the list could not be built.
    pub placeholder: Option<&'static str>,
    pub notice: Option<String>,
}

impl DoctorChoices {
    pub fn from_result(result: Result<Vec<AvailableDoctor>, PortError>) -> Self {
        match result {
            Ok(doctors) => Self {
                doctors: Listing::from_items(doctors),
                placeholder: None,
                notice: None,
            },
            Err(PortError::NotFound(message)) => Self {
                doctors: Listing::Empty,
                placeholder: Some("No doctors available"),
                notice: Some(message.unwrap_or_else(|| NO_DOCTORS.to_string())),
            },
            Err(error) => Self {
                doctors: Listing::Empty,
                placeholder: Some("Error loading doctors"),
                notice: Some(
                    ActionError::from_port(&error, DOCTORS_FAILED, CONNECTION_FAILED).to_string(),
                ),
            },
        }
    }
}
