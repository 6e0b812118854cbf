pub mod auth;
pub mod domain;
pub mod error;
pub mod listing;
pub mod panel;
pub mod portal;
pub mod ports;
pub mod registration;
pub mod role;
pub mod view;

#[cfg(test)]
mod testing;

pub use domain::{
    AccountKind, AvailableDoctor, DoctorNote, HealthRecord, PatientProfile, PersistedSession,
    RecordDraft, Registration, RegistrationReceipt, Role, Session, TokenPair,
};
pub use error::ActionError;
pub use listing::Listing;
pub use portal::{Arrival, Portal};
pub use ports::{Confirmation, PortError, PortResult, PortalBackend, SessionStore};
pub use registration::{DoctorChoices, RegistrationForm};
pub use role::RoleStrategy;
pub use view::View;
