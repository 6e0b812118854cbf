//! crates/clinic_portal_core/src/error.rs
//!
//! User-facing errors produced by the controller. The `Display` of every
//! variant is the exact text shown to the user.

use crate::ports::PortError;
use crate::view::View;

pub const CONNECTION_FAILED: &str =
    "Failed to connect to the server. Please check your connection and try again.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The request never reached the backend or never came back.
    #[error("{0}")]
    Network(String),

    /// The backend refused the request.
    #[error("{0}")]
    Rejected(String),

    /// Local validation stopped the request before it was sent.
    #[error("{0}")]
    Invalid(String),

    /// The persisted session could not be read or written.
    #[error("Could not update the saved session: {0}")]
    Storage(String),

    #[error("An error occurred while loading dashboard. Please try logging in again.")]
    RoleUnresolved,

    #[error("Please log in first")]
    NotLoggedIn,

    #[error("That action is not available from the {0} view")]
    WrongView(View),
}

impl ActionError {
    /// Converts a port failure into what the user sees: the server's own
    /// message when it sent one, otherwise `fallback`. Transport failures
    /// always get `network`.
    pub fn from_port(error: &PortError, fallback: &str, network: &str) -> Self {
        match error {
            PortError::Transport(_) => ActionError::Network(network.to_string()),
            other => ActionError::Rejected(
                other
                    .server_message()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(fallback)
                    .to_string(),
            ),
        }
    }

    /// Like [`ActionError::from_port`] but the fallback doubles as the
    /// network message.
    pub fn with_fallback(error: &PortError, fallback: &str) -> Self {
        Self::from_port(error, fallback, fallback)
    }
}
