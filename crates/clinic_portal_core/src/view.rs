//! crates/clinic_portal_core/src/view.rs
//!
//! The view router: which of the four top-level views is current.

use crate::domain::Role;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    PatientDashboard,
    DoctorDashboard,
}

impl View {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, View::PatientDashboard | View::DoctorDashboard)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Login => write!(f, "login"),
            View::Register => write!(f, "registration"),
            View::PatientDashboard => write!(f, "patient dashboard"),
            View::DoctorDashboard => write!(f, "doctor dashboard"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot go from the {from} view to the {to} view")]
    NotAllowed { from: View, to: View },
    #[error("no dashboard exists for the {0} role")]
    NoDashboard(Role),
}

/// Holds the current view. Only the transitions below are accepted; a
/// refused transition leaves the current view as it was.
#[derive(Debug, Clone)]
pub struct ViewRouter {
    current: View,
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self {
            current: View::Login,
        }
    }
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Login -> Register.
    pub fn show_register(&mut self) -> Result<View, TransitionError> {
        self.step(View::Login, View::Register)
    }

    /// Register -> Login. Already being on Login is accepted.
    pub fn show_login(&mut self) -> Result<View, TransitionError> {
        if self.current == View::Login {
            return Ok(View::Login);
        }
        self.step(View::Register, View::Login)
    }

    /// Login -> the dashboard matching `role`.
    pub fn enter_dashboard(&mut self, role: Role) -> Result<View, TransitionError> {
        let target = match role {
            Role::Patient => View::PatientDashboard,
            Role::Doctor => View::DoctorDashboard,
            Role::Unknown => return Err(TransitionError::NoDashboard(role)),
        };
        self.step(View::Login, target)
    }

    /// Any view -> Login.
    pub fn reset(&mut self) -> View {
        self.current = View::Login;
        self.current
    }

    fn step(&mut self, from: View, to: View) -> Result<View, TransitionError> {
        if self.current != from {
            return Err(TransitionError::NotAllowed {
                from: self.current,
                to,
            });
        }
        self.current = to;
        Ok(to)
    }
}
