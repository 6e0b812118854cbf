//! crates/clinic_portal_core/src/role.rs
//!
//! Decides whether an access token belongs to a patient or a doctor.

use crate::domain::Role;
use crate::ports::{PortError, PortalBackend};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// How the role is discovered. The two backend variants disagree, so the
/// choice is configuration rather than a merge of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleStrategy {
    /// Try the patient endpoint, then the doctor endpoint; first success wins.
    Probe,
    /// Read `user_type` from the dedicated endpoint.
    Explicit,
}

impl FromStr for RoleStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "probe" => Ok(RoleStrategy::Probe),
            "explicit" | "user-type" | "user_type" => Ok(RoleStrategy::Explicit),
            other => Err(format!("'{}' is not a role strategy (probe|explicit)", other)),
        }
    }
}

impl fmt::Display for RoleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleStrategy::Probe => write!(f, "probe"),
            RoleStrategy::Explicit => write!(f, "explicit"),
        }
    }
}

#[derive(Clone)]
pub struct RoleResolver {
    backend: Arc<dyn PortalBackend>,
    strategy: RoleStrategy,
}

impl RoleResolver {
    pub fn new(backend: Arc<dyn PortalBackend>, strategy: RoleStrategy) -> Self {
        Self { backend, strategy }
    }

    pub fn strategy(&self) -> RoleStrategy {
        self.strategy
    }

    /// Never fails: anything that does not positively identify a role
    /// yields `Role::Unknown`.
    pub async fn resolve(&self, access: &str) -> Role {
        let role = match self.strategy {
            RoleStrategy::Probe => self.probe(access).await,
            RoleStrategy::Explicit => match self.backend.fetch_user_type(access).await {
                Ok(role) => role,
                Err(e) => {
                    warn!("Failed to get user type: {:?}", e);
                    Role::Unknown
                }
            },
        };
        debug!(strategy = %self.strategy, %role, "role resolved");
        role
    }

    async fn probe(&self, access: &str) -> Role {
        match self.backend.probe_patient(access).await {
            Ok(()) => return Role::Patient,
            Err(PortError::Transport(e)) => {
                warn!("Patient probe could not reach the backend: {}", e);
                return Role::Unknown;
            }
            Err(_) => {}
        }
        match self.backend.probe_doctor(access).await {
            Ok(()) => Role::Doctor,
            Err(e) => {
                warn!("Neither role probe succeeded: {:?}", e);
                Role::Unknown
            }
        }
    }
}
