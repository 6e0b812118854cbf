//! crates/clinic_portal_core/src/auth.rs
//!
//! The auth gateway: the only writer of the persisted session.

use crate::domain::{PersistedSession, Role, Session};
use crate::error::ActionError;
use crate::ports::{PortError, PortalBackend, SessionStore};
use crate::registration::{success_message, DoctorChoices, RegistrationForm};
use crate::role::RoleResolver;
use std::sync::Arc;
use tracing::{error, info, warn};

const LOGIN_FAILED: &str = "An error occurred during login. Please try again.";
const REGISTRATION_FAILED: &str = "Registration failed";
const REGISTRATION_ERROR: &str = "An error occurred during registration. Please try again.";

#[derive(Clone)]
pub struct AuthGateway {
    backend: Arc<dyn PortalBackend>,
    store: Arc<dyn SessionStore>,
    resolver: RoleResolver,
}

impl AuthGateway {
    pub fn new(
        backend: Arc<dyn PortalBackend>,
        store: Arc<dyn SessionStore>,
        resolver: RoleResolver,
    ) -> Self {
        Self {
            backend,
            store,
            resolver,
        }
    }

    /// Exchanges credentials for tokens, persists them and resolves the
    /// role. A rejected login leaves the store exactly as it was; a login
    /// whose role cannot be resolved clears what it just stored.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ActionError> {
        // 1. Obtain the token pair
        let tokens = self
            .backend
            .obtain_token(username, password)
            .await
            .map_err(|e| {
                error!("Login failed: {:?}", e);
                match e {
                    PortError::Transport(_) | PortError::Unexpected(_) => {
                        ActionError::Network(LOGIN_FAILED.to_string())
                    }
                    _ => ActionError::InvalidCredentials,
                }
            })?;

        // 2. Persist it before anything else reads it
        let persisted = PersistedSession {
            tokens,
            username: Some(username.to_string()),
        };
        self.store.save(&persisted).map_err(|e| {
            error!("Failed to persist session: {:?}", e);
            ActionError::Storage(e.to_string())
        })?;

        // 3. Resolve the role
        let role = self.resolver.resolve(&persisted.tokens.access).await;
        if role == Role::Unknown {
            if let Err(e) = self.store.clear() {
                error!("Failed to clear session after role miss: {:?}", e);
            }
            return Err(ActionError::RoleUnresolved);
        }

        info!(username, %role, "logged in");
        Ok(Session {
            tokens: persisted.tokens,
            username: persisted.username,
            role,
        })
    }

    /// Clears the persisted tokens. Safe to call with nothing stored.
    pub fn logout(&self) -> Result<(), ActionError> {
        self.store.clear().map_err(|e| {
            error!("Failed to clear session: {:?}", e);
            ActionError::Storage(e.to_string())
        })?;
        info!("logged out");
        Ok(())
    }

    /// Picks up a session left by an earlier run. Any failure means "not
    /// logged in"; stored tokens are left in place.
    pub async fn restore(&self) -> Option<Session> {
        let persisted = match self.store.load() {
            Ok(Some(persisted)) => persisted,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read saved session: {:?}", e);
                return None;
            }
        };
        let role = self.resolver.resolve(&persisted.tokens.access).await;
        if role == Role::Unknown {
            warn!("Saved session could not be resolved to a role");
            return None;
        }
        info!(%role, "restored saved session");
        Some(Session {
            tokens: persisted.tokens,
            username: persisted.username,
            role,
        })
    }

    /// Validates and submits a registration, returning the success message.
    pub async fn register(&self, form: RegistrationForm) -> Result<String, ActionError> {
        let registration = form.validate()?;
        let receipt = self
            .backend
            .register(&registration)
            .await
            .map_err(|e| {
                error!("Registration failed: {:?}", e);
                ActionError::from_port(&e, REGISTRATION_FAILED, REGISTRATION_ERROR)
            })?;
        info!(username = %registration.username, kind = registration.kind.as_str(), "registered");
        Ok(success_message(registration.kind, &receipt))
    }

    pub async fn available_doctors(&self) -> DoctorChoices {
        let result = self.backend.available_doctors().await;
        if let Err(e) = &result {
            error!("Failed to load available doctors: {:?}", e);
        }
        DoctorChoices::from_result(result)
    }
}
