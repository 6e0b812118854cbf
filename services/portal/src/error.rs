//! services/portal/src/error.rs
//!
//! Defines the primary error type for the portal client service.

use crate::config::ConfigError;
use clinic_portal_core::error::ActionError;
use clinic_portal_core::ports::PortError;

/// The primary error type for the `portal` service.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error building or using the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., the console went away).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A user-facing failure of a portal operation. The shell prints these
    /// and keeps running.
    #[error("{0}")]
    Action(#[from] ActionError),
}

